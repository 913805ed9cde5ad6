// Directory loader for authorisation-check
// Uses walkdir to merge every .json route table found under a directory

use super::{load_route_table, RouteTableParser};
use crate::error::FatalError;
use crate::router::RouteTable;
use std::path::Path;
use tracing::{debug, warn};
use walkdir::WalkDir;

pub struct DirectoryParser;

impl RouteTableParser for DirectoryParser {
    fn parse(&self, dir_path: &Path) -> Result<RouteTable, FatalError> {
        let mut table = RouteTable::new();

        for entry in WalkDir::new(dir_path).sort_by_file_name() {
            let entry = entry.map_err(|e| FatalError::Read {
                path: e.path().unwrap_or(dir_path).to_path_buf(),
                source: e.into(),
            })?;
            if !entry.file_type().is_file() || entry.path().extension().map_or(true, |ext| ext != "json") {
                continue;
            }
            let loaded = load_route_table(entry.path())?;
            if loaded.is_empty() {
                warn!(file = %entry.path().display(), "route table declares no routes");
            }
            debug!(file = %entry.path().display(), routes = loaded.len(), "loaded route table");
            table.extend(loaded.routes().iter().cloned());
        }

        Ok(table)
    }
}
