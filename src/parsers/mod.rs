// Route table loaders for authorisation-check
// Picks a parser from the shape of the input, the way a collection is picked
// by file type

pub mod directory;
pub mod manifest;
pub mod openapi;

pub use directory::DirectoryParser;
pub use manifest::ManifestParser;
pub use openapi::OpenApiParser;

use crate::error::FatalError;
use crate::router::RouteTable;
use serde_json::Value;
use std::path::{Path, PathBuf};

/// Trait for loading a route table from a file or directory
pub trait RouteTableParser {
    fn parse(&self, path: &Path) -> Result<RouteTable, FatalError>;
}

/// Directory, OpenAPI document or route manifest, decided by the input.
pub fn load_route_table(path: &Path) -> Result<RouteTable, FatalError> {
    if path.is_dir() {
        return DirectoryParser.parse(path);
    }
    if path.extension().map_or(false, |ext| ext == "json") {
        let json = read_json(path)?;
        return if json.get("openapi").is_some() {
            OpenApiParser::from_value(&json, path)
        } else {
            ManifestParser::from_value(&json, path)
        };
    }
    Err(FatalError::UnsupportedInput(path.to_path_buf()))
}

pub(crate) fn read_json(path: &Path) -> Result<Value, FatalError> {
    let data = std::fs::read_to_string(path).map_err(|source| FatalError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&data).map_err(|source| FatalError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

pub(crate) fn invalid(path: &Path, reason: impl Into<String>) -> FatalError {
    FatalError::InvalidRouteTable {
        path: PathBuf::from(path),
        reason: reason.into(),
    }
}
