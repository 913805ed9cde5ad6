// Route manifest parser for authorisation-check
// Uses serde_json to read either a `{"routes": [...]}` list or the object
// emitted by Symfony's `debug:router --format=json`

use super::{invalid, read_json, RouteTableParser};
use crate::error::FatalError;
use crate::models::Route;
use crate::router::RouteTable;
use serde_json::{Map, Value};
use std::path::Path;
use tracing::warn;

pub struct ManifestParser;

impl ManifestParser {
    pub fn from_value(json: &Value, path: &Path) -> Result<RouteTable, FatalError> {
        let mut table = RouteTable::new();

        if let Some(entries) = json.get("routes").and_then(|r| r.as_array()) {
            for (index, entry) in entries.iter().enumerate() {
                let name = entry
                    .get("name")
                    .and_then(|n| n.as_str())
                    .ok_or_else(|| invalid(path, format!("route #{} has no name", index)))?;
                table.add(route_from_entry(name, entry, path)?);
            }
        } else if let Some(map) = json.as_object() {
            // Symfony dump: route name -> route description, in registration order
            for (name, entry) in map {
                table.add(route_from_entry(name, entry, path)?);
            }
        } else {
            return Err(invalid(path, "expected a JSON object"));
        }

        Ok(table)
    }
}

impl RouteTableParser for ManifestParser {
    fn parse(&self, path: &Path) -> Result<RouteTable, FatalError> {
        let json = read_json(path)?;
        ManifestParser::from_value(&json, path)
    }
}

fn route_from_entry(name: &str, entry: &Value, path: &Path) -> Result<Route, FatalError> {
    let template = entry
        .get("path")
        .and_then(|p| p.as_str())
        .ok_or_else(|| invalid(path, format!("route \"{}\" has no path", name)))?;

    let mut route = Route::new(name, template);

    // PHP encodes an empty map as `[]`, anything that is not an object is empty
    if let Some(defaults) = entry.get("defaults").and_then(|d| d.as_object()) {
        for (param, value) in defaults {
            route.defaults.insert(param.clone(), value.clone());
        }
    }

    // Absent requirements are dumped as the string "NO CUSTOM"
    if let Some(requirements) = entry.get("requirements").and_then(|r| r.as_object()) {
        add_requirements(&mut route, requirements);
    }

    Ok(route)
}

fn add_requirements(route: &mut Route, requirements: &Map<String, Value>) {
    for (param, pattern) in requirements {
        match pattern.as_str() {
            Some(p) => {
                route.requirements.insert(param.clone(), p.to_string());
            }
            None => warn!(route = %route.name, parameter = %param, "ignoring non-string requirement"),
        }
    }
}
