// OpenAPI parser for authorisation-check
// Uses serde_json to turn the GET operations of an openapi.json into routes

use super::{invalid, read_json, RouteTableParser};
use crate::error::FatalError;
use crate::models::Route;
use crate::router::RouteTable;
use serde_json::Value;
use std::path::Path;

pub struct OpenApiParser;

impl OpenApiParser {
    // Resolve local JSON Pointer refs like "#/components/parameters/Id"
    fn resolve_local_ref<'a>(root: &'a Value, ref_str: &str) -> Option<&'a Value> {
        let pointer = ref_str.strip_prefix('#')?;
        if !pointer.starts_with('/') {
            return None;
        }
        let parts = pointer[1..].split('/').map(|s| s.replace("~1", "/").replace("~0", "~"));
        let mut cur = root;
        for p in parts {
            cur = cur.get(&p)?;
        }
        Some(cur)
    }

    // If server URL contains variables like {env}, replace with defaults when available
    fn server_with_vars(server: &Value) -> Option<String> {
        let url = server.get("url")?.as_str()?;
        let mut result = url.to_string();
        if let Some(vars) = server.get("variables").and_then(|v| v.as_object()) {
            for (k, v) in vars {
                if let Some(def) = v.get("default").and_then(|d| d.as_str()) {
                    result = result.replace(&format!("{{{}}}", k), def);
                }
            }
        }
        Some(result)
    }

    /// Path part of `servers[0].url`; the host comes from the audit target.
    fn server_path_prefix(json: &Value) -> String {
        let server_url = json
            .get("servers")
            .and_then(|s| s.as_array())
            .and_then(|arr| arr.first())
            .and_then(OpenApiParser::server_with_vars);

        let path = match server_url {
            Some(url) if url.starts_with('/') => url,
            Some(url) => reqwest::Url::parse(&url)
                .map(|u| u.path().to_string())
                .unwrap_or_default(),
            None => String::new(),
        };
        path.trim_end_matches('/').to_string()
    }

    pub fn from_value(json: &Value, path: &Path) -> Result<RouteTable, FatalError> {
        let paths = json
            .get("paths")
            .and_then(|p| p.as_object())
            .ok_or_else(|| invalid(path, "OpenAPI document has no paths object"))?;
        let prefix = OpenApiParser::server_path_prefix(json);
        let mut table = RouteTable::new();

        for (template, item) in paths {
            let Some(get) = item.get("get") else {
                continue;
            };

            let name = get
                .get("operationId")
                .and_then(|id| id.as_str())
                .unwrap_or(template.as_str());
            let mut route = Route::new(name, format!("{}{}", prefix, template));

            // Path-level parameters first, operation-level ones override them
            let declared = [item.get("parameters"), get.get("parameters")];
            for param in declared.iter().flatten().filter_map(|p| p.as_array()).flatten() {
                let param = match param.get("$ref").and_then(|r| r.as_str()) {
                    Some(r) => match OpenApiParser::resolve_local_ref(json, r) {
                        Some(resolved) => resolved,
                        None => continue,
                    },
                    None => param,
                };
                if param.get("in").and_then(|i| i.as_str()) != Some("path") {
                    continue;
                }
                let Some(param_name) = param.get("name").and_then(|n| n.as_str()) else {
                    continue;
                };
                let schema = match param.get("schema") {
                    Some(s) => match s.get("$ref").and_then(|r| r.as_str()) {
                        Some(r) => OpenApiParser::resolve_local_ref(json, r).unwrap_or(s),
                        None => s,
                    },
                    None => continue,
                };
                if let Some(default) = schema.get("default") {
                    route.defaults.insert(param_name.to_string(), default.clone());
                }
                if let Some(pattern) = schema.get("pattern").and_then(|p| p.as_str()) {
                    let pattern = pattern.trim_start_matches('^').trim_end_matches('$');
                    route.requirements.insert(param_name.to_string(), pattern.to_string());
                }
            }

            table.add(route);
        }

        Ok(table)
    }
}

impl RouteTableParser for OpenApiParser {
    fn parse(&self, path: &Path) -> Result<RouteTable, FatalError> {
        let json = read_json(path)?;
        OpenApiParser::from_value(&json, path)
    }
}
