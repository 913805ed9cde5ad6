// Route source abstraction and the in-memory route table
// URL generation follows the rules of a Symfony-style generator: mandatory
// and optional trailing placeholders, requirement patterns, extra parameters
// as query string

use crate::error::{FatalError, RouteGenerationError};
use crate::models::{ParameterAssignment, RequestContext, Route};
use crate::parameters::{extract_placeholders, render_value, tokenize_path, PathToken};
use regex::Regex;
use serde_json::Value;

/// Anything that can enumerate routes and render them into absolute URLs.
pub trait RouteSource {
    /// Every registered route in a reproducible order.
    fn list_routes(&self) -> Result<Vec<Route>, FatalError>;

    /// Target used by every subsequent `generate_url` call.
    fn set_context(&mut self, context: RequestContext);

    fn generate_url(&self, route_name: &str, parameters: &ParameterAssignment) -> Result<String, RouteGenerationError>;
}

/// Ordered collection of routes with unique names.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: Vec<Route>,
    context: RequestContext,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_routes(routes: impl IntoIterator<Item = Route>) -> Self {
        let mut table = Self::new();
        table.extend(routes);
        table
    }

    /// Adding an existing name replaces that route and moves it to the end.
    pub fn add(&mut self, route: Route) {
        if let Some(pos) = self.routes.iter().position(|r| r.name == route.name) {
            self.routes.remove(pos);
        }
        self.routes.push(route);
    }

    pub fn extend(&mut self, routes: impl IntoIterator<Item = Route>) {
        for route in routes {
            self.add(route);
        }
    }

    pub fn get(&self, name: &str) -> Option<&Route> {
        self.routes.iter().find(|r| r.name == name)
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Tokens are walked from the end: trailing placeholders still holding
    /// their default (or null) are left out together with their separator.
    fn render_path(&self, route: &Route, parameters: &ParameterAssignment) -> Result<String, RouteGenerationError> {
        let mut path = String::new();
        let mut optional = true;

        for token in tokenize_path(&route.path).iter().rev() {
            match token {
                PathToken::Text(text) => {
                    path.insert_str(0, text);
                    optional = false;
                }
                PathToken::Variable {
                    prefix,
                    name,
                    default_requirement,
                } => {
                    let Some(value) = parameters.get(name).or_else(|| route.default_for(name)) else {
                        return Err(RouteGenerationError::MissingParameters {
                            route: route.name.clone(),
                            parameters: vec![name.clone()],
                        });
                    };
                    if optional && holds_default(route, name, value) {
                        continue;
                    }

                    let rendered = render_value(value).ok_or_else(|| RouteGenerationError::InvalidParameter {
                        route: route.name.clone(),
                        parameter: name.clone(),
                    })?;
                    let requirement = route.requirements.get(name).unwrap_or(default_requirement);
                    check_requirement(route, name, requirement, &rendered)?;

                    path.insert_str(0, &rendered);
                    path.insert_str(0, prefix);
                    optional = false;
                }
            }
        }

        let mut path = encode_path(&path);
        if path.is_empty() {
            path.push('/');
        }
        Ok(path)
    }
}

fn holds_default(route: &Route, name: &str, value: &Value) -> bool {
    match route.default_for(name) {
        Some(default) => value.is_null() || render_value(value) == render_value(default),
        None => false,
    }
}

/// Characters left readable after percent-encoding a path.
const DECODED_CHARS: [(&str, &str); 10] = [
    ("%2F", "/"),
    ("%40", "@"),
    ("%3A", ":"),
    ("%3B", ";"),
    ("%2C", ","),
    ("%3D", "="),
    ("%2B", "+"),
    ("%21", "!"),
    ("%2A", "*"),
    ("%7C", "|"),
];

fn encode_path(path: &str) -> String {
    let mut encoded = urlencoding::encode(path).into_owned();
    for (from, to) in DECODED_CHARS {
        encoded = encoded.replace(from, to);
    }
    // A literal "%2F" in a value must stay encoded
    encoded = encoded.replace("%252F", "%2F");

    // Dot segments would be resolved away by the client
    if encoded.contains("/.") {
        encoded = encoded.replace("/../", "/%2E%2E/").replace("/./", "/%2E/");
        if encoded.ends_with("/..") {
            encoded.truncate(encoded.len() - 2);
            encoded.push_str("%2E%2E");
        } else if encoded.ends_with("/.") {
            encoded.truncate(encoded.len() - 1);
            encoded.push_str("%2E");
        }
    }
    encoded
}

fn check_requirement(route: &Route, parameter: &str, requirement: &str, value: &str) -> Result<(), RouteGenerationError> {
    let anchored = Regex::new(&format!("^(?:{})$", requirement)).map_err(|e| RouteGenerationError::InvalidRequirement {
        route: route.name.clone(),
        parameter: parameter.to_string(),
        requirement: requirement.to_string(),
        reason: e.to_string(),
    })?;
    if anchored.is_match(value) {
        Ok(())
    } else {
        Err(RouteGenerationError::RequirementMismatch {
            route: route.name.clone(),
            parameter: parameter.to_string(),
            requirement: requirement.to_string(),
            value: value.to_string(),
        })
    }
}

/// Parameters that are neither placeholders nor equal to a route default.
fn query_string(route: &Route, placeholders: &[String], parameters: &ParameterAssignment) -> Result<String, RouteGenerationError> {
    let mut pairs = Vec::new();
    for (name, value) in parameters {
        if placeholders.contains(name) || route.default_for(name) == Some(value) {
            continue;
        }
        let rendered = render_value(value).ok_or_else(|| RouteGenerationError::InvalidParameter {
            route: route.name.clone(),
            parameter: name.clone(),
        })?;
        pairs.push(format!("{}={}", urlencoding::encode(name), urlencoding::encode(&rendered)));
    }
    if pairs.is_empty() {
        Ok(String::new())
    } else {
        Ok(format!("?{}", pairs.join("&")))
    }
}

impl RouteSource for RouteTable {
    fn list_routes(&self) -> Result<Vec<Route>, FatalError> {
        Ok(self.routes.clone())
    }

    fn set_context(&mut self, context: RequestContext) {
        self.context = context;
    }

    fn generate_url(&self, route_name: &str, parameters: &ParameterAssignment) -> Result<String, RouteGenerationError> {
        let route = self.get(route_name).ok_or_else(|| RouteGenerationError::RouteNotFound {
            route: route_name.to_string(),
        })?;

        let placeholders = extract_placeholders(&route.path);
        let mut missing: Vec<String> = Vec::new();
        for name in &placeholders {
            if !parameters.contains_key(name) && route.default_for(name).is_none() && !missing.contains(name) {
                missing.push(name.clone());
            }
        }
        if !missing.is_empty() {
            return Err(RouteGenerationError::MissingParameters {
                route: route.name.clone(),
                parameters: missing,
            });
        }

        let path = self.render_path(route, parameters)?;
        let query = query_string(route, &placeholders, parameters)?;
        Ok(format!("{}{}{}", self.context.base_url(), path, query))
    }
}
