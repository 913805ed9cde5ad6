// Placeholder handling for authorisation-check
// Uses regex to find `{name}` placeholders in path templates and builds the
// values each route is probed with

use crate::models::{ParameterAssignment, Route};
use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value;

lazy_static! {
    /// `{identifier}` where identifier is ASCII letters, digits or underscores.
    pub static ref PLACEHOLDER: Regex = Regex::new(r"\{([a-zA-Z0-9_]+)\}").unwrap();
}

/// Characters that split a placeholder from the text before it.
pub const SEPARATORS: &str = "/,;.:-_~+*=@|";

/// Piece of a path template, in template order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathToken {
    Text(String),
    Variable {
        /// Separator directly before the placeholder, dropped with it
        prefix: String,
        name: String,
        /// Used when the route declares no requirement for `name`
        default_requirement: String,
    },
}

/// Split a template into static text and placeholders. A separator right
/// before a placeholder belongs to the placeholder.
pub fn tokenize_path(template: &str) -> Vec<PathToken> {
    let matches: Vec<(usize, usize, &str)> = PLACEHOLDER
        .captures_iter(template)
        .filter_map(|cap| {
            let whole = cap.get(0)?;
            let name = cap.get(1)?;
            Some((whole.start(), whole.end(), name.as_str()))
        })
        .collect();

    let mut tokens = Vec::new();
    let mut last = 0;
    for (i, &(start, end, name)) in matches.iter().enumerate() {
        let preceding = &template[last..start];
        let (text, prefix) = match preceding.chars().last() {
            Some(c) if SEPARATORS.contains(c) => preceding.split_at(preceding.len() - c.len_utf8()),
            _ => (preceding, ""),
        };
        if !text.is_empty() {
            tokens.push(PathToken::Text(text.to_string()));
        }

        let following_end = matches.get(i + 1).map_or(template.len(), |&(next_start, _, _)| next_start);
        let next_separator = template[end..following_end]
            .chars()
            .next()
            .filter(|c| *c != '/' && SEPARATORS.contains(*c));
        let default_requirement = match next_separator {
            Some(c) => format!("[^/{}]+", regex::escape(&c.to_string())),
            None => "[^/]+".to_string(),
        };

        tokens.push(PathToken::Variable {
            prefix: prefix.to_string(),
            name: name.to_string(),
            default_requirement,
        });
        last = end;
    }
    if last < template.len() {
        tokens.push(PathToken::Text(template[last..].to_string()));
    }
    tokens
}

/// Placeholder names in order of appearance.
pub fn extract_placeholders(template: &str) -> Vec<String> {
    PLACEHOLDER
        .captures_iter(template)
        .filter_map(|cap| cap.get(1))
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Declared default for each placeholder, `fallback` for the rest.
pub fn build_assignment(route: &Route, fallback: &Value) -> ParameterAssignment {
    extract_placeholders(&route.path)
        .into_iter()
        .map(|name| {
            let value = route.default_for(&name).cloned().unwrap_or_else(|| fallback.clone());
            (name, value)
        })
        .collect()
}

/// Render a scalar the way it appears in a URL. Non-scalars have no
/// rendering.
pub fn render_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(true) => Some("1".to_string()),
        Value::Bool(false) => Some("0".to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}
