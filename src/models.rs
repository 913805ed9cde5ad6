// Core data models for authorisation-check
// Routes, parameter assignments, request context and probe results

use serde_json::Value;
use std::collections::BTreeMap;

/// Parameter name to value mapping used to render one route into a URL.
pub type ParameterAssignment = BTreeMap<String, Value>;

/// A named, parameterised URL pattern registered by the host application.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    pub name: String,
    /// Path template, e.g. `/admin/{id}`
    pub path: String,
    pub defaults: BTreeMap<String, Value>,
    /// Regex each rendered parameter value must fully match
    pub requirements: BTreeMap<String, String>,
}

impl Route {
    pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            defaults: BTreeMap::new(),
            requirements: BTreeMap::new(),
        }
    }

    pub fn with_default(mut self, parameter: impl Into<String>, value: impl Into<Value>) -> Self {
        self.defaults.insert(parameter.into(), value.into());
        self
    }

    pub fn with_requirement(mut self, parameter: impl Into<String>, pattern: impl Into<String>) -> Self {
        self.requirements.insert(parameter.into(), pattern.into());
        self
    }

    pub fn default_for(&self, parameter: &str) -> Option<&Value> {
        self.defaults.get(parameter)
    }
}

/// Target the URL generator renders absolute URLs against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    pub host: String,
    pub scheme: String,
    pub base_path: String,
}

impl RequestContext {
    pub fn new(host: impl Into<String>, scheme: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            scheme: scheme.into(),
            base_path: String::new(),
        }
    }

    /// `scheme://host` followed by the base path, without a trailing slash.
    pub fn base_url(&self) -> String {
        format!(
            "{}://{}{}",
            self.scheme,
            self.host,
            self.base_path.trim_end_matches('/')
        )
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_HOST, crate::config::DEFAULT_SCHEME)
    }
}

/// Outcome of an anonymous GET as seen after redirects were followed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub final_url: String,
}

/// What one route answered when probed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeResult {
    pub route: String,
    pub url: String,
    pub status: u16,
    pub final_url: String,
    pub verdict: crate::verdict::Verdict,
}

impl ProbeResult {
    pub fn is_exposed(&self) -> bool {
        self.verdict == crate::verdict::Verdict::Exposed
    }
}
