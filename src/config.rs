// Run configuration for authorisation-check
// Built once from the command line and passed into the auditor

use crate::models::RequestContext;
use serde_json::Value;

pub const DEFAULT_HOST: &str = "localhost:8000";
pub const DEFAULT_SCHEME: &str = "http";
/// Route names starting with this belong to the framework itself.
pub const DEFAULT_INTERNAL_PREFIX: &str = "_";
pub const DEFAULT_MAX_REDIRECTS: usize = 1;
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, PartialEq)]
pub struct AuditConfig {
    pub host: String,
    pub scheme: String,
    pub base_path: String,
    pub max_redirects: usize,
    /// Substituted for placeholders that have no declared default
    pub placeholder_value: Value,
    pub internal_prefix: String,
}

impl AuditConfig {
    pub fn new(host: impl Into<String>, scheme: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            scheme: scheme.into(),
            ..Self::default()
        }
    }

    pub fn with_internal_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.internal_prefix = prefix.into();
        self
    }

    pub fn context(&self) -> RequestContext {
        RequestContext {
            host: self.host.clone(),
            scheme: self.scheme.clone(),
            base_path: self.base_path.clone(),
        }
    }

    pub fn is_internal(&self, route_name: &str) -> bool {
        !self.internal_prefix.is_empty() && route_name.starts_with(&self.internal_prefix)
    }
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            scheme: DEFAULT_SCHEME.to_string(),
            base_path: String::new(),
            max_redirects: DEFAULT_MAX_REDIRECTS,
            placeholder_value: Value::from(1),
            internal_prefix: DEFAULT_INTERNAL_PREFIX.to_string(),
        }
    }
}
