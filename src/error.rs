// Error taxonomy for authorisation-check
//
// RouteGenerationError and RequestError are recovered per route by the
// auditor. FatalError ends the run.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RouteGenerationError {
    #[error("Unable to generate a URL for the named route \"{route}\" as such route does not exist.")]
    RouteNotFound { route: String },

    #[error("Some mandatory parameters are missing ({}) to generate a URL for route \"{route}\".", quote_list(.parameters))]
    MissingParameters { route: String, parameters: Vec<String> },

    #[error("Parameter \"{parameter}\" for route \"{route}\" must be a scalar value to generate a corresponding URL.")]
    InvalidParameter { route: String, parameter: String },

    #[error("Parameter \"{parameter}\" for route \"{route}\" must match \"{requirement}\" (\"{value}\" given) to generate a corresponding URL.")]
    RequirementMismatch {
        route: String,
        parameter: String,
        requirement: String,
        value: String,
    },

    #[error("Requirement \"{requirement}\" of parameter \"{parameter}\" for route \"{route}\" is not a valid pattern: {reason}")]
    InvalidRequirement {
        route: String,
        parameter: String,
        requirement: String,
        reason: String,
    },
}

fn quote_list(items: &[String]) -> String {
    items
        .iter()
        .map(|item| format!("\"{}\"", item))
        .collect::<Vec<_>>()
        .join(", ")
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RequestError {
    #[error("Invalid URL \"{url}\": {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Failed to build HTTP client: {0}")]
    Client(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("{0}")]
    Transport(String),
}

impl From<reqwest::Error> for RequestError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            RequestError::Timeout(err.to_string())
        } else if err.is_builder() {
            RequestError::Client(err.to_string())
        } else {
            RequestError::Transport(err.to_string())
        }
    }
}

/// Why a single route could not be probed. Never aborts the run.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProbeError {
    #[error(transparent)]
    RouteGeneration(#[from] RouteGenerationError),

    #[error(transparent)]
    Request(#[from] RequestError),
}

#[derive(Error, Debug)]
pub enum FatalError {
    #[error("Failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse JSON in {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid route table {}: {reason}", .path.display())]
    InvalidRouteTable { path: PathBuf, reason: String },

    #[error("Unsupported route table input: {}. Use a .json manifest, an OpenAPI .json document or a directory of manifests.", .0.display())]
    UnsupportedInput(PathBuf),

    #[error("Failed to list routes: {0}")]
    RouteListing(String),

    #[error("Failed to write report: {0}")]
    Output(#[from] std::io::Error),
}
