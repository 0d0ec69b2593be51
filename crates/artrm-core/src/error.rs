//! Error types surfaced by the search → reduce → delete pipeline.

use reqwest::StatusCode;
use thiserror::Error;

use crate::transport::TransportError;

pub type Result<T> = std::result::Result<T, Error>;

/// Guidance shown when the server refuses to hand out an encrypted password.
pub const ENCRYPTION_NOT_CONFIGURED: &str = "Your Artifactory server is not configured to encrypt passwords.\n\
     You may use \"art config --enc-password=false\"";

/// Typed failures of the core.
///
/// Every variant carries enough context (path, status, body) for the caller
/// to report it without re-querying the server.
#[derive(Error, Debug)]
pub enum Error {
    /// The search request could not be sent or returned a non-success status.
    #[error("Search query failed{}: {detail}", .status.map(|s| format!(" ({s})")).unwrap_or_default())]
    Query {
        status: Option<StatusCode>,
        detail: String,
    },

    /// The search response body did not have the expected shape.
    #[error("Failed to parse search response")]
    Parse(#[source] serde_json::Error),

    /// A delete call returned something other than 204. Items before it stay deleted.
    #[error("Failed to delete {path}: Artifactory response: {status}\n{body}")]
    Delete {
        path: String,
        status: StatusCode,
        body: String,
        /// Number of items deleted before the failing call.
        completed: usize,
    },

    /// A delete call never got a response. Items before it stay deleted.
    #[error("Failed to delete {path}")]
    DeleteInterrupted {
        path: String,
        /// Number of items deleted before the failing call.
        completed: usize,
        #[source]
        source: TransportError,
    },

    /// A server-side feature is not enabled.
    #[error("{0}")]
    Configuration(String),

    /// Credentials are missing or invalid, or certificates could not be loaded.
    #[error("Authentication error: {0}")]
    Auth(String),

    /// Transport failure or unexpected status on an ancillary call.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A structured pattern could not be translated into a query.
    #[error("Invalid file spec '{pattern}': {reason}")]
    InvalidSpec { pattern: String, reason: String },

    /// The configured base URL or an item path did not form a valid URL.
    #[error("Invalid URL '{url}'")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
}

impl Error {
    pub(crate) fn invalid_spec(pattern: &str, reason: impl Into<String>) -> Self {
        Self::InvalidSpec {
            pattern: pattern.to_string(),
            reason: reason.into(),
        }
    }

    /// Items deleted before a delete run failed; `None` for other errors.
    pub fn completed(&self) -> Option<usize> {
        match self {
            Self::Delete { completed, .. } | Self::DeleteInterrupted { completed, .. } => {
                Some(*completed)
            }
            _ => None,
        }
    }

    /// Whether the failure happened after some items were already removed.
    pub fn is_partial(&self) -> bool {
        self.completed().is_some_and(|completed| completed > 0)
    }
}
