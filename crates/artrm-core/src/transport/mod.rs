//! HTTP transport seam.
//!
//! The pipeline only talks to the server through [`Transport`], so tests can
//! substitute a recording implementation and production code uses
//! [`HttpTransport`] (reqwest).

mod http;

pub use http::HttpTransport;

use async_trait::async_trait;
use reqwest::StatusCode;
use reqwest::header::HeaderMap;
use thiserror::Error;

use crate::error::{Error, Result};

/// Status and body of a completed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: StatusCode,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn new(status: StatusCode, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// The request never produced a response (DNS, TLS, connection, timeout).
    #[error("Request to {url} failed: {message}")]
    Request { url: String, message: String },

    /// The server answered with a status the caller does not handle.
    #[error("Artifactory response: {status}")]
    UnexpectedStatus { status: StatusCode },
}

impl TransportError {
    pub fn request(url: &str, message: impl Into<String>) -> Self {
        Self::Request {
            url: url.to_string(),
            message: message.into(),
        }
    }
}

/// Minimal request surface the core depends on.
///
/// Calls are issued one at a time; implementations don't need to guard
/// against concurrent use by the pipeline.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send_get(
        &self,
        url: &str,
        headers: &HeaderMap,
    ) -> std::result::Result<HttpResponse, TransportError>;

    async fn send_post(
        &self,
        url: &str,
        headers: &HeaderMap,
        body: String,
    ) -> std::result::Result<HttpResponse, TransportError>;

    async fn send_delete(
        &self,
        url: &str,
        headers: &HeaderMap,
    ) -> std::result::Result<HttpResponse, TransportError>;
}

/// Join the server base URL with a repository-relative path.
///
/// Each path segment is percent-encoded; empty segments are skipped so
/// `"libs//a/"` and `"libs/a"` produce the same URL.
pub fn artifactory_url(base_url: &str, relative_path: &str) -> Result<String> {
    let mut url = url::Url::parse(base_url).map_err(|source| Error::InvalidUrl {
        url: base_url.to_string(),
        source,
    })?;

    {
        let mut segments = url.path_segments_mut().map_err(|_| Error::InvalidUrl {
            url: base_url.to_string(),
            source: url::ParseError::RelativeUrlWithCannotBeABaseBase,
        })?;
        segments.pop_if_empty();
        segments.extend(relative_path.split('/').filter(|s| !s.is_empty()));
    }

    Ok(url.to_string())
}

/// Pretty-print a JSON response body; non-JSON bodies are returned as-is.
pub fn indent_json(body: &[u8]) -> String {
    match serde_json::from_slice::<serde_json::Value>(body) {
        Ok(value) => serde_json::to_string_pretty(&value)
            .unwrap_or_else(|_| String::from_utf8_lossy(body).into_owned()),
        Err(_) => String::from_utf8_lossy(body).into_owned(),
    }
}
