//! Request authentication and certificate loading.

use std::fmt;
use std::path::Path;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use reqwest::Certificate;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderName, HeaderValue};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub const API_KEY_HEADER: &str = "X-JFrog-Art-Api";

/// Credentials attached to every request.
///
/// Precedence: access token, then user with password (or API key as the
/// password), then a bare API key. No material at all means anonymous access.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
}

impl AuthDetails {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn basic(user: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            user: Some(user.into()),
            password: Some(password.into()),
            ..Self::default()
        }
    }

    pub fn api_key(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Some(api_key.into()),
            ..Self::default()
        }
    }

    pub fn access_token(token: impl Into<String>) -> Self {
        Self {
            access_token: Some(token.into()),
            ..Self::default()
        }
    }

    pub fn is_anonymous(&self) -> bool {
        self.user.is_none() && self.api_key.is_none() && self.access_token.is_none()
    }

    /// Build the per-request header material.
    pub fn headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();

        if let Some(token) = non_empty(&self.access_token) {
            headers.insert(AUTHORIZATION, sensitive(&format!("Bearer {token}"))?);
            return Ok(headers);
        }

        if let Some(user) = non_empty(&self.user) {
            let secret = non_empty(&self.password)
                .or_else(|| non_empty(&self.api_key))
                .ok_or_else(|| {
                    Error::Auth(format!("No password or API key provided for user '{user}'"))
                })?;
            let encoded = STANDARD.encode(format!("{user}:{secret}"));
            headers.insert(AUTHORIZATION, sensitive(&format!("Basic {encoded}"))?);
            return Ok(headers);
        }

        if let Some(api_key) = non_empty(&self.api_key) {
            headers.insert(HeaderName::from_static("x-jfrog-art-api"), sensitive(api_key)?);
        }

        Ok(headers)
    }
}

impl fmt::Debug for AuthDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redact = |value: &Option<String>| value.as_ref().map(|_| "***");
        f.debug_struct("AuthDetails")
            .field("user", &self.user)
            .field("password", &redact(&self.password))
            .field("api_key", &redact(&self.api_key))
            .field("access_token", &redact(&self.access_token))
            .finish()
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

fn sensitive(value: &str) -> Result<HeaderValue> {
    let mut header = HeaderValue::from_str(value)
        .map_err(|_| Error::Auth("Credentials contain characters not allowed in headers".into()))?;
    header.set_sensitive(true);
    Ok(header)
}

/// Load every `*.pem` / `*.crt` file in `dir` as a trusted root certificate.
///
/// A missing directory yields no certificates.
pub fn load_certificates(dir: &Path) -> Result<Vec<Certificate>> {
    if !dir.exists() {
        return Ok(Vec::new());
    }

    let entries = std::fs::read_dir(dir).map_err(|e| {
        Error::Auth(format!(
            "Failed to read certificates directory {}: {e}",
            dir.display()
        ))
    })?;

    let mut paths: Vec<_> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| {
            path.is_file()
                && matches!(
                    path.extension().and_then(|ext| ext.to_str()),
                    Some("pem") | Some("crt")
                )
        })
        .collect();
    paths.sort();

    let mut certificates = Vec::with_capacity(paths.len());
    for path in paths {
        let pem = std::fs::read(&path).map_err(|e| {
            Error::Auth(format!("Failed to read certificate {}: {e}", path.display()))
        })?;
        let certificate = Certificate::from_pem(&pem).map_err(|e| {
            Error::Auth(format!("Failed to load certificate {}: {e}", path.display()))
        })?;
        tracing::debug!(path = %path.display(), "Loaded certificate");
        certificates.push(certificate);
    }
    Ok(certificates)
}
