//! Service configuration shared by every pipeline component.
//!
//! A [`ServiceConfig`] is built once per invocation and handed to the
//! search, reduce and delete stages by reference. Nothing mutates it after
//! [`ServiceConfigBuilder::build`].

pub mod paths;
pub mod store;

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::auth::AuthDetails;
use crate::error::{Error, Result};

pub use paths::{home_dir, security_dir};
pub use store::{ServerProfile, ServerProfileStore, ServerProfiles};

#[derive(Debug, Clone)]
pub struct ServiceConfig {
    url: String,
    auth: AuthDetails,
    dry_run: bool,
    certificates_path: Option<PathBuf>,
    timeout: Option<Duration>,
}

impl ServiceConfig {
    pub fn builder() -> ServiceConfigBuilder {
        ServiceConfigBuilder::default()
    }

    /// Base URL, always ending in `/`.
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn auth(&self) -> &AuthDetails {
        &self.auth
    }

    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    pub fn certificates_path(&self) -> Option<&Path> {
        self.certificates_path.as_deref()
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }
}

#[derive(Debug, Default)]
pub struct ServiceConfigBuilder {
    url: Option<String>,
    auth: AuthDetails,
    dry_run: bool,
    certificates_path: Option<PathBuf>,
    timeout: Option<Duration>,
}

impl ServiceConfigBuilder {
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn auth(mut self, auth: AuthDetails) -> Self {
        self.auth = auth;
        self
    }

    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn certificates_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.certificates_path = Some(path.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Validate and freeze the configuration.
    pub fn build(self) -> Result<ServiceConfig> {
        let raw = self
            .url
            .filter(|u| !u.trim().is_empty())
            .ok_or_else(|| Error::Configuration("Artifactory URL is required".to_string()))?;
        let parsed = url::Url::parse(raw.trim()).map_err(|source| Error::InvalidUrl {
            url: raw.clone(),
            source,
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(Error::Configuration(format!(
                "Unsupported URL scheme '{}' in {raw}",
                parsed.scheme()
            )));
        }

        let mut url = parsed.to_string();
        if !url.ends_with('/') {
            url.push('/');
        }

        Ok(ServiceConfig {
            url,
            auth: self.auth,
            dry_run: self.dry_run,
            certificates_path: self.certificates_path,
            timeout: self.timeout,
        })
    }
}
