//! reqwest-backed transport.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::HeaderMap;
use reqwest::{Client, RequestBuilder};

use super::{HttpResponse, Transport, TransportError};
use crate::auth::load_certificates;
use crate::error::{Error, Result};

const USER_AGENT: &str = concat!("artrm/", env!("CARGO_PKG_VERSION"));

/// Sends requests with a shared reqwest client.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Build a client that trusts the system roots only.
    pub fn new(timeout: Option<Duration>) -> Result<Self> {
        Self::build(None, timeout)
    }

    /// Build a client that also trusts every certificate found in `cert_dir`.
    pub fn with_certificates(cert_dir: &Path, timeout: Option<Duration>) -> Result<Self> {
        Self::build(Some(cert_dir), timeout)
    }

    fn build(cert_dir: Option<&Path>, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = Client::builder().user_agent(USER_AGENT);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(dir) = cert_dir {
            for certificate in load_certificates(dir)? {
                builder = builder.add_root_certificate(certificate);
            }
        }
        let client = builder
            .build()
            .map_err(|e| Error::Auth(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }

    async fn send(
        &self,
        url: &str,
        request: RequestBuilder,
    ) -> std::result::Result<HttpResponse, TransportError> {
        let response = request
            .send()
            .await
            .map_err(|e| TransportError::request(url, e.to_string()))?;
        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| TransportError::request(url, format!("failed to read body: {e}")))?;
        tracing::debug!(%url, %status, "Artifactory response");
        Ok(HttpResponse::new(status, body.to_vec()))
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send_get(
        &self,
        url: &str,
        headers: &HeaderMap,
    ) -> std::result::Result<HttpResponse, TransportError> {
        let request = self.client.get(url).headers(headers.clone());
        self.send(url, request).await
    }

    async fn send_post(
        &self,
        url: &str,
        headers: &HeaderMap,
        body: String,
    ) -> std::result::Result<HttpResponse, TransportError> {
        let request = self
            .client
            .post(url)
            .headers(headers.clone())
            .header(reqwest::header::CONTENT_TYPE, "text/plain")
            .body(body);
        self.send(url, request).await
    }

    async fn send_delete(
        &self,
        url: &str,
        headers: &HeaderMap,
    ) -> std::result::Result<HttpResponse, TransportError> {
        let request = self.client.delete(url).headers(headers.clone());
        self.send(url, request).await
    }
}
