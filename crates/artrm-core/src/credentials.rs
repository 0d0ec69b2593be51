//! Encrypted password retrieval.

use reqwest::StatusCode;

use crate::config::ServiceConfig;
use crate::error::{ENCRYPTION_NOT_CONFIGURED, Error, Result};
use crate::transport::{Transport, TransportError, artifactory_url};

const ENCRYPTED_PASSWORD_ENDPOINT: &str = "api/security/encryptedPassword";

/// Ask the server for the encrypted form of the configured password.
///
/// `transport` should be the certificate-aware transport.
pub async fn retrieve_encrypted_credential(
    transport: &dyn Transport,
    config: &ServiceConfig,
) -> Result<String> {
    let url = artifactory_url(config.url(), ENCRYPTED_PASSWORD_ENDPOINT)?;
    let headers = config.auth().headers()?;
    let response = transport.send_get(&url, &headers).await?;

    match response.status {
        StatusCode::OK => Ok(response.body_text()),
        StatusCode::CONFLICT => Err(Error::Configuration(ENCRYPTION_NOT_CONFIGURED.to_string())),
        status => Err(TransportError::UnexpectedStatus { status }.into()),
    }
}
