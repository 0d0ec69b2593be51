//! Resolve server connection details from flags and saved profiles.

use anyhow::{Context, Result};
use clap::Args;

use artrm_core::auth::AuthDetails;
use artrm_core::config::{ServerProfiles, ServiceConfig, security_dir};

#[derive(Args, Debug, Default, Clone)]
pub struct ServerArgs {
    /// Saved server profile to use (defaults to the default profile)
    #[arg(long)]
    pub server_id: Option<String>,
    /// Artifactory URL
    #[arg(long)]
    pub url: Option<String>,
    /// Artifactory username
    #[arg(long)]
    pub user: Option<String>,
    /// Artifactory password
    #[arg(long)]
    pub password: Option<String>,
    /// Artifactory API key
    #[arg(long)]
    pub apikey: Option<String>,
    /// Artifactory access token
    #[arg(long)]
    pub access_token: Option<String>,
    /// Request timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,
}

impl ServerArgs {
    fn auth_overrides(&self) -> AuthDetails {
        AuthDetails {
            user: self.user.clone(),
            password: self.password.clone(),
            api_key: self.apikey.clone(),
            access_token: self.access_token.clone(),
        }
    }
}

/// Merge flags over the selected profile. Flags win field by field.
pub fn resolve_service_config(
    args: &ServerArgs,
    profiles: &ServerProfiles,
    dry_run: bool,
) -> Result<ServiceConfig> {
    let profile = match (args.server_id.as_deref(), profiles.get(args.server_id.as_deref())) {
        (Some(id), None) => anyhow::bail!("Server ID '{}' does not exist", id),
        (_, found) => found.map(|(_, profile)| profile),
    };

    let url = args
        .url
        .clone()
        .or_else(|| profile.map(|p| p.url.clone()))
        .context("No Artifactory URL given. Use --url or `artrm config add`")?;

    let overrides = args.auth_overrides();
    let saved = profile.map(|p| p.auth.clone()).unwrap_or_default();
    let auth = AuthDetails {
        user: overrides.user.or(saved.user),
        password: overrides.password.or(saved.password),
        api_key: overrides.api_key.or(saved.api_key),
        access_token: overrides.access_token.or(saved.access_token),
    };

    let mut builder = ServiceConfig::builder()
        .url(url)
        .auth(auth)
        .dry_run(dry_run)
        .certificates_path(security_dir()?);
    if let Some(secs) = args.timeout {
        builder = builder.timeout(std::time::Duration::from_secs(secs));
    }
    Ok(builder.build()?)
}
