//! Server profile store for loading and saving artrm.toml.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::auth::AuthDetails;

const CONFIG_FILE_NAME: &str = "artrm.toml";

/// Connection details for one server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerProfile {
    pub url: String,
    #[serde(flatten)]
    pub auth: AuthDetails,
}

/// Contents of artrm.toml.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerProfiles {
    /// Profile used when no server id is given.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    #[serde(default)]
    pub servers: BTreeMap<String, ServerProfile>,
}

impl ServerProfiles {
    /// Look up `id`, or the default profile when `id` is `None`.
    ///
    /// With a single profile and no default set, that profile is used.
    pub fn get(&self, id: Option<&str>) -> Option<(&str, &ServerProfile)> {
        let id = match id {
            Some(id) => id,
            None => match self.default.as_deref() {
                Some(default) => default,
                None if self.servers.len() == 1 => self.servers.keys().next()?.as_str(),
                None => return None,
            },
        };
        self.servers
            .get_key_value(id)
            .map(|(key, profile)| (key.as_str(), profile))
    }

    /// Insert or replace a profile; the first profile becomes the default.
    pub fn insert(&mut self, id: impl Into<String>, profile: ServerProfile) {
        let id = id.into();
        if self.default.is_none() {
            self.default = Some(id.clone());
        }
        self.servers.insert(id, profile);
    }
}

#[derive(Debug, Clone)]
pub struct ServerProfileStore {
    config_path: PathBuf,
}

impl ServerProfileStore {
    /// Store under the resolved home directory.
    pub fn from_home() -> anyhow::Result<Self> {
        Ok(Self::from_dir(&super::home_dir()?))
    }

    pub fn from_dir(dir: &Path) -> Self {
        Self {
            config_path: dir.join(CONFIG_FILE_NAME),
        }
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn load(&self) -> anyhow::Result<ServerProfiles> {
        if !self.config_path.exists() {
            return Ok(ServerProfiles::default());
        }
        let content = std::fs::read_to_string(&self.config_path).with_context(|| {
            format!("Failed to read config file: {}", self.config_path.display())
        })?;
        toml::from_str(&content).with_context(|| {
            format!("Failed to parse config file: {}", self.config_path.display())
        })
    }

    pub fn save(&self, profiles: &ServerProfiles) -> anyhow::Result<()> {
        let content =
            toml::to_string_pretty(profiles).context("Failed to serialize config to TOML")?;
        if let Some(parent) = self.config_path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }
        std::fs::write(&self.config_path, content).with_context(|| {
            format!(
                "Failed to write config file: {}",
                self.config_path.display()
            )
        })?;
        Ok(())
    }
}
