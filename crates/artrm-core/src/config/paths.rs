//! Home and security directory resolution.

use std::path::{Path, PathBuf};

pub const HOME_ENV: &str = "JFROG_CLI_HOME";

const HOME_DIR_NAME: &str = ".jfrog";
const SECURITY_DIR_NAME: &str = "security";

/// `$JFROG_CLI_HOME`, or `~/.jfrog` when unset.
pub fn home_dir() -> anyhow::Result<PathBuf> {
    let override_dir = std::env::var_os(HOME_ENV).map(PathBuf::from);
    let user_home = dirs::home_dir();
    resolve_home_dir(override_dir, user_home.as_deref())
}

/// Directory holding the certificates trusted by sensitive endpoints.
pub fn security_dir() -> anyhow::Result<PathBuf> {
    Ok(security_dir_for(&home_dir()?))
}

pub fn security_dir_for(home: &Path) -> PathBuf {
    home.join(SECURITY_DIR_NAME)
}

fn resolve_home_dir(
    override_dir: Option<PathBuf>,
    user_home: Option<&Path>,
) -> anyhow::Result<PathBuf> {
    if let Some(dir) = override_dir.filter(|d| !d.as_os_str().is_empty()) {
        return Ok(dir);
    }
    user_home
        .map(|home| home.join(HOME_DIR_NAME))
        .ok_or_else(|| anyhow::anyhow!("Could not determine home directory"))
}
