//! Helper-process launching.
//!
//! The environment for the child is carried in [`CommandConfig`] and applied
//! to the child only; the current process environment is left untouched.

use std::collections::BTreeMap;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use anyhow::Context;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandConfig {
    pub program: PathBuf,
    pub args: Vec<String>,
    pub env: BTreeMap<String, String>,
    pub working_dir: Option<PathBuf>,
}

impl CommandConfig {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            ..Self::default()
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    fn to_command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args).envs(&self.env);
        if let Some(dir) = &self.working_dir {
            cmd.current_dir(dir);
        }
        cmd
    }
}

/// Run `config` to completion with inherited stdio.
pub fn run_command(config: CommandConfig) -> anyhow::Result<()> {
    tracing::debug!(program = %config.program.display(), args = ?config.args, "Running command");
    let status = config
        .to_command()
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()
        .with_context(|| format!("Failed to start {}", config.program.display()))?;

    if !status.success() {
        anyhow::bail!("{} exited with {}", config.program.display(), status);
    }
    Ok(())
}

/// Gradle executable: the project wrapper, or `gradle` from `PATH`.
pub fn gradle_exec_path(use_wrapper: bool) -> anyhow::Result<PathBuf> {
    if use_wrapper {
        let wrapper = if cfg!(windows) {
            "gradlew.bat"
        } else {
            "./gradlew"
        };
        return Ok(PathBuf::from(wrapper));
    }
    find_in_path("gradle", std::env::var_os("PATH"))
        .ok_or_else(|| anyhow::anyhow!("Could not find 'gradle' in PATH"))
}

fn find_in_path(name: &str, path_var: Option<OsString>) -> Option<PathBuf> {
    let path_var = path_var?;
    std::env::split_paths(&path_var).find_map(|dir| executable_in(&dir, name))
}

fn executable_in(dir: &Path, name: &str) -> Option<PathBuf> {
    let candidates: &[&str] = if cfg!(windows) {
        &[".exe", ".bat", ".cmd"]
    } else {
        &[""]
    };
    candidates
        .iter()
        .map(|ext| dir.join(format!("{name}{ext}")))
        .find(|candidate| candidate.is_file())
}
