use std::env;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Flags shared by every subcommand, captured once at startup.
#[derive(Debug, Clone, Default)]
pub struct GlobalOptions {
    pub quiet: bool,
    pub verbose: u8,
    pub json: bool,
}

#[derive(Clone, Copy, Debug)]
pub struct CommandInfo {
    pub name: &'static str,
}

impl CommandInfo {
    #[must_use]
    pub const fn new(name: &'static str) -> Self {
        Self { name }
    }
}

/// Per-invocation context: global flags plus the resolved working and home
/// directories every default is derived from.
pub struct CommandContext<'a> {
    pub global: &'a GlobalOptions,
    cwd: PathBuf,
    home: PathBuf,
}

impl<'a> CommandContext<'a> {
    pub fn new(global: &'a GlobalOptions) -> Result<Self> {
        let cwd = env::current_dir().context("failed to resolve the working directory")?;
        let home = dirs_next::home_dir().context("failed to resolve the home directory")?;
        Ok(Self { global, cwd, home })
    }

    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    pub fn default_base_dir(&self) -> PathBuf {
        self.home.join("virtual_environments")
    }

    pub fn default_manifest_path(&self) -> PathBuf {
        self.cwd.join("requirements.txt")
    }

    /// Default environment name: the working directory's basename.
    pub fn default_environment_name(&self) -> Result<String> {
        self.cwd
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .context("cannot derive an environment name from the working directory")
    }
}
