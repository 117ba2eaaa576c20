use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use venvctl_domain::Environment;

/// `.venvlocation`: one absolute path, newline-terminated, recording the
/// most recently created or updated environment for the working directory.
///
/// Owned by the lifecycle controller; nothing else writes it.
#[derive(Debug, Clone)]
pub struct LocationMarker {
    path: PathBuf,
}

impl LocationMarker {
    pub const FILE_NAME: &'static str = ".venvlocation";

    #[must_use]
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            path: dir.join(Self::FILE_NAME),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    pub fn write(&self, env_path: &Path) -> Result<()> {
        fs::write(&self.path, format!("{}\n", env_path.display()))
            .with_context(|| format!("failed to write {}", self.path.display()))
    }

    pub fn stored_path(&self) -> Result<PathBuf> {
        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read {}", self.path.display()))?;
        Ok(PathBuf::from(contents.trim()))
    }

    /// Delete the marker only when it records exactly the removed path, so
    /// a marker pointing at some other environment survives.
    pub fn remove_if_points_to(&self, env_path: &Path) -> Result<bool> {
        if !self.exists() {
            return Ok(false);
        }
        if self.stored_path()? != env_path {
            return Ok(false);
        }
        fs::remove_file(&self.path)
            .with_context(|| format!("failed to remove {}", self.path.display()))?;
        Ok(true)
    }
}

/// `venv_shell`: generated executable that opens a fresh shell with the
/// environment activated. Rewritten on every successful create/update.
#[derive(Debug, Clone)]
pub struct ActivationScript {
    path: PathBuf,
}

impl ActivationScript {
    pub const FILE_NAME: &'static str = "venv_shell";

    #[must_use]
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            path: dir.join(Self::FILE_NAME),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn write(&self, env: &Environment, workdir: &Path) -> Result<()> {
        let contents = render_script(env, workdir);
        fs::write(&self.path, contents)
            .with_context(|| format!("failed to write {}", self.path.display()))?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&self.path, fs::Permissions::from_mode(0o755))
                .with_context(|| format!("failed to chmod {}", self.path.display()))?;
        }
        Ok(())
    }

    /// Delete the script only when its content references the removed
    /// environment's path.
    pub fn remove_if_references(&self, env_path: &Path) -> Result<bool> {
        if !self.path.exists() {
            return Ok(false);
        }
        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read {}", self.path.display()))?;
        if !contents.contains(&env_path.display().to_string()) {
            return Ok(false);
        }
        fs::remove_file(&self.path)
            .with_context(|| format!("failed to remove {}", self.path.display()))?;
        Ok(true)
    }
}

fn render_script(env: &Environment, workdir: &Path) -> String {
    format!(
        r#"#!/bin/bash
# Automatically generated virtual environment activation script
# This script opens a NEW shell with the virtual environment activated
echo "Starting new shell with virtual environment '{name}' activated..."
echo "Type 'exit' to return to your original shell."
echo "Virtual environment path: {path}"
echo ""
cd "{workdir}"
source {activate}
exec "$SHELL"
"#,
        name = env.name(),
        path = env.path().display(),
        workdir = workdir.display(),
        activate = env.activation_file().display(),
    )
}
