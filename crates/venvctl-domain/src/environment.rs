use std::path::{Path, PathBuf};

/// A named virtual environment rooted under a base directory.
///
/// Nothing about an environment is cached or persisted by the tool itself;
/// existence is always re-derived from the activation marker on disk.
#[derive(Debug, Clone)]
pub struct Environment {
    name: String,
    base_dir: PathBuf,
    path: PathBuf,
}

impl Environment {
    pub fn new(name: impl Into<String>, base_dir: impl Into<PathBuf>) -> Self {
        let name = name.into();
        let base_dir = base_dir.into();
        let path = base_dir.join(&name);
        Self {
            name,
            base_dir,
            path,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// An environment exists iff its activation marker is present.
    #[must_use]
    pub fn exists(&self) -> bool {
        is_environment_dir(&self.path)
    }

    /// The activation file sourced by the generated `venv_shell` script.
    #[must_use]
    pub fn activation_file(&self) -> PathBuf {
        self.path.join("bin").join("activate")
    }

    #[must_use]
    pub fn pip_executable(&self) -> PathBuf {
        scripts_dir(&self.path).join(executable_name("pip"))
    }

    #[must_use]
    pub fn python_executable(&self) -> PathBuf {
        scripts_dir(&self.path).join(executable_name("python"))
    }
}

/// Whether `path` looks like a managed environment.
///
/// Both the POSIX (`bin/activate`) and Windows (`Scripts/activate.bat`)
/// layouts qualify, regardless of the host platform, so listings stay
/// honest about directories created elsewhere.
#[must_use]
pub fn is_environment_dir(path: &Path) -> bool {
    path.join("bin").join("activate").exists()
        || path.join("Scripts").join("activate.bat").exists()
}

#[cfg(windows)]
fn scripts_dir(root: &Path) -> PathBuf {
    root.join("Scripts")
}

#[cfg(not(windows))]
fn scripts_dir(root: &Path) -> PathBuf {
    root.join("bin")
}

#[cfg(windows)]
fn executable_name(stem: &str) -> String {
    format!("{stem}.exe")
}

#[cfg(not(windows))]
fn executable_name(stem: &str) -> String {
    stem.to_string()
}
