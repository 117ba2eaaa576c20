use std::env;
use std::path::{Path, PathBuf};

use crate::process;

/// Overrides the base interpreter used for environment creation. Mainly for
/// tests and unusual installs; normal discovery walks `PATH`.
pub(crate) const PYTHON_ENV_VAR: &str = "VENVCTL_PYTHON";

pub(crate) const CAPABILITY_HINT: &str = "Install the Python venv module with your system \
     package manager. Ubuntu/Debian: `sudo apt install python3-venv`; \
     CentOS/RHEL: `sudo yum install python3-venv`.";

/// Locate the base interpreter: explicit override first, then `python3`,
/// then `python` on `PATH`.
pub(crate) fn locate_interpreter() -> Option<PathBuf> {
    if let Some(raw) = env::var_os(PYTHON_ENV_VAR) {
        let path = PathBuf::from(raw);
        if path.is_file() {
            return Some(path);
        }
        tracing::warn!(
            path = %path.display(),
            "{PYTHON_ENV_VAR} does not point at an executable, falling back to PATH"
        );
    }
    which::which("python3")
        .or_else(|_| which::which("python"))
        .ok()
}

/// Probe whether the interpreter can create virtual environments.
pub(crate) fn venv_capable(python: &Path) -> bool {
    process::run_command(python, &["-c".to_string(), "import venv".to_string()])
        .map(|out| out.success())
        .unwrap_or(false)
}
