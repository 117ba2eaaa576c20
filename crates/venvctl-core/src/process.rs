use std::path::Path;
use std::process::{Command, Stdio};

use anyhow::{Context, Result};

#[derive(Debug, Clone)]
pub struct RunOutput {
    pub code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl RunOutput {
    #[must_use]
    pub fn success(&self) -> bool {
        self.code == 0
    }
}

/// Execute a program and capture stdout/stderr.
///
/// # Errors
///
/// Returns an error when the program cannot be spawned; a non-zero exit is
/// reported through `RunOutput::code`, not as an error.
pub fn run_command(program: &Path, args: &[String]) -> Result<RunOutput> {
    tracing::debug!(program = %program.display(), ?args, "running command");
    let output = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .output()
        .with_context(|| format!("failed to start {}", program.display()))?;

    Ok(RunOutput {
        code: output.status.code().unwrap_or(-1),
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    })
}

/// Execute a program with inherited stdio so the user sees its output live
/// (pip progress, venv warnings).
///
/// # Errors
///
/// Returns an error when the program cannot be spawned.
pub fn run_command_passthrough(program: &Path, args: &[String]) -> Result<RunOutput> {
    tracing::debug!(program = %program.display(), ?args, "running command (passthrough)");
    let status = Command::new(program)
        .args(args)
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()
        .with_context(|| format!("failed to start {}", program.display()))?;

    Ok(RunOutput {
        code: status.code().unwrap_or(-1),
        stdout: String::new(),
        stderr: String::new(),
    })
}
