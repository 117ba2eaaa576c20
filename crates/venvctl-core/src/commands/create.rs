use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde_json::json;

use venvctl_domain::{packages_in_sync, required_packages, Environment};

use crate::artifacts::{ActivationScript, LocationMarker};
use crate::context::CommandContext;
use crate::inspect::installed_packages;
use crate::interpreter;
use crate::outcome::ExecutionOutcome;
use crate::process;

#[derive(Clone, Debug)]
pub struct SetupRequest {
    pub name: String,
    pub base_dir: PathBuf,
    pub manifest: PathBuf,
}

enum SetupStep {
    Done { action: &'static str, installed: bool },
    Failed(ExecutionOutcome),
}

/// Create-or-update an environment against its manifest.
///
/// Branches on the activation marker: absent means create from scratch,
/// present means reconcile the installed package set. Either way a
/// successful run leaves the location marker and activation script in the
/// working directory.
pub fn setup_environment(
    ctx: &CommandContext,
    request: &SetupRequest,
) -> Result<ExecutionOutcome> {
    let Some(python) = interpreter::locate_interpreter() else {
        return Ok(ExecutionOutcome::failure(
            "no Python interpreter found on PATH",
            json!({
                "reason": "capability_unavailable",
                "hint": interpreter::CAPABILITY_HINT,
            }),
        ));
    };
    if !interpreter::venv_capable(&python) {
        return Ok(ExecutionOutcome::failure(
            format!(
                "{} cannot create virtual environments (venv module unavailable)",
                python.display()
            ),
            json!({
                "reason": "capability_unavailable",
                "interpreter": python.display().to_string(),
                "hint": interpreter::CAPABILITY_HINT,
            }),
        ));
    }

    let env = Environment::new(&request.name, &request.base_dir);
    let marker = LocationMarker::in_dir(ctx.cwd());

    let step = if env.exists() {
        update_environment(&env, &marker, &request.manifest)?
    } else {
        create_environment(&python, &env, &marker, &request.manifest)?
    };

    let (action, installed) = match step {
        SetupStep::Failed(outcome) => return Ok(outcome),
        SetupStep::Done { action, installed } => (action, installed),
    };

    // Secondary bookkeeping: never fails the setup.
    let script = ActivationScript::in_dir(ctx.cwd());
    if let Err(err) = script.write(&env, ctx.cwd()) {
        tracing::warn!(error = %err, "could not write activation script");
    }

    let message = match action {
        "created" => format!("created virtual environment '{}'", env.name()),
        "updated" => format!("updated packages in '{}'", env.name()),
        _ => "all required packages are already installed".to_string(),
    };

    Ok(ExecutionOutcome::success(
        message,
        json!({
            "name": env.name(),
            "path": env.path().display().to_string(),
            "action": action,
            "installed": installed,
            "activate": format!("source {}", env.activation_file().display()),
            "shell_script": script.path().display().to_string(),
        }),
    ))
}

fn create_environment(
    python: &Path,
    env: &Environment,
    marker: &LocationMarker,
    manifest: &Path,
) -> Result<SetupStep> {
    fs::create_dir_all(env.base_dir())
        .with_context(|| format!("failed to create {}", env.base_dir().display()))?;

    tracing::info!(path = %env.path().display(), "creating virtual environment");
    let venv_args = vec![
        "-m".to_string(),
        "venv".to_string(),
        env.path().display().to_string(),
    ];
    let out = process::run_command_passthrough(python, &venv_args)?;
    if !out.success() {
        return Ok(SetupStep::Failed(ExecutionOutcome::failure(
            format!("failed to create virtual environment at {}", env.path().display()),
            json!({ "reason": "subprocess_failure", "code": out.code }),
        )));
    }

    if let Err(err) = marker.write(env.path()) {
        tracing::warn!(error = %err, "could not write location marker");
    }

    match install_packages(env, manifest)? {
        InstallStep::Failed(outcome) => Ok(SetupStep::Failed(outcome)),
        InstallStep::Installed => Ok(SetupStep::Done {
            action: "created",
            installed: true,
        }),
        InstallStep::Skipped => Ok(SetupStep::Done {
            action: "created",
            installed: false,
        }),
    }
}

fn update_environment(
    env: &Environment,
    marker: &LocationMarker,
    manifest: &Path,
) -> Result<SetupStep> {
    tracing::info!(path = %env.path().display(), "environment exists, checking packages");

    if !marker.exists() {
        if let Err(err) = marker.write(env.path()) {
            tracing::warn!(error = %err, "could not write location marker");
        }
    }

    let required = required_packages(manifest).unwrap_or_else(|err| {
        tracing::warn!(error = %err, "could not read manifest, treating as empty");
        BTreeSet::new()
    });
    if required.is_empty() {
        tracing::info!("manifest missing or empty, nothing to install");
        return Ok(SetupStep::Done {
            action: "unchanged",
            installed: false,
        });
    }

    let installed = installed_packages(env);
    if packages_in_sync(&installed, &required) {
        return Ok(SetupStep::Done {
            action: "unchanged",
            installed: false,
        });
    }

    tracing::info!(
        installed = installed.len(),
        required = required.len(),
        "package requirements changed, reinstalling"
    );
    match install_packages(env, manifest)? {
        InstallStep::Failed(outcome) => Ok(SetupStep::Failed(outcome)),
        _ => Ok(SetupStep::Done {
            action: "updated",
            installed: true,
        }),
    }
}

enum InstallStep {
    Installed,
    Skipped,
    Failed(ExecutionOutcome),
}

fn install_packages(env: &Environment, manifest: &Path) -> Result<InstallStep> {
    if !manifest.exists() {
        tracing::info!(
            manifest = %manifest.display(),
            "no requirements file, skipping package installation"
        );
        return Ok(InstallStep::Skipped);
    }

    let pip = env.pip_executable();

    tracing::info!("upgrading pip");
    let upgrade_args = vec!["install".to_string(), "-U".to_string(), "pip".to_string()];
    let out = process::run_command_passthrough(&pip, &upgrade_args)?;
    if !out.success() {
        return Ok(InstallStep::Failed(ExecutionOutcome::failure(
            "failed to upgrade pip",
            json!({ "reason": "subprocess_failure", "code": out.code }),
        )));
    }

    tracing::info!(manifest = %manifest.display(), "installing packages");
    let install_args = vec![
        "install".to_string(),
        "-r".to_string(),
        manifest.display().to_string(),
    ];
    let out = process::run_command_passthrough(&pip, &install_args)?;
    if !out.success() {
        return Ok(InstallStep::Failed(ExecutionOutcome::failure(
            format!("failed to install packages from {}", manifest.display()),
            json!({ "reason": "subprocess_failure", "code": out.code }),
        )));
    }

    Ok(InstallStep::Installed)
}
