use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::Result;
use serde_json::json;

use venvctl_domain::Environment;

use crate::artifacts::{ActivationScript, LocationMarker};
use crate::context::CommandContext;
use crate::fs::remove_dir_all_writable;
use crate::inspect::{environment_info, EnvironmentInfo};
use crate::outcome::ExecutionOutcome;

#[derive(Clone, Debug)]
pub struct RemoveRequest {
    pub name: String,
    pub base_dir: PathBuf,
    pub force: bool,
}

/// Delete an environment directory, then clean up the working-directory
/// artifacts that reference it.
///
/// Without `force` the user sees a metadata snapshot and a `[y/N]` prompt;
/// declining (or a closed stdin) cancels with a successful, no-op outcome.
pub fn remove_environment(
    ctx: &CommandContext,
    request: &RemoveRequest,
) -> Result<ExecutionOutcome> {
    let env = Environment::new(&request.name, &request.base_dir);
    if !env.exists() {
        return Ok(ExecutionOutcome::user_error(
            format!(
                "virtual environment '{}' does not exist at {}",
                env.name(),
                env.path().display()
            ),
            json!({
                "reason": "not_found",
                "name": env.name(),
                "path": env.path().display().to_string(),
            }),
        ));
    }

    if !request.force {
        let info = environment_info(&env);
        if !confirm_removal(&info)? {
            return Ok(ExecutionOutcome::success(
                "Deletion cancelled",
                json!({
                    "cancelled": true,
                    "name": env.name(),
                    "path": env.path().display().to_string(),
                }),
            ));
        }
    }

    if let Err(err) = remove_dir_all_writable(env.path()) {
        return Ok(ExecutionOutcome::failure(
            format!("failed to remove '{}': {err:#}", env.name()),
            json!({
                "reason": "io_failure",
                "path": env.path().display().to_string(),
            }),
        ));
    }

    // Conditional cleanup of shared working-directory artifacts; failures
    // here must not undo a removal that already happened.
    let marker = LocationMarker::in_dir(ctx.cwd());
    let marker_removed = match marker.remove_if_points_to(env.path()) {
        Ok(removed) => removed,
        Err(err) => {
            tracing::warn!(error = %err, "could not clean up location marker");
            false
        }
    };
    let script = ActivationScript::in_dir(ctx.cwd());
    let script_removed = match script.remove_if_references(env.path()) {
        Ok(removed) => removed,
        Err(err) => {
            tracing::warn!(error = %err, "could not clean up activation script");
            false
        }
    };

    Ok(ExecutionOutcome::success(
        format!("removed virtual environment '{}'", env.name()),
        json!({
            "name": env.name(),
            "path": env.path().display().to_string(),
            "marker_removed": marker_removed,
            "script_removed": script_removed,
        }),
    ))
}

fn confirm_removal(info: &EnvironmentInfo) -> Result<bool> {
    println!();
    println!("Environment to be deleted:");
    println!("  Name: {}", info.name);
    println!("  Path: {}", info.path);
    println!("  Size: {}", info.size);
    println!("  Created: {}", info.created.as_deref().unwrap_or("unknown"));
    println!("  Packages: {}", info.package_count);
    print!("\nAre you sure you want to delete '{}'? [y/N]: ", info.name);
    io::stdout().flush()?;

    let mut response = String::new();
    // A closed or interrupted stdin counts as declining.
    if io::stdin().lock().read_line(&mut response).is_err() {
        return Ok(false);
    }
    let response = response.trim().to_ascii_lowercase();
    Ok(matches!(response.as_str(), "y" | "yes"))
}
