use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde_json::json;

use venvctl_domain::{is_environment_dir, Environment};

use crate::inspect::environment_info;
use crate::outcome::ExecutionOutcome;

#[derive(Clone, Debug)]
pub struct ListRequest {
    pub base_dir: PathBuf,
    pub detailed: bool,
}

/// Enumerate managed environments under the base directory.
///
/// A subdirectory qualifies iff it carries an activation marker; anything
/// else under the base directory is ignored. An absent base directory is
/// an empty inventory, not an error.
pub fn list_environments(request: &ListRequest) -> Result<ExecutionOutcome> {
    let mut environments = Vec::new();

    if request.base_dir.is_dir() {
        let entries = fs::read_dir(&request.base_dir)
            .with_context(|| format!("failed to read {}", request.base_dir.display()))?;
        for entry in entries {
            let entry = entry
                .with_context(|| format!("failed to read {}", request.base_dir.display()))?;
            let path = entry.path();
            if path.is_dir() && is_environment_dir(&path) {
                environments.push(Environment::new(
                    entry.file_name().to_string_lossy().to_string(),
                    &request.base_dir,
                ));
            }
        }
    } else {
        tracing::debug!(base_dir = %request.base_dir.display(), "base directory does not exist");
    }

    environments.sort_by(|a, b| a.name().cmp(b.name()));
    let infos: Vec<_> = environments.iter().map(environment_info).collect();

    let message = format!(
        "Found {} virtual environment(s) in {}",
        infos.len(),
        request.base_dir.display()
    );

    Ok(ExecutionOutcome::success(
        message,
        json!({
            "base_dir": request.base_dir.display().to_string(),
            "count": infos.len(),
            "detailed": request.detailed,
            "environments": serde_json::to_value(&infos)?,
        }),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fake_env(base: &std::path::Path, name: &str) {
        let bin = base.join(name).join("bin");
        fs::create_dir_all(&bin).expect("bin dir");
        fs::write(bin.join("activate"), "# marker").expect("marker");
    }

    #[test]
    fn missing_base_dir_reports_zero() {
        let temp = tempfile::tempdir().expect("tempdir");
        let request = ListRequest {
            base_dir: temp.path().join("absent"),
            detailed: false,
        };
        let outcome = list_environments(&request).expect("list");
        assert!(outcome.message.contains("Found 0 virtual environment(s)"));
        assert_eq!(outcome.details["count"], 0);
    }

    #[test]
    fn unmarked_directories_are_excluded() {
        let temp = tempfile::tempdir().expect("tempdir");
        fake_env(temp.path(), "real");
        // Non-empty directory without a marker must not qualify.
        fs::create_dir_all(temp.path().join("not-an-env").join("stuff")).expect("decoy");
        fs::write(temp.path().join("loose-file.txt"), "x").expect("file");

        let request = ListRequest {
            base_dir: temp.path().to_path_buf(),
            detailed: false,
        };
        let outcome = list_environments(&request).expect("list");
        assert_eq!(outcome.details["count"], 1);
        assert_eq!(outcome.details["environments"][0]["name"], "real");
    }

    #[test]
    fn environments_are_sorted_by_name() {
        let temp = tempfile::tempdir().expect("tempdir");
        for name in ["zeta", "alpha", "mid"] {
            fake_env(temp.path(), name);
        }
        let request = ListRequest {
            base_dir: temp.path().to_path_buf(),
            detailed: true,
        };
        let outcome = list_environments(&request).expect("list");
        let names: Vec<_> = outcome.details["environments"]
            .as_array()
            .expect("array")
            .iter()
            .map(|env| env["name"].as_str().expect("name").to_string())
            .collect();
        assert_eq!(names, ["alpha", "mid", "zeta"]);
    }
}
