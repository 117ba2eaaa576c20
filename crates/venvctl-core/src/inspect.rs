use std::collections::BTreeSet;
use std::fs;

use serde::Serialize;
use time::{format_description, OffsetDateTime};

use venvctl_domain::{parse_freeze_output, Environment};

use crate::fs::{dir_size, format_size};
use crate::process;

/// Metadata snapshot of an environment, computed on demand.
///
/// Every field is best-effort: a broken pip or unreadable directory
/// degrades the value instead of failing the caller.
#[derive(Debug, Clone, Serialize)]
pub struct EnvironmentInfo {
    pub name: String,
    pub path: String,
    pub created: Option<String>,
    pub size_bytes: u64,
    pub size: String,
    pub python_version: Option<String>,
    pub package_count: usize,
    pub packages: Vec<String>,
}

pub fn environment_info(env: &Environment) -> EnvironmentInfo {
    let size_bytes = dir_size(env.path());
    let packages: Vec<String> = installed_packages(env).into_iter().collect();

    EnvironmentInfo {
        name: env.name().to_string(),
        path: env.path().display().to_string(),
        created: created_timestamp(env),
        size_bytes,
        size: format_size(size_bytes),
        python_version: python_version(env),
        package_count: packages.len(),
        packages,
    }
}

/// The installed package set per `pip freeze`.
///
/// A missing or failing pip yields an empty set with a warning so listing
/// and update stay best-effort.
pub(crate) fn installed_packages(env: &Environment) -> BTreeSet<String> {
    let pip = env.pip_executable();
    match process::run_command(&pip, &["freeze".to_string()]) {
        Ok(out) if out.success() => parse_freeze_output(&out.stdout),
        Ok(out) => {
            tracing::warn!(
                pip = %pip.display(),
                code = out.code,
                stderr = %out.stderr.trim(),
                "pip freeze failed, treating installed set as empty"
            );
            BTreeSet::new()
        }
        Err(err) => {
            tracing::warn!(pip = %pip.display(), error = %err, "could not run pip freeze");
            BTreeSet::new()
        }
    }
}

fn created_timestamp(env: &Environment) -> Option<String> {
    let meta = fs::metadata(env.path()).ok()?;
    // created() is unsupported on some Linux filesystems; mtime is the
    // closest available approximation there.
    let stamp = meta.created().or_else(|_| meta.modified()).ok()?;
    #[allow(deprecated)]
    let fmt = format_description::parse("[year]-[month]-[day] [hour]:[minute]:[second]").ok()?;
    OffsetDateTime::from(stamp).format(&fmt).ok()
}

fn python_version(env: &Environment) -> Option<String> {
    let python = env.python_executable();
    if !python.exists() {
        return None;
    }
    let out = process::run_command(&python, &["--version".to_string()]).ok()?;
    if !out.success() {
        return None;
    }
    // Older interpreters print the version banner to stderr.
    let banner = if out.stdout.trim().is_empty() {
        out.stderr
    } else {
        out.stdout
    };
    let banner = banner.trim();
    (!banner.is_empty()).then(|| banner.to_string())
}
