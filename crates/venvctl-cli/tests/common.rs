#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::assert::Assert;
use assert_cmd::cargo::cargo_bin_cmd;
use serde_json::Value;
use tempfile::TempDir;

/// Scratch layout for one test: a working directory (markers and the
/// activation script land here), a base directory for environments, and
/// optionally a stub interpreter wired up through `VENVCTL_PYTHON`.
pub struct Sandbox {
    pub temp: TempDir,
    pub workdir: PathBuf,
    pub base_dir: PathBuf,
    pub python: Option<PathBuf>,
}

pub fn sandbox(prefix: &str) -> Sandbox {
    let temp = tempfile::Builder::new()
        .prefix(prefix)
        .tempdir()
        .expect("tempdir");
    let workdir = temp.path().join("project");
    let base_dir = temp.path().join("envs");
    fs::create_dir_all(&workdir).expect("workdir");
    Sandbox {
        temp,
        workdir,
        base_dir,
        python: None,
    }
}

/// Sandbox with a fake interpreter: `python -m venv` scaffolds an
/// environment whose pip logs installs and replays the manifest through
/// `freeze`, so lifecycle tests never need a real Python.
#[cfg(unix)]
pub fn sandbox_with_python(prefix: &str) -> Sandbox {
    let mut sb = sandbox(prefix);
    sb.python = Some(write_python_stub(sb.temp.path()));
    sb
}

pub fn venvctl_cmd(sb: &Sandbox) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("venvctl");
    cmd.current_dir(&sb.workdir).env("NO_COLOR", "1");
    if let Some(python) = &sb.python {
        cmd.env("VENVCTL_PYTHON", python);
    }
    cmd
}

pub fn parse_json(assert: &Assert) -> Value {
    serde_json::from_slice(&assert.get_output().stdout).expect("valid json")
}

pub fn stdout_of(assert: &Assert) -> String {
    String::from_utf8(assert.get_output().stdout.clone()).expect("utf8 stdout")
}

/// A directory that qualifies as an environment without any interpreter:
/// just the activation marker.
pub fn fake_environment(base: &Path, name: &str) -> PathBuf {
    let root = base.join(name);
    fs::create_dir_all(root.join("bin")).expect("bin dir");
    fs::write(root.join("bin").join("activate"), "# fake activate\n").expect("marker");
    root
}

#[cfg(unix)]
fn write_python_stub(root: &Path) -> PathBuf {
    let stubs = root.join("stubs");
    fs::create_dir_all(&stubs).expect("stubs dir");

    write_executable(
        &stubs.join("env-python"),
        r#"#!/bin/sh
if [ "$1" = "--version" ]; then
  echo "Python 3.12.1"
fi
exit 0
"#,
    );

    write_executable(
        &stubs.join("env-pip"),
        r#"#!/bin/sh
venv="$(cd "$(dirname "$0")/.." && pwd)"
cmd="$1"
[ "$#" -gt 0 ] && shift
case "$cmd" in
  freeze)
    if [ -f "$venv/freeze.txt" ]; then
      cat "$venv/freeze.txt"
    fi
    ;;
  install)
    echo "install $*" >> "$venv/install.log"
    if [ "$1" = "-r" ] && [ -f "$2" ]; then
      sed -e 's/^[[:space:]]*//' -e 's/[[:space:]]*$//' "$2" | grep -v '^#' | grep -v '^$' | sort -u > "$venv/freeze.txt"
    fi
    ;;
esac
exit 0
"#,
    );

    write_executable(
        &stubs.join("python"),
        r##"#!/bin/sh
stubs="$(cd "$(dirname "$0")" && pwd)"
case "$1" in
  -c)
    exit 0
    ;;
  --version)
    echo "Python 3.12.1"
    exit 0
    ;;
  -m)
    if [ "$2" != "venv" ]; then
      exit 1
    fi
    target="$3"
    mkdir -p "$target/bin"
    echo "# stub activate" > "$target/bin/activate"
    cp "$stubs/env-python" "$target/bin/python"
    cp "$stubs/env-pip" "$target/bin/pip"
    chmod 755 "$target/bin/python" "$target/bin/pip"
    exit 0
    ;;
esac
exit 0
"##,
    );

    stubs.join("python")
}

#[cfg(unix)]
fn write_executable(path: &Path, contents: &str) {
    use std::os::unix::fs::PermissionsExt;
    fs::write(path, contents).expect("write stub");
    fs::set_permissions(path, fs::Permissions::from_mode(0o755)).expect("chmod stub");
}

/// Lines logged by the stub pip, one per `pip install` invocation.
pub fn install_log(env_root: &Path) -> Vec<String> {
    match fs::read_to_string(env_root.join("install.log")) {
        Ok(contents) => contents.lines().map(ToString::to_string).collect(),
        Err(_) => Vec::new(),
    }
}
