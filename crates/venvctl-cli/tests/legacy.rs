#![cfg(unix)]

use std::fs;

mod common;

use common::{sandbox_with_python, stdout_of, venvctl_cmd};

#[test]
fn no_subcommand_invocation_behaves_like_create() {
    let sb = sandbox_with_python("venvctl-legacy-");
    let manifest = sb.workdir.join("requirements.txt");
    fs::write(&manifest, "requests>=2.25.0\n").expect("manifest");

    let assert = venvctl_cmd(&sb)
        .args(["--name", "legacydemo", "-b"])
        .arg(&sb.base_dir)
        .arg("-r")
        .arg(&manifest)
        .assert()
        .success();
    assert!(
        stdout_of(&assert).contains("created virtual environment 'legacydemo'"),
        "{}",
        stdout_of(&assert)
    );
    assert!(sb
        .base_dir
        .join("legacydemo")
        .join("bin")
        .join("activate")
        .exists());
}

#[test]
fn legacy_mode_tolerates_unknown_flags() {
    let sb = sandbox_with_python("venvctl-legacy-unknown-");

    venvctl_cmd(&sb)
        .args(["--name", "tolerant", "-b"])
        .arg(&sb.base_dir)
        .args(["--some-future-flag"])
        .assert()
        .success();
    assert!(sb
        .base_dir
        .join("tolerant")
        .join("bin")
        .join("activate")
        .exists());
}

#[test]
fn legacy_default_name_is_the_working_directory() {
    let sb = sandbox_with_python("venvctl-legacy-default-");

    // No --name: the environment takes the cwd basename, here "project".
    venvctl_cmd(&sb)
        .arg("-b")
        .arg(&sb.base_dir)
        .assert()
        .success();
    assert!(sb
        .base_dir
        .join("project")
        .join("bin")
        .join("activate")
        .exists());
}
