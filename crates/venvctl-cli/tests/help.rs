use assert_cmd::cargo::cargo_bin_cmd;

fn help_output(args: &[&str]) -> String {
    let assert = cargo_bin_cmd!("venvctl").args(args).assert().success();
    String::from_utf8(assert.get_output().stdout.clone()).expect("utf8 help")
}

#[test]
fn top_level_help_lists_all_subcommands() {
    let output = help_output(&["--help"]);
    assert!(
        output.contains("Manage Python virtual environments"),
        "about line missing: {output}"
    );
    for subcommand in ["create", "list", "remove"] {
        assert!(output.contains(subcommand), "{subcommand} missing: {output}");
    }
    assert!(
        output.contains("legacy interface"),
        "legacy note missing: {output}"
    );
}

#[test]
fn create_help_documents_defaults() {
    let output = help_output(&["create", "--help"]);
    assert!(
        output.contains("current directory name"),
        "name default missing: {output}"
    );
    assert!(
        output.contains("~/virtual_environments"),
        "base dir default missing: {output}"
    );
    assert!(
        output.contains("requirements.txt"),
        "manifest default missing: {output}"
    );
}

#[test]
fn remove_help_mentions_force() {
    let output = help_output(&["remove", "--help"]);
    assert!(
        output.contains("confirmation prompt"),
        "force help missing: {output}"
    );
    assert!(
        output.contains("venvctl remove --name myproject --force"),
        "force example missing: {output}"
    );
}

#[test]
fn list_help_mentions_detailed() {
    let output = help_output(&["list", "--help"]);
    assert!(
        output.contains("detailed information"),
        "detailed help missing: {output}"
    );
}
