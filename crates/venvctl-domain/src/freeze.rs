use std::collections::BTreeSet;

/// Parse `pip freeze` output into the installed package set.
///
/// Entries are kept verbatim (`name==version` lines, editable installs,
/// whatever pip prints); the caller compares them as opaque tokens.
pub fn parse_freeze_output(stdout: &str) -> BTreeSet<String> {
    stdout
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(ToString::to_string)
        .collect()
}

/// Coarse reconciliation check between installed and required sets.
///
/// Deliberately blunt set equality: any textual difference (missing
/// packages, extras, or a manifest pin that `pip freeze` renders
/// differently) counts as out of sync and triggers a reinstall. False
/// positives re-run an idempotent install; false negatives would leave a
/// stale environment, so the trade goes this way.
pub fn packages_in_sync(installed: &BTreeSet<String>, required: &BTreeSet<String>) -> bool {
    installed == required
}
