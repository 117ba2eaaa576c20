use std::{collections::BTreeSet, fs, path::Path};

use anyhow::{Context, Result};

/// Read the requirement lines from a manifest file.
///
/// Lines are trimmed; blank lines and `#` comments are skipped. Requirement
/// lines are opaque tokens: `requests>=2.25.0` and `requests` are two
/// different entries, and no version semantics are applied anywhere.
///
/// A missing manifest is not an error; it yields an empty set so create and
/// update can treat "nothing required" uniformly.
pub fn required_packages(manifest: &Path) -> Result<BTreeSet<String>> {
    if !manifest.exists() {
        tracing::debug!(path = %manifest.display(), "manifest not found, treating as empty");
        return Ok(BTreeSet::new());
    }

    let contents = fs::read_to_string(manifest)
        .with_context(|| format!("failed to read {}", manifest.display()))?;
    Ok(parse_manifest(&contents))
}

fn parse_manifest(contents: &str) -> BTreeSet<String> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(ToString::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_manifest_is_empty() {
        let temp = tempfile::tempdir().expect("tempdir");
        let set = required_packages(&temp.path().join("requirements.txt")).expect("parse");
        assert!(set.is_empty());
    }

    #[test]
    fn comments_and_blank_lines_are_skipped() {
        let set = parse_manifest("# header\n\n   \nrequests>=2.25.0\n  # trailing comment\n");
        assert_eq!(set.len(), 1);
        assert!(set.contains("requests>=2.25.0"));
    }

    #[test]
    fn comment_only_manifest_matches_missing_manifest() {
        let set = parse_manifest("# only\n# comments\n\n");
        assert!(set.is_empty());
    }

    #[test]
    fn lines_are_trimmed_and_deduplicated() {
        let set = parse_manifest("  flask==3.0.0  \nflask==3.0.0\nclick\n");
        assert_eq!(set.len(), 2);
        assert!(set.contains("flask==3.0.0"));
        assert!(set.contains("click"));
    }

    #[test]
    fn requirement_lines_stay_opaque() {
        // No normalization: a pinned and an unpinned spelling are distinct.
        let set = parse_manifest("requests\nrequests==2.32.0\n");
        assert_eq!(set.len(), 2);
    }
}
