//! End-to-end release execution

use crate::helpers::{TestFork, git, stdout_of};

#[test]
fn test_release_from_merge_base() {
  let fork = TestFork::new().unwrap();
  fork.commit_file("src/retry.rs", "pub fn retry() {}\n", "feat: add retry").unwrap();
  fork.commit_file("src/retry.rs", "pub fn retry() { }\n", "fix: retry loop").unwrap();
  fork.commit_file("docs/guide.md", "# Guide\n", "docs: add guide").unwrap();

  let output = fork.run_ok(&["0.1.0"]).unwrap();
  let stdout = stdout_of(&output);

  // First fork release: base is the merge-base with upstream
  assert!(stdout.contains("(merge-base with upstream)"));
  assert!(stdout.contains("Released fork-v0.1.0"));

  // Version bumped
  let manifest = fork.read_file("Cargo.toml").unwrap();
  assert!(manifest.contains("version = \"0.1.0\""));

  // Changelog created with sections in order, newest commit first
  let changelog = fork.read_file("CHANGELOG.md").unwrap();
  assert!(changelog.starts_with("# Changelog\n"));
  assert!(changelog.contains("## [0.1.0]"));
  assert!(changelog.contains("(fork)"));
  let fix = changelog.find("fix: retry loop").unwrap();
  let feat = changelog.find("feat: add retry").unwrap();
  assert!(fix < feat);
  assert!(changelog.contains("### Docs / CI Changes"));
  assert!(changelog.contains("docs: add guide"));
  assert!(changelog.contains("### Upstream Baseline"));
  assert!(changelog.contains("upstream/main @ "));

  // Release commit and annotated tag
  assert_eq!(fork.head_subject().unwrap(), "release: fork-v0.1.0");
  assert!(fork.tags().unwrap().contains(&"fork-v0.1.0".to_string()));
  assert!(fork.is_clean().unwrap());
}

#[test]
fn test_second_release_uses_prior_fork_tag() {
  let fork = TestFork::new().unwrap();
  fork.commit_file("src/a.rs", "pub fn a() {}\n", "feat: first").unwrap();
  fork.run_ok(&["0.1.0"]).unwrap();

  fork.commit_file("src/b.rs", "pub fn b() {}\n", "feat: second").unwrap();
  let output = fork.run_ok(&["0.2.0"]).unwrap();
  let stdout = stdout_of(&output);

  assert!(stdout.contains("fork-v0.1.0 (prior fork tag)"));

  // Only commits after the prior tag appear in the new entry
  let changelog = fork.read_file("CHANGELOG.md").unwrap();
  let entry_start = changelog.find("## [0.2.0]").unwrap();
  let prior_start = changelog.find("## [0.1.0]").unwrap();
  assert!(entry_start < prior_start);
  let new_entry = &changelog[entry_start..prior_start];
  assert!(new_entry.contains("feat: second"));
  assert!(!new_entry.contains("feat: first"));
}

#[test]
fn test_upstream_sync_merge_categorized() {
  let fork = TestFork::new().unwrap();
  fork.commit_file("src/a.rs", "pub fn a() {}\n", "feat: fork work").unwrap();
  fork.merge_upstream("Merge upstream/main into fork").unwrap();

  let output = fork.run_ok(&["0.1.0", "--dry-run"]).unwrap();
  let stdout = stdout_of(&output);

  assert!(stdout.contains("### Upstream Syncs"));
  assert!(stdout.contains("Merge upstream/main into fork"));
  // The merge is not a fork change
  let fork_section = stdout.find("### Fork Changes").unwrap();
  let sync_section = stdout.find("### Upstream Syncs").unwrap();
  let merge_bullet = stdout.rfind("Merge upstream/main into fork").unwrap();
  assert!(fork_section < sync_section && sync_section < merge_bullet);
}

#[test]
fn test_release_with_push() {
  let fork = TestFork::new().unwrap();
  fork.commit_file("src/a.rs", "pub fn a() {}\n", "feat: fork work").unwrap();

  fork.run_ok(&["0.1.0", "--push"]).unwrap();

  // Tag and branch arrived on the fork remote
  let remote_tags = git(&fork.origin, &["tag", "--list"]).unwrap();
  assert!(String::from_utf8_lossy(&remote_tags.stdout).contains("fork-v0.1.0"));
  let remote_log = git(&fork.origin, &["log", "-1", "--format=%s", "main"]).unwrap();
  assert_eq!(
    String::from_utf8_lossy(&remote_log.stdout).trim(),
    "release: fork-v0.1.0"
  );
}

#[test]
fn test_release_without_code_changes_uses_placeholder() {
  let fork = TestFork::new().unwrap();
  fork.commit_file("docs/guide.md", "# Guide\n", "docs: add guide").unwrap();

  fork.run_ok(&["0.1.0"]).unwrap();

  let changelog = fork.read_file("CHANGELOG.md").unwrap();
  assert!(changelog.contains("- No fork-specific code changes"));
  assert!(changelog.contains("docs: add guide"));
}
