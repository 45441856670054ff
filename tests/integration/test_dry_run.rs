//! Dry-run behavior: full plan output, zero mutation, deterministic

use crate::helpers::{TestFork, stdout_of};

#[test]
fn test_dry_run_prints_plan_and_changes_nothing() {
  let fork = TestFork::new().unwrap();
  fork.commit_file("src/extra.rs", "pub fn extra() {}\n", "feat: add extra").unwrap();

  let head_before = fork.head_subject().unwrap();
  let manifest_before = fork.read_file("Cargo.toml").unwrap();

  let output = fork.run_ok(&["0.1.0", "--dry-run"]).unwrap();
  let stdout = stdout_of(&output);

  assert!(stdout.contains("Release plan: fork-v0.1.0"));
  assert!(stdout.contains("## [0.1.0]"));
  assert!(stdout.contains("feat: add extra"));
  assert!(stdout.contains("Dry-run mode (no changes applied)"));

  // No mutation of any kind
  assert_eq!(fork.head_subject().unwrap(), head_before);
  assert_eq!(fork.read_file("Cargo.toml").unwrap(), manifest_before);
  assert!(fork.tags().unwrap().is_empty());
  assert!(!fork.path.join("CHANGELOG.md").exists());
}

#[test]
fn test_dry_run_output_is_deterministic() {
  let fork = TestFork::new().unwrap();
  fork.commit_file("src/extra.rs", "pub fn extra() {}\n", "feat: add extra").unwrap();
  fork.commit_file("docs/guide.md", "# Guide\n", "docs: add guide").unwrap();

  let first = fork.run_ok(&["0.1.0", "--dry-run"]).unwrap();
  let second = fork.run_ok(&["0.1.0", "--dry-run"]).unwrap();

  assert_eq!(first.stdout, second.stdout);
}

#[test]
fn test_dry_run_allowed_on_dirty_tree() {
  let fork = TestFork::new().unwrap();
  fork.commit_file("src/extra.rs", "pub fn extra() {}\n", "feat: add extra").unwrap();

  // Dirty the tracked tree; a dry run must still work
  std::fs::write(fork.path.join("src/lib.rs"), "pub fn widget() { /* wip */ }\n").unwrap();

  let output = fork.run_ok(&["0.1.0", "--dry-run"]).unwrap();
  assert!(stdout_of(&output).contains("Release plan: fork-v0.1.0"));
}
