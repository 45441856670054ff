//! Precondition failures: exit codes and no partial mutation

use crate::helpers::TestFork;

#[test]
fn test_dirty_tree_aborts_with_exit_3() {
  let fork = TestFork::new().unwrap();
  fork.commit_file("src/a.rs", "pub fn a() {}\n", "feat: fork work").unwrap();
  std::fs::write(fork.path.join("src/lib.rs"), "pub fn widget() { /* wip */ }\n").unwrap();

  let output = fork.run(&["0.1.0"]).unwrap();

  assert_eq!(output.status.code(), Some(3));
  let stderr = String::from_utf8_lossy(&output.stderr);
  assert!(stderr.contains("uncommitted changes"));
  assert!(!fork.path.join("CHANGELOG.md").exists());
}

#[test]
fn test_duplicate_local_tag_aborts_before_any_change() {
  let fork = TestFork::new().unwrap();
  fork.commit_file("src/a.rs", "pub fn a() {}\n", "feat: fork work").unwrap();
  fork.tag("fork-v0.1.0").unwrap();
  fork.commit_file("src/b.rs", "pub fn b() {}\n", "feat: more work").unwrap();

  let manifest_before = fork.read_file("Cargo.toml").unwrap();
  let head_before = fork.head_subject().unwrap();

  let output = fork.run(&["0.1.0"]).unwrap();

  assert_eq!(output.status.code(), Some(3));
  let stderr = String::from_utf8_lossy(&output.stderr);
  assert!(stderr.contains("fork-v0.1.0"));
  assert!(stderr.contains("already exists"));

  assert_eq!(fork.read_file("Cargo.toml").unwrap(), manifest_before);
  assert_eq!(fork.head_subject().unwrap(), head_before);
  assert!(!fork.path.join("CHANGELOG.md").exists());
}

#[test]
fn test_duplicate_remote_tag_detected() {
  let fork = TestFork::new().unwrap();
  fork.commit_file("src/a.rs", "pub fn a() {}\n", "feat: fork work").unwrap();
  fork.tag("fork-v0.1.0").unwrap();
  crate::helpers::git(&fork.path, &["push", "origin", "refs/tags/fork-v0.1.0"]).unwrap();
  crate::helpers::git(&fork.path, &["tag", "-d", "fork-v0.1.0"]).unwrap();

  // Dry run skips the fetch, so the tag stays remote-only and the
  // ls-remote duplicate check is what has to catch it
  let output = fork.run(&["0.1.0", "--dry-run"]).unwrap();

  assert_eq!(output.status.code(), Some(3));
  let stderr = String::from_utf8_lossy(&output.stderr);
  assert!(stderr.contains("on the remote"));
}

#[test]
fn test_invalid_version_exits_1() {
  let fork = TestFork::new().unwrap();

  for bad in ["1.2", "v1.2.3", "fork-v1.2.3", "1.2.3_rc1", ""] {
    let output = fork.run(&[bad]).unwrap();
    // Empty string trips clap's own validation; both paths are user errors
    let code = output.status.code();
    assert!(code == Some(1) || code == Some(2), "version {:?} gave {:?}", bad, code);
    if !bad.is_empty() {
      assert_eq!(code, Some(1), "version {:?}", bad);
    }
  }
}

#[test]
fn test_no_changelog_base_exits_3() {
  let fork = TestFork::standalone().unwrap();
  fork.commit_file("src/lib.rs", "pub fn orphan() {}\n", "feat: orphan work").unwrap();

  let output = fork.run(&["0.1.0"]).unwrap();

  assert_eq!(output.status.code(), Some(3));
  let stderr = String::from_utf8_lossy(&output.stderr);
  assert!(stderr.contains("No fork release tag"));
  assert!(stderr.contains("upstream/main"));
}
