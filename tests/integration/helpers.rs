//! Test helpers for integration tests

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

/// A fork repository with an upstream remote and a fork remote
///
/// Layout inside the tempdir:
/// - `upstream/`   non-bare repository standing in for the upstream project
/// - `origin.git/` bare repository standing in for the fork's own remote
/// - `fork/`       the clone fork-release runs in
pub struct TestFork {
  _root: TempDir,
  pub path: PathBuf,
  pub upstream: PathBuf,
  pub origin: PathBuf,
}

impl TestFork {
  /// Create a fork cloned from a one-commit upstream project
  pub fn new() -> Result<Self> {
    let root = TempDir::new()?;
    let upstream = root.path().join("upstream");
    let origin = root.path().join("origin.git");
    let path = root.path().join("fork");

    // Upstream project with one commit
    std::fs::create_dir_all(&upstream)?;
    git(&upstream, &["init", "--initial-branch=main"])?;
    configure_identity(&upstream)?;
    std::fs::write(
      upstream.join("Cargo.toml"),
      r#"[package]
name = "widget"
version = "1.0.0"
edition = "2021"

[dependencies]
"#,
    )?;
    std::fs::create_dir_all(upstream.join("src"))?;
    std::fs::write(upstream.join("src/lib.rs"), "pub fn widget() {}\n")?;
    git(&upstream, &["add", "."])?;
    git(&upstream, &["commit", "-m", "Initial import"])?;

    // Bare fork remote
    git(root.path(), &["init", "--bare", "origin.git"])?;

    // The fork: clone upstream, then rewire remotes so "upstream" is the
    // upstream project and "origin" is the fork's own remote
    git(root.path(), &["clone", upstream.to_str().unwrap(), "fork"])?;
    configure_identity(&path)?;
    git(&path, &["remote", "rename", "origin", "upstream"])?;
    git(&path, &["remote", "add", "origin", origin.to_str().unwrap()])?;
    git(&path, &["push", "origin", "main"])?;

    Ok(Self {
      _root: root,
      path,
      upstream,
      origin,
    })
  }

  /// Create a repository with no remotes and its own unrelated history
  pub fn standalone() -> Result<Self> {
    let root = TempDir::new()?;
    let path = root.path().join("fork");

    std::fs::create_dir_all(&path)?;
    git(&path, &["init", "--initial-branch=main"])?;
    configure_identity(&path)?;
    std::fs::write(
      path.join("Cargo.toml"),
      "[package]\nname = \"orphan\"\nversion = \"0.1.0\"\nedition = \"2021\"\n",
    )?;
    git(&path, &["add", "."])?;
    git(&path, &["commit", "-m", "Initial import"])?;

    let upstream = root.path().join("upstream");
    let origin = root.path().join("origin.git");
    Ok(Self {
      _root: root,
      path,
      upstream,
      origin,
    })
  }

  /// Write a file in the fork and commit it
  pub fn commit_file(&self, rel_path: &str, content: &str, message: &str) -> Result<String> {
    let file_path = self.path.join(rel_path);
    if let Some(parent) = file_path.parent() {
      std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&file_path, content)?;
    git(&self.path, &["add", rel_path])?;
    git(&self.path, &["commit", "-m", message])?;

    let output = git(&self.path, &["rev-parse", "HEAD"])?;
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
  }

  /// Advance upstream by one commit and merge it into the fork
  pub fn merge_upstream(&self, merge_message: &str) -> Result<()> {
    std::fs::write(self.upstream.join("src/lib.rs"), "pub fn widget() {}\npub fn gadget() {}\n")?;
    git(&self.upstream, &["add", "."])?;
    git(&self.upstream, &["commit", "-m", "Add gadget"])?;

    git(&self.path, &["fetch", "upstream"])?;
    git(&self.path, &["merge", "--no-ff", "-m", merge_message, "upstream/main"])?;
    Ok(())
  }

  /// Create an annotated tag in the fork
  pub fn tag(&self, name: &str) -> Result<()> {
    git(&self.path, &["tag", "-a", name, "-m", name])?;
    Ok(())
  }

  /// Local tag names
  pub fn tags(&self) -> Result<Vec<String>> {
    let output = git(&self.path, &["tag", "--list"])?;
    Ok(
      String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(String::from)
        .collect(),
    )
  }

  /// Subject of the HEAD commit
  pub fn head_subject(&self) -> Result<String> {
    let output = git(&self.path, &["log", "-1", "--format=%s"])?;
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
  }

  /// Whether the tracked working tree is clean
  pub fn is_clean(&self) -> Result<bool> {
    let output = git(&self.path, &["status", "--porcelain", "--untracked-files=no"])?;
    Ok(output.stdout.is_empty())
  }

  /// Read a file from the fork
  pub fn read_file(&self, rel_path: &str) -> Result<String> {
    std::fs::read_to_string(self.path.join(rel_path)).context("Failed to read file")
  }

  /// Run fork-release in the fork; does not fail on non-zero exit
  pub fn run(&self, args: &[&str]) -> Result<Output> {
    let bin = env!("CARGO_BIN_EXE_fork-release");
    Command::new(bin)
      .current_dir(&self.path)
      .args(args)
      .output()
      .context("Failed to run fork-release")
  }

  /// Run fork-release and require success
  pub fn run_ok(&self, args: &[&str]) -> Result<Output> {
    let output = self.run(args)?;
    if !output.status.success() {
      anyhow::bail!(
        "fork-release {} failed\nstdout: {}\nstderr: {}",
        args.join(" "),
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr),
      );
    }
    Ok(output)
  }
}

fn configure_identity(repo: &Path) -> Result<()> {
  git(repo, &["config", "user.name", "Test User"])?;
  git(repo, &["config", "user.email", "test@example.com"])?;
  Ok(())
}

/// Run git command in a directory
pub fn git(cwd: &Path, args: &[&str]) -> Result<Output> {
  let output = Command::new("git")
    .current_dir(cwd)
    .args(args)
    .output()
    .context("Failed to run git command")?;

  if !output.status.success() {
    let stderr = String::from_utf8_lossy(&output.stderr);
    anyhow::bail!("Git command failed: git {}\n{}", args.join(" "), stderr);
  }

  Ok(output)
}

/// Stdout of an invocation as UTF-8
pub fn stdout_of(output: &Output) -> String {
  String::from_utf8_lossy(&output.stdout).to_string()
}
