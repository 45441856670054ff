//! Release-oriented operations for SystemGit (tags, remotes, history ranges)

use super::system_git::SystemGit;
use super::{CommitDetail, CommitRecord};
use crate::core::error::{ForkError, ForkResult, GitError, ResultExt};
use std::path::Path;

impl SystemGit {
  /// List all local tag names
  pub fn list_tags(&self) -> ForkResult<Vec<String>> {
    let output = self
      .git_cmd()
      .args(["tag", "--list"])
      .output()
      .context("Failed to list tags")?;

    if !output.status.success() {
      let stderr = String::from_utf8_lossy(&output.stderr);
      return Err(ForkError::Git(GitError::CommandFailed {
        command: "git tag --list".to_string(),
        stderr: stderr.to_string(),
      }));
    }

    let tags = String::from_utf8_lossy(&output.stdout)
      .lines()
      .map(|s| s.trim().to_string())
      .filter(|s| !s.is_empty())
      .collect();

    Ok(tags)
  }

  /// List tag names on a remote via ls-remote (read-only network query)
  pub fn list_remote_tags(&self, remote: &str) -> ForkResult<Vec<String>> {
    let output = self
      .git_cmd()
      .args(["ls-remote", "--tags", "--refs", remote])
      .output()
      .context("Failed to list remote tags")?;

    if !output.status.success() {
      let stderr = String::from_utf8_lossy(&output.stderr);
      return Err(ForkError::Git(GitError::CommandFailed {
        command: format!("git ls-remote --tags {}", remote),
        stderr: stderr.to_string(),
      }));
    }

    // Lines look like: "<sha>\trefs/tags/<name>"
    let tags = String::from_utf8_lossy(&output.stdout)
      .lines()
      .filter_map(|line| line.split('\t').nth(1))
      .filter_map(|r| r.strip_prefix("refs/tags/"))
      .map(|s| s.to_string())
      .collect();

    Ok(tags)
  }

  /// Fetch from a remote (mutates remote-tracking refs)
  pub fn fetch(&self, remote: &str) -> ForkResult<()> {
    let output = self
      .git_cmd()
      .args(["fetch", "--tags", remote])
      .output()
      .context("Failed to fetch")?;

    if !output.status.success() {
      let stderr = String::from_utf8_lossy(&output.stderr);
      return Err(ForkError::Git(GitError::CommandFailed {
        command: format!("git fetch {}", remote),
        stderr: stderr.to_string(),
      }));
    }

    Ok(())
  }

  /// Compute the merge-base of two refs, if any common ancestor exists
  pub fn merge_base(&self, a: &str, b: &str) -> ForkResult<Option<String>> {
    let output = self
      .git_cmd()
      .args(["merge-base", a, b])
      .output()
      .context("Failed to compute merge-base")?;

    // merge-base exits 1 when there is no common ancestor, and 128 when a
    // ref cannot be resolved; both mean "no usable base" here.
    if !output.status.success() {
      return Ok(None);
    }

    let sha = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if sha.is_empty() { Ok(None) } else { Ok(Some(sha)) }
  }

  /// Resolve a ref to its abbreviated commit hash
  pub fn short_hash(&self, reference: &str) -> ForkResult<Option<String>> {
    let output = self
      .git_cmd()
      .args(["rev-parse", "--short", &format!("{}^{{commit}}", reference)])
      .output()
      .context("Failed to resolve ref")?;

    if !output.status.success() {
      return Ok(None);
    }

    let sha = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if sha.is_empty() { Ok(None) } else { Ok(Some(sha)) }
  }

  /// List commit SHAs in `(base, HEAD]`, newest first, merges included
  pub fn rev_list_range(&self, base: &str) -> ForkResult<Vec<String>> {
    let range = format!("{}..HEAD", base);
    let output = self
      .git_cmd()
      .args(["rev-list", &range])
      .output()
      .context("Failed to run git rev-list")?;

    if !output.status.success() {
      let stderr = String::from_utf8_lossy(&output.stderr);
      return Err(ForkError::Git(GitError::CommandFailed {
        command: format!("git rev-list {}", range),
        stderr: stderr.to_string(),
      }));
    }

    let shas = String::from_utf8_lossy(&output.stdout)
      .lines()
      .map(|s| s.trim().to_string())
      .filter(|s| !s.is_empty())
      .collect();

    Ok(shas)
  }

  /// Get the metadata for one commit as a typed record
  ///
  /// Merge commits skip the path query; their diffs are never inspected.
  pub fn commit_detail(&self, sha: &str) -> ForkResult<CommitDetail> {
    // Format: abbreviated hash, parent hashes, subject, then full body
    let format = "%h%n%P%n%s%n%B";

    let output = self
      .git_cmd()
      .args(["show", "--no-patch", &format!("--format={}", format), sha])
      .output()
      .context("Failed to get commit metadata")?;

    if !output.status.success() {
      let stderr = String::from_utf8_lossy(&output.stderr);
      return Err(ForkError::Git(GitError::CommandFailed {
        command: format!("git show {}", sha),
        stderr: stderr.to_string(),
      }));
    }

    let text = String::from_utf8_lossy(&output.stdout).to_string();
    let mut detail = parse_commit_detail(&text)?;

    if !detail.is_merge {
      detail.paths = self.changed_paths(sha)?;
    }

    Ok(detail)
  }

  /// Paths touched by a single commit (relative to the repo root)
  fn changed_paths(&self, sha: &str) -> ForkResult<Vec<String>> {
    let output = self
      .git_cmd()
      .args(["diff-tree", "--no-commit-id", "--name-only", "-r", "--root", sha])
      .output()
      .context("Failed to get changed paths")?;

    if !output.status.success() {
      let stderr = String::from_utf8_lossy(&output.stderr);
      return Err(ForkError::Git(GitError::CommandFailed {
        command: format!("git diff-tree {}", sha),
        stderr: stderr.to_string(),
      }));
    }

    let paths = String::from_utf8_lossy(&output.stdout)
      .lines()
      .map(|s| s.trim().to_string())
      .filter(|s| !s.is_empty())
      .collect();

    Ok(paths)
  }

  /// Stage specific paths and create a commit
  pub fn commit_paths(&self, paths: &[&Path], message: &str) -> ForkResult<()> {
    let mut add = self.git_cmd();
    add.arg("add").arg("--");
    for path in paths {
      add.arg(path);
    }
    let output = add.output().context("Failed to stage release files")?;

    if !output.status.success() {
      let stderr = String::from_utf8_lossy(&output.stderr);
      return Err(ForkError::Git(GitError::CommandFailed {
        command: "git add".to_string(),
        stderr: stderr.to_string(),
      }));
    }

    let output = self
      .git_cmd()
      .args(["commit", "-m", message])
      .output()
      .context("Failed to create release commit")?;

    if !output.status.success() {
      let stderr = String::from_utf8_lossy(&output.stderr);
      return Err(ForkError::Git(GitError::CommandFailed {
        command: "git commit".to_string(),
        stderr: stderr.to_string(),
      }));
    }

    Ok(())
  }

  /// Create an annotated tag at HEAD
  pub fn create_annotated_tag(&self, tag: &str, message: &str) -> ForkResult<()> {
    let output = self
      .git_cmd()
      .args(["tag", "-a", tag, "-m", message])
      .output()
      .context("Failed to create tag")?;

    if !output.status.success() {
      let stderr = String::from_utf8_lossy(&output.stderr);
      return Err(ForkError::Git(GitError::CommandFailed {
        command: format!("git tag -a {}", tag),
        stderr: stderr.to_string(),
      }));
    }

    Ok(())
  }

  /// Verify an annotated tag object exists and points at a commit
  pub fn verify_tag(&self, tag: &str) -> ForkResult<bool> {
    let output = self
      .git_cmd()
      .args(["rev-parse", "--verify", &format!("refs/tags/{}", tag)])
      .output()
      .context("Failed to verify tag")?;

    Ok(output.status.success())
  }

  /// Push a branch and a tag to a remote
  pub fn push_release(&self, remote: &str, branch: &str, tag: &str) -> ForkResult<()> {
    let tag_ref = format!("refs/tags/{}", tag);
    let output = self
      .git_cmd()
      .args(["push", remote, branch, &tag_ref])
      .output()
      .context("Failed to push")?;

    if !output.status.success() {
      let stderr = String::from_utf8_lossy(&output.stderr);
      return Err(ForkError::Git(GitError::PushFailed {
        remote: remote.to_string(),
        refspec: format!("{} + {}", branch, tag_ref),
        reason: stderr.to_string(),
      }));
    }

    Ok(())
  }
}

/// Parse `git show --format=%h%n%P%n%s%n%B` output into a CommitDetail
///
/// Which gives us: abbreviated hash, parent hashes, subject, full body.
fn parse_commit_detail(text: &str) -> ForkResult<CommitDetail> {
  let mut lines = text.lines();

  let short_hash = lines
    .next()
    .ok_or_else(|| ForkError::message("Missing commit hash"))?
    .trim()
    .to_string();
  let parents_line = lines.next().unwrap_or("").trim();
  let is_merge = parents_line.split_whitespace().count() > 1;
  let subject = lines
    .next()
    .ok_or_else(|| ForkError::message("Missing commit subject"))?
    .to_string();

  // Rest is the full message body
  let message: Vec<&str> = lines.collect();
  let message = message.join("\n").trim().to_string();

  Ok(CommitDetail {
    record: CommitRecord { short_hash, subject },
    is_merge,
    message,
    paths: vec![],
  })
}
