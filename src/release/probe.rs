//! Repository preconditions
//!
//! Read-mostly checks that run before any mutation: working-tree
//! cleanliness, best-effort remote fetch, and tag-namespace availability.
//! Fetch failures never abort a release; they only mean the duplicate-tag
//! check and upstream baseline may be based on stale remote-tracking refs.

use crate::core::config::ForkConfig;
use crate::core::error::{ForkError, ForkResult, PreconditionError, TagLocation, print_warning};
use crate::core::vcs::SystemGit;

/// Precondition checks over the repository
pub struct RepositoryProbe<'a> {
  git: &'a SystemGit,
  config: &'a ForkConfig,
}

impl<'a> RepositoryProbe<'a> {
  pub fn new(git: &'a SystemGit, config: &'a ForkConfig) -> Self {
    Self { git, config }
  }

  /// Fail on a dirty working tree
  ///
  /// Skipped entirely in dry-run mode: a dry run performs no mutation, so a
  /// dirty tree is harmless.
  pub fn assert_clean_tree(&self, dry_run: bool) -> ForkResult<()> {
    if dry_run {
      return Ok(());
    }

    if self.git.is_work_tree_clean()? {
      Ok(())
    } else {
      Err(ForkError::Precondition(PreconditionError::DirtyTree))
    }
  }

  /// Best-effort fetch of the fork and upstream remotes
  ///
  /// Failure is downgraded to a warning; the release then runs against
  /// whatever remote-tracking state is already present.
  pub fn fetch_remotes(&self) {
    for remote in [&self.config.fork_remote, &self.config.upstream_remote] {
      if let Err(err) = self.git.fetch(remote) {
        print_warning(format!("Could not fetch '{}': {} (continuing with local state)", remote, err));
      }
    }
  }

  /// Tags on the fork remote, or empty when the remote is unreachable
  pub fn remote_tags(&self) -> Vec<String> {
    match self.git.list_remote_tags(&self.config.fork_remote) {
      Ok(tags) => tags,
      Err(err) => {
        print_warning(format!(
          "Could not list tags on '{}': {} (checking local tags only)",
          self.config.fork_remote, err
        ));
        vec![]
      }
    }
  }

  /// Fail if the proposed tag exists locally or on the fork remote
  pub fn assert_tag_available(&self, tag: &str, local_tags: &[String], remote_tags: &[String]) -> ForkResult<()> {
    check_tag_available(tag, local_tags, remote_tags)
  }
}

/// Tag uniqueness across the local and remote tag namespaces
pub fn check_tag_available(tag: &str, local_tags: &[String], remote_tags: &[String]) -> ForkResult<()> {
  if local_tags.iter().any(|t| t == tag) {
    return Err(ForkError::Precondition(PreconditionError::DuplicateTag {
      tag: tag.to_string(),
      location: TagLocation::Local,
    }));
  }

  if remote_tags.iter().any(|t| t == tag) {
    return Err(ForkError::Precondition(PreconditionError::DuplicateTag {
      tag: tag.to_string(),
      location: TagLocation::Remote,
    }));
  }

  Ok(())
}
