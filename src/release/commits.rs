//! Commit categorization over a resolved range
//!
//! Splits the commits in `(base, HEAD]` into the three changelog buckets.
//! Pure over typed commit records; the VCS layer supplies diffs and merge
//! flags so no log text is parsed here.

use crate::core::vcs::{CommitDetail, CommitRecord};
use serde::Serialize;

/// Commits in the release range, split into changelog buckets
///
/// Each bucket preserves the newest-first order of the history walk. A commit
/// lands in at most one of `code_changes`/`docs_ci_changes`; merge commits
/// appear in neither, but matching merges surface in `upstream_sync_merges`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CategorizedCommits {
  /// Non-merge commits touching at least one non-excluded path
  pub code_changes: Vec<CommitRecord>,
  /// Non-merge commits whose entire diff is confined to excluded paths
  pub docs_ci_changes: Vec<CommitRecord>,
  /// Merge commits whose message carries the upstream-sync marker
  pub upstream_sync_merges: Vec<CommitRecord>,
}

impl CategorizedCommits {
  /// Count of fork-authored non-merge commits since the base
  ///
  /// This is what the annotated tag message reports.
  pub fn fork_commit_count(&self) -> usize {
    self.code_changes.len() + self.docs_ci_changes.len()
  }
}

/// Categorize the commits of a release range
///
/// `excluded_paths` are path prefixes (e.g. "docs/"); `sync_marker` is
/// matched case-insensitively against full merge-commit messages.
pub fn categorize(details: &[CommitDetail], excluded_paths: &[String], sync_marker: &str) -> CategorizedCommits {
  let marker = sync_marker.to_lowercase();
  let mut buckets = CategorizedCommits::default();

  for detail in details {
    if detail.is_merge {
      if detail.message.to_lowercase().contains(&marker) {
        buckets.upstream_sync_merges.push(detail.record.clone());
      }
      continue;
    }

    if is_docs_ci_only(&detail.paths, excluded_paths) {
      buckets.docs_ci_changes.push(detail.record.clone());
    } else {
      buckets.code_changes.push(detail.record.clone());
    }
  }

  buckets
}

/// True when a non-empty diff touches only excluded path prefixes
///
/// An empty diff (e.g. `git commit --allow-empty`) counts as a code change:
/// the Docs/CI bucket requires at least one touched, excluded path.
fn is_docs_ci_only(paths: &[String], excluded_paths: &[String]) -> bool {
  !paths.is_empty()
    && paths
      .iter()
      .all(|path| excluded_paths.iter().any(|prefix| path.starts_with(prefix.as_str())))
}
