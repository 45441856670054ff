pub mod system_git;
mod system_git_ops;

pub use system_git::SystemGit;

use serde::Serialize;

/// A commit as it appears in changelog output
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommitRecord {
  pub short_hash: String,
  pub subject: String,
}

impl CommitRecord {
  /// Render as a changelog bullet body: "<shortHash> <subject>", verbatim
  pub fn bullet(&self) -> String {
    format!("{} {}", self.short_hash, self.subject)
  }
}

/// Full commit metadata needed for categorization
///
/// Populated directly by the VCS query layer so the categorization logic
/// never parses log text. `paths` is empty for merge commits (their diffs
/// are never inspected).
#[derive(Debug, Clone, Serialize)]
pub struct CommitDetail {
  pub record: CommitRecord,
  pub is_merge: bool,
  pub message: String,
  pub paths: Vec<String>,
}
