//! The release plan: everything decided, nothing yet done
//!
//! A plan is computed from a snapshot of repository state and is the single
//! artifact a dry run prints. Plans are serializable; the plan id is a
//! content hash, so identical repository state and date produce an
//! identical id (and byte-identical dry-run output).

use crate::core::config::ForkConfig;
use crate::core::error::ForkResult;
use crate::release::base::ChangelogBase;
use crate::release::commits::CategorizedCommits;
use crate::release::entry::{ChangelogEntry, UNKNOWN_BASELINE};
use crate::release::version::ForkVersion;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::fmt;

/// Plan identifier (SHA-256 hash of plan contents)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlanId(String);

impl PlanId {
  /// Create a plan ID from plan contents
  pub fn from_contents(contents: &[u8]) -> Self {
    let mut hasher = Sha256::new();
    hasher.update(contents);
    let result = hasher.finalize();
    Self(format!("{:x}", result))
  }

  /// Get the short ID (first 12 characters)
  pub fn short(&self) -> &str {
    &self.0[..12.min(self.0.len())]
  }
}

impl fmt::Display for PlanId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.short())
  }
}

/// A validated release request; immutable once constructed
#[derive(Debug, Clone, Serialize)]
pub struct ReleaseRequest {
  pub version: ForkVersion,
  pub push: bool,
  pub dry_run: bool,
}

impl ReleaseRequest {
  /// Validate the proposed version and freeze the request
  pub fn new(version: &str, push: bool, dry_run: bool) -> ForkResult<Self> {
    Ok(Self {
      version: ForkVersion::parse(version)?,
      push,
      dry_run,
    })
  }
}

/// A fully-resolved release, ready to apply or report
#[derive(Debug, Clone, Serialize)]
pub struct ReleasePlan {
  pub request: ReleaseRequest,
  pub tag_name: String,
  /// Current branch (push target)
  pub branch: String,
  /// HEAD commit the release will be cut from
  pub head: String,
  pub base: ChangelogBase,
  pub commits: CategorizedCommits,
  pub entry: ChangelogEntry,
  /// Upstream tracking ref, e.g. "upstream/main"
  pub upstream_ref: String,
  /// Short hash of the upstream head, when resolvable
  pub upstream_head: Option<String>,
}

impl ReleasePlan {
  /// Assemble the plan from resolved parts; pure
  #[allow(clippy::too_many_arguments)]
  pub fn build(
    request: ReleaseRequest,
    config: &ForkConfig,
    branch: String,
    head: String,
    base: ChangelogBase,
    commits: CategorizedCommits,
    upstream_head: Option<String>,
    date: String,
  ) -> Self {
    let tag_name = request.version.tag_name(&config.tag_prefix);
    let upstream_ref = config.upstream_ref();
    let entry = ChangelogEntry::build(
      request.version.clone(),
      date,
      &commits,
      &upstream_ref,
      upstream_head.as_deref(),
    );

    Self {
      request,
      tag_name,
      branch,
      head,
      base,
      commits,
      entry,
      upstream_ref,
      upstream_head,
    }
  }

  /// Content-hash identity of this plan
  pub fn id(&self) -> PlanId {
    let json = serde_json::to_vec(self).unwrap_or_default();
    PlanId::from_contents(&json)
  }

  /// Upstream baseline as displayed in messages: "<ref> @ <hash|unknown>"
  pub fn baseline(&self) -> String {
    format!(
      "{} @ {}",
      self.upstream_ref,
      self.upstream_head.as_deref().unwrap_or(UNKNOWN_BASELINE)
    )
  }

  /// Commit message for the release commit (fixed template)
  pub fn commit_message(&self) -> String {
    format!("release: {}\n\nUpstream baseline: {}", self.tag_name, self.baseline())
  }

  /// Message for the annotated release tag
  pub fn tag_message(&self) -> String {
    format!(
      "Fork release {}\n\nUpstream baseline: {}\nFork commits since {}: {}",
      self.request.version,
      self.baseline(),
      self.base.reference,
      self.commits.fork_commit_count(),
    )
  }

  /// Get human-readable representation
  pub fn to_human_readable(&self) -> String {
    let mut output = String::new();

    output.push_str(&format!("📋 Release plan: {} ({})\n", self.tag_name, self.id()));
    output.push_str(&format!("   HEAD:     {} ({})\n", &self.head[..12.min(self.head.len())], self.branch));
    output.push_str(&format!("   Base:     {} ({})\n", self.base.reference, self.base.origin));
    output.push_str(&format!("   Baseline: {}\n", self.baseline()));
    output.push_str(&format!(
      "   Commits:  {} code, {} docs/ci, {} upstream sync\n",
      self.commits.code_changes.len(),
      self.commits.docs_ci_changes.len(),
      self.commits.upstream_sync_merges.len(),
    ));

    output.push_str("\n   Changelog entry:\n");
    for line in self.entry.render().lines() {
      output.push_str(&format!("   {}\n", line));
    }

    output
  }
}
