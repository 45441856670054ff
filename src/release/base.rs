//! Changelog base resolution
//!
//! Decides which commit marks the boundary of "what's new in this release":
//! the most recent fork tag by version ordering, or, for a first release,
//! the merge-base between HEAD and the upstream tracking branch.

use crate::core::error::{ForkError, ForkResult, PreconditionError};
use crate::release::version::{ForkVersion, latest_fork_tag};
use serde::Serialize;
use std::fmt;

/// Where the changelog base came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BaseOrigin {
  /// The most recent prior fork release tag
  PriorForkTag,
  /// Merge-base with the upstream tracking branch (first fork release)
  UpstreamMergeBase,
}

impl fmt::Display for BaseOrigin {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      BaseOrigin::PriorForkTag => write!(f, "prior fork tag"),
      BaseOrigin::UpstreamMergeBase => write!(f, "merge-base with upstream"),
    }
  }
}

/// The resolved commit-range boundary for this release
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChangelogBase {
  /// Ref or SHA usable in a `<base>..HEAD` range
  pub reference: String,
  pub origin: BaseOrigin,
  /// Prior release version, when the base is a fork tag
  pub prior_version: Option<ForkVersion>,
}

/// Resolve the changelog base from already-collected repository state
///
/// A fork tag, when any exists, is mandatory; the merge-base path is only
/// taken for a first release. Neither available is fatal: without a boundary
/// there is no well-defined notion of "what's new".
pub fn resolve_base(
  local_tags: &[String],
  tag_prefix: &str,
  merge_base: Option<&str>,
  upstream_ref: &str,
) -> ForkResult<ChangelogBase> {
  if let Some((version, tag)) = latest_fork_tag(tag_prefix, local_tags) {
    return Ok(ChangelogBase {
      reference: tag,
      origin: BaseOrigin::PriorForkTag,
      prior_version: Some(version),
    });
  }

  match merge_base {
    Some(sha) => Ok(ChangelogBase {
      reference: sha.to_string(),
      origin: BaseOrigin::UpstreamMergeBase,
      prior_version: None,
    }),
    None => Err(ForkError::Precondition(PreconditionError::NoChangelogBase {
      upstream_ref: upstream_ref.to_string(),
    })),
  }
}
