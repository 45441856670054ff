//! Release version grammar and fork tag naming
//!
//! A release version is `MAJOR.MINOR.PATCH`, optionally followed by a `.` or
//! `-` separated suffix of alphanumerics, dots, and hyphens. This is looser
//! than strict semver (`1.2.3.rc1` is accepted), so the numeric triple is
//! parsed with the semver crate and the suffix is kept as an opaque string
//! that only participates in ordering.

use crate::core::error::{ForkError, ForkResult, ValidationError};
use semver::Version;
use serde::Serialize;
use std::cmp::Ordering;
use std::fmt;

/// A validated fork release version
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ForkVersion {
  /// Numeric MAJOR.MINOR.PATCH triple
  pub base: Version,
  /// Pre-release/build suffix, without its leading separator
  pub suffix: Option<String>,
}

impl ForkVersion {
  /// Parse a version string against the release grammar
  pub fn parse(input: &str) -> ForkResult<Self> {
    let bad = |reason: &str| {
      ForkError::Validation(ValidationError::BadVersion {
        version: input.to_string(),
        reason: reason.to_string(),
      })
    };

    let (triple, rest) = split_numeric_triple(input).ok_or_else(|| bad("expected MAJOR.MINOR.PATCH"))?;

    let suffix = if rest.is_empty() {
      None
    } else {
      let mut chars = rest.chars();
      match chars.next() {
        Some('.') | Some('-') => {}
        _ => return Err(bad("suffix must be separated by '.' or '-'")),
      }
      let suffix = chars.as_str();
      if suffix.is_empty() {
        return Err(bad("suffix is empty"));
      }
      if !suffix.chars().all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-') {
        return Err(bad("suffix may only contain alphanumerics, dots, and hyphens"));
      }
      Some(suffix.to_string())
    };

    let base = Version::new(triple.0, triple.1, triple.2);
    Ok(Self { base, suffix })
  }

  /// Parse a tag name in the fork namespace, e.g. "fork-v0.3.0"
  pub fn parse_tag(prefix: &str, tag: &str) -> Option<Self> {
    let version = tag.strip_prefix(prefix)?;
    Self::parse(version).ok()
  }

  /// Format as a fork tag name
  pub fn tag_name(&self, prefix: &str) -> String {
    format!("{}{}", prefix, self)
  }
}

impl fmt::Display for ForkVersion {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match &self.suffix {
      // The canonical separator is '-'; a '.'-separated suffix round-trips
      // through the tag name with '-', which is fine because ordering and
      // uniqueness are computed on the parsed value.
      Some(suffix) => write!(f, "{}.{}.{}-{}", self.base.major, self.base.minor, self.base.patch, suffix),
      None => write!(f, "{}.{}.{}", self.base.major, self.base.minor, self.base.patch),
    }
  }
}

impl Ord for ForkVersion {
  fn cmp(&self, other: &Self) -> Ordering {
    match self.base.cmp(&other.base) {
      Ordering::Equal => match (&self.suffix, &other.suffix) {
        // Pre-release semantics: a bare version outranks a suffixed one
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(a), Some(b)) => a.cmp(b),
      },
      ord => ord,
    }
  }
}

impl PartialOrd for ForkVersion {
  fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
    Some(self.cmp(other))
  }
}

/// Split "<digits>.<digits>.<digits>" off the front of the input
fn split_numeric_triple(input: &str) -> Option<((u64, u64, u64), &str)> {
  let (major, rest) = take_number(input)?;
  let rest = rest.strip_prefix('.')?;
  let (minor, rest) = take_number(rest)?;
  let rest = rest.strip_prefix('.')?;
  let (patch, rest) = take_number(rest)?;
  Some(((major, minor, patch), rest))
}

fn take_number(input: &str) -> Option<(u64, &str)> {
  let end = input.find(|c: char| !c.is_ascii_digit()).unwrap_or(input.len());
  if end == 0 {
    return None;
  }
  let value = input[..end].parse().ok()?;
  Some((value, &input[end..]))
}

/// Pick the greatest fork version among tags carrying the fork prefix
///
/// Returns the version together with the tag name it came from. Ordering is
/// version-aware, never lexical or chronological.
pub fn latest_fork_tag(prefix: &str, tags: &[String]) -> Option<(ForkVersion, String)> {
  tags
    .iter()
    .filter_map(|tag| ForkVersion::parse_tag(prefix, tag).map(|v| (v, tag.clone())))
    .max_by(|(a, _), (b, _)| a.cmp(b))
}
