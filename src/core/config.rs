//! Release policy configuration
//!
//! Everything here has a sensible default; a repository without a fork.toml
//! gets the stock fork-release behavior. The sync-marker and excluded-path
//! rules are policy, not code, so they live in configuration.

use crate::core::error::{ForkError, ForkResult, ResultExt, ValidationError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Configuration for fork-release
/// Searched in order: fork.toml, .fork.toml, .config/fork.toml
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForkConfig {
  /// Remote holding the upstream project (default: "upstream")
  #[serde(default = "default_upstream_remote")]
  pub upstream_remote: String,

  /// Upstream branch the fork tracks (default: "main")
  #[serde(default = "default_upstream_branch")]
  pub upstream_branch: String,

  /// Remote the fork's own history and tags live on (default: "origin")
  #[serde(default = "default_fork_remote")]
  pub fork_remote: String,

  /// Reserved tag namespace for fork releases (default: "fork-v")
  #[serde(default = "default_tag_prefix")]
  pub tag_prefix: String,

  /// Path prefixes whose exclusive diffs classify a commit as Docs/CI
  #[serde(default = "default_excluded_paths")]
  pub excluded_paths: Vec<String>,

  /// Case-insensitive substring identifying upstream-sync merge commits
  #[serde(default = "default_sync_marker")]
  pub sync_marker: String,

  /// Manifest whose package version is bumped (default: "Cargo.toml")
  #[serde(default = "default_manifest_path")]
  pub manifest_path: PathBuf,

  /// Changelog file the release entry is spliced into (default: "CHANGELOG.md")
  #[serde(default = "default_changelog_path")]
  pub changelog_path: PathBuf,
}

fn default_upstream_remote() -> String {
  "upstream".to_string()
}

fn default_upstream_branch() -> String {
  "main".to_string()
}

fn default_fork_remote() -> String {
  "origin".to_string()
}

fn default_tag_prefix() -> String {
  "fork-v".to_string()
}

fn default_excluded_paths() -> Vec<String> {
  vec!["docs/".to_string(), ".github/".to_string()]
}

fn default_sync_marker() -> String {
  "upstream".to_string()
}

fn default_manifest_path() -> PathBuf {
  PathBuf::from("Cargo.toml")
}

fn default_changelog_path() -> PathBuf {
  PathBuf::from("CHANGELOG.md")
}

impl Default for ForkConfig {
  fn default() -> Self {
    Self {
      upstream_remote: default_upstream_remote(),
      upstream_branch: default_upstream_branch(),
      fork_remote: default_fork_remote(),
      tag_prefix: default_tag_prefix(),
      excluded_paths: default_excluded_paths(),
      sync_marker: default_sync_marker(),
      manifest_path: default_manifest_path(),
      changelog_path: default_changelog_path(),
    }
  }
}

impl ForkConfig {
  /// Find config file in search order: fork.toml, .fork.toml, .config/fork.toml
  pub fn find_config_path(path: &Path) -> Option<PathBuf> {
    let candidates = vec![
      path.join("fork.toml"),
      path.join(".fork.toml"),
      path.join(".config").join("fork.toml"),
    ];

    candidates.into_iter().find(|p| p.exists())
  }

  /// Load config from fork.toml, falling back to defaults when absent
  pub fn load(path: &Path) -> ForkResult<Self> {
    let Some(config_path) = Self::find_config_path(path) else {
      return Ok(Self::default());
    };

    let content = fs::read_to_string(&config_path)
      .with_context(|| format!("Failed to read config from {}", config_path.display()))?;
    let config: ForkConfig = toml_edit::de::from_str(&content).map_err(|e| {
      ForkError::Validation(ValidationError::ConfigInvalid {
        path: config_path.clone(),
        reason: e.to_string(),
      })
    })?;

    config.validate(&config_path)?;
    Ok(config)
  }

  /// Validate policy fields that would silently misbehave if empty
  fn validate(&self, config_path: &Path) -> ForkResult<()> {
    let invalid = |reason: &str| {
      ForkError::Validation(ValidationError::ConfigInvalid {
        path: config_path.to_path_buf(),
        reason: reason.to_string(),
      })
    };

    if self.tag_prefix.is_empty() {
      return Err(invalid("tag_prefix must not be empty (it reserves the fork tag namespace)"));
    }
    if self.sync_marker.is_empty() {
      return Err(invalid("sync_marker must not be empty (it would match every merge commit)"));
    }
    if self.upstream_remote.is_empty() || self.upstream_branch.is_empty() {
      return Err(invalid("upstream_remote and upstream_branch must not be empty"));
    }

    Ok(())
  }

  /// Upstream tracking ref, e.g. "upstream/main"
  pub fn upstream_ref(&self) -> String {
    format!("{}/{}", self.upstream_remote, self.upstream_branch)
  }
}
