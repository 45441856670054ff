//! Applying a release plan: manifest bump, changelog splice, commit + tag
//!
//! File mutations are staged in memory first and flushed together, so every
//! failure that can be caught up front (unreadable manifest, missing
//! `[package]` table) aborts before anything on disk changes. The window
//! between the first write and the tag is kept as short as possible; a
//! failure inside it leaves an uncommitted tree for the user to reset.

use crate::core::config::ForkConfig;
use crate::core::error::{ForkError, ForkResult, ResultExt, print_warning};
use crate::release::plan::ReleasePlan;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Header written when the changelog file does not exist yet
const CHANGELOG_HEADER: &str = "# Changelog\n";

/// Marker line new entries are inserted under, when present
const UNRELEASED_MARKER: &str = "## [Unreleased]";

/// All file mutations of a release, computed in memory before any write
pub struct StagedRelease {
  manifest_path: PathBuf,
  manifest_text: String,
  changelog_path: PathBuf,
  changelog_text: String,
}

impl StagedRelease {
  /// Compute the post-release contents of the manifest and changelog
  ///
  /// Read-only; every validation error here aborts with the tree untouched.
  pub fn stage(work_tree: &Path, config: &ForkConfig, plan: &ReleasePlan) -> ForkResult<Self> {
    let manifest_path = work_tree.join(&config.manifest_path);
    let manifest = fs::read_to_string(&manifest_path)
      .with_context(|| format!("Failed to read {}", manifest_path.display()))?;
    let manifest_text = bump_manifest_version(&manifest, &plan.request.version.to_string())?;

    let changelog_path = work_tree.join(&config.changelog_path);
    let existing = match fs::read_to_string(&changelog_path) {
      Ok(content) => Some(content),
      Err(err) if err.kind() == std::io::ErrorKind::NotFound => None,
      Err(err) => {
        return Err(ForkError::from(err).context(format!("Failed to read {}", changelog_path.display())));
      }
    };
    let changelog_text = splice_changelog(existing.as_deref(), &plan.entry.render());

    Ok(Self {
      manifest_path,
      manifest_text,
      changelog_path,
      changelog_text,
    })
  }

  /// Flush the staged contents to disk
  pub fn write(&self) -> ForkResult<()> {
    fs::write(&self.manifest_path, &self.manifest_text)
      .with_context(|| format!("Failed to write {}", self.manifest_path.display()))?;
    fs::write(&self.changelog_path, &self.changelog_text)
      .with_context(|| format!("Failed to write {}", self.changelog_path.display()))?;
    Ok(())
  }
}

/// Rewrite the `[package]` version field, preserving formatting
///
/// Only the package's own version is touched; dependency tables that happen
/// to contain `version` keys are left alone.
pub fn bump_manifest_version(content: &str, version: &str) -> ForkResult<String> {
  let mut doc: toml_edit::DocumentMut = content.parse().context("Failed to parse manifest")?;

  let package = doc
    .get_mut("package")
    .and_then(|p| p.as_table_mut())
    .ok_or_else(|| ForkError::message("No [package] section in manifest"))?;

  if package.get("version").is_none() {
    return Err(ForkError::message("No version field in [package]"));
  }
  package["version"] = toml_edit::value(version);

  Ok(doc.to_string())
}

/// Insert a rendered entry into the changelog text
///
/// Placement, in order of preference: directly under a `## [Unreleased]`
/// marker line; before the first existing `## ` entry; appended after the
/// header when the file has no entries yet. A missing file becomes a fresh
/// changelog with a top-level heading.
pub fn splice_changelog(existing: Option<&str>, entry: &str) -> String {
  let Some(existing) = existing else {
    return format!("{}\n{}", CHANGELOG_HEADER, entry);
  };

  if let Some(end) = unreleased_line_end(existing) {
    return format!("{}\n{}{}", &existing[..end], entry, &existing[end..]);
  }

  if let Some(pos) = first_entry_offset(existing) {
    return format!("{}{}\n{}", &existing[..pos], entry, &existing[pos..]);
  }

  format!("{}\n{}", existing.trim_end(), entry)
}

/// Byte offset just past the `## [Unreleased]` line, if present
fn unreleased_line_end(text: &str) -> Option<usize> {
  let mut offset = 0;
  for line in text.split_inclusive('\n') {
    if line.trim_end() == UNRELEASED_MARKER {
      return Some(offset + line.len());
    }
    offset += line.len();
  }
  None
}

/// Byte offset of the first `## ` entry heading, if any
fn first_entry_offset(text: &str) -> Option<usize> {
  let mut offset = 0;
  for line in text.split_inclusive('\n') {
    if line.starts_with("## ") {
      return Some(offset);
    }
    offset += line.len();
  }
  None
}

/// Regenerate the dependency lockfile after the version bump
///
/// Failure costs lockfile freshness, not the release: it is downgraded to a
/// warning and the run continues.
pub fn refresh_lockfile(work_tree: &Path) -> bool {
  let result = Command::new("cargo")
    .current_dir(work_tree)
    .args(["update", "--workspace"])
    .output();

  match result {
    Ok(output) if output.status.success() => true,
    Ok(output) => {
      let stderr = String::from_utf8_lossy(&output.stderr);
      print_warning(format!("Lockfile update failed (continuing): {}", stderr.trim()));
      false
    }
    Err(err) => {
      print_warning(format!("Could not run cargo update (continuing): {}", err));
      false
    }
  }
}
