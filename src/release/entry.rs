//! Changelog entry construction
//!
//! Renders categorized commits plus release metadata into the text block
//! spliced into CHANGELOG.md. Output is deterministic for a fixed repository
//! state and date; the date itself is embedded, so re-running on a different
//! day produces a different (still correct) entry.

use crate::core::vcs::CommitRecord;
use crate::release::commits::CategorizedCommits;
use crate::release::version::ForkVersion;
use serde::Serialize;

/// Placeholder bullet when a release carries no fork code changes
const NO_CODE_CHANGES: &str = "No fork-specific code changes";

/// Literal baseline token when the upstream head cannot be resolved
pub const UNKNOWN_BASELINE: &str = "unknown";

/// A rendered changelog section: heading plus bullet lines
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Section {
  pub heading: String,
  pub lines: Vec<String>,
}

/// A structured changelog entry for one fork release
#[derive(Debug, Clone, Serialize)]
pub struct ChangelogEntry {
  pub version: ForkVersion,
  /// Invocation date, YYYY-MM-DD
  pub date: String,
  pub sections: Vec<Section>,
}

impl ChangelogEntry {
  /// Build the entry from categorized commits and the upstream baseline
  ///
  /// Section order is fixed: Fork Changes (always), Docs / CI Changes and
  /// Upstream Syncs (only when non-empty), Upstream Baseline (always).
  pub fn build(
    version: ForkVersion,
    date: String,
    commits: &CategorizedCommits,
    upstream_ref: &str,
    upstream_head: Option<&str>,
  ) -> Self {
    let mut sections = Vec::new();

    let code_lines = if commits.code_changes.is_empty() {
      vec![format!("- {}", NO_CODE_CHANGES)]
    } else {
      bullets(&commits.code_changes)
    };
    sections.push(Section {
      heading: "Fork Changes".to_string(),
      lines: code_lines,
    });

    if !commits.docs_ci_changes.is_empty() {
      sections.push(Section {
        heading: "Docs / CI Changes".to_string(),
        lines: bullets(&commits.docs_ci_changes),
      });
    }

    if !commits.upstream_sync_merges.is_empty() {
      sections.push(Section {
        heading: "Upstream Syncs".to_string(),
        lines: bullets(&commits.upstream_sync_merges),
      });
    }

    sections.push(Section {
      heading: "Upstream Baseline".to_string(),
      lines: vec![format!(
        "- {} @ {}",
        upstream_ref,
        upstream_head.unwrap_or(UNKNOWN_BASELINE)
      )],
    });

    Self { version, date, sections }
  }

  /// Render as the markdown block inserted into the changelog
  pub fn render(&self) -> String {
    let mut output = String::new();

    output.push_str(&format!("## [{}] - {} (fork)\n", self.version, self.date));

    for section in &self.sections {
      output.push('\n');
      output.push_str(&format!("### {}\n\n", section.heading));
      for line in &section.lines {
        output.push_str(line);
        output.push('\n');
      }
    }

    output
  }
}

fn bullets(records: &[CommitRecord]) -> Vec<String> {
  records.iter().map(|r| format!("- {}", r.bullet())).collect()
}
