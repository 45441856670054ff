//! Error types for fork-release with contextual messages and exit codes
//!
//! This module provides a unified error type that categorizes errors and provides
//! contextual help messages to users. Every fatal error maps to a stable exit
//! code; recoverable conditions are emitted as warnings, never as errors.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Exit codes for fork-release
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
  /// User error (bad version string, invalid args, config)
  User = 1,
  /// System error (git, network, I/O)
  System = 2,
  /// Precondition failure (dirty tree, duplicate tag, no changelog base)
  Precondition = 3,
}

impl ExitCode {
  /// Convert to i32 for process exit
  pub fn as_i32(self) -> i32 {
    self as i32
  }
}

/// Main error type for fork-release
#[derive(Debug)]
pub enum ForkError {
  /// Version or configuration validation errors
  Validation(ValidationError),

  /// Git operation errors
  Git(GitError),

  /// Release precondition failures (abort before any mutation)
  Precondition(PreconditionError),

  /// I/O errors
  Io(io::Error),

  /// Generic error with message and optional context
  Message {
    message: String,
    context: Option<String>,
    help: Option<String>,
  },
}

impl ForkError {
  /// Create a simple error message
  pub fn message(msg: impl Into<String>) -> Self {
    ForkError::Message {
      message: msg.into(),
      context: None,
      help: None,
    }
  }

  /// Add context to an existing error
  pub fn context(self, ctx: impl Into<String>) -> Self {
    let ctx_str = ctx.into();
    match self {
      ForkError::Message { message, context, help } => ForkError::Message {
        message,
        context: Some(context.map(|c| format!("{}\n{}", ctx_str, c)).unwrap_or(ctx_str)),
        help,
      },
      _ => self,
    }
  }

  /// Get the appropriate exit code for this error
  pub fn exit_code(&self) -> ExitCode {
    match self {
      ForkError::Validation(_) => ExitCode::User,
      ForkError::Git(_) => ExitCode::System,
      ForkError::Precondition(_) => ExitCode::Precondition,
      ForkError::Io(_) => ExitCode::System,
      ForkError::Message { .. } => ExitCode::User,
    }
  }

  /// Get contextual help message for this error
  pub fn help_message(&self) -> Option<String> {
    match self {
      ForkError::Validation(e) => e.help_message(),
      ForkError::Git(e) => e.help_message(),
      ForkError::Precondition(e) => e.help_message(),
      ForkError::Message { help, .. } => help.clone(),
      _ => None,
    }
  }
}

impl fmt::Display for ForkError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ForkError::Validation(e) => write!(f, "{}", e),
      ForkError::Git(e) => write!(f, "{}", e),
      ForkError::Precondition(e) => write!(f, "{}", e),
      ForkError::Io(e) => write!(f, "I/O error: {}", e),
      ForkError::Message { message, context, .. } => {
        write!(f, "{}", message)?;
        if let Some(ctx) = context {
          write!(f, "\n{}", ctx)?;
        }
        Ok(())
      }
    }
  }
}

impl std::error::Error for ForkError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      ForkError::Io(e) => Some(e),
      _ => None,
    }
  }
}

impl From<io::Error> for ForkError {
  fn from(err: io::Error) -> Self {
    ForkError::Io(err)
  }
}

impl From<String> for ForkError {
  fn from(msg: String) -> Self {
    ForkError::message(msg)
  }
}

impl From<&str> for ForkError {
  fn from(msg: &str) -> Self {
    ForkError::message(msg)
  }
}

impl From<toml_edit::TomlError> for ForkError {
  fn from(err: toml_edit::TomlError) -> Self {
    ForkError::message(format!("TOML parse error: {}", err))
  }
}

impl From<toml_edit::de::Error> for ForkError {
  fn from(err: toml_edit::de::Error) -> Self {
    ForkError::message(format!("TOML deserialization error: {}", err))
  }
}

impl From<serde_json::Error> for ForkError {
  fn from(err: serde_json::Error) -> Self {
    ForkError::message(format!("JSON error: {}", err))
  }
}

impl From<std::string::FromUtf8Error> for ForkError {
  fn from(err: std::string::FromUtf8Error) -> Self {
    ForkError::message(format!("UTF-8 conversion error: {}", err))
  }
}

impl From<anyhow::Error> for ForkError {
  fn from(err: anyhow::Error) -> Self {
    ForkError::message(err.to_string())
  }
}

/// Validation errors (pre-flight, before any repository access)
#[derive(Debug)]
pub enum ValidationError {
  /// Proposed release version does not match the version grammar
  BadVersion { version: String, reason: String },

  /// Configuration file is malformed
  ConfigInvalid { path: PathBuf, reason: String },
}

impl ValidationError {
  fn help_message(&self) -> Option<String> {
    match self {
      ValidationError::BadVersion { .. } => Some(
        "Versions look like 1.2.3 or 1.2.3-rc.1 (no leading 'v', no tag prefix).".to_string(),
      ),
      ValidationError::ConfigInvalid { path, .. } => {
        Some(format!("Fix or remove {} and retry.", path.display()))
      }
    }
  }
}

impl fmt::Display for ValidationError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ValidationError::BadVersion { version, reason } => {
        write!(f, "Invalid release version '{}': {}", version, reason)
      }
      ValidationError::ConfigInvalid { path, reason } => {
        write!(f, "Invalid configuration in {}: {}", path.display(), reason)
      }
    }
  }
}

/// Git operation errors
#[derive(Debug)]
pub enum GitError {
  /// Git command failed
  CommandFailed { command: String, stderr: String },

  /// Repository not found
  RepoNotFound { path: PathBuf },

  /// Push failed
  PushFailed {
    remote: String,
    refspec: String,
    reason: String,
  },
}

impl GitError {
  fn help_message(&self) -> Option<String> {
    match self {
      GitError::PushFailed { reason, .. } => {
        if reason.contains("non-fast-forward") {
          Some("The remote has commits you don't have. Pull first and re-run the release.".to_string())
        } else if reason.contains("permission denied") || reason.contains("403") {
          Some("Check your credentials for the fork remote.".to_string())
        } else {
          None
        }
      }
      GitError::RepoNotFound { path } => Some(format!(
        "Run fork-release from inside a git clone (looked at {}).",
        path.display()
      )),
      _ => None,
    }
  }
}

impl fmt::Display for GitError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      GitError::CommandFailed { command, stderr } => {
        write!(f, "Git command failed: {}\n{}", command, stderr)
      }
      GitError::RepoNotFound { path } => {
        write!(f, "Git repository not found at: {}", path.display())
      }
      GitError::PushFailed { remote, refspec, reason } => {
        write!(f, "Push of {} to {} failed: {}", refspec, remote, reason)
      }
    }
  }
}

/// Release precondition failures
///
/// All of these abort the run before any file or ref is modified.
#[derive(Debug)]
pub enum PreconditionError {
  /// Working tree has uncommitted changes
  DirtyTree,

  /// Release tag already exists, locally or on a remote
  DuplicateTag { tag: String, location: TagLocation },

  /// No prior fork tag and no resolvable merge-base with upstream
  NoChangelogBase { upstream_ref: String },
}

/// Where a duplicate tag was found
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagLocation {
  Local,
  Remote,
}

impl fmt::Display for TagLocation {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      TagLocation::Local => write!(f, "locally"),
      TagLocation::Remote => write!(f, "on the remote"),
    }
  }
}

impl PreconditionError {
  fn help_message(&self) -> Option<String> {
    match self {
      PreconditionError::DirtyTree => {
        Some("Commit or stash your changes, or use --dry-run to preview the release.".to_string())
      }
      PreconditionError::DuplicateTag { .. } => {
        Some("Pick a version that has not been released yet.".to_string())
      }
      PreconditionError::NoChangelogBase { upstream_ref } => Some(format!(
        "Ensure {} is fetched and shares history with HEAD, or create an initial fork tag.",
        upstream_ref
      )),
    }
  }
}

impl fmt::Display for PreconditionError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      PreconditionError::DirtyTree => {
        write!(f, "Working tree has uncommitted changes")
      }
      PreconditionError::DuplicateTag { tag, location } => {
        write!(f, "Tag '{}' already exists {}", tag, location)
      }
      PreconditionError::NoChangelogBase { upstream_ref } => {
        write!(
          f,
          "No fork release tag found and no merge-base with {}; cannot determine what is new",
          upstream_ref
        )
      }
    }
  }
}

/// Result type alias for fork-release
pub type ForkResult<T> = Result<T, ForkError>;

/// Helper trait to add context to Results
pub trait ResultExt<T> {
  /// Add context to an error result
  fn context(self, ctx: impl Into<String>) -> ForkResult<T>;

  /// Add context using a closure (lazy evaluation)
  fn with_context<F>(self, f: F) -> ForkResult<T>
  where
    F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
  E: Into<ForkError>,
{
  fn context(self, ctx: impl Into<String>) -> ForkResult<T> {
    self.map_err(|e| e.into().context(ctx))
  }

  fn with_context<F>(self, f: F) -> ForkResult<T>
  where
    F: FnOnce() -> String,
  {
    self.map_err(|e| e.into().context(f()))
  }
}

/// Pretty-print an error to stderr with help text
pub fn print_error(error: &ForkError) {
  eprintln!("\n❌ {}\n", error);

  if let Some(help) = error.help_message() {
    eprintln!("💡 Help: {}\n", help);
  }
}

/// Print a non-fatal warning to stderr
///
/// Used for recoverable conditions (failed fetch, failed lockfile refresh)
/// that the release continues past.
pub fn print_warning(msg: impl AsRef<str>) {
  eprintln!("⚠️  Warning: {}", msg.as_ref());
}
