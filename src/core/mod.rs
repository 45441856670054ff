//! Core infrastructure: errors, configuration, and the VCS backend
//!
//! Everything with decision logic lives in `crate::release`; this module is
//! the plumbing it stands on.

pub mod config;
pub mod error;
pub mod vcs;
