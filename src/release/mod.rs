//! Release pipeline: version grammar, base resolution, commit
//! categorization, changelog entry, plan, preconditions, and apply.

pub mod apply;
pub mod base;
pub mod commits;
pub mod entry;
pub mod plan;
pub mod probe;
pub mod version;
