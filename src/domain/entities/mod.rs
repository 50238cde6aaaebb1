//! Core domain entities.
//!
//! - [`LinkEntry`] - A cached artifact base name → download URL mapping
//! - [`ProjectId`] - Identity of one upstream CI project
//! - [`ProjectRegistry`] - Ordered, immutable list of configured projects

pub mod link_entry;
pub mod project;

pub use link_entry::LinkEntry;
pub use project::{PROJECT_SEPARATOR, ProjectId, ProjectRegistry};
