//! Port traits implemented by the infrastructure layer.
//!
//! - [`KeyValueStore`] - Durable link cache
//! - [`ArtifactSource`] - Upstream artifact listing
//!
//! Mock implementations are generated via `mockall` for unit tests.

pub mod artifact_source;
pub mod link_store;

pub use artifact_source::ArtifactSource;
pub use link_store::KeyValueStore;

#[cfg(test)]
pub use artifact_source::MockArtifactSource;
#[cfg(test)]
pub use link_store::MockKeyValueStore;
