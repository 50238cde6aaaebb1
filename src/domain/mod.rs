//! Domain layer containing the link cache model and its ports.
//!
//! # Architecture
//!
//! - [`entities`] - Link entries and project identities
//! - [`repositories`] - Store and artifact source trait definitions
//! - [`refresh_clock`] - Atomic rate-limit clock shared by refresh triggers
//! - [`slug`] - Slug sanitization helpers
//! - [`errors`] - Store, source and registry errors
//!
//! # Refresh Flow
//!
//! 1. A trigger (background tick or `/refresh`) asks [`refresh_clock::RefreshClock`] for admission
//! 2. Each [`repositories::ArtifactSource`] lists its latest [`entities::LinkEntry`] values
//! 3. Entries are written to the [`repositories::KeyValueStore`]
//! 4. Lookups read the store concurrently, never waiting on a refresh

pub mod entities;
pub mod errors;
pub mod refresh_clock;
pub mod repositories;
pub mod slug;
