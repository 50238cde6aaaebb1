//! # Artifact Redirector
//!
//! Resolves short download slugs such as `/dl/coredns-linux-amd64.zip` into
//! the current, time-limited download URL of a CI build artifact.
//!
//! ## Architecture
//!
//! This crate follows Clean Architecture principles with clear layer separation:
//!
//! - **Domain Layer** ([`domain`]) - Link entries, project registry, refresh clock, port traits
//! - **Application Layer** ([`application`]) - Refresh and lookup services
//! - **Infrastructure Layer** ([`infrastructure`]) - Redis store and AppVeyor source
//! - **API Layer** ([`api`]) - Refresh trigger, health check, middleware
//! - **Web Layer** ([`web`]) - Download page rendering
//!
//! ## How It Works
//!
//! - A background loop (and the `/refresh` endpoint) polls every configured
//!   project for its latest artifacts, at most once per minimum interval
//! - Each artifact's base name is stored in Redis with its download URL
//! - `/dl/{name}` reads Redis only; it never waits on the upstream API
//!
//! ## Quick Start
//!
//! ```bash
//! export APPVEYOR_USERNAME="missdeer"
//! export APPVEYOR_PROJECT="coredns-custom-build"
//! export REDIS="127.0.0.1:6379"
//!
//! cargo run
//! ```
//!
//! ## Configuration
//!
//! Service configuration is loaded from environment variables via [`config::Config`].
//! See [`config`] module for available options.

pub mod api;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod state;

pub mod config;
pub mod server;
pub mod telemetry;

pub mod routes;
pub mod web;

pub use error::AppError;
pub use state::AppState;

/// Commonly used types for external consumers.
///
/// Re-exports frequently used types to simplify imports for library users
/// and integration tests.
pub mod prelude {
    pub use crate::application::services::{
        LinkMapRefresher, LookupGateway, LookupMiss, RefreshOutcome, RefreshReport, ResolvedLink,
    };
    pub use crate::domain::entities::{LinkEntry, ProjectId, ProjectRegistry};
    pub use crate::domain::errors::{SourceError, StoreError};
    pub use crate::domain::refresh_clock::RefreshClock;
    pub use crate::domain::repositories::{ArtifactSource, KeyValueStore};
    pub use crate::error::AppError;
    pub use crate::state::{AppState, SiteSettings};
}
