//! Application layer services.
//!
//! Services orchestrate the domain ports and are what HTTP handlers and the
//! background loop call into.
//!
//! # Available Services
//!
//! - [`services::refresh_service::LinkMapRefresher`] - Rate-limited cache refresh from all sources
//! - [`services::lookup_service::LookupGateway`] - Slug resolution against the cache

pub mod services;
