//! Business logic services for the application layer.

pub mod lookup_service;
pub mod refresh_service;

pub use lookup_service::{LookupGateway, LookupMiss, ResolvedLink};
pub use refresh_service::{
    DEFAULT_MIN_INTERVAL, LinkMapRefresher, RefreshOutcome, RefreshReport, run_refresh_loop,
};
