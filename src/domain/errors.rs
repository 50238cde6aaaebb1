//! Error types raised by domain ports.
//!
//! None of these reach an HTTP caller directly: store and upstream failures
//! are absorbed by the refresh pass, and lookups only ever report a miss.

use thiserror::Error;

/// Failures of the key-value store backing the link cache.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store cannot be reached at all. Fatal at startup.
    #[error("key-value store unavailable: {0}")]
    Unavailable(String),

    /// A single read failed.
    #[error("failed to read key {key}: {reason}")]
    Read { key: String, reason: String },

    /// A single write failed; the previous value stays visible.
    #[error("failed to write key {key}: {reason}")]
    Write { key: String, reason: String },
}

/// Failures while listing artifacts from the upstream CI provider.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The request could not be sent or the connection broke.
    #[error("request to {url} failed: {reason}")]
    Http { url: String, reason: String },

    /// The provider answered with a non-success status (including rate limiting).
    #[error("{url} answered with HTTP {status}")]
    Status { url: String, status: u16 },

    /// The response body did not match the expected shape.
    #[error("malformed response from {url}: {reason}")]
    Decode { url: String, reason: String },
}

/// Invalid project registry configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("owner identity must not be empty")]
    EmptyOwner,

    #[error("at least one project slug must be configured")]
    NoProjects,
}
