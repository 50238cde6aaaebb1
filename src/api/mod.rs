//! JSON API layer.
//!
//! # Modules
//!
//! - [`dto`] - Response serialization types
//! - [`handlers`] - Refresh trigger and health check handlers
//! - [`middleware`] - Rate limiting and request tracing
//! - [`routes`] - Route configuration

pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod routes;
