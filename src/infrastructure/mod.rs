//! Infrastructure layer for external integrations.
//!
//! This layer implements the port traits defined by the domain layer.
//!
//! # Modules
//!
//! - [`store`] - Key-value stores (Redis and in-memory implementations)
//! - [`appveyor`] - AppVeyor CI artifact source

pub mod appveyor;
pub mod store;
