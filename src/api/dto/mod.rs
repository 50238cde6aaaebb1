//! Data Transfer Objects for JSON responses.

pub mod health;
pub mod refresh;
