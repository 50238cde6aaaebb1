//! HTTP request handlers for JSON endpoints.

pub mod health;
pub mod refresh;

pub use health::health_handler;
pub use refresh::refresh_handler;
