//! Web layer for browser-facing pages.
//!
//! Uses Askama templates (`templates/`) for server-side rendering.
//!
//! # Modules
//!
//! - [`handlers`] - Download page and homepage fallback
//! - [`locale`] - `Accept-Language` based template selection
//! - [`routes`] - Public route configuration

pub mod handlers;
pub mod locale;
pub mod routes;
