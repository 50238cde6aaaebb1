//! Top-level router configuration combining page and API routes.
//!
//! # Route Structure
//!
//! - `GET  /dl/{*base_name}` - Artifact download page or redirect
//! - `GET|POST /refresh`     - Rate-limited refresh trigger
//! - `GET  /health`          - Store and refresh status
//! - anything else           - Redirect to the project homepage
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Rate limiting** - Per-IP token bucket (configurable for proxy deployments)
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::middleware::{rate_limit, tracing};
use crate::state::AppState;
use crate::web;
use crate::web::handlers::homepage_redirect;
use axum::Router;
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// All routes with tracing, without rate limiting or path normalization.
///
/// Used directly by tests, which have no peer address to rate-limit on.
pub fn router(state: AppState) -> Router {
    Router::new()
        .merge(web::routes::public_routes())
        .merge(api::routes::routes())
        .fallback(homepage_redirect)
        .with_state(state)
        .layer(tracing::layer())
}

/// Constructs the application router with all routes and middleware.
///
/// # Arguments
///
/// - `state` - shared application state injected into all handlers
/// - `behind_proxy` - when `true`, rate limiting reads client IP from
///   `X-Forwarded-For` / `X-Real-IP` headers instead of the peer socket address;
///   enable only when the service runs behind a trusted reverse proxy
pub fn app_router(state: AppState, behind_proxy: bool) -> NormalizePath<Router> {
    let router = router(state);

    let router = if behind_proxy {
        router.layer(rate_limit::proxied_layer())
    } else {
        router.layer(rate_limit::layer())
    };

    NormalizePathLayer::trim_trailing_slash().layer(router)
}
