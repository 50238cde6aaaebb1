//! API route configuration.

use crate::api::handlers::{health_handler, refresh_handler};
use crate::state::AppState;
use crate::web::handlers::homepage_redirect;
use axum::{Router, routing::get};

/// JSON endpoints.
///
/// # Endpoints
///
/// - `GET  /refresh` - Trigger a rate-limited refresh pass
/// - `POST /refresh` - Same as `GET`
/// - other methods on `/refresh` redirect to the homepage, like unknown paths
/// - `GET  /health`  - Store and refresh status
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/refresh",
            get(refresh_handler)
                .post(refresh_handler)
                .fallback(homepage_redirect),
        )
        .route("/health", get(health_handler))
}
