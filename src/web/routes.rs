//! Public page route configuration.

use crate::state::AppState;
use crate::web::handlers::download_handler;
use axum::{Router, routing::get};

/// Public download routes.
///
/// # Endpoints
///
/// - `GET /dl/{*base_name}` - Artifact download page or redirect
pub fn public_routes() -> Router<AppState> {
    Router::new().route("/dl/{*base_name}", get(download_handler))
}
