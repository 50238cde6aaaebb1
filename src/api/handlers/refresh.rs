//! Handler for the manual refresh trigger.

use axum::{Json, extract::State};
use tracing::debug;

use crate::api::dto::refresh::RefreshResponse;
use crate::state::AppState;

/// Runs a refresh pass, subject to the shared rate limit.
///
/// # Endpoint
///
/// `GET /refresh`, `POST /refresh`
///
/// Always answers `200 {"result":"OK"}`: a rate-limited no-op and upstream
/// failures look the same to the caller. The response is sent after the
/// pass finishes.
pub async fn refresh_handler(State(state): State<AppState>) -> Json<RefreshResponse> {
    let outcome = state.refresher.refresh_all().await;
    debug!("Manual refresh: {:?}", outcome);

    Json(RefreshResponse::ok())
}
