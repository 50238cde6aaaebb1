//! Handler for health check endpoint.

use axum::{Json, extract::State, http::StatusCode};

use crate::api::dto::health::{CheckStatus, HealthChecks, HealthResponse, RefreshStatus};
use crate::state::AppState;

/// Returns service health status with component checks.
///
/// # Endpoint
///
/// `GET /health`
///
/// # Response Codes
///
/// - **200 OK**: Store reachable
/// - **503 Service Unavailable**: Store unreachable
///
/// # Response
///
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0",
///   "checks": {
///     "store": { "status": "ok", "message": "Store reachable" },
///     "refresh": {
///       "status": "ok",
///       "last_refresh": "2026-10-19T08:00:00+00:00",
///       "sources": ["missdeer/coredns-custom-build"]
///     }
///   }
/// }
/// ```
pub async fn health_handler(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, (StatusCode, Json<HealthResponse>)> {
    let store_check = check_store(&state).await;
    let refresh_check = check_refresh(&state);

    let healthy = store_check.status == "ok";

    let response = HealthResponse {
        status: if healthy { "healthy" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: HealthChecks {
            store: store_check,
            refresh: refresh_check,
        },
    };

    if healthy {
        Ok(Json(response))
    } else {
        Err((StatusCode::SERVICE_UNAVAILABLE, Json(response)))
    }
}

async fn check_store(state: &AppState) -> CheckStatus {
    if state.store.health_check().await {
        CheckStatus {
            status: "ok".to_string(),
            message: Some("Store reachable".to_string()),
        }
    } else {
        CheckStatus {
            status: "error".to_string(),
            message: Some("Store connection failed".to_string()),
        }
    }
}

/// Reports when the last pass started. A pending first pass is not an error.
fn check_refresh(state: &AppState) -> RefreshStatus {
    let last_refresh = state.refresher.last_refresh();

    RefreshStatus {
        status: if last_refresh.is_some() { "ok" } else { "pending" }.to_string(),
        last_refresh: last_refresh.map(|ts| ts.to_rfc3339()),
        sources: state.refresher.sources().map(ToString::to_string).collect(),
    }
}
