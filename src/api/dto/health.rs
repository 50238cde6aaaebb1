//! DTOs for health check endpoint.

use serde::Serialize;

/// Health check response with component status.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub checks: HealthChecks,
}

/// Health status for each system component.
#[derive(Debug, Serialize)]
pub struct HealthChecks {
    pub store: CheckStatus,
    pub refresh: RefreshStatus,
}

/// Individual component health status.
#[derive(Debug, Serialize)]
pub struct CheckStatus {
    pub status: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Refresh loop status.
#[derive(Debug, Serialize)]
pub struct RefreshStatus {
    pub status: String,
    /// RFC 3339 start time of the last admitted pass.
    pub last_refresh: Option<String>,
    /// Configured sources as `owner/project`.
    pub sources: Vec<String>,
}
