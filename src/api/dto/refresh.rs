//! DTOs for the refresh trigger.

use serde::Serialize;

/// Acknowledgment returned by `/refresh`, whether or not a pass ran.
#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    pub result: &'static str,
}

impl RefreshResponse {
    pub fn ok() -> Self {
        Self { result: "OK" }
    }
}
