//! Trait for upstream projects that publish build artifacts.

use crate::domain::entities::{LinkEntry, ProjectId};
use crate::domain::errors::SourceError;
use async_trait::async_trait;

/// One configured upstream project that can list its current artifacts.
///
/// # Implementations
///
/// - [`crate::infrastructure::appveyor::AppveyorSource`] - AppVeyor CI
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ArtifactSource: Send + Sync {
    /// Identity of the upstream project.
    fn id(&self) -> &ProjectId;

    /// Lists the artifacts of the latest build, in provider order.
    ///
    /// Must be idempotent and must not modify anything upstream. The
    /// returned entries are handed over to the caller.
    ///
    /// # Errors
    ///
    /// Returns a [`SourceError`] on network failures, non-success responses
    /// (including upstream rate limiting) and malformed bodies.
    async fn list_artifacts(&self) -> Result<Vec<LinkEntry>, SourceError>;
}
