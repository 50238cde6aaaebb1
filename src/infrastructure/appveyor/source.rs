//! [`ArtifactSource`] implementation for one AppVeyor project.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

use super::client::AppveyorClient;
use crate::domain::entities::{LinkEntry, ProjectId};
use crate::domain::errors::SourceError;
use crate::domain::repositories::ArtifactSource;

/// Lists the artifacts of the last build of one AppVeyor project.
pub struct AppveyorSource {
    id: ProjectId,
    client: Arc<AppveyorClient>,
}

impl AppveyorSource {
    pub fn new(id: ProjectId, client: Arc<AppveyorClient>) -> Self {
        Self { id, client }
    }
}

#[async_trait]
impl ArtifactSource for AppveyorSource {
    fn id(&self) -> &ProjectId {
        &self.id
    }

    /// Walks every job of the last build and collects its artifacts.
    ///
    /// Any failing request fails the whole listing; entries whose name or
    /// URL is unusable are skipped.
    #[instrument(skip(self), fields(project = %self.id))]
    async fn list_artifacts(&self) -> Result<Vec<LinkEntry>, SourceError> {
        let project = self.client.last_build(&self.id).await?;
        debug!(
            version = project.build.version.as_deref().unwrap_or("unknown"),
            jobs = project.build.jobs.len(),
            "Fetched last build"
        );

        let mut entries = Vec::new();

        for job in project.build.jobs.iter().filter(|j| j.may_have_artifacts()) {
            let artifacts = self.client.job_artifacts(&job.job_id).await?;

            for artifact in artifacts {
                let api_url = self.client.artifact_url(&job.job_id, &artifact.file_name);
                let download_url = self.client.download_url(api_url).await;

                match LinkEntry::from_artifact(&artifact.file_name, &download_url) {
                    Some(entry) => entries.push(entry),
                    None => warn!(
                        file_name = %artifact.file_name,
                        "Skipping artifact with unusable name or URL"
                    ),
                }
            }
        }

        Ok(entries)
    }
}
