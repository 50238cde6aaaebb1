//! HTTP client for the AppVeyor REST API.

use reqwest::{header, redirect};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, instrument, warn};
use url::Url;

use super::models::{Artifact, ProjectResponse};
use crate::domain::entities::ProjectId;
use crate::domain::errors::SourceError;

/// Default public API endpoint.
pub const DEFAULT_API_URL: &str = "https://ci.appveyor.com/api";

/// AppVeyor client configuration.
#[derive(Debug, Clone)]
pub struct AppveyorConfig {
    /// API base URL, e.g. `https://ci.appveyor.com/api`.
    pub api_url: Url,
    /// Optional bearer token for private projects.
    pub token: Option<String>,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Store the provider's redirect target instead of the API artifact URL.
    pub resolve_redirects: bool,
}

impl AppveyorConfig {
    pub fn new(api_url: Url) -> Self {
        Self {
            api_url,
            token: None,
            timeout: Duration::from_secs(30),
            resolve_redirects: true,
        }
    }
}

/// Shared AppVeyor API client.
///
/// One instance serves every configured project. Redirects are never
/// followed automatically so that artifact download redirects can be
/// captured as the cached value.
pub struct AppveyorClient {
    config: AppveyorConfig,
    http_client: reqwest::Client,
}

impl AppveyorClient {
    /// Creates a client with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the TLS backend cannot be initialised.
    pub fn new(config: AppveyorConfig) -> Result<Self, reqwest::Error> {
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .redirect(redirect::Policy::none())
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .build()?;

        Ok(Self {
            config,
            http_client,
        })
    }

    pub fn config(&self) -> &AppveyorConfig {
        &self.config
    }

    /// Fetches the last build of a project.
    #[instrument(skip_all, fields(project = %project))]
    pub(crate) async fn last_build(
        &self,
        project: &ProjectId,
    ) -> Result<ProjectResponse, SourceError> {
        let url = self.endpoint(&["projects", project.owner(), project.slug()]);
        self.get_json(url).await
    }

    /// Lists the artifacts published by one build job.
    #[instrument(skip(self))]
    pub(crate) async fn job_artifacts(&self, job_id: &str) -> Result<Vec<Artifact>, SourceError> {
        let url = self.endpoint(&["buildjobs", job_id, "artifacts"]);
        self.get_json(url).await
    }

    /// Builds the API download URL of an artifact.
    ///
    /// `file_name` may contain `/`; each component becomes its own
    /// percent-encoded path segment.
    pub fn artifact_url(&self, job_id: &str, file_name: &str) -> Url {
        let mut segments = vec!["buildjobs", job_id, "artifacts"];
        segments.extend(file_name.split(['/', '\\']).filter(|s| !s.is_empty()));
        self.endpoint(&segments)
    }

    /// Returns the URL clients should download from.
    ///
    /// With redirect resolution enabled, a `HEAD` request is issued and a
    /// `3xx` `Location` (the provider's time-limited storage URL) replaces
    /// the API URL. Any failure of that probe keeps the API URL.
    pub async fn download_url(&self, artifact_url: Url) -> String {
        if !self.config.resolve_redirects {
            return artifact_url.into();
        }

        let probe = self.authorized(self.http_client.head(artifact_url.clone()));
        let response = match probe.send().await {
            Ok(response) => response,
            Err(e) => {
                warn!("Redirect probe for {} failed: {}", artifact_url, e);
                return artifact_url.into();
            }
        };

        if !response.status().is_redirection() {
            debug!(
                "No redirect for {} (HTTP {})",
                artifact_url,
                response.status()
            );
            return artifact_url.into();
        }

        response
            .headers()
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|location| artifact_url.join(location).ok())
            .map_or_else(|| artifact_url.into(), Into::into)
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.config.api_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.config.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, SourceError> {
        let response = self
            .authorized(self.http_client.get(url.clone()))
            .header(header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| SourceError::Http {
                url: url.to_string(),
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response.json::<T>().await.map_err(|e| SourceError::Decode {
            url: url.to_string(),
            reason: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(api: &str) -> AppveyorClient {
        AppveyorClient::new(AppveyorConfig::new(Url::parse(api).unwrap())).unwrap()
    }

    #[test]
    fn test_endpoint_appends_segments() {
        let client = client("https://ci.appveyor.com/api");
        let url = client.endpoint(&["projects", "missdeer", "coredns-custom-build"]);
        assert_eq!(
            url.as_str(),
            "https://ci.appveyor.com/api/projects/missdeer/coredns-custom-build"
        );
    }

    #[test]
    fn test_endpoint_with_trailing_slash_base() {
        let client = client("http://127.0.0.1:9000/api/");
        let url = client.endpoint(&["buildjobs", "abc", "artifacts"]);
        assert_eq!(url.as_str(), "http://127.0.0.1:9000/api/buildjobs/abc/artifacts");
    }

    #[test]
    fn test_artifact_url_encodes_segments() {
        let client = client("https://ci.appveyor.com/api");
        let url = client.artifact_url("job1", "dist/core dns.zip");
        assert_eq!(
            url.as_str(),
            "https://ci.appveyor.com/api/buildjobs/job1/artifacts/dist/core%20dns.zip"
        );
    }

    #[tokio::test]
    async fn test_download_url_without_resolution() {
        let mut config = AppveyorConfig::new(Url::parse("https://ci.appveyor.com/api").unwrap());
        config.resolve_redirects = false;
        let client = AppveyorClient::new(config).unwrap();

        let url = client.artifact_url("job1", "a.zip");
        assert_eq!(
            client.download_url(url).await,
            "https://ci.appveyor.com/api/buildjobs/job1/artifacts/a.zip"
        );
    }
}
