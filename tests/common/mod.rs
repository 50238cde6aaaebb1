#![allow(dead_code)]

use artifact_redirector::application::services::{LinkMapRefresher, LookupGateway};
use artifact_redirector::domain::entities::{LinkEntry, ProjectId, ProjectRegistry};
use artifact_redirector::domain::errors::{SourceError, StoreError};
use artifact_redirector::domain::refresh_clock::RefreshClock;
use artifact_redirector::domain::repositories::{ArtifactSource, KeyValueStore};
use artifact_redirector::infrastructure::store::MemoryStore;
use artifact_redirector::state::{AppState, SiteSettings};
use async_trait::async_trait;
use axum::{
    Json, Router,
    extract::Path,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

pub const OWNER: &str = "missdeer";
pub const PROJECTS: &str = "foo-a;foo-b;bar-c";
pub const DIRECT_USER_AGENT: &str = "CoreDNSHome";
pub const HOMEPAGE_URL: &str = "https://github.com/missdeer/coredns_custom_build";

/// A source that always returns the same entries and counts its calls.
pub struct StaticSource {
    id: ProjectId,
    entries: Vec<(String, String)>,
    calls: AtomicUsize,
}

impl StaticSource {
    pub fn new(slug: &str, entries: &[(&str, &str)]) -> Self {
        Self {
            id: ProjectId::new(OWNER, slug),
            entries: entries
                .iter()
                .map(|(name, url)| (name.to_string(), url.to_string()))
                .collect(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ArtifactSource for StaticSource {
    fn id(&self) -> &ProjectId {
        &self.id
    }

    async fn list_artifacts(&self) -> Result<Vec<LinkEntry>, SourceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        // Long enough for concurrent triggers to overlap.
        tokio::time::sleep(Duration::from_millis(20)).await;
        Ok(self
            .entries
            .iter()
            .filter_map(|(name, url)| LinkEntry::from_artifact(name, url))
            .collect())
    }
}

/// A source whose upstream always answers 503.
pub struct FailingSource {
    id: ProjectId,
}

impl FailingSource {
    pub fn new(slug: &str) -> Self {
        Self {
            id: ProjectId::new(OWNER, slug),
        }
    }
}

#[async_trait]
impl ArtifactSource for FailingSource {
    fn id(&self) -> &ProjectId {
        &self.id
    }

    async fn list_artifacts(&self) -> Result<Vec<LinkEntry>, SourceError> {
        Err(SourceError::Status {
            url: format!("https://ci.example.com/api/projects/{}", self.id),
            status: 503,
        })
    }
}

/// A store that is unreachable.
pub struct DownStore;

#[async_trait]
impl KeyValueStore for DownStore {
    async fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
        Err(StoreError::Unavailable("connection refused".to_string()))
    }

    async fn set(&self, _key: &str, _value: &str) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("connection refused".to_string()))
    }

    async fn health_check(&self) -> bool {
        false
    }
}

pub fn registry() -> Arc<ProjectRegistry> {
    Arc::new(ProjectRegistry::parse(OWNER, PROJECTS).unwrap())
}

pub fn site_settings() -> SiteSettings {
    SiteSettings {
        direct_user_agent: DIRECT_USER_AGENT.to_string(),
        homepage_url: HOMEPAGE_URL.to_string(),
    }
}

pub fn create_refresher(
    sources: Vec<Arc<dyn ArtifactSource>>,
    store: Arc<dyn KeyValueStore>,
) -> Arc<LinkMapRefresher> {
    Arc::new(LinkMapRefresher::new(
        sources,
        store,
        Arc::new(RefreshClock::new()),
        Duration::from_secs(120),
    ))
}

pub fn create_test_state_with(
    store: Arc<dyn KeyValueStore>,
    sources: Vec<Arc<dyn ArtifactSource>>,
) -> AppState {
    let refresher = create_refresher(sources, store.clone());
    let lookup = Arc::new(LookupGateway::new(store.clone(), registry()));
    AppState::new(lookup, refresher, store, site_settings())
}

/// State backed by a memory store pre-populated with `entries` and no sources.
pub fn create_test_state(entries: &[(&str, &str)]) -> (AppState, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::with_entries(entries.iter().copied()));
    let state = create_test_state_with(store.clone(), Vec::new());
    (state, store)
}

/// Starts a fake CI API on a loopback port and returns its `/api` base URL.
///
/// - `foo-a` has one job with two artifacts, one of them in a subdirectory
/// - `broken` answers 500
/// - Artifact downloads redirect to `https://storage.example.com/...`
pub async fn spawn_fake_api() -> String {
    let app = Router::new()
        .route("/api/projects/{owner}/{slug}", get(fake_project))
        .route("/api/buildjobs/{job_id}/artifacts", get(fake_artifacts))
        .route(
            "/api/buildjobs/{job_id}/artifacts/{*file_name}",
            get(fake_download),
        );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr: SocketAddr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{addr}/api")
}

async fn fake_project(Path((_owner, slug)): Path<(String, String)>) -> Response {
    match slug.as_str() {
        "foo-a" => Json(json!({
            "build": {
                "version": "1.0.42",
                "jobs": [
                    { "jobId": "job1", "artifactsCount": 2 },
                    { "jobId": "job2", "artifactsCount": 0 }
                ]
            }
        }))
        .into_response(),
        "empty" => Json(json!({ "build": { "jobs": [] } })).into_response(),
        _ => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
    }
}

async fn fake_artifacts(Path(job_id): Path<String>) -> Response {
    match job_id.as_str() {
        "job1" => Json(json!([
            { "fileName": "foo-linux-amd64.zip", "type": "Zip", "size": 1024 },
            { "fileName": "dist/foo-windows-amd64.zip", "type": "Zip", "size": 2048 }
        ]))
        .into_response(),
        _ => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn fake_download(Path((job_id, file_name)): Path<(String, String)>) -> Response {
    let location = format!("https://storage.example.com/{job_id}/{file_name}?sig=abc");
    (StatusCode::FOUND, [(header::LOCATION, location)]).into_response()
}
