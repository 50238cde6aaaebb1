//! Slug resolution against the link cache.

use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

use crate::domain::entities::ProjectRegistry;
use crate::domain::repositories::KeyValueStore;
use crate::domain::slug::{project_token, sanitize_slug};

/// A cached download URL together with its presentation context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedLink {
    /// Cached download URL.
    pub target_link: String,
    /// Configured display identity (upstream owner).
    pub owner: String,
    /// Registry project the slug belongs to.
    pub project_slug: String,
    /// Leading `-`-separated token of the slug.
    pub project: String,
}

/// No usable cached URL exists for the requested slug.
///
/// Also returned for slugs that fail sanitization, so callers cannot tell
/// the two cases apart.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
#[error("no cached link for the requested slug")]
pub struct LookupMiss;

/// Resolves request slugs to cached download URLs.
///
/// Read-only: never contacts upstream and never waits on a refresh pass.
pub struct LookupGateway {
    store: Arc<dyn KeyValueStore>,
    registry: Arc<ProjectRegistry>,
}

impl LookupGateway {
    /// Creates a new lookup gateway.
    pub fn new(store: Arc<dyn KeyValueStore>, registry: Arc<ProjectRegistry>) -> Self {
        Self { store, registry }
    }

    /// Resolves a raw slug taken from a request path.
    ///
    /// # Resolution Flow
    ///
    /// 1. Reduce the slug to its base name
    /// 2. Exact lookup in the store
    /// 3. On a non-empty hit, attach the matched project and owner
    ///
    /// # Errors
    ///
    /// Returns [`LookupMiss`] for invalid slugs, unknown keys, empty values
    /// and store read failures.
    pub async fn resolve(&self, raw_slug: &str) -> Result<ResolvedLink, LookupMiss> {
        let Some(slug) = sanitize_slug(raw_slug) else {
            debug!("Rejected slug {:?}", raw_slug);
            metrics::counter!("lookup_total", "result" => "miss").increment(1);
            return Err(LookupMiss);
        };

        let target_link = match self.store.get(slug).await {
            Ok(Some(url)) if !url.is_empty() => url,
            Ok(_) => {
                debug!("No cached link for {}", slug);
                metrics::counter!("lookup_total", "result" => "miss").increment(1);
                return Err(LookupMiss);
            }
            Err(e) => {
                warn!("{}", e);
                metrics::counter!("lookup_total", "result" => "miss").increment(1);
                return Err(LookupMiss);
            }
        };

        metrics::counter!("lookup_total", "result" => "hit").increment(1);

        let project = project_token(slug);

        Ok(ResolvedLink {
            target_link,
            owner: self.registry.owner().to_string(),
            project_slug: self.registry.match_slug(project).to_string(),
            project: project.to_string(),
        })
    }

    pub fn registry(&self) -> &ProjectRegistry {
        &self.registry
    }
}
