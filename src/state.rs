//! Shared application state injected into every handler.

use std::sync::Arc;

use crate::application::services::{LinkMapRefresher, LookupGateway};
use crate::domain::repositories::KeyValueStore;

/// Presentation settings for the public routes.
#[derive(Debug, Clone)]
pub struct SiteSettings {
    /// `User-Agent` that receives a plain redirect instead of the HTML page.
    pub direct_user_agent: String,
    /// Where unknown paths are redirected.
    pub homepage_url: String,
}

#[derive(Clone)]
pub struct AppState {
    pub lookup: Arc<LookupGateway>,
    pub refresher: Arc<LinkMapRefresher>,
    pub store: Arc<dyn KeyValueStore>,
    pub site: Arc<SiteSettings>,
}

impl AppState {
    pub fn new(
        lookup: Arc<LookupGateway>,
        refresher: Arc<LinkMapRefresher>,
        store: Arc<dyn KeyValueStore>,
        site: SiteSettings,
    ) -> Self {
        Self {
            lookup,
            refresher,
            store,
            site: Arc::new(site),
        }
    }
}
