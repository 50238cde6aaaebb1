//! Download page handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, State},
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::application::services::ResolvedLink;
use crate::error::AppError;
use crate::state::AppState;
use crate::web::locale::Locale;

/// English download page.
///
/// Renders `templates/download.en.html` with the resolved link and the
/// project it belongs to.
#[derive(Template, WebTemplate)]
#[template(path = "download.en.html")]
pub struct DownloadPageEn {
    pub target_link: String,
    pub owner: String,
    pub project_slug: String,
    pub project: String,
}

/// Chinese download page (`templates/download.zh.html`).
#[derive(Template, WebTemplate)]
#[template(path = "download.zh.html")]
pub struct DownloadPageZh {
    pub target_link: String,
    pub owner: String,
    pub project_slug: String,
    pub project: String,
}

impl From<ResolvedLink> for DownloadPageEn {
    fn from(link: ResolvedLink) -> Self {
        Self {
            target_link: link.target_link,
            owner: link.owner,
            project_slug: link.project_slug,
            project: link.project,
        }
    }
}

impl From<ResolvedLink> for DownloadPageZh {
    fn from(link: ResolvedLink) -> Self {
        Self {
            target_link: link.target_link,
            owner: link.owner,
            project_slug: link.project_slug,
            project: link.project,
        }
    }
}

/// Resolves an artifact slug.
///
/// # Endpoint
///
/// `GET /dl/{*base_name}`
///
/// # Responses
///
/// - **302 Found** to the cached URL when the `User-Agent` is the
///   configured direct client
/// - **200 OK** with the download page otherwise, in Chinese when
///   `Accept-Language` mentions `zh`
///
/// # Errors
///
/// Returns 404 Not Found if no cached URL exists (including invalid slugs).
pub async fn download_handler(
    Path(base_name): Path<String>,
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let resolved = state.lookup.resolve(&base_name).await?;

    let user_agent = headers
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok());

    if user_agent == Some(state.site.direct_user_agent.as_str()) {
        let location = HeaderValue::from_str(&resolved.target_link).map_err(|_| {
            AppError::internal("Cached link is not a valid header value", json!({}))
        })?;
        return Ok((StatusCode::FOUND, [(header::LOCATION, location)]).into_response());
    }

    let page = match Locale::from_headers(&headers) {
        Locale::English => DownloadPageEn::from(resolved).into_response(),
        Locale::Chinese => DownloadPageZh::from(resolved).into_response(),
    };

    Ok(page)
}

/// Redirects unknown paths to the project homepage.
pub async fn homepage_redirect(State(state): State<AppState>) -> Response {
    match HeaderValue::from_str(&state.site.homepage_url) {
        Ok(location) => (StatusCode::FOUND, [(header::LOCATION, location)]).into_response(),
        Err(_) => StatusCode::NOT_FOUND.into_response(),
    }
}
