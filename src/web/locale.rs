//! Response language selection.

use axum::http::{HeaderMap, header};

/// Languages the download page is rendered in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Locale {
    #[default]
    English,
    Chinese,
}

impl Locale {
    /// Picks the page language from an `Accept-Language` value.
    ///
    /// Any mention of `zh` selects Chinese; everything else, including a
    /// missing header, falls back to English.
    pub fn from_accept_language(value: Option<&str>) -> Self {
        match value {
            Some(v) if v.contains("zh") => Self::Chinese,
            _ => Self::English,
        }
    }

    pub fn from_headers(headers: &HeaderMap) -> Self {
        Self::from_accept_language(
            headers
                .get(header::ACCEPT_LANGUAGE)
                .and_then(|v| v.to_str().ok()),
        )
    }
}
