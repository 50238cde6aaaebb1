//! HTML rendering handlers.

mod download;

pub use download::{DownloadPageEn, DownloadPageZh, download_handler, homepage_redirect};
