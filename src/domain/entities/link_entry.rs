//! Link entry entity: one artifact base name mapped to its download URL.

use url::Url;

use crate::domain::slug::sanitize_slug;

/// A cached mapping from an artifact base name to its download URL.
///
/// Only constructed through [`LinkEntry::from_artifact`] by sources, which
/// guarantees the key is a bare base name and the value parses as an
/// absolute URL. The store therefore never receives a partial or malformed
/// value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkEntry {
    pub base_name: String,
    pub download_url: String,
}

impl LinkEntry {
    /// Builds an entry from a provider-reported file name and download URL.
    ///
    /// The key is the final path component of `file_name`.
    ///
    /// # Returns
    ///
    /// `None` if the file name has no usable base name or the URL is not an
    /// absolute URL.
    ///
    /// # Examples
    ///
    /// ```
    /// use artifact_redirector::domain::entities::LinkEntry;
    ///
    /// let entry = LinkEntry::from_artifact(
    ///     "dist/coredns-linux-amd64.zip",
    ///     "https://ci.example.com/artifacts/coredns-linux-amd64.zip",
    /// )
    /// .unwrap();
    /// assert_eq!(entry.base_name, "coredns-linux-amd64.zip");
    /// ```
    pub fn from_artifact(file_name: &str, download_url: &str) -> Option<Self> {
        let base_name = sanitize_slug(file_name)?;
        let url = Url::parse(download_url).ok()?;

        Some(Self {
            base_name: base_name.to_string(),
            download_url: url.into(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_artifact_uses_base_name() {
        let entry = LinkEntry::from_artifact(
            "build/release/coredns-windows-amd64.zip",
            "https://ci.example.com/api/buildjobs/1/artifacts/build/release/coredns-windows-amd64.zip",
        )
        .unwrap();

        assert_eq!(entry.base_name, "coredns-windows-amd64.zip");
        assert!(entry.download_url.starts_with("https://ci.example.com/"));
    }

    #[test]
    fn test_from_artifact_rejects_bad_url() {
        assert!(LinkEntry::from_artifact("file.zip", "not a url").is_none());
        assert!(LinkEntry::from_artifact("file.zip", "/relative/path").is_none());
    }

    #[test]
    fn test_from_artifact_rejects_bad_name() {
        assert!(LinkEntry::from_artifact("dir/..", "https://example.com/x").is_none());
        assert!(LinkEntry::from_artifact("", "https://example.com/x").is_none());
    }
}
