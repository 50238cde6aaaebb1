//! Slug sanitization and token helpers.
//!
//! Every slug coming from a request path is reduced to its final path
//! component before it touches the key-value store, so a caller can never
//! address anything outside the flat artifact key namespace.

/// Reduces a raw slug or provider file name to its bare base name.
///
/// Both `/` and `\` are treated as separators and trailing separators are
/// ignored, so `"dist/coredns-linux-amd64.zip"` and `"a\\b\\c.zip/"` yield
/// `"coredns-linux-amd64.zip"` and `"c.zip"`.
///
/// Returns `None` for identifiers that cannot name an artifact: empty
/// input, `"."`, `".."`, or anything containing control characters.
///
/// # Examples
///
/// ```
/// use artifact_redirector::domain::slug::sanitize_slug;
///
/// assert_eq!(sanitize_slug("../../etc/passwd"), Some("passwd"));
/// assert_eq!(sanitize_slug(".."), None);
/// ```
pub fn sanitize_slug(raw: &str) -> Option<&str> {
    let trimmed = raw.trim_end_matches(['/', '\\']);
    let base = trimmed.rsplit(['/', '\\']).next().unwrap_or_default();

    if base.is_empty() || base == "." || base == ".." || base.chars().any(char::is_control) {
        return None;
    }

    Some(base)
}

/// Returns the leading `-`-separated token of a slug.
///
/// `"coredns-linux-amd64.zip"` yields `"coredns"`; a slug without a dash is
/// returned unchanged.
pub fn project_token(slug: &str) -> &str {
    slug.split_once('-').map_or(slug, |(head, _)| head)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_plain_slug() {
        assert_eq!(
            sanitize_slug("coredns-linux-amd64.zip"),
            Some("coredns-linux-amd64.zip")
        );
    }

    #[test]
    fn test_sanitize_strips_directories() {
        assert_eq!(sanitize_slug("/nested/dir/file.7z"), Some("file.7z"));
        assert_eq!(sanitize_slug("build\\out\\file.7z"), Some("file.7z"));
        assert_eq!(sanitize_slug("dir/file.zip/"), Some("file.zip"));
    }

    #[test]
    fn test_sanitize_path_traversal() {
        assert_eq!(sanitize_slug("../../etc/passwd"), Some("passwd"));
        assert_eq!(sanitize_slug("..\\..\\windows\\win.ini"), Some("win.ini"));
    }

    #[test]
    fn test_sanitize_rejects_unusable_names() {
        assert_eq!(sanitize_slug(""), None);
        assert_eq!(sanitize_slug("/"), None);
        assert_eq!(sanitize_slug("."), None);
        assert_eq!(sanitize_slug("foo/.."), None);
        assert_eq!(sanitize_slug("evil\r\nkey"), None);
    }

    #[test]
    fn test_project_token() {
        assert_eq!(project_token("foo-x-1.0.zip"), "foo");
        assert_eq!(project_token("plain.zip"), "plain.zip");
        assert_eq!(project_token("-leading"), "");
    }
}
