//! Rewrites image-host size segments so the largest rendition is fetched.
//!
//! Blog image hosts encode the requested resolution as a path segment such as
//! `/s220/` or `/s1600-h/`. Swapping it for [`FULL_SIZE_SEGMENT`] asks the host
//! for the largest rendition it has.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;

/// Segment substituted for any size segment found in an image URL.
pub const FULL_SIZE_SEGMENT: &str = "/s3200";

#[allow(clippy::expect_used)]
static SIZE_SEGMENT_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)/s[0-9]+(-h)?").expect("size segment regex is valid") // Static pattern, safe to panic
});

/// Returns the fetch target for an image URL.
///
/// Only the first size segment in the path is replaced. URLs without one are
/// returned unchanged (borrowed).
///
/// # Examples
///
/// ```
/// use imagelocalizer_core::parser::resolve_full_size_url;
///
/// assert_eq!(
///     resolve_full_size_url("http://bp.example.com/a/s220/foo.jpg"),
///     "http://bp.example.com/a/s3200/foo.jpg"
/// );
/// assert_eq!(
///     resolve_full_size_url("http://example.com/foo.jpg"),
///     "http://example.com/foo.jpg"
/// );
/// ```
#[must_use]
pub fn resolve_full_size_url(url: &str) -> Cow<'_, str> {
    let path_start = path_offset(url);
    let Some(found) = SIZE_SEGMENT_PATTERN.find_at(url, path_start) else {
        return Cow::Borrowed(url);
    };

    let mut resolved = String::with_capacity(url.len() + FULL_SIZE_SEGMENT.len());
    resolved.push_str(&url[..found.start()]);
    resolved.push_str(FULL_SIZE_SEGMENT);
    resolved.push_str(&url[found.end()..]);
    Cow::Owned(resolved)
}

/// Byte offset where the path begins, skipping `scheme://authority`.
fn path_offset(url: &str) -> usize {
    let Some(scheme_end) = url.find("://") else {
        return 0;
    };
    let authority_start = scheme_end + 3;
    url[authority_start..]
        .find('/')
        .map_or(url.len(), |slash| authority_start + slash)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_full_size_url_replaces_size_segment() {
        assert_eq!(
            resolve_full_size_url("http://example.com/img/s220/foo.jpg"),
            "http://example.com/img/s3200/foo.jpg"
        );
    }

    #[test]
    fn test_resolve_full_size_url_replaces_height_variant() {
        assert_eq!(
            resolve_full_size_url("http://example.com/x/S1600-h/foo.jpg"),
            "http://example.com/x/s3200/foo.jpg"
        );
    }

    #[test]
    fn test_resolve_full_size_url_unchanged_without_segment() {
        let url = "http://example.com/photos/foo.jpg";
        let resolved = resolve_full_size_url(url);
        assert!(matches!(resolved, Cow::Borrowed(_)));
        assert_eq!(resolved, url);
    }

    #[test]
    fn test_resolve_full_size_url_replaces_only_first_segment() {
        assert_eq!(
            resolve_full_size_url("http://example.com/s72/s400/foo.jpg"),
            "http://example.com/s3200/s400/foo.jpg"
        );
    }

    #[test]
    fn test_resolve_full_size_url_ignores_host_names() {
        let url = "http://s3.example.com/bucket/foo.jpg";
        assert_eq!(resolve_full_size_url(url), url);

        assert_eq!(
            resolve_full_size_url("https://s3.example.com/b/s640/foo.jpg"),
            "https://s3.example.com/b/s3200/foo.jpg"
        );
    }

    #[test]
    fn test_resolve_full_size_url_without_path() {
        assert_eq!(resolve_full_size_url("http://s1.example.com"), "http://s1.example.com");
    }

    #[test]
    fn test_path_offset_without_scheme_scans_whole_string() {
        assert_eq!(path_offset("/s100/foo.jpg"), 0);
        assert_eq!(resolve_full_size_url("/s100/foo.jpg"), "/s3200/foo.jpg");
    }
}
