//! Quoted image URL extraction from raw document text.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::bytes::Regex;
use tracing::trace;

/// Regex pattern for quoted image references.
///
/// Matches `"http...jpg"` case-insensitively. The class `[^"]` runs in Unicode
/// mode, so every match is valid UTF-8 even when the surrounding document is not.
/// A quoted URL containing invalid UTF-8 is not a reference.
#[allow(clippy::expect_used)]
static IMAGE_URL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)"(http[^"]*\.jpg)""#).expect("image URL regex is valid") // Static pattern, safe to panic
});

/// Extracts every quoted image URL from `text`, in document order.
///
/// Duplicates are retained; the surrounding quotes are stripped. No URL
/// validation is performed, the match is purely lexical.
///
/// # Examples
///
/// ```
/// use imagelocalizer_core::parser::extract_image_urls;
///
/// let text = br#"<img src="http://example.com/a.jpg"> <img src="http://example.com/a.jpg">"#;
/// let urls = extract_image_urls(text);
/// assert_eq!(urls, vec!["http://example.com/a.jpg", "http://example.com/a.jpg"]);
/// ```
#[tracing::instrument(level = "debug", skip(text), fields(text_len = text.len()))]
#[must_use]
pub fn extract_image_urls(text: &[u8]) -> Vec<String> {
    IMAGE_URL_PATTERN
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .map(|m| {
            let url = String::from_utf8_lossy(m.as_bytes()).into_owned();
            trace!(url = %url, "found image reference");
            url
        })
        .collect()
}

/// Removes repeated URLs, keeping the first occurrence of each.
#[must_use]
pub fn unique_in_order(urls: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::with_capacity(urls.len());
    urls.into_iter()
        .filter(|url| seen.insert(url.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_image_urls_strips_quotes() {
        let urls = extract_image_urls(br#"src="http://example.com/photo.jpg""#);
        assert_eq!(urls, vec!["http://example.com/photo.jpg"]);
    }

    #[test]
    fn test_extract_image_urls_is_case_insensitive() {
        let urls = extract_image_urls(br#""HTTP://EXAMPLE.COM/PHOTO.JPG" "https://a.b/c.Jpg""#);
        assert_eq!(
            urls,
            vec!["HTTP://EXAMPLE.COM/PHOTO.JPG", "https://a.b/c.Jpg"]
        );
    }

    #[test]
    fn test_extract_image_urls_keeps_duplicates_in_order() {
        let text = br#""http://a/1.jpg" "http://a/2.jpg" "http://a/1.jpg""#;
        let urls = extract_image_urls(text);
        assert_eq!(urls, vec!["http://a/1.jpg", "http://a/2.jpg", "http://a/1.jpg"]);
    }

    #[test]
    fn test_extract_image_urls_ignores_unquoted_and_other_extensions() {
        let text = br#"http://a/bare.jpg "http://a/pic.png" "ftp://a/x.jpg" "http://a/x.jpeg""#;
        assert!(extract_image_urls(text).is_empty());
    }

    #[test]
    fn test_extract_image_urls_requires_jpg_before_closing_quote() {
        let text = br#""http://a/x.jpg?size=2" "http://a/y.jpg""#;
        let urls = extract_image_urls(text);
        assert_eq!(urls, vec!["http://a/y.jpg"]);
    }

    #[test]
    fn test_extract_image_urls_tolerates_non_utf8_documents() {
        let mut text = vec![0xff, 0xfe, b' '];
        text.extend_from_slice(br#""http://a/ok.jpg""#);
        text.push(0xc3);
        assert_eq!(extract_image_urls(&text), vec!["http://a/ok.jpg"]);
    }

    #[test]
    fn test_extract_image_urls_skips_url_with_invalid_utf8() {
        let text = b"\"http://a/caf\xE9.jpg\" \"http://a/cafe.jpg\"";
        assert_eq!(extract_image_urls(text), vec!["http://a/cafe.jpg"]);
    }

    #[test]
    fn test_extract_image_urls_empty_input() {
        assert!(extract_image_urls(b"").is_empty());
    }

    #[test]
    fn test_unique_in_order_first_seen_wins() {
        let urls = vec![
            "b".to_string(),
            "a".to_string(),
            "b".to_string(),
            "c".to_string(),
            "a".to_string(),
        ];
        assert_eq!(unique_in_order(urls), vec!["b", "a", "c"]);
    }
}
