//! End-to-end tests for document localization against mock HTTP servers.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use imagelocalizer_core::{FailurePolicy, HttpClient, Localizer, LocalizerOptions};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const HELLO_SHA256: &str = "5891b5b522d5df086d0ff0b110fbd9d21bb4fc7163af34d08286a2e846f6be03";

fn localizer(policy: FailurePolicy) -> Localizer {
    Localizer::new(
        Arc::new(HttpClient::new()),
        LocalizerOptions {
            failure_policy: policy,
        },
    )
}

fn write_doc(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).expect("should write document");
    path
}

async fn mount_image(server: &MockServer, path_str: &str, body: &[u8], expected_hits: u64) {
    Mock::given(method("GET"))
        .and(path(path_str))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(body.to_vec()))
        .expect(expected_hits)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_localize_replaces_reference_with_local_path() {
    let server = MockServer::start().await;
    mount_image(&server, "/photo.jpg", b"hello\n", 1).await;
    let temp_dir = TempDir::new().expect("failed to create temp dir");
    let doc = write_doc(
        temp_dir.path(),
        "post.html",
        &format!(r#"<p><img src="{}/photo.jpg"></p>"#, server.uri()),
    );

    let report = localizer(FailurePolicy::Leave)
        .localize(&doc)
        .await
        .expect("localize should succeed");

    let text = std::fs::read_to_string(&doc).expect("should read document");
    assert_eq!(text, format!(r#"<p><img src="img/{HELLO_SHA256}.jpg"></p>"#));
    let blob = temp_dir.path().join("img").join(format!("{HELLO_SHA256}.jpg"));
    assert_eq!(std::fs::read(blob).expect("blob should exist"), b"hello\n");
    assert_eq!(report.fetched, 1);
    assert!(report.rewritten);
}

#[tokio::test]
async fn test_localize_fetches_repeated_url_once() {
    let server = MockServer::start().await;
    mount_image(&server, "/photo.jpg", b"hello\n", 1).await;
    let temp_dir = TempDir::new().expect("failed to create temp dir");
    let url = format!("{}/photo.jpg", server.uri());
    let doc = write_doc(
        temp_dir.path(),
        "post.md",
        &format!(r#"a "{url}" b "{url}" c "{url}""#),
    );

    let report = localizer(FailurePolicy::Leave)
        .localize(&doc)
        .await
        .expect("localize should succeed");

    assert_eq!(report.urls_found, 3);
    assert_eq!(report.unique_urls, 1);
    assert_eq!(report.replaced, 3);
    // MockServer verifies the single expected hit on drop.
}

#[tokio::test]
async fn test_localize_fetches_full_size_rendition() {
    let server = MockServer::start().await;
    mount_image(&server, "/blog/s3200/photo.jpg", b"hello\n", 1).await;
    let temp_dir = TempDir::new().expect("failed to create temp dir");
    let doc = write_doc(
        temp_dir.path(),
        "post.md",
        &format!(r#"<img src="{}/blog/s220/photo.jpg">"#, server.uri()),
    );

    localizer(FailurePolicy::Leave)
        .localize(&doc)
        .await
        .expect("localize should succeed");

    let text = std::fs::read_to_string(&doc).expect("should read document");
    assert_eq!(text, format!(r#"<img src="img/{HELLO_SHA256}.jpg">"#));
}

#[tokio::test]
async fn test_localize_identical_bytes_share_one_blob() {
    let server = MockServer::start().await;
    mount_image(&server, "/one.jpg", b"hello\n", 1).await;
    mount_image(&server, "/two.jpg", b"hello\n", 1).await;
    let temp_dir = TempDir::new().expect("failed to create temp dir");
    let doc = write_doc(
        temp_dir.path(),
        "post.md",
        &format!(r#""{0}/one.jpg" "{0}/two.jpg""#, server.uri()),
    );

    localizer(FailurePolicy::Leave)
        .localize(&doc)
        .await
        .expect("localize should succeed");

    let text = std::fs::read_to_string(&doc).expect("should read document");
    assert_eq!(
        text,
        format!(r#""img/{HELLO_SHA256}.jpg" "img/{HELLO_SHA256}.jpg""#)
    );
    let blobs = std::fs::read_dir(temp_dir.path().join("img"))
        .expect("img dir should exist")
        .count();
    assert_eq!(blobs, 1);
}

#[tokio::test]
async fn test_localize_404_continues_with_other_urls() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/missing.jpg"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;
    mount_image(&server, "/photo.jpg", b"hello\n", 1).await;
    let temp_dir = TempDir::new().expect("failed to create temp dir");
    let doc = write_doc(
        temp_dir.path(),
        "post.md",
        &format!(r#""{0}/missing.jpg" "{0}/photo.jpg""#, server.uri()),
    );

    let report = localizer(FailurePolicy::Leave)
        .localize(&doc)
        .await
        .expect("fetch failures must not fail the document");

    let text = std::fs::read_to_string(&doc).expect("should read document");
    assert_eq!(
        text,
        format!(r#""{}/missing.jpg" "img/{HELLO_SHA256}.jpg""#, server.uri())
    );
    assert_eq!(report.failed, 1);
    assert_eq!(report.fetched, 1);
}

#[tokio::test]
async fn test_localize_404_blank_policy_empties_reference() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/missing.jpg"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    let temp_dir = TempDir::new().expect("failed to create temp dir");
    let doc = write_doc(
        temp_dir.path(),
        "post.md",
        &format!(r#"<img src="{}/missing.jpg">"#, server.uri()),
    );

    localizer(FailurePolicy::Blank)
        .localize(&doc)
        .await
        .expect("localize should succeed");

    assert_eq!(
        std::fs::read_to_string(&doc).expect("should read document"),
        r#"<img src="">"#
    );
}

#[tokio::test]
async fn test_localize_document_without_images_is_untouched() {
    let server = MockServer::start().await;
    let temp_dir = TempDir::new().expect("failed to create temp dir");
    let content = "# Title\n\nNo pictures, only https://example.com/page and \"http://x/a.png\".\n";
    let doc = write_doc(temp_dir.path(), "post.md", content);

    let report = localizer(FailurePolicy::Blank)
        .localize(&doc)
        .await
        .expect("localize should succeed");

    assert!(!report.rewritten);
    assert_eq!(std::fs::read_to_string(&doc).expect("should read"), content);
    assert!(!temp_dir.path().join("img").exists());
    let received = server.received_requests().await.unwrap_or_default();
    assert!(received.is_empty());
}

#[cfg(unix)]
#[tokio::test]
async fn test_localize_preserves_permission_bits() {
    use std::os::unix::fs::PermissionsExt;

    let server = MockServer::start().await;
    mount_image(&server, "/photo.jpg", b"hello\n", 1).await;
    let temp_dir = TempDir::new().expect("failed to create temp dir");
    let doc = write_doc(
        temp_dir.path(),
        "post.md",
        &format!(r#""{}/photo.jpg""#, server.uri()),
    );
    std::fs::set_permissions(&doc, std::fs::Permissions::from_mode(0o604))
        .expect("should set permissions");

    let report = localizer(FailurePolicy::Leave)
        .localize(&doc)
        .await
        .expect("localize should succeed");

    assert!(report.rewritten);
    let mode = std::fs::metadata(&doc).expect("should stat").permissions().mode();
    assert_eq!(mode & 0o777, 0o604);
}

#[tokio::test]
async fn test_localize_second_run_is_noop() {
    let server = MockServer::start().await;
    mount_image(&server, "/photo.jpg", b"hello\n", 1).await;
    let temp_dir = TempDir::new().expect("failed to create temp dir");
    let doc = write_doc(
        temp_dir.path(),
        "post.md",
        &format!(r#""{}/photo.jpg""#, server.uri()),
    );
    let localizer = localizer(FailurePolicy::Leave);

    localizer.localize(&doc).await.expect("first run should succeed");
    let second = localizer
        .localize(&doc)
        .await
        .expect("second run should succeed");

    assert_eq!(second.urls_found, 0);
    assert!(!second.rewritten);
}
