//! HTTP client wrapper for fetching images into content-addressed storage.
//!
//! This module provides the `HttpClient` struct which streams a response to a
//! scratch file while hashing it, then commits the file under its digest.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::redirect::Policy;
use reqwest::{Client, StatusCode};
use sha2::{Digest, Sha256};
use tempfile::NamedTempFile;
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::{debug, info, instrument};
use url::Url;

use super::ImageFetcher;
use super::blob::{BlobStore, StoredBlob};
use super::constants::{CONNECT_TIMEOUT_SECS, MAX_REDIRECTS, READ_TIMEOUT_SECS, TEMP_FILE_PREFIX};
use super::error::DownloadError;

/// Network settings for [`HttpClient`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientOptions {
    /// TCP/TLS connect timeout in seconds.
    pub connect_timeout_secs: u64,
    /// Whole-request timeout in seconds, body included.
    pub read_timeout_secs: u64,
    /// Redirect hops followed per request; `0` disables following.
    pub max_redirects: usize,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            connect_timeout_secs: CONNECT_TIMEOUT_SECS,
            read_timeout_secs: READ_TIMEOUT_SECS,
            max_redirects: MAX_REDIRECTS,
        }
    }
}

/// HTTP client for image downloads.
///
/// Created once per run and reused for every fetch, taking advantage of
/// connection pooling. No headers are added beyond the client defaults.
///
/// # Example
///
/// ```no_run
/// use imagelocalizer_core::download::HttpClient;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = HttpClient::new();
/// let blob = client
///     .fetch_image(Path::new("./posts"), "https://example.com/s3200/photo.jpg")
///     .await?;
/// println!("stored as {}", blob.relative_path);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpClient {
    /// Creates a client with the default timeouts and redirect policy.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client builder fails to build with the static
    /// configuration. This should never happen in practice.
    #[must_use]
    pub fn new() -> Self {
        Self::with_options(ClientOptions::default())
    }

    /// Creates a client with explicit network settings.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client builder fails to build (TLS backend
    /// initialization failure).
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn with_options(options: ClientOptions) -> Self {
        let redirect = if options.max_redirects == 0 {
            Policy::none()
        } else {
            Policy::limited(options.max_redirects)
        };
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(options.connect_timeout_secs))
            .timeout(Duration::from_secs(options.read_timeout_secs))
            .redirect(redirect)
            .build()
            .expect("failed to build HTTP client with static configuration");
        debug!(?options, "HTTP client ready");
        Self { client }
    }

    /// Downloads `url` and stores it under `<destination_dir>/img/<sha256>.jpg`.
    ///
    /// The body is streamed to a scratch file in the platform temp directory
    /// while its SHA-256 is computed; the scratch file is removed on every
    /// failure path.
    ///
    /// # Errors
    ///
    /// Returns `DownloadError` if:
    /// - The URL is not an absolute http/https URL
    /// - The request fails (network error, timeout)
    /// - The server answers with anything other than 200
    /// - The scratch file cannot be written
    /// - The image directory cannot be created
    /// - The final rename fails
    #[instrument(skip(self, destination_dir), fields(url = %url))]
    pub async fn fetch_image(
        &self,
        destination_dir: &Path,
        url: &str,
    ) -> Result<StoredBlob, DownloadError> {
        validate_fetch_url(url)?;

        let scratch = tempfile::Builder::new()
            .prefix(TEMP_FILE_PREFIX)
            .tempfile()
            .map_err(|e| DownloadError::io(std::env::temp_dir(), e))?;
        info!(path = %scratch.path().display(), "temp file");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| DownloadError::from_reqwest(url, e))?;

        if response.status() != StatusCode::OK {
            return Err(DownloadError::http_status(url, response.status().as_u16()));
        }

        let (sha256, bytes) = stream_to_scratch(&scratch, response, url).await?;

        let store = BlobStore::new(destination_dir);
        store.ensure_dir()?;
        let blob = store.commit(scratch, &sha256, bytes)?;

        info!(path = %blob.path.display(), bytes, "image stored");
        Ok(blob)
    }
}

#[async_trait]
impl ImageFetcher for HttpClient {
    async fn fetch_image(
        &self,
        destination_dir: &Path,
        url: &str,
    ) -> Result<StoredBlob, DownloadError> {
        HttpClient::fetch_image(self, destination_dir, url).await
    }
}

fn validate_fetch_url(url: &str) -> Result<(), DownloadError> {
    let parsed = Url::parse(url).map_err(|_| DownloadError::invalid_url(url))?;
    match parsed.scheme() {
        "http" | "https" if parsed.host().is_some() => Ok(()),
        _ => Err(DownloadError::invalid_url(url)),
    }
}

/// Streams the body into the scratch file, hashing the same bytes on the way.
///
/// Returns the lowercase hex digest and the number of bytes written.
async fn stream_to_scratch(
    scratch: &NamedTempFile,
    response: reqwest::Response,
    url: &str,
) -> Result<(String, u64), DownloadError> {
    let handle = scratch
        .as_file()
        .try_clone()
        .map_err(|e| DownloadError::io(scratch.path(), e))?;
    let mut writer = BufWriter::new(tokio::fs::File::from_std(handle));
    let mut hasher = Sha256::new();
    let mut stream = response.bytes_stream();
    let mut bytes_written: u64 = 0;

    while let Some(chunk_result) = stream.next().await {
        let chunk = chunk_result.map_err(|e| DownloadError::from_reqwest(url, e))?;
        hasher.update(&chunk);
        writer
            .write_all(&chunk)
            .await
            .map_err(|e| DownloadError::io(scratch.path(), e))?;
        bytes_written += chunk.len() as u64;
    }

    writer
        .flush()
        .await
        .map_err(|e| DownloadError::io(scratch.path(), e))?;
    writer
        .into_inner()
        .sync_all()
        .await
        .map_err(|e| DownloadError::io(scratch.path(), e))?;

    Ok((hex::encode(hasher.finalize()), bytes_written))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_client_options_default_values() {
        let options = ClientOptions::default();
        assert_eq!(options.connect_timeout_secs, 30);
        assert_eq!(options.read_timeout_secs, 300);
        assert_eq!(options.max_redirects, 10);
    }

    #[test]
    fn test_validate_fetch_url_accepts_http_and_https() {
        assert!(validate_fetch_url("http://example.com/a.jpg").is_ok());
        assert!(validate_fetch_url("HTTPS://example.com/a.jpg").is_ok());
    }

    #[test]
    fn test_validate_fetch_url_rejects_malformed() {
        assert!(matches!(
            validate_fetch_url("http//example.com/a.jpg"),
            Err(DownloadError::InvalidUrl { .. })
        ));
        assert!(matches!(
            validate_fetch_url("httpfoo.jpg"),
            Err(DownloadError::InvalidUrl { .. })
        ));
    }

    #[tokio::test]
    async fn test_fetch_image_invalid_url_creates_nothing() {
        let dir = tempfile::TempDir::new().unwrap();
        let client = HttpClient::new();
        let result = client.fetch_image(dir.path(), "http//nope.jpg").await;
        assert!(matches!(result, Err(DownloadError::InvalidUrl { .. })));
        assert!(!dir.path().join("img").exists());
    }
}
