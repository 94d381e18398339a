//! Image download and content-addressed storage.
//!
//! # Features
//!
//! - Streaming downloads hashed in a single pass (SHA-256)
//! - Scratch files in the platform temp directory, removed on every failure path
//! - Atomic commit to `<document dir>/img/<sha256>.jpg`
//! - Explicit timeouts (30s connect, 5min total) and a bounded redirect policy
//!
//! # Example
//!
//! ```no_run
//! use imagelocalizer_core::download::HttpClient;
//! use std::path::Path;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = HttpClient::new();
//! let blob = client
//!     .fetch_image(Path::new("./posts"), "https://example.com/photo.jpg")
//!     .await?;
//! println!("Stored: {}", blob.relative_path);
//! # Ok(())
//! # }
//! ```

mod blob;
mod client;
pub mod constants;
mod error;

pub use blob::{BlobStore, StoredBlob, blob_file_name};
pub use client::{ClientOptions, HttpClient};
pub use error::DownloadError;

use std::path::Path;

use async_trait::async_trait;

/// Fetches one image into the image directory of a document.
///
/// [`HttpClient`] is the production implementation; the document pipeline only
/// depends on this trait.
#[async_trait]
pub trait ImageFetcher: Send + Sync {
    /// Downloads `url` and stores it below `destination_dir`.
    ///
    /// # Errors
    ///
    /// Returns [`DownloadError`] for any network, status, or storage failure.
    async fn fetch_image(
        &self,
        destination_dir: &Path,
        url: &str,
    ) -> Result<StoredBlob, DownloadError>;
}
