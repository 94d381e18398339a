//! Constants for the download module (timeouts, redirects, storage layout).

/// Default HTTP connect timeout (30 seconds).
pub const CONNECT_TIMEOUT_SECS: u64 = 30;

/// Default whole-request timeout (5 minutes for large images).
pub const READ_TIMEOUT_SECS: u64 = 300;

/// Default maximum number of redirect hops followed per request.
pub const MAX_REDIRECTS: usize = 10;

/// Subdirectory, next to each document, that holds downloaded images.
pub const IMAGE_DIR: &str = "img";

/// File extension given to every stored image.
pub const IMAGE_EXTENSION: &str = "jpg";

/// Prefix of scratch files created in the platform temp directory.
pub const TEMP_FILE_PREFIX: &str = "imagelocalizer-download-";
