//! Content-addressed image storage next to a document.
//!
//! Blobs live at `<document dir>/img/<sha256 hex>.jpg`. The name depends only
//! on the bytes, so storing identical content twice lands on the same file.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::debug;

use super::constants::{IMAGE_DIR, IMAGE_EXTENSION, TEMP_FILE_PREFIX};
use super::error::DownloadError;

/// A committed image blob.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredBlob {
    /// Path relative to the document directory, always `/`-separated (`img/<hash>.jpg`).
    pub relative_path: String,
    /// Absolute (or caller-relative) path of the blob on disk.
    pub path: PathBuf,
    /// Lowercase hex SHA-256 of the content.
    pub sha256: String,
    /// Number of bytes stored.
    pub bytes: u64,
}

/// Returns the stored file name for a content digest.
#[must_use]
pub fn blob_file_name(sha256_hex: &str) -> String {
    format!("{sha256_hex}.{IMAGE_EXTENSION}")
}

/// Image directory of one document.
#[derive(Debug, Clone)]
pub struct BlobStore {
    image_dir: PathBuf,
}

impl BlobStore {
    /// Creates the store rooted at `<destination_dir>/img`.
    #[must_use]
    pub fn new(destination_dir: &Path) -> Self {
        Self {
            image_dir: destination_dir.join(IMAGE_DIR),
        }
    }

    /// Creates the image directory and any missing parents. Idempotent.
    ///
    /// # Errors
    ///
    /// Returns [`DownloadError::CreateDir`] when the directory cannot be created.
    pub fn ensure_dir(&self) -> Result<(), DownloadError> {
        fs::create_dir_all(&self.image_dir)
            .map_err(|e| DownloadError::create_dir(self.image_dir.clone(), e))
    }

    /// Moves a finished download to its content-addressed name.
    ///
    /// The rename is the commit point. When the scratch file sits on another
    /// filesystem the bytes are first staged inside the image directory so the
    /// final step is still a rename.
    ///
    /// # Errors
    ///
    /// Returns [`DownloadError::Commit`] if neither the direct rename nor the
    /// staged copy succeeds.
    pub fn commit(
        &self,
        download: NamedTempFile,
        sha256_hex: &str,
        bytes: u64,
    ) -> Result<StoredBlob, DownloadError> {
        let file_name = blob_file_name(sha256_hex);
        let destination = self.image_dir.join(&file_name);

        set_readable_permissions(download.path())
            .map_err(|e| DownloadError::commit(destination.clone(), e))?;

        if let Err(persist_error) = download.persist(&destination) {
            debug!(
                error = %persist_error.error,
                destination = %destination.display(),
                "rename failed, staging copy inside image directory"
            );
            self.stage_and_rename(persist_error.file.path(), &destination)
                .map_err(|e| DownloadError::commit(destination.clone(), e))?;
        }

        Ok(StoredBlob {
            relative_path: format!("{IMAGE_DIR}/{file_name}"),
            path: destination,
            sha256: sha256_hex.to_string(),
            bytes,
        })
    }

    fn stage_and_rename(&self, source: &Path, destination: &Path) -> io::Result<()> {
        let mut staged = tempfile::Builder::new()
            .prefix(TEMP_FILE_PREFIX)
            .tempfile_in(&self.image_dir)?;
        let mut reader = File::open(source)?;
        io::copy(&mut reader, staged.as_file_mut())?;
        staged.as_file().sync_all()?;
        set_readable_permissions(staged.path())?;
        staged.persist(destination).map_err(|e| e.error)?;
        Ok(())
    }
}

// Scratch files are created owner-only; published images should be readable
// by whatever serves the documents.
#[cfg(unix)]
fn set_readable_permissions(path: &Path) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    fs::set_permissions(path, fs::Permissions::from_mode(0o644))
}

#[cfg(not(unix))]
fn set_readable_permissions(_path: &Path) -> io::Result<()> {
    Ok(())
}
