//! Whole-file replacement through a temp file and a rename.

use std::fs::{self, Permissions};
use std::io::{self, Write};
use std::path::Path;

use tracing::debug;

const STAGING_PREFIX: &str = ".imagelocalizer-rewrite-";

/// Replaces the contents of `path` with `contents`, applying `permissions`.
///
/// The new contents are staged in a sibling temp file, flushed to disk, and
/// renamed over the original. Readers see either the old or the new file,
/// never a partial write. Symlinks are resolved first so the link itself
/// survives and its target is rewritten.
///
/// # Errors
///
/// Returns any IO error from resolving the path, staging, or the rename. On
/// error the original file is left untouched and the staging file is removed.
pub fn write_atomically(path: &Path, contents: &[u8], permissions: &Permissions) -> io::Result<()> {
    let target = fs::canonicalize(path)?;
    let dir = target.parent().unwrap_or_else(|| Path::new("."));

    let mut staged = tempfile::Builder::new()
        .prefix(STAGING_PREFIX)
        .tempfile_in(dir)?;
    staged.write_all(contents)?;
    staged.flush()?;
    staged.as_file().sync_all()?;
    fs::set_permissions(staged.path(), permissions.clone())?;

    debug!(
        staged = %staged.path().display(),
        target = %target.display(),
        "replacing document"
    );
    staged.persist(&target).map_err(|e| e.error)?;
    Ok(())
}
