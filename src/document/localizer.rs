//! Per-document pipeline: read, extract, fetch each unique URL, rewrite.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use super::error::DocumentError;
use super::report::LocalizeReport;
use crate::download::ImageFetcher;
use crate::parser::{extract_image_urls, resolve_full_size_url, unique_in_order};
use crate::rewrite::{FailurePolicy, Replacements, write_atomically};

/// Stage of a document in the pipeline. Stages only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum DocumentState {
    /// Metadata captured.
    Opened,
    /// Content loaded; file handle released.
    Read,
    /// Image references extracted and deduplicated.
    Extracted,
    /// Downloading unique references in encounter order.
    Fetching,
    /// Substitution applied and written back.
    Rewritten,
    /// Terminal.
    Closed,
}

impl fmt::Display for DocumentState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Opened => "opened",
            Self::Read => "read",
            Self::Extracted => "extracted",
            Self::Fetching => "fetching",
            Self::Rewritten => "rewritten",
            Self::Closed => "closed",
        };
        f.write_str(label)
    }
}

/// Behavior switches for [`Localizer`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LocalizerOptions {
    /// What replaces a reference whose download failed.
    pub failure_policy: FailurePolicy,
}

/// A fetch the pipeline would perform, reported by [`Localizer::plan`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedFetch {
    /// URL as written in the document.
    pub original: String,
    /// URL actually requested.
    pub target: String,
}

/// Localizes image references of documents, one at a time.
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use std::sync::Arc;
///
/// use imagelocalizer_core::document::{Localizer, LocalizerOptions};
/// use imagelocalizer_core::download::HttpClient;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let localizer = Localizer::new(Arc::new(HttpClient::new()), LocalizerOptions::default());
/// let report = localizer.localize(Path::new("posts/hello.md")).await?;
/// println!("{} fetched, {} failed", report.fetched, report.failed);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Localizer {
    fetcher: Arc<dyn ImageFetcher>,
    options: LocalizerOptions,
}

impl fmt::Debug for Localizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Localizer")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl Localizer {
    /// Creates a localizer that downloads through `fetcher`.
    #[must_use]
    pub fn new(fetcher: Arc<dyn ImageFetcher>, options: LocalizerOptions) -> Self {
        Self { fetcher, options }
    }

    /// Options in effect.
    #[must_use]
    pub fn options(&self) -> LocalizerOptions {
        self.options
    }

    /// Runs the full pipeline on one document.
    ///
    /// Fetch failures are logged and handled per [`FailurePolicy`]; they never
    /// fail the document. Images land in `img/` next to the document. The
    /// document is only rewritten when the substitution changed its bytes.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError`] if the document cannot be stat'ed, read, or
    /// written back. Images downloaded before a write failure stay on disk.
    #[instrument(skip(self), fields(path = %path.display()))]
    pub async fn localize(&self, path: &Path) -> Result<LocalizeReport, DocumentError> {
        info!("processing document");

        let mut state = DocumentState::Opened;
        let permissions = tokio::fs::metadata(path)
            .await
            .map_err(|e| DocumentError::metadata(path, e))?
            .permissions();

        advance(&mut state, DocumentState::Read);
        let content = tokio::fs::read(path)
            .await
            .map_err(|e| DocumentError::read(path, e))?;

        advance(&mut state, DocumentState::Extracted);
        let found = extract_image_urls(&content);
        let urls_found = found.len();
        let unique = unique_in_order(found);
        debug!(urls_found, unique = unique.len(), "extracted image references");

        let mut report = LocalizeReport {
            path: path.to_path_buf(),
            urls_found,
            unique_urls: unique.len(),
            ..LocalizeReport::default()
        };

        let destination_dir = document_dir(path);
        let mut replacements = Replacements::new();
        if !unique.is_empty() {
            advance(&mut state, DocumentState::Fetching);
        }
        for original in unique {
            let target = resolve_full_size_url(&original).into_owned();
            match self.fetcher.fetch_image(&destination_dir, &target).await {
                Ok(blob) => {
                    report.fetched += 1;
                    debug!(url = %original, path = %blob.relative_path, "image localized");
                    replacements.insert(original, blob.relative_path);
                }
                Err(error) => {
                    report.failed += 1;
                    warn!(url = %target, error = %error, "failed to download image");
                    if let Some(replacement) =
                        self.options.failure_policy.replacement_for(&original)
                    {
                        replacements.insert(original, replacement);
                    }
                }
            }
        }

        advance(&mut state, DocumentState::Rewritten);
        let rewritten = replacements
            .apply(&content)
            .map_err(|e| DocumentError::rewrite(path, e))?;
        report.replaced = rewritten.replaced;
        if rewritten.changed(&content) {
            write_atomically(path, &rewritten.text, &permissions)
                .map_err(|e| DocumentError::write(path, e))?;
            report.rewritten = true;
        } else {
            debug!("document unchanged, skipping write");
        }

        advance(&mut state, DocumentState::Closed);
        info!(
            urls_found = report.urls_found,
            unique_urls = report.unique_urls,
            fetched = report.fetched,
            failed = report.failed,
            rewritten = report.rewritten,
            "document processed"
        );
        Ok(report)
    }

    /// Lists the fetches [`localize`](Self::localize) would perform, without
    /// touching the network or the filesystem beyond reading the document.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::Read`] if the document cannot be read.
    #[instrument(skip(self), fields(path = %path.display()))]
    pub async fn plan(&self, path: &Path) -> Result<Vec<PlannedFetch>, DocumentError> {
        let content = tokio::fs::read(path)
            .await
            .map_err(|e| DocumentError::read(path, e))?;
        Ok(unique_in_order(extract_image_urls(&content))
            .into_iter()
            .map(|original| PlannedFetch {
                target: resolve_full_size_url(&original).into_owned(),
                original,
            })
            .collect())
    }
}

fn advance(state: &mut DocumentState, next: DocumentState) {
    debug_assert!(next > *state, "document state moved backwards: {state} -> {next}");
    debug!(from = %state, to = %next, "document state");
    *state = next;
}

/// Directory holding the document; images are stored below it.
fn document_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}
