//! Document-level errors. Any of these aborts the run.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that stop processing of a document (and of the whole run).
#[derive(Debug, Error)]
pub enum DocumentError {
    /// The document could not be opened or stat'ed.
    #[error("could not stat file {path}: {source}")]
    Metadata {
        /// Document path.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The document content could not be read.
    #[error("could not read file {path}: {source}")]
    Read {
        /// Document path.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The substitution pattern for the document could not be built.
    #[error("could not build replacements for {path}: {source}")]
    Rewrite {
        /// Document path.
        path: PathBuf,
        /// The underlying regex error.
        #[source]
        source: regex::Error,
    },

    /// The rewritten document could not be written back.
    #[error("could not write file {path}: {source}")]
    Write {
        /// Document path.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },
}

impl DocumentError {
    /// Creates a metadata error.
    pub fn metadata(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Metadata {
            path: path.into(),
            source,
        }
    }

    /// Creates a read error.
    pub fn read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Read {
            path: path.into(),
            source,
        }
    }

    /// Creates a rewrite error.
    pub fn rewrite(path: impl Into<PathBuf>, source: regex::Error) -> Self {
        Self::Rewrite {
            path: path.into(),
            source,
        }
    }

    /// Creates a write error.
    pub fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Write {
            path: path.into(),
            source,
        }
    }
}
