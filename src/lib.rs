//! Image Localizer Core Library
//!
//! Rewrites references to remote images inside local text documents: quoted
//! `"http...jpg"` URLs are downloaded once each, stored under a content-derived
//! name in an `img/` directory next to the document, and replaced in the
//! document with the relative path.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`parser`] - Quoted image URL extraction and full-size URL resolution
//! - [`download`] - Streaming HTTP fetch into content-addressed storage
//! - [`rewrite`] - Single-pass substitution and atomic file replacement
//! - [`document`] - Per-document pipeline tying the above together
//! - [`config`] - Config file loading and settings resolution

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod document;
pub mod download;
pub mod parser;
pub mod rewrite;

// Re-export commonly used types
pub use config::{ConfigError, FileConfig, Settings};
pub use document::{
    DocumentError, DocumentState, LocalizeReport, Localizer, LocalizerOptions, PlannedFetch,
    RunSummary,
};
pub use download::{ClientOptions, DownloadError, HttpClient, ImageFetcher, StoredBlob};
pub use parser::{extract_image_urls, resolve_full_size_url, unique_in_order};
pub use rewrite::{FailurePolicy, Replacements, write_atomically};
