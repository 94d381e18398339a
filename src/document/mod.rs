//! Document orchestration.
//!
//! Each document moves through [`DocumentState`] stages: its metadata and
//! content are read, quoted image references are extracted and deduplicated,
//! each distinct reference is fetched once, and the document is rewritten in
//! a single substitution pass with an atomic replace.
//!
//! Fetch failures are recoverable and handled per
//! [`FailurePolicy`](crate::rewrite::FailurePolicy); document errors are not.

mod error;
mod localizer;
mod report;

pub use error::DocumentError;
pub use localizer::{DocumentState, Localizer, LocalizerOptions, PlannedFetch};
pub use report::{LocalizeReport, RunSummary};
