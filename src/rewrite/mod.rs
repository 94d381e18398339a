//! Document rewriting: URL-to-path substitution and atomic file replacement.
//!
//! # Example
//!
//! ```
//! use imagelocalizer_core::rewrite::Replacements;
//!
//! let mut replacements = Replacements::new();
//! replacements.insert("http://example.com/a.jpg", "img/0a1b.jpg");
//! let out = replacements.apply(br#"<img src="http://example.com/a.jpg">"#).unwrap();
//! assert_eq!(out.text.as_ref(), br#"<img src="img/0a1b.jpg">"#);
//! ```

mod atomic;
mod policy;
mod replacements;

pub use atomic::write_atomically;
pub use policy::{FETCH_FAILED_MARKER, FailurePolicy};
pub use replacements::{Replacements, Rewritten};
