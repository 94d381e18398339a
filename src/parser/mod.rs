//! Image reference extraction from raw document text.
//!
//! Matching is lexical: no markup is parsed. A reference is any quoted
//! `"http...jpg"` string, wherever it appears in the document.
//!
//! # Example
//!
//! ```
//! use imagelocalizer_core::parser::{extract_image_urls, resolve_full_size_url, unique_in_order};
//!
//! let text = br#"![a]("http://example.com/s400/a.jpg") ![b]("http://example.com/s400/a.jpg")"#;
//! let urls = unique_in_order(extract_image_urls(text));
//! assert_eq!(urls.len(), 1);
//! assert_eq!(resolve_full_size_url(&urls[0]), "http://example.com/s3200/a.jpg");
//! ```

mod image_url;
mod size;

pub use image_url::{extract_image_urls, unique_in_order};
pub use size::{FULL_SIZE_SEGMENT, resolve_full_size_url};
