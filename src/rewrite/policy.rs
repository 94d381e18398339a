//! What to write in place of a reference whose image could not be fetched.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

/// Prefix written by [`FailurePolicy::Mark`] in front of the original URL.
pub const FETCH_FAILED_MARKER: &str = "imagelocalizer-fetch-failed:";

/// Replacement policy for references whose download failed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Keep the original URL in the document.
    #[default]
    Leave,
    /// Replace the URL with an empty string.
    Blank,
    /// Replace the URL with [`FETCH_FAILED_MARKER`] followed by the URL.
    Mark,
}

impl FailurePolicy {
    /// Returns the replacement for `original`, or `None` when the reference
    /// should stay untouched.
    #[must_use]
    pub fn replacement_for(self, original: &str) -> Option<String> {
        match self {
            Self::Leave => None,
            Self::Blank => Some(String::new()),
            Self::Mark => Some(format!("{FETCH_FAILED_MARKER}{original}")),
        }
    }

    /// Returns the stable string label used by the CLI and config file.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Leave => "leave",
            Self::Blank => "blank",
            Self::Mark => "mark",
        }
    }
}

impl fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FailurePolicy {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "leave" => Ok(Self::Leave),
            "blank" => Ok(Self::Blank),
            "mark" => Ok(Self::Mark),
            other => Err(format!(
                "unknown failure policy '{other}' (expected leave, blank, or mark)"
            )),
        }
    }
}
