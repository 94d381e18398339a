//! Single-pass multi-pattern substitution over document bytes.

use std::borrow::Cow;
use std::collections::BTreeMap;

use regex::bytes::{Captures, RegexBuilder};
use tracing::debug;

/// Compiled-size ceiling for the combined pattern (documents with thousands of
/// distinct images stay well below it).
const PATTERN_SIZE_LIMIT: usize = 64 * 1024 * 1024;

/// Result of [`Replacements::apply`].
#[derive(Debug)]
pub struct Rewritten<'a> {
    /// Document bytes after substitution; borrowed when nothing matched.
    pub text: Cow<'a, [u8]>,
    /// Number of occurrences replaced.
    pub replaced: usize,
}

impl Rewritten<'_> {
    /// True when the output differs from the input.
    #[must_use]
    pub fn changed(&self, original: &[u8]) -> bool {
        self.text.as_ref() != original
    }
}

/// Ordered mapping from an original URL to the text that replaces it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Replacements {
    rules: BTreeMap<String, String>,
}

impl Replacements {
    /// Creates an empty mapping.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a rule. The first rule for a given URL wins.
    ///
    /// Returns `false` if `original` was already mapped.
    pub fn insert(&mut self, original: impl Into<String>, replacement: impl Into<String>) -> bool {
        let original = original.into();
        if original.is_empty() || self.rules.contains_key(&original) {
            return false;
        }
        self.rules.insert(original, replacement.into());
        true
    }

    /// True when no rule is recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }


    /// Replaces every occurrence of every key in one pass over `text`.
    ///
    /// All keys are matched simultaneously, so text produced by one rule is
    /// never rewritten by another. When two keys match at the same position
    /// the longer key wins.
    ///
    /// # Errors
    ///
    /// Returns the regex build error if the combined pattern exceeds the
    /// compiled-size limit.
    pub fn apply<'a>(&self, text: &'a [u8]) -> Result<Rewritten<'a>, regex::Error> {
        if self.rules.is_empty() {
            return Ok(Rewritten {
                text: Cow::Borrowed(text),
                replaced: 0,
            });
        }

        let mut keys: Vec<&str> = self.rules.keys().map(String::as_str).collect();
        keys.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        let pattern = keys
            .iter()
            .map(|key| regex::escape(key))
            .collect::<Vec<_>>()
            .join("|");
        let matcher = RegexBuilder::new(&pattern)
            .size_limit(PATTERN_SIZE_LIMIT)
            .build()?;

        let mut replaced = 0usize;
        let output = matcher.replace_all(text, |caps: &Captures<'_>| {
            replaced += 1;
            let matched = &caps[0];
            std::str::from_utf8(matched)
                .ok()
                .and_then(|key| self.rules.get(key))
                .map_or_else(|| matched.to_vec(), |value| value.as_bytes().to_vec())
        });

        debug!(rules = self.rules.len(), replaced, "applied replacements");
        Ok(Rewritten {
            text: output,
            replaced,
        })
    }
}
