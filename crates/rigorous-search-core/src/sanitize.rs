//! Pattern sanitizer.
//!
//! Turns a raw user search string into a [`Pattern`]: every character in
//! [`BLOCKLIST`] is deleted (not escaped), and the remainder is lower-cased.
//! A raw string that is empty after deletion yields `None`, meaning the
//! query matches nothing and no scan is needed.
//!
//! Matching compares full Unicode case folds of both sides, so `ß` finds
//! `STRASSE` and `ΟΣ` finds a word-final `ς`. The lower-cased form is only
//! what gets shown.
//!
//! The deletion is lossy on purpose: `"foo-bar"` searches for `foobar`.
//! There is no escape mechanism, so terms containing these characters
//! cannot be searched for.

use std::fmt;

use serde::{Serialize, Serializer};

/// Characters removed from every raw pattern.
///
/// These carry meaning for SQL `LIKE` (`%`, `_`, `\`), for wiki markup and
/// link syntax, or for path handling in the request layer.
pub const BLOCKLIST: &[char] = &[
    '"', '*', '%', '\\', '/', '(', ')', '[', ']', '-', '_', '\u{2014}', '.', ';', ':',
];

/// A sanitized, lower-cased, non-empty substring pattern.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Pattern {
    shown: String,
    folded: String,
}

impl Pattern {
    fn new(shown: String) -> Self {
        let folded = caseless::default_case_fold_str(&shown);
        Self { shown, folded }
    }

    pub fn as_str(&self) -> &str {
        &self.shown
    }

    /// Case-insensitive containment of the pattern anywhere in `text`.
    ///
    /// Not a regex, not word-bounded, not anchored.
    pub fn is_contained_in(&self, text: &str) -> bool {
        caseless::default_case_fold_str(text).contains(self.folded.as_str())
    }
}

impl Serialize for Pattern {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.shown)
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.shown)
    }
}

impl AsRef<str> for Pattern {
    fn as_ref(&self) -> &str {
        &self.shown
    }
}

/// Sanitize a raw search string. Returns `None` when nothing is left.
pub fn sanitize(raw: &str) -> Option<Pattern> {
    let cleaned: String = raw.chars().filter(|c| !BLOCKLIST.contains(c)).collect();
    if cleaned.is_empty() {
        return None;
    }
    Some(Pattern::new(cleaned.to_lowercase()))
}
