//! Core data models for the scanned corpus.
//!
//! The corpus is a three-level structure: each [`Document`] points at its
//! current [`Revision`], which points at the [`TextBlob`] holding the raw
//! source. The scanner only ever reads these records.

use serde::{Deserialize, Serialize};

/// Namespace classifier of a document. `0` is the main namespace.
pub type NamespaceId = i64;
/// Document (page) identity.
pub type DocumentId = i64;
/// Revision identity.
pub type RevisionId = i64;
/// Text blob identity.
pub type TextId = i64;

/// A document in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub id: DocumentId,
    pub namespace: NamespaceId,
    /// Title in storage form: no namespace prefix, words joined by `_`.
    pub title: String,
    /// Current revision. May point at a revision that no longer exists.
    pub latest_revision: RevisionId,
}

/// A revision of a document, referencing the blob that holds its text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Revision {
    pub id: RevisionId,
    pub text_id: TextId,
}

/// Raw stored source of a revision.
///
/// Content is kept as bytes; it is decoded lossily as UTF-8 only at match
/// time, so markup in odd encodings still scans.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextBlob {
    pub id: TextId,
    pub content: Vec<u8>,
}

impl TextBlob {
    pub fn new(id: TextId, content: impl Into<Vec<u8>>) -> Self {
        Self {
            id,
            content: content.into(),
        }
    }

    /// Content decoded as UTF-8, replacing invalid sequences.
    pub fn text(&self) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(&self.content)
    }
}
