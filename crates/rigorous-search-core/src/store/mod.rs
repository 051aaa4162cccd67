//! Corpus abstraction for Rigorous Search.
//!
//! The [`Corpus`] trait is the read-only view the scanner needs over a
//! content repository: a document catalog queryable by namespace, a
//! revision store, and a text store. Backends (SQLite, in-memory) plug in
//! here; the scanner never sees SQL.
//!
//! Implementations must be `Send + Sync` to work with async runtimes.

pub mod memory;

use anyhow::Result;
use async_trait::async_trait;
use tracing::{debug, warn};

use crate::models::{Document, NamespaceId, Revision, RevisionId, TextBlob, TextId};

/// A document paired with the text blob of its current revision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedDocument {
    pub document: Document,
    pub text: TextBlob,
}

/// Read-only storage backend scanned by the [`scan`](crate::scan) engine.
///
/// # Operations
///
/// | Method | Purpose |
/// |--------|---------|
/// | [`documents`](Corpus::documents) | Enumerate a namespace in stable order |
/// | [`revision`](Corpus::revision) | Look up a revision by id |
/// | [`text`](Corpus::text) | Look up a text blob by id |
/// | [`resolved_documents`](Corpus::resolved_documents) | Batched document → text resolution |
///
/// A missing revision or blob is `Ok(None)`, not an error. Errors are
/// reserved for the backend itself failing.
#[async_trait]
pub trait Corpus: Send + Sync {
    /// Every document in `namespace`, in the backend's stable order.
    async fn documents(&self, namespace: NamespaceId) -> Result<Vec<Document>>;

    /// The revision with the given id, if it exists.
    async fn revision(&self, id: RevisionId) -> Result<Option<Revision>>;

    /// The text blob with the given id, if it exists and is stored locally.
    async fn text(&self, id: TextId) -> Result<Option<TextBlob>>;

    /// Every document in `namespace` whose current revision and text both
    /// resolve, paired with that text, in [`documents`](Corpus::documents)
    /// order. Documents with a missing revision or blob are left out.
    ///
    /// The default walks the three lookups above one document at a time.
    /// Backends that can join should override it with a single query.
    async fn resolved_documents(&self, namespace: NamespaceId) -> Result<Vec<ResolvedDocument>> {
        let docs = self.documents(namespace).await?;
        let mut resolved = Vec::with_capacity(docs.len());
        for document in docs {
            let revision = match self.revision(document.latest_revision).await {
                Ok(Some(rev)) => rev,
                Ok(None) => {
                    debug!(doc = document.id, rev = document.latest_revision, "revision missing");
                    continue;
                }
                Err(e) => {
                    warn!(doc = document.id, error = %e, "revision lookup failed");
                    continue;
                }
            };
            match self.text(revision.text_id).await {
                Ok(Some(text)) => resolved.push(ResolvedDocument { document, text }),
                Ok(None) => debug!(doc = document.id, text = revision.text_id, "text missing"),
                Err(e) => warn!(doc = document.id, error = %e, "text lookup failed"),
            }
        }
        Ok(resolved)
    }
}
