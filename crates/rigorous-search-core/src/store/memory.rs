//! In-memory [`Corpus`] implementation for testing and WASM targets.
//!
//! Uses `BTreeMap` behind `std::sync::RwLock` for thread safety. Documents
//! enumerate in ascending id order, the same order the SQLite corpus uses.

use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;

use anyhow::Result;
use async_trait::async_trait;

use crate::models::{Document, DocumentId, NamespaceId, Revision, RevisionId, TextBlob, TextId};

use super::Corpus;

/// In-memory corpus for testing and WASM environments.
pub struct InMemoryCorpus {
    docs: RwLock<BTreeMap<DocumentId, Document>>,
    revisions: RwLock<HashMap<RevisionId, Revision>>,
    texts: RwLock<HashMap<TextId, TextBlob>>,
}

impl InMemoryCorpus {
    pub fn new() -> Self {
        Self {
            docs: RwLock::new(BTreeMap::new()),
            revisions: RwLock::new(HashMap::new()),
            texts: RwLock::new(HashMap::new()),
        }
    }

    pub fn insert_document(&self, doc: Document) {
        self.docs.write().unwrap().insert(doc.id, doc);
    }

    pub fn insert_revision(&self, rev: Revision) {
        self.revisions.write().unwrap().insert(rev.id, rev);
    }

    pub fn insert_text(&self, text: TextBlob) {
        self.texts.write().unwrap().insert(text.id, text);
    }

    /// Add a page with one revision holding `text`, reusing the next free
    /// id for all three records. Returns the document id.
    pub fn add_page(&self, namespace: NamespaceId, title: &str, text: &str) -> DocumentId {
        let id = self.next_id();
        self.insert_text(TextBlob::new(id, text));
        self.insert_revision(Revision { id, text_id: id });
        self.insert_document(Document {
            id,
            namespace,
            title: title.to_string(),
            latest_revision: id,
        });
        id
    }

    /// Add a page whose current revision points at nothing.
    pub fn add_dangling_page(&self, namespace: NamespaceId, title: &str) -> DocumentId {
        let id = self.next_id();
        self.insert_document(Document {
            id,
            namespace,
            title: title.to_string(),
            latest_revision: -id,
        });
        id
    }

    /// Add a page whose revision exists but whose text blob does not.
    pub fn add_textless_page(&self, namespace: NamespaceId, title: &str) -> DocumentId {
        let id = self.next_id();
        self.insert_revision(Revision { id, text_id: -id });
        self.insert_document(Document {
            id,
            namespace,
            title: title.to_string(),
            latest_revision: id,
        });
        id
    }

    /// Point an existing document at a new revision holding `text`.
    pub fn edit_page(&self, doc_id: DocumentId, text: &str) {
        let id = self.next_id();
        self.insert_text(TextBlob::new(id, text));
        self.insert_revision(Revision { id, text_id: id });
        if let Some(doc) = self.docs.write().unwrap().get_mut(&doc_id) {
            doc.latest_revision = id;
        }
    }

    pub fn len(&self) -> usize {
        self.docs.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn next_id(&self) -> i64 {
        let docs = self.docs.read().unwrap().keys().next_back().copied().unwrap_or(0);
        let revs = self.revisions.read().unwrap().keys().max().copied().unwrap_or(0);
        let texts = self.texts.read().unwrap().keys().max().copied().unwrap_or(0);
        docs.max(revs).max(texts) + 1
    }
}

impl Default for InMemoryCorpus {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Corpus for InMemoryCorpus {
    async fn documents(&self, namespace: NamespaceId) -> Result<Vec<Document>> {
        let docs = self.docs.read().unwrap();
        Ok(docs
            .values()
            .filter(|d| d.namespace == namespace)
            .cloned()
            .collect())
    }

    async fn revision(&self, id: RevisionId) -> Result<Option<Revision>> {
        Ok(self.revisions.read().unwrap().get(&id).copied())
    }

    async fn text(&self, id: TextId) -> Result<Option<TextBlob>> {
        Ok(self.texts.read().unwrap().get(&id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;

    #[test]
    fn test_enumerates_namespace_in_id_order() {
        let corpus = InMemoryCorpus::new();
        let a = corpus.add_page(0, "A", "one");
        corpus.add_page(1, "Talk_A", "two");
        let b = corpus.add_page(0, "B", "three");

        let docs = block_on(corpus.documents(0)).unwrap();
        let ids: Vec<_> = docs.iter().map(|d| d.id).collect();
        assert_eq!(ids, vec![a, b]);
    }

    #[test]
    fn test_gaps_resolve_to_none() {
        let corpus = InMemoryCorpus::new();
        let dangling = corpus.add_dangling_page(0, "Dangling");
        let textless = corpus.add_textless_page(0, "Textless");

        let docs = block_on(corpus.documents(0)).unwrap();
        let d = docs.iter().find(|d| d.id == dangling).unwrap();
        assert!(block_on(corpus.revision(d.latest_revision)).unwrap().is_none());

        let t = docs.iter().find(|d| d.id == textless).unwrap();
        let rev = block_on(corpus.revision(t.latest_revision)).unwrap().unwrap();
        assert!(block_on(corpus.text(rev.text_id)).unwrap().is_none());
    }

    #[test]
    fn test_default_resolved_documents_skips_gaps() {
        let corpus = InMemoryCorpus::new();
        corpus.add_dangling_page(0, "Dangling");
        let ok = corpus.add_page(0, "Ok", "body");
        corpus.add_textless_page(0, "Textless");

        let resolved = block_on(corpus.resolved_documents(0)).unwrap();
        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[0].document.id, ok);
        assert_eq!(resolved[0].text.text(), "body");
    }

    #[test]
    fn test_edit_page_moves_current_revision() {
        let corpus = InMemoryCorpus::new();
        let id = corpus.add_page(0, "Page", "old");
        corpus.edit_page(id, "new");

        let resolved = block_on(corpus.resolved_documents(0)).unwrap();
        assert_eq!(resolved[0].text.text(), "new");
    }
}
