//! Brute-force corpus scanner.
//!
//! Walks every document of one namespace, resolves its current revision to
//! the stored source text, and keeps the documents whose text contains the
//! sanitized [`Pattern`]. There is no index: every query reads every
//! document, so cost grows with corpus size.
//!
//! # Algorithm
//!
//! 1. An empty pattern returns an empty result without touching the corpus.
//! 2. Enumerate the namespace. If that fails the scan fails with
//!    [`ScanError::CorpusUnavailable`].
//! 3. Per document: revision → text blob → case-insensitive containment.
//!    A missing revision or blob (or a failed lookup) skips the document.
//! 4. Matching documents are reported by full display title, in
//!    enumeration order.
//!
//! With [`ScanStrategy::Joined`] step 3 is replaced by a single batched
//! [`Corpus::resolved_documents`] call. The output is identical.

use std::fmt;
use std::str::FromStr;

use futures::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::models::{Document, NamespaceId};
use crate::namespace::Namespaces;
use crate::sanitize::{sanitize, Pattern};
use crate::store::Corpus;

/// How the scanner resolves document text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScanStrategy {
    /// One revision lookup and one text lookup per document.
    #[default]
    PerDocument,
    /// One batched resolution call for the whole namespace.
    Joined,
}

impl FromStr for ScanStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "per-document" => Ok(Self::PerDocument),
            "joined" => Ok(Self::Joined),
            other => Err(format!(
                "unknown scan strategy '{}'. Use per-document or joined.",
                other
            )),
        }
    }
}

impl fmt::Display for ScanStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PerDocument => f.write_str("per-document"),
            Self::Joined => f.write_str("joined"),
        }
    }
}

/// Scan tuning, decoupled from application config.
#[derive(Debug, Clone)]
pub struct ScanOptions {
    pub strategy: ScanStrategy,
    /// Maximum per-document resolutions in flight. Only used by
    /// [`ScanStrategy::PerDocument`]; values below 1 are treated as 1.
    pub concurrency: usize,
    /// Names used to qualify result titles.
    pub namespaces: Namespaces,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            strategy: ScanStrategy::PerDocument,
            concurrency: 1,
            namespaces: Namespaces::default(),
        }
    }
}

/// Titles of the matching documents, in corpus enumeration order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MatchResult {
    pub titles: Vec<String>,
}

impl MatchResult {
    pub fn count(&self) -> usize {
        self.titles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.titles.is_empty()
    }
}

/// Failures that abort a scan. Resolution gaps are never errors.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("corpus unavailable for namespace {namespace}")]
    CorpusUnavailable {
        namespace: NamespaceId,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
    },
}

impl ScanError {
    fn unavailable(namespace: NamespaceId, err: anyhow::Error) -> Self {
        Self::CorpusUnavailable {
            namespace,
            source: err.into(),
        }
    }
}

/// Sanitize `raw` and scan `namespace` for it.
pub async fn search<C: Corpus + ?Sized>(
    corpus: &C,
    namespace: NamespaceId,
    raw: &str,
    options: &ScanOptions,
) -> Result<MatchResult, ScanError> {
    let pattern = sanitize(raw);
    scan(corpus, namespace, pattern.as_ref(), options).await
}

/// Scan every document of `namespace` for `pattern`.
///
/// `None` is the empty pattern: the result is empty and the corpus is not
/// queried.
pub async fn scan<C: Corpus + ?Sized>(
    corpus: &C,
    namespace: NamespaceId,
    pattern: Option<&Pattern>,
    options: &ScanOptions,
) -> Result<MatchResult, ScanError> {
    let pattern = match pattern {
        Some(p) => p,
        None => {
            debug!(namespace, "empty pattern, skipping scan");
            return Ok(MatchResult::default());
        }
    };

    let matched = match options.strategy {
        ScanStrategy::PerDocument => {
            scan_per_document(corpus, namespace, pattern, options.concurrency).await?
        }
        ScanStrategy::Joined => scan_joined(corpus, namespace, pattern).await?,
    };

    let titles: Vec<String> = matched
        .iter()
        .map(|doc| options.namespaces.full_title(doc))
        .collect();

    info!(
        namespace,
        pattern = %pattern,
        strategy = %options.strategy,
        matches = titles.len(),
        "scan complete"
    );

    Ok(MatchResult { titles })
}

async fn scan_per_document<C: Corpus + ?Sized>(
    corpus: &C,
    namespace: NamespaceId,
    pattern: &Pattern,
    concurrency: usize,
) -> Result<Vec<Document>, ScanError> {
    let docs = corpus
        .documents(namespace)
        .await
        .map_err(|e| ScanError::unavailable(namespace, e))?;
    debug!(namespace, documents = docs.len(), "enumerated namespace");

    // `buffered` yields in input order, so the result keeps catalog order
    // whatever the concurrency.
    let hits: Vec<bool> = stream::iter(docs.iter())
        .map(|doc| document_matches(corpus, doc, pattern))
        .buffered(concurrency.max(1))
        .collect()
        .await;

    Ok(docs
        .into_iter()
        .zip(hits)
        .filter_map(|(doc, hit)| hit.then_some(doc))
        .collect())
}

async fn scan_joined<C: Corpus + ?Sized>(
    corpus: &C,
    namespace: NamespaceId,
    pattern: &Pattern,
) -> Result<Vec<Document>, ScanError> {
    let resolved = corpus
        .resolved_documents(namespace)
        .await
        .map_err(|e| ScanError::unavailable(namespace, e))?;
    debug!(namespace, resolved = resolved.len(), "resolved namespace");

    Ok(resolved
        .into_iter()
        .filter(|r| pattern.is_contained_in(&r.text.text()))
        .map(|r| r.document)
        .collect())
}

/// Resolve one document's current text and test it. Gaps are `false`.
async fn document_matches<C: Corpus + ?Sized>(
    corpus: &C,
    doc: &Document,
    pattern: &Pattern,
) -> bool {
    let revision = match corpus.revision(doc.latest_revision).await {
        Ok(Some(rev)) => rev,
        Ok(None) => {
            debug!(doc = doc.id, rev = doc.latest_revision, "revision missing, skipped");
            return false;
        }
        Err(e) => {
            warn!(doc = doc.id, error = %e, "revision lookup failed, skipped");
            return false;
        }
    };

    let text = match corpus.text(revision.text_id).await {
        Ok(Some(text)) => text,
        Ok(None) => {
            debug!(doc = doc.id, text = revision.text_id, "text missing, skipped");
            return false;
        }
        Err(e) => {
            warn!(doc = doc.id, error = %e, "text lookup failed, skipped");
            return false;
        }
    };

    pattern.is_contained_in(&text.text())
}
