//! # Rigorous Search Core
//!
//! Shared, WASM-safe logic for Rigorous Search: data models, the pattern
//! sanitizer, the corpus storage abstraction, and the brute-force scanner.
//!
//! This crate contains no tokio, sqlx, filesystem I/O, or other
//! native-only dependencies. Storage backends live in the application
//! crate and plug in through the [`store::Corpus`] trait.
//!
//! ```text
//! raw pattern ──▶ sanitize ──▶ Pattern ──▶ scan(corpus, namespace) ──▶ MatchResult
//!                    │                           │
//!                    └── Empty ──────────────────┴──▶ (0, [])
//! ```

pub mod models;
pub mod namespace;
pub mod sanitize;
pub mod scan;
pub mod store;

pub use models::{Document, DocumentId, NamespaceId, Revision, RevisionId, TextBlob, TextId};
pub use namespace::Namespaces;
pub use sanitize::{sanitize, Pattern, BLOCKLIST};
pub use scan::{scan, search, MatchResult, ScanError, ScanOptions, ScanStrategy};
pub use store::Corpus;
