//! # Rigorous Search
//!
//! Exhaustive substring search over the raw stored source of wiki pages.
//!
//! An indexed search only sees rendered text. Rigorous search reads the
//! current revision of every page in a namespace and tests the source
//! itself, so it finds link URLs, template calls and tag syntax that an
//! index never stores. The price is a full scan per query.
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────┐   ┌──────────────┐   ┌──────────────────────┐
//! │  rsearch   │──▶│   sanitize   │──▶│ scan (core)          │
//! │   (CLI)    │   │  (core)      │   │  page→revision→text  │
//! └────────────┘   └──────────────┘   └──────────┬───────────┘
//!                                                │ Corpus trait
//!                                        ┌───────▼────────┐
//!                                        │ SqliteCorpus   │
//!                                        │ page/rev/text  │
//!                                        └────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! rsearch init                        # create database
//! rsearch import pages.json           # load pages
//! rsearch search "http://example.com" # scan the main namespace
//! rsearch search "{{Cite" --namespace 10 --strategy joined
//! rsearch stats
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing and validation |
//! | [`db`] | SQLite connection pool with WAL mode |
//! | [`migrate`] | Schema migrations (idempotent) |
//! | [`sqlite_store`] | SQLite-backed `Corpus` |
//! | [`import`] | JSON page import |
//! | [`search`] | Sanitize + scan + CLI output |
//! | [`stats`] | Per-namespace page and gap counts |

pub mod config;
pub mod db;
pub mod import;
pub mod migrate;
pub mod search;
pub mod sqlite_store;
pub mod stats;

pub use rigorous_search_core::store;
