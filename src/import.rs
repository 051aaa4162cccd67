//! Page import.
//!
//! Loads pages from a JSON array into the `page` / `revision` / `text`
//! tables. Every imported page gets a fresh revision that becomes its
//! current one; importing a title that already exists behaves like an
//! edit, leaving the older revision and text in place.
//!
//! ```json
//! [
//!   { "title": "Main Page", "text": "Welcome to [[the wiki]]" },
//!   { "namespace": 10, "title": "Cite web", "text": "{{{url}}}" },
//!   { "title": "Archived", "text": "DB://cluster1/42", "external": true },
//!   { "title": "Lost text" }
//! ]
//! ```
//!
//! A page without `text` gets a revision whose text row does not exist.

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use sqlx::{Sqlite, SqlitePool, Transaction};
use std::path::Path;
use tracing::{debug, info};

use rigorous_search_core::models::{DocumentId, NamespaceId};

use crate::config::Config;
use crate::db;

/// One page record in an import file.
#[derive(Debug, Clone, Deserialize)]
pub struct ImportPage {
    #[serde(default)]
    pub namespace: NamespaceId,
    pub title: String,
    #[serde(default)]
    pub text: Option<String>,
    /// Store the text row flagged as externally stored.
    #[serde(default)]
    pub external: bool,
}

/// Outcome of an import run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportStats {
    pub created: usize,
    pub updated: usize,
}

/// Convert a display title to storage form.
pub fn storage_title(title: &str) -> String {
    title.trim().replace(' ', "_")
}

/// Parse an import file.
pub fn read_pages(path: &Path) -> Result<Vec<ImportPage>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read import file: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse import file: {}", path.display()))
}

/// Write `pages` into the database in one transaction.
pub async fn import_pages(pool: &SqlitePool, pages: &[ImportPage]) -> Result<ImportStats> {
    let mut stats = ImportStats::default();
    let mut tx = pool.begin().await?;
    let now = chrono::Utc::now().timestamp();

    for page in pages {
        let title = storage_title(&page.title);
        if title.is_empty() {
            bail!("page with empty title in namespace {}", page.namespace);
        }

        let (page_id, existed) = find_or_create_page(&mut tx, page.namespace, &title).await?;

        let rev_id: i64 = sqlx::query_scalar(
            "SELECT COALESCE(MAX(rev_id), 0) + 1 FROM revision",
        )
        .fetch_one(&mut *tx)
        .await?;

        let text_id = match &page.text {
            Some(text) => {
                let flags = if page.external { "utf-8,external" } else { "utf-8" };
                let result = sqlx::query("INSERT INTO text (old_text, old_flags) VALUES (?, ?)")
                    .bind(text.as_bytes())
                    .bind(flags)
                    .execute(&mut *tx)
                    .await?;
                result.last_insert_rowid()
            }
            // Negative ids are never assigned, so this reference dangles.
            None => -rev_id,
        };

        sqlx::query(
            "INSERT INTO revision (rev_id, rev_page, rev_text_id, rev_timestamp) VALUES (?, ?, ?, ?)",
        )
        .bind(rev_id)
        .bind(page_id)
        .bind(text_id)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        sqlx::query("UPDATE page SET page_latest = ? WHERE page_id = ?")
            .bind(rev_id)
            .bind(page_id)
            .execute(&mut *tx)
            .await?;

        debug!(page = page_id, rev = rev_id, text = text_id, title = %title, "imported page");
        if existed {
            stats.updated += 1;
        } else {
            stats.created += 1;
        }
    }

    tx.commit().await?;
    Ok(stats)
}

async fn find_or_create_page(
    tx: &mut Transaction<'_, Sqlite>,
    namespace: NamespaceId,
    title: &str,
) -> Result<(DocumentId, bool)> {
    let existing: Option<i64> =
        sqlx::query_scalar("SELECT page_id FROM page WHERE page_namespace = ? AND page_title = ?")
            .bind(namespace)
            .bind(title)
            .fetch_optional(&mut **tx)
            .await?;

    if let Some(id) = existing {
        return Ok((id, true));
    }

    let result =
        sqlx::query("INSERT INTO page (page_namespace, page_title, page_latest) VALUES (?, ?, 0)")
            .bind(namespace)
            .bind(title)
            .execute(&mut **tx)
            .await?;
    Ok((result.last_insert_rowid(), false))
}

/// CLI entry point for `rsearch import <file>`.
pub async fn run_import(config: &Config, path: &Path) -> Result<()> {
    let pages = read_pages(path)?;
    let pool = db::connect(config).await?;
    let stats = import_pages(&pool, &pages).await?;
    pool.close().await;

    info!(created = stats.created, updated = stats.updated, "import finished");
    println!(
        "Imported {} page{} ({} new, {} updated).",
        pages.len(),
        if pages.len() == 1 { "" } else { "s" },
        stats.created,
        stats.updated
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_title() {
        assert_eq!(storage_title("Main Page"), "Main_Page");
        assert_eq!(storage_title("  Padded title "), "Padded_title");
        assert_eq!(storage_title("Already_stored"), "Already_stored");
    }

    #[test]
    fn test_import_record_defaults() {
        let pages: Vec<ImportPage> =
            serde_json::from_str(r#"[{"title": "A"}, {"namespace": 2, "title": "B", "text": "x", "external": true}]"#)
                .unwrap();
        assert_eq!(pages[0].namespace, 0);
        assert!(pages[0].text.is_none());
        assert!(!pages[0].external);
        assert_eq!(pages[1].namespace, 2);
        assert!(pages[1].external);
    }
}
