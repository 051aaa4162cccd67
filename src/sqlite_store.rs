//! SQLite-backed [`Corpus`] implementation.
//!
//! Maps each [`Corpus`] operation onto the `page` / `revision` / `text`
//! schema created by [`migrate`](crate::migrate). Containment is never
//! pushed down as `LIKE`: SQLite only folds ASCII case, so the blob is
//! fetched and tested by the core.

use anyhow::Result;
use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use rigorous_search_core::models::{Document, NamespaceId, Revision, RevisionId, TextBlob, TextId};
use rigorous_search_core::store::{Corpus, ResolvedDocument};

/// SQLite implementation of the [`Corpus`] trait.
///
/// Each lookup runs on whatever pooled connection is free; nothing is
/// held across documents.
pub struct SqliteCorpus {
    pool: SqlitePool,
}

impl SqliteCorpus {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

/// True when `old_flags` marks the row as externally stored.
fn is_external(flags: &str) -> bool {
    flags.split(',').any(|f| f.trim() == "external")
}

fn document_from_row(row: &SqliteRow) -> Document {
    Document {
        id: row.get("page_id"),
        namespace: row.get("page_namespace"),
        title: row.get("page_title"),
        latest_revision: row.get("page_latest"),
    }
}

#[async_trait]
impl Corpus for SqliteCorpus {
    async fn documents(&self, namespace: NamespaceId) -> Result<Vec<Document>> {
        let rows = sqlx::query(
            r#"
            SELECT page_id, page_namespace, page_title, page_latest
            FROM page
            WHERE page_namespace = ?
            ORDER BY page_id ASC
            "#,
        )
        .bind(namespace)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(document_from_row).collect())
    }

    async fn revision(&self, id: RevisionId) -> Result<Option<Revision>> {
        let row = sqlx::query("SELECT rev_id, rev_text_id FROM revision WHERE rev_id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|r| Revision {
            id: r.get("rev_id"),
            text_id: r.get("rev_text_id"),
        }))
    }

    async fn text(&self, id: TextId) -> Result<Option<TextBlob>> {
        let row = sqlx::query("SELECT old_id, old_text, old_flags FROM text WHERE old_id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.and_then(|r| {
            let flags: String = r.get("old_flags");
            if is_external(&flags) {
                return None;
            }
            Some(TextBlob {
                id: r.get("old_id"),
                content: r.get("old_text"),
            })
        }))
    }

    async fn resolved_documents(&self, namespace: NamespaceId) -> Result<Vec<ResolvedDocument>> {
        // Inner joins drop pages whose revision or text row is missing,
        // which is exactly the per-document skip rule.
        let rows = sqlx::query(
            r#"
            SELECT p.page_id, p.page_namespace, p.page_title, p.page_latest,
                   t.old_id, t.old_text, t.old_flags
            FROM page p
            JOIN revision r ON r.rev_id = p.page_latest
            JOIN text t ON t.old_id = r.rev_text_id
            WHERE p.page_namespace = ?
            ORDER BY p.page_id ASC
            "#,
        )
        .bind(namespace)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .iter()
            .filter(|row| !is_external(&row.get::<String, _>("old_flags")))
            .map(|row| ResolvedDocument {
                document: document_from_row(row),
                text: TextBlob {
                    id: row.get("old_id"),
                    content: row.get("old_text"),
                },
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_external_flag_detection() {
        assert!(is_external("external"));
        assert!(is_external("utf-8,gzip,external"));
        assert!(is_external("utf-8, external"));
        assert!(!is_external(""));
        assert!(!is_external("utf-8"));
        assert!(!is_external("externalized"));
    }
}
