//! Database schema migrations (idempotent).
//!
//! The schema mirrors the three tables a wiki keeps page source in:
//!
//! | Table | Key | Points at |
//! |-------|-----|-----------|
//! | `page` | `page_id` | `page_latest` → `revision.rev_id` |
//! | `revision` | `rev_id` | `rev_text_id` → `text.old_id` |
//! | `text` | `old_id` | raw source in `old_text` |
//!
//! No foreign keys are declared: dangling references are a normal state
//! of a real wiki dump and the scanner treats them as gaps.

use anyhow::Result;
use sqlx::SqlitePool;

use crate::config::Config;
use crate::db;

pub async fn run_migrations(config: &Config) -> Result<()> {
    let pool = db::connect(config).await?;
    migrate_pool(&pool).await?;
    pool.close().await;
    Ok(())
}

/// Create all tables and indexes on an open pool.
pub async fn migrate_pool(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS page (
            page_id INTEGER PRIMARY KEY,
            page_namespace INTEGER NOT NULL DEFAULT 0,
            page_title TEXT NOT NULL,
            page_latest INTEGER NOT NULL,
            UNIQUE(page_namespace, page_title)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS revision (
            rev_id INTEGER PRIMARY KEY,
            rev_page INTEGER NOT NULL,
            rev_text_id INTEGER NOT NULL,
            rev_timestamp INTEGER NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    // old_flags is a comma-separated list; "external" means old_text only
    // holds a locator for content kept elsewhere.
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS text (
            old_id INTEGER PRIMARY KEY,
            old_text BLOB NOT NULL,
            old_flags TEXT NOT NULL DEFAULT ''
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_page_namespace ON page(page_namespace, page_id)",
    )
    .execute(pool)
    .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_revision_page ON revision(rev_page)")
        .execute(pool)
        .await?;

    Ok(())
}
