//! Corpus statistics and health overview.
//!
//! Summarizes what a scan will walk: page counts per namespace, and how
//! many of those pages are scan gaps (current revision missing, or text
//! missing or externally stored). Used by `rsearch stats`.

use anyhow::Result;
use sqlx::{Row, SqlitePool};

use rigorous_search_core::{NamespaceId, Namespaces};

use crate::config::Config;
use crate::db;

/// Per-namespace breakdown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamespaceStats {
    pub namespace: NamespaceId,
    pub pages: i64,
    /// Pages whose current revision or its text will not resolve.
    pub gaps: i64,
    pub last_edit_ts: Option<i64>,
}

/// Collect per-namespace stats, ordered by namespace id.
pub async fn namespace_stats(pool: &SqlitePool) -> Result<Vec<NamespaceStats>> {
    let rows = sqlx::query(
        r#"
        SELECT
            p.page_namespace AS namespace,
            COUNT(*) AS pages,
            SUM(CASE
                    WHEN r.rev_id IS NULL OR t.old_id IS NULL
                         OR (',' || t.old_flags || ',') LIKE '%,external,%'
                    THEN 1 ELSE 0
                END) AS gaps,
            MAX(r.rev_timestamp) AS last_edit
        FROM page p
        LEFT JOIN revision r ON r.rev_id = p.page_latest
        LEFT JOIN text t ON t.old_id = r.rev_text_id
        GROUP BY p.page_namespace
        ORDER BY p.page_namespace ASC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(rows
        .iter()
        .map(|row| NamespaceStats {
            namespace: row.get("namespace"),
            pages: row.get("pages"),
            gaps: row.get("gaps"),
            last_edit_ts: row.get("last_edit"),
        })
        .collect())
}

/// Run the stats command: query the database and print a summary.
pub async fn run_stats(config: &Config) -> Result<()> {
    let pool = db::connect_read_only(config)?;

    let total_pages: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM page")
        .fetch_one(&pool)
        .await?;
    let total_revisions: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM revision")
        .fetch_one(&pool)
        .await?;
    let total_texts: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM text")
        .fetch_one(&pool)
        .await?;

    let db_size = std::fs::metadata(&config.db.path)
        .map(|m| m.len())
        .unwrap_or(0);

    println!("Rigorous Search — Corpus Stats");
    println!("==============================");
    println!();
    println!("  Database:    {}", config.db.path.display());
    println!("  Size:        {}", format_bytes(db_size));
    println!();
    println!("  Pages:       {}", total_pages);
    println!("  Revisions:   {}", total_revisions);
    println!("  Texts:       {}", total_texts);

    let by_namespace = namespace_stats(&pool).await?;
    let names: Namespaces = config.namespaces();

    if !by_namespace.is_empty() {
        println!();
        println!("  By namespace:");
        println!(
            "  {:<6} {:<20} {:>8} {:>6}   {}",
            "ID", "NAME", "PAGES", "GAPS", "LAST EDIT"
        );
        println!("  {}", "-".repeat(60));

        for s in &by_namespace {
            let name = match names.name(s.namespace) {
                n if n.is_empty() => "(Main)".to_string(),
                n => n,
            };
            let edit_display = match s.last_edit_ts {
                Some(ts) => format_ts_relative(ts),
                None => "never".to_string(),
            };
            println!(
                "  {:<6} {:<20} {:>8} {:>6}   {}",
                s.namespace, name, s.pages, s.gaps, edit_display
            );
        }
    }

    println!();

    pool.close().await;
    Ok(())
}

/// Format a byte count as a human-readable string.
fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else if bytes < 1024 * 1024 * 1024 {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    } else {
        format!("{:.2} GB", bytes as f64 / (1024.0 * 1024.0 * 1024.0))
    }
}

/// Format a Unix timestamp relative to now ("3 hours ago").
fn format_ts_relative(ts: i64) -> String {
    let delta = chrono::Utc::now().timestamp() - ts;

    if delta < 0 {
        return format_ts_iso(ts);
    }

    match delta {
        0..=59 => "just now".to_string(),
        60..=3599 => plural(delta / 60, "min"),
        3600..=86399 => plural(delta / 3600, "hour"),
        d if d < 86400 * 30 => plural(d / 86400, "day"),
        _ => format_ts_iso(ts),
    }
}

fn plural(n: i64, unit: &str) -> String {
    format!("{} {}{} ago", n, unit, if n == 1 { "" } else { "s" })
}

fn format_ts_iso(ts: i64) -> String {
    chrono::DateTime::from_timestamp(ts, 0)
        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| ts.to_string())
}
