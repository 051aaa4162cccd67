//! SQLite database connection management.
//!
//! Provides a connection pool to the wiki database with WAL mode enabled,
//! so a long scan can read while an import writes. [`connect`] creates the
//! database file and its parent directories if they don't exist; it backs
//! `init` and `import`. [`connect_read_only`] backs `search` and `stats`
//! and never creates anything.
//!
//! # Connection Pool
//!
//! Uses `sqlx::SqlitePool` with up to 5 connections. The per-document scan
//! checks a connection out for each lookup and returns it straight away;
//! no connection is held for the whole scan.

use anyhow::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;

use crate::config::Config;

/// Create a connection pool to the configured SQLite database.
///
/// # Errors
///
/// Returns an error if the database cannot be created or connected to.
pub async fn connect(config: &Config) -> Result<SqlitePool> {
    let db_path = &config.db.path;

    // Ensure parent directory exists
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let options = SqliteConnectOptions::from_str(&format!("sqlite:{}", db_path.display()))?
        .create_if_missing(true)
        .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal);

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    Ok(pool)
}

/// Open the configured database read-only, without creating it.
///
/// The pool is lazy: no connection is opened until the first query, so a
/// missing file surfaces from the first read rather than from here. For a
/// scan that is the namespace enumeration, which reports it as an
/// unavailable corpus.
pub fn connect_read_only(config: &Config) -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(&format!("sqlite:{}", config.db.path.display()))?
        .create_if_missing(false)
        .read_only(true);

    Ok(SqlitePoolOptions::new()
        .max_connections(5)
        .connect_lazy_with(options))
}
