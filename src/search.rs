//! Application-level entry points for rigorous search.
//!
//! The scan itself lives in `rigorous-search-core::scan` and runs against
//! any [`Corpus`](rigorous_search_core::Corpus). This wrapper handles the
//! config, the database connection, and CLI output.

use anyhow::Result;
use serde::Serialize;

use rigorous_search_core::{sanitize, scan, MatchResult, NamespaceId, ScanStrategy};

use crate::config::Config;
use crate::db;
use crate::sqlite_store::SqliteCorpus;

/// Per-invocation overrides of the `[search]` config.
#[derive(Debug, Clone, Default)]
pub struct SearchOverrides {
    pub namespace: Option<NamespaceId>,
    pub strategy: Option<ScanStrategy>,
    pub concurrency: Option<usize>,
}

/// JSON output shape of `rsearch search --json`.
#[derive(Debug, Clone, Serialize)]
pub struct SearchReport {
    /// The raw pattern as entered.
    pub pattern: String,
    /// The pattern actually searched for; `null` if nothing was left.
    pub sanitized: Option<String>,
    pub namespace: NamespaceId,
    pub count: usize,
    pub titles: Vec<String>,
}

/// Sanitize `raw` and scan the configured database for it.
///
/// An empty sanitized pattern returns an empty result without opening the
/// database. A namespace that cannot be enumerated is an error.
pub async fn search_pages(
    config: &Config,
    raw: &str,
    overrides: &SearchOverrides,
) -> Result<SearchReport> {
    let namespace = overrides.namespace.unwrap_or(config.search.namespace);
    let pattern = sanitize(raw);

    let result = match &pattern {
        None => MatchResult::default(),
        Some(p) => {
            let options = config.scan_options(overrides.strategy, overrides.concurrency);
            let pool = db::connect_read_only(config)?;
            let corpus = SqliteCorpus::new(pool.clone());
            let result = scan(&corpus, namespace, Some(p), &options).await;
            pool.close().await;
            result?
        }
    };

    Ok(SearchReport {
        pattern: raw.to_string(),
        sanitized: pattern.map(|p| p.as_str().to_string()),
        namespace,
        count: result.count(),
        titles: result.titles,
    })
}

/// Summary line for a match count.
pub fn match_count_message(count: usize) -> String {
    match count {
        0 => "no matches - maybe try a different spelling or less characters.".to_string(),
        1 => "1 match:".to_string(),
        n => format!("{} matches:", n),
    }
}

/// CLI entry point — calls [`search_pages`] and prints results to stdout.
pub async fn run_search(
    config: &Config,
    raw: &str,
    overrides: &SearchOverrides,
    json: bool,
) -> Result<()> {
    let report = search_pages(config, raw, overrides).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!(
        "Rigorous search for text like '{}' returned {}",
        report.sanitized.as_deref().unwrap_or(""),
        match_count_message(report.count)
    );
    for title in &report.titles {
        println!("{}", title);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_match_count_message() {
        assert!(match_count_message(0).starts_with("no matches"));
        assert_eq!(match_count_message(1), "1 match:");
        assert_eq!(match_count_message(7), "7 matches:");
    }
}
