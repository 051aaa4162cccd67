//! Scanner behavior against the SQLite corpus.
//!
//! Builds throwaway databases with the import pipeline, then checks that
//! both scan strategies and every concurrency level return identical,
//! catalog-ordered results, including around dangling references.

use rigorous_search::config::{parse_config, Config};
use rigorous_search::db;
use rigorous_search::import::{import_pages, ImportPage};
use rigorous_search::migrate;
use rigorous_search::sqlite_store::SqliteCorpus;
use rigorous_search::stats::namespace_stats;
use rigorous_search::store::memory::InMemoryCorpus;
use rigorous_search::store::Corpus;
use rigorous_search_core::{search, MatchResult, ScanError, ScanOptions, ScanStrategy};
use sqlx::SqlitePool;
use tempfile::TempDir;

fn test_config(tmp: &TempDir) -> Config {
    parse_config(&format!(
        "[db]\npath = \"{}/wiki.sqlite\"\n",
        tmp.path().display()
    ))
    .unwrap()
}

fn page(namespace: i64, title: &str, text: Option<&str>) -> ImportPage {
    ImportPage {
        namespace,
        title: title.to_string(),
        text: text.map(str::to_string),
        external: false,
    }
}

async fn setup(pages: &[ImportPage]) -> (TempDir, SqlitePool) {
    let tmp = TempDir::new().unwrap();
    let cfg = test_config(&tmp);
    let pool = db::connect(&cfg).await.unwrap();
    migrate::migrate_pool(&pool).await.unwrap();
    import_pages(&pool, pages).await.unwrap();
    (tmp, pool)
}

fn option_grid() -> Vec<ScanOptions> {
    let mut grid = Vec::new();
    for strategy in [ScanStrategy::PerDocument, ScanStrategy::Joined] {
        for concurrency in [1, 3, 16] {
            grid.push(ScanOptions {
                strategy,
                concurrency,
                ..ScanOptions::default()
            });
        }
    }
    grid
}

async fn run_all(corpus: &dyn Corpus, namespace: i64, raw: &str) -> MatchResult {
    let mut results = Vec::new();
    for opts in option_grid() {
        results.push(search(corpus, namespace, raw, &opts).await.unwrap());
    }
    let first = results[0].clone();
    for r in &results {
        assert_eq!(r, &first, "scan options disagree for {:?}", raw);
    }
    first
}

#[tokio::test]
async fn test_scan_finds_raw_source() {
    let (_tmp, pool) = setup(&[
        page(0, "Alpha", Some("A link to [http://rust-lang.org Rust].")),
        page(0, "Beta", Some("<ref name=\"x\">cite</ref>")),
        page(0, "Gamma", Some("Plain prose about Rust.")),
    ])
    .await;
    let corpus = SqliteCorpus::new(pool);

    let result = run_all(&corpus, 0, "<ref name=").await;
    assert_eq!(result.titles, vec!["Beta"]);

    let result = run_all(&corpus, 0, "RUST").await;
    assert_eq!(result.titles, vec!["Alpha", "Gamma"]);
    assert_eq!(result.count(), 2);
}

#[tokio::test]
async fn test_gaps_are_skipped() {
    let (_tmp, pool) = setup(&[
        page(0, "Textless", None),
        page(0, "Good", Some("needle")),
        page(0, "Also good", Some("NEEDLE")),
    ])
    .await;

    // A page whose current revision does not exist at all.
    sqlx::query("INSERT INTO page (page_namespace, page_title, page_latest) VALUES (0, 'Dangling', 9999)")
        .execute(&pool)
        .await
        .unwrap();

    let corpus = SqliteCorpus::new(pool);
    let result = run_all(&corpus, 0, "needle").await;
    assert_eq!(result.titles, vec!["Good", "Also good"]);
}

#[tokio::test]
async fn test_external_text_is_absent() {
    let mut archived = page(0, "Archived", Some("needle"));
    archived.external = true;
    let (_tmp, pool) = setup(&[archived, page(0, "Local", Some("needle"))]).await;

    let corpus = SqliteCorpus::new(pool);
    assert_eq!(run_all(&corpus, 0, "needle").await.titles, vec!["Local"]);
}

#[tokio::test]
async fn test_namespace_scope_and_display_titles() {
    let (_tmp, pool) = setup(&[
        page(0, "Main_Page", Some("needle")),
        page(2, "Ada Lovelace", Some("needle")),
        page(100, "Science", Some("needle")),
    ])
    .await;
    let corpus = SqliteCorpus::new(pool);

    assert_eq!(run_all(&corpus, 0, "needle").await.titles, vec!["Main Page"]);
    assert_eq!(
        run_all(&corpus, 2, "needle").await.titles,
        vec!["User:Ada Lovelace"]
    );

    let opts = ScanOptions {
        namespaces: rigorous_search_core::Namespaces::default().with_name(100, "Portal"),
        ..ScanOptions::default()
    };
    let result = search(&corpus, 100, "needle", &opts).await.unwrap();
    assert_eq!(result.titles, vec!["Portal:Science"]);
}

#[tokio::test]
async fn test_only_current_revision_is_scanned() {
    let (_tmp, pool) = setup(&[page(0, "Page", Some("old needle"))]).await;
    import_pages(&pool, &[page(0, "Page", Some("fresh text"))])
        .await
        .unwrap();

    let corpus = SqliteCorpus::new(pool);
    assert!(run_all(&corpus, 0, "needle").await.is_empty());
    assert_eq!(run_all(&corpus, 0, "fresh").await.titles, vec!["Page"]);
}

#[tokio::test]
async fn test_growth_adds_exactly_one() {
    let (_tmp, pool) = setup(&[
        page(0, "A", Some("needle")),
        page(0, "B", Some("hay")),
    ])
    .await;
    let corpus = SqliteCorpus::new(pool.clone());
    let before = run_all(&corpus, 0, "needle").await.count();

    import_pages(&pool, &[page(0, "C", Some("more NeEdLe"))])
        .await
        .unwrap();
    let after = run_all(&corpus, 0, "needle").await.count();
    assert_eq!(after, before + 1);
}

#[tokio::test]
async fn test_sqlite_and_memory_agree() {
    let texts = [
        ("One", Some("{{Cite web|url=http://a.example}}")),
        ("Two", None),
        ("Three", Some("[[Category:Stubs]]")),
        ("Four", Some("cite WEB twice: cite web")),
        ("Five", Some("nothing")),
    ];
    let pages: Vec<ImportPage> = texts.iter().map(|(t, x)| page(0, t, *x)).collect();
    let (_tmp, pool) = setup(&pages).await;
    let sqlite = SqliteCorpus::new(pool);

    let memory = InMemoryCorpus::new();
    for (title, text) in texts {
        match text {
            Some(text) => {
                memory.add_page(0, title, text);
            }
            None => {
                memory.add_textless_page(0, title);
            }
        }
    }

    for raw in ["cite web", "{{cite", "category", "stubs]]", "zzz", "---"] {
        assert_eq!(
            run_all(&sqlite, 0, raw).await,
            run_all(&memory, 0, raw).await,
            "backends disagree for {:?}",
            raw
        );
    }
}

#[tokio::test]
async fn test_missing_schema_is_corpus_unavailable() {
    let tmp = TempDir::new().unwrap();
    let pool = db::connect(&test_config(&tmp)).await.unwrap();
    let corpus = SqliteCorpus::new(pool);

    for opts in option_grid() {
        let err = search(&corpus, 0, "needle", &opts).await.unwrap_err();
        assert!(matches!(err, ScanError::CorpusUnavailable { namespace: 0, .. }));
    }

    // Empty patterns never reach the database.
    let result = search(&corpus, 0, "::--", &ScanOptions::default())
        .await
        .unwrap();
    assert!(result.is_empty());
}

#[tokio::test]
async fn test_read_only_search_of_missing_database() {
    let tmp = TempDir::new().unwrap();
    let cfg = test_config(&tmp);
    let pool = db::connect_read_only(&cfg).unwrap();
    let corpus = SqliteCorpus::new(pool.clone());

    let err = search(&corpus, 0, "needle", &ScanOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, ScanError::CorpusUnavailable { namespace: 0, .. }));
    pool.close().await;

    assert!(!cfg.db.path.exists());
}

#[tokio::test]
async fn test_namespace_stats_counts_gaps() {
    let mut archived = page(0, "Archived", Some("httpexamplecom"));
    archived.external = true;
    let (_tmp, pool) = setup(&[
        page(0, "Linked Page", Some("See [http://example.com the example].")),
        page(0, "Plain", Some("Nothing special here.")),
        archived,
        page(0, "Lost", None),
        page(10, "Infobox person", Some("{{{name}}}")),
    ])
    .await;

    let stats = namespace_stats(&pool).await.unwrap();
    assert_eq!(stats.len(), 2);

    assert_eq!(stats[0].namespace, 0);
    assert_eq!(stats[0].pages, 4);
    assert_eq!(stats[0].gaps, 2);
    assert!(stats[0].last_edit_ts.is_some());

    assert_eq!(stats[1].namespace, 10);
    assert_eq!(stats[1].pages, 1);
    assert_eq!(stats[1].gaps, 0);

    // Gaps in stats are exactly the pages a scan skips.
    let corpus = SqliteCorpus::new(pool);
    let everything = run_all(&corpus, 0, " ").await;
    assert_eq!(everything.titles, vec!["Linked Page", "Plain"]);
}
