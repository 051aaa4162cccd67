//! # Rigorous Search CLI (`rsearch`)
//!
//! ```bash
//! rsearch --config ./config/rsearch.toml <command>
//! ```
//!
//! | Command | Description |
//! |---------|-------------|
//! | `rsearch init` | Create the SQLite database and run schema migrations |
//! | `rsearch import <file>` | Load pages from a JSON file |
//! | `rsearch search "<pattern>"` | Scan page source for a substring |
//! | `rsearch stats` | Page and gap counts per namespace |
//!
//! Logs go to stderr and are filtered with `RUST_LOG`; results go to stdout.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use rigorous_search::search::SearchOverrides;
use rigorous_search::{config, import, migrate, search, stats};
use rigorous_search_core::{NamespaceId, ScanStrategy};

/// Rigorous Search — exhaustive substring search over raw page source.
#[derive(Parser)]
#[command(
    name = "rsearch",
    about = "Rigorous Search — exhaustive substring search over raw page source",
    version,
    long_about = "Scans the stored source of every page in a namespace for a substring. \
    Finds link URLs, template calls and markup that an indexed search never sees, \
    at the cost of reading every page on every query."
)]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true, default_value = "./config/rsearch.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// Initialize the database schema.
    ///
    /// Creates the SQLite database file and the page, revision and text
    /// tables. Safe to run repeatedly.
    Init,

    /// Import pages from a JSON file.
    ///
    /// The file holds an array of `{namespace?, title, text?, external?}`
    /// objects. Re-importing a title adds a new current revision.
    Import {
        /// Path to the JSON file.
        path: PathBuf,
    },

    /// Scan page source for a substring.
    ///
    /// The pattern is stripped of `" * % \ / ( ) [ ] - _ — . ; :` and
    /// lower-cased before the scan. Matching is case-folded
    /// containment; results are listed in page id order.
    Search {
        /// The raw search pattern.
        pattern: String,

        /// Namespace id to scan (default from config, usually 0).
        #[arg(long)]
        namespace: Option<NamespaceId>,

        /// `per-document` (one lookup per page) or `joined` (one query).
        #[arg(long)]
        strategy: Option<ScanStrategy>,

        /// Maximum per-page lookups in flight.
        #[arg(long)]
        concurrency: Option<usize>,

        /// Print the result as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Show page, revision and text counts per namespace.
    Stats,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rigorous_search=info,rigorous_search_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let cfg = config::load_config(&cli.config)?;

    match cli.command {
        Commands::Init => {
            migrate::run_migrations(&cfg).await?;
            println!("Database initialized successfully.");
        }
        Commands::Import { path } => {
            import::run_import(&cfg, &path).await?;
        }
        Commands::Search {
            pattern,
            namespace,
            strategy,
            concurrency,
            json,
        } => {
            if concurrency == Some(0) {
                anyhow::bail!("--concurrency must be >= 1");
            }
            let overrides = SearchOverrides {
                namespace,
                strategy,
                concurrency,
            };
            search::run_search(&cfg, &pattern, &overrides, json).await?;
        }
        Commands::Stats => {
            stats::run_stats(&cfg).await?;
        }
    }

    Ok(())
}
