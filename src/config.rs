//! TOML configuration.
//!
//! ```toml
//! [db]
//! path = "./data/wiki.sqlite"
//!
//! [search]
//! namespace = 0
//! strategy = "per-document"   # or "joined"
//! concurrency = 1
//!
//! [namespaces]
//! 100 = "Portal"
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use rigorous_search_core::{NamespaceId, Namespaces, ScanOptions, ScanStrategy};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub db: DbConfig,
    #[serde(default)]
    pub search: SearchConfig,
    /// Site-specific namespace names, keyed by namespace id.
    #[serde(default)]
    pub namespaces: BTreeMap<String, String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DbConfig {
    pub path: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SearchConfig {
    #[serde(default)]
    pub namespace: NamespaceId,
    #[serde(default)]
    pub strategy: ScanStrategy,
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            namespace: 0,
            strategy: ScanStrategy::default(),
            concurrency: default_concurrency(),
        }
    }
}

fn default_concurrency() -> usize {
    1
}

impl Config {
    /// Canonical namespace names plus the `[namespaces]` overrides.
    ///
    /// Keys are validated by [`load_config`]; an unparsable key is skipped.
    pub fn namespaces(&self) -> Namespaces {
        self.namespaces
            .iter()
            .filter_map(|(id, name)| id.parse::<NamespaceId>().ok().map(|id| (id, name)))
            .fold(Namespaces::canonical(), |ns, (id, name)| {
                ns.with_name(id, name.as_str())
            })
    }

    /// Scan options from `[search]`, with optional CLI overrides.
    pub fn scan_options(
        &self,
        strategy: Option<ScanStrategy>,
        concurrency: Option<usize>,
    ) -> ScanOptions {
        ScanOptions {
            strategy: strategy.unwrap_or(self.search.strategy),
            concurrency: concurrency.unwrap_or(self.search.concurrency),
            namespaces: self.namespaces(),
        }
    }
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    parse_config(&content)
}

pub fn parse_config(content: &str) -> Result<Config> {
    let config: Config = toml::from_str(content).with_context(|| "Failed to parse config file")?;

    if config.search.concurrency == 0 {
        anyhow::bail!("search.concurrency must be >= 1");
    }

    for (id, name) in &config.namespaces {
        let parsed: NamespaceId = id
            .parse()
            .with_context(|| format!("namespaces key '{}' is not an integer id", id))?;
        if parsed == 0 {
            anyhow::bail!("namespace 0 is the main namespace and cannot be renamed");
        }
        if name.trim().is_empty() {
            anyhow::bail!("namespaces.{} must have a non-empty name", id);
        }
    }

    Ok(config)
}
