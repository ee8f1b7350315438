// src/enrich.rs

use anyhow::{Context, Result};
use tracing::{info, instrument};

use crate::{
    archive::{self, NetworkYear},
    registry::{Fetch, HttpFetcher, Lookup, Registry},
    table::{DoiTable, OutputRow},
    Config,
};

/// Counters for one enrichment run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct EnrichSummary {
    pub looked_up: usize,
    pub unmatched: usize,
    pub written: usize,
    pub duplicates: usize,
}

/// Look every pair up in the registry, one at a time, and append rows that
/// the DOI table does not already hold.
#[instrument(level = "info", skip_all, fields(pairs = pairs.len()))]
pub fn enrich<F: Fetch>(fetcher: F, config: &Config, pairs: &[NetworkYear]) -> Result<EnrichSummary> {
    let registry = Registry::new(fetcher, config)?;
    let mut table = DoiTable::open(&config.output_path)?;
    let mut summary = EnrichSummary::default();

    for (i, pair) in pairs.iter().enumerate() {
        info!("[{}/{}] {}", i + 1, pairs.len(), pair);
        let lookup = registry
            .lookup(pair)
            .with_context(|| format!("looking up {}", pair))?;
        summary.looked_up += 1;

        let row = match lookup {
            Lookup::Matched(entry) => OutputRow::matched(&pair.code, entry),
            Lookup::Unmatched { code } => {
                summary.unmatched += 1;
                OutputRow::unmatched(&code)
            }
        };

        if table.append(&row)? {
            summary.written += 1;
        } else {
            summary.duplicates += 1;
        }
    }

    info!(
        written = summary.written,
        duplicates = summary.duplicates,
        unmatched = summary.unmatched,
        "network information written to {}",
        table.path().display()
    );
    Ok(summary)
}

/// Scan the archive (or load the precomputed pairs), write the summary, then
/// enrich against the live registry.
pub fn run(config: &Config) -> Result<EnrichSummary> {
    config.validate()?;
    let pairs = collect_pairs(config)?;
    enrich(HttpFetcher::new(), config, &pairs)
}

/// Pairs to enrich: a fresh scan written to the summary file, or the
/// configured pairs file.
pub fn collect_pairs(config: &Config) -> Result<Vec<NetworkYear>> {
    match (&config.pairs_path, config.scan_archive) {
        (_, true) => {
            let pairs = archive::scan(&config.archive_root, &config.archive_extension)
                .with_context(|| format!("scanning {}", config.archive_root.display()))?;
            archive::write_summary(&config.summary_path, &pairs)?;
            Ok(pairs)
        }
        (Some(path), false) => Ok(archive::read_summary(path)?),
        (None, false) => Err(crate::config::ConfigError::MissingPairs.into()),
    }
}
