use anyhow::Result;
use clap::Parser;
use fdsnscraper::{config::Config, run};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

/// Catalog the network codes in an event archive and look up their FDSN DOIs.
#[derive(Parser)]
#[command(name = "fdsnscraper", version)]
struct Cli {
    /// YAML config; flags below override it.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Event archive root (`<root>/<YYYY...>/Data/*.MSEED`).
    #[arg(short, long)]
    root: Option<PathBuf>,

    /// Read `code<TAB>year` pairs from this file instead of scanning.
    #[arg(short, long)]
    pairs: Option<PathBuf>,

    /// Where the scanned `Name\tYear` summary goes.
    #[arg(long)]
    summary: Option<PathBuf>,

    /// Fixed-width DOI table to append to.
    #[arg(short, long)]
    output: Option<PathBuf>,
}

impl Cli {
    fn into_config(self) -> Result<Config> {
        let mut cfg = match &self.config {
            Some(path) => Config::from_yaml_file(path)?,
            None => Config::default(),
        };
        if let Some(root) = self.root {
            cfg.archive_root = root;
        }
        if let Some(pairs) = self.pairs {
            cfg.pairs_path = Some(pairs);
            cfg.scan_archive = false;
        }
        if let Some(summary) = self.summary {
            cfg.summary_path = summary;
        }
        if let Some(output) = self.output {
            cfg.output_path = output;
        }
        Ok(cfg)
    }
}

fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_span_events(fmt::format::FmtSpan::CLOSE)
        .init();
    info!("startup");

    // ─── 2) configure ────────────────────────────────────────────────
    let cfg = Cli::parse().into_config()?;
    info!(
        root = %cfg.archive_root.display(),
        scan = cfg.scan_archive,
        output = %cfg.output_path.display(),
        "configured"
    );

    // ─── 3) scan + enrich ────────────────────────────────────────────
    let summary = run(&cfg)?;
    info!(
        looked_up = summary.looked_up,
        written = summary.written,
        "all done"
    );
    Ok(())
}
