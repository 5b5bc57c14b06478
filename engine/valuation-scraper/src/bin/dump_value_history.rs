//! Dump the cached market value histories as CSV

use anyhow::{Context, Result};
use clap::Parser;
use scrape_cache::CacheStore;
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use tracing::info;

use valuation_scraper::export::{write_value_history, HISTORY_OUTPUT_NAME};
use valuation_scraper::logging::initialize_logging;
use valuation_scraper::{Caches, ScraperConfig};

/// Write every cached market value observation to a CSV file
#[derive(Parser)]
#[command(name = "dump-value-history")]
#[command(about = "Dump cached player market value histories to CSV")]
struct Args {
    /// Output CSV file
    #[arg(short, long, default_value = HISTORY_OUTPUT_NAME)]
    out: PathBuf,

    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory holding the cache files
    #[arg(long)]
    cache_dir: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = ScraperConfig::load(args.config.as_deref()).context("Failed to load configuration")?;
    if let Some(dir) = args.cache_dir {
        config.cache.dir = dir;
    }

    initialize_logging(&config.logging)?;

    let caches = Caches::open(&config.cache).context("Failed to open caches")?;
    let entries = caches.valuations.entries();

    let file = File::create(&args.out).with_context(|| format!("Failed to create {}", args.out.display()))?;
    let rows = write_value_history(&entries, BufWriter::new(file))?;

    info!("Wrote {} observations for {} players to {}", rows, entries.len(), args.out.display());
    Ok(())
}
