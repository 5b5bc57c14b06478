//! Scrape season-aligned market values for a range of seasons

use anyhow::{bail, Context, Result};
use clap::Parser;
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use tracing::info;

use valuation_scraper::export::default_output_name;
use valuation_scraper::logging::initialize_logging;
use valuation_scraper::{Caches, CsvSink, HttpTransport, ScraperConfig, SeasonAggregator};

/// Scrape player attributes and season-start market values
#[derive(Parser)]
#[command(name = "scrape-market-values")]
#[command(about = "Scrape Premier League player market values per season")]
struct Args {
    /// First season (start year)
    #[arg(long, default_value = "2011")]
    from: i32,

    /// Last season (start year), inclusive
    #[arg(long, default_value = "2020")]
    to: i32,

    /// Output CSV file
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory holding the cache files
    #[arg(long)]
    cache_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    if args.from > args.to {
        bail!("--from ({}) must not be after --to ({})", args.from, args.to);
    }

    let mut config = ScraperConfig::load(args.config.as_deref()).context("Failed to load configuration")?;
    if let Some(dir) = args.cache_dir {
        config.cache.dir = dir;
    }

    initialize_logging(&config.logging)?;
    info!("Scraping seasons {} to {}", args.from, args.to);

    let mut caches = Caches::open(&config.cache).context("Failed to open caches")?;
    let transport = HttpTransport::new(&config.site, &config.http).context("Failed to create HTTP client")?;

    let out = args.out.unwrap_or_else(|| PathBuf::from(default_output_name(args.from, args.to)));
    let file = File::create(&out).with_context(|| format!("Failed to create {}", out.display()))?;
    let mut sink = CsvSink::new(BufWriter::new(file))?;

    let mut aggregator = SeasonAggregator::new(&transport, &config.site, &mut caches);
    let reports = aggregator
        .run_years(args.from..=args.to, &mut sink)
        .await
        .context("Scrape run failed")?;

    let rows = sink.rows();
    sink.into_inner()?;

    let skipped: usize = reports.iter().map(|r| r.skipped).sum();
    info!("Wrote {} rows to {} ({} players skipped)", rows, out.display(), skipped);
    Ok(())
}
