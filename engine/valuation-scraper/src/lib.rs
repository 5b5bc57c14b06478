//! # Valuation Scraper
//!
//! Builds a per-season table of player attributes and market values from
//! transfermarkt. For each season the scraper resolves the competition's
//! clubs and their players, reads each player's profile and market value
//! chart, and picks the value in effect on 1 October of that season.
//!
//! ## Architecture
//!
//! - **Transport**: fetches pages, with retry and exponential backoff over `reqwest`
//! - **LinkResolver**: season -> clubs -> player profile links
//! - **attributes / history**: profile table and market value chart extraction
//! - **align**: season start alignment and age calculation
//! - **SeasonAggregator**: drives a run through the three caches and emits rows
//! - **export**: CSV output
//!
//! All network results go through persistent caches from `scrape-cache`, so
//! a repeated or interrupted run only fetches what it has not seen before.

pub mod aggregator;
pub mod align;
pub mod attributes;
pub mod cache;
pub mod config;
pub mod error;
pub mod export;
pub mod history;
pub mod links;
pub mod literal;
pub mod logging;
pub mod transport;
pub mod types;

pub use aggregator::{RowSink, SeasonAggregator};
pub use cache::Caches;
pub use config::ScraperConfig;
pub use error::{Result, ScrapeError};
pub use export::CsvSink;
pub use links::LinkResolver;
pub use transport::{HttpTransport, Page, Transport};
pub use types::*;
