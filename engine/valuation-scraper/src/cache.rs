//! The three scraper caches

use crate::config::CacheConfig;
use crate::error::Result;
use crate::types::{AttributeRecord, EntityLink, SeasonLinks, ValuationHistory};
use scrape_cache::{CacheStore, FileCache, MemoryCache};
use tracing::info;

/// Season year -> club and player links
pub type LinkCache = dyn CacheStore<i32, SeasonLinks> + Send;

/// Profile link -> attributes
pub type AttributeCache = dyn CacheStore<EntityLink, AttributeRecord> + Send;

/// "name position" -> history, `None` when the page had no chart data
pub type ValuationCache = dyn CacheStore<String, Option<ValuationHistory>> + Send;

/// Independent caches injected into the aggregator
pub struct Caches {
    pub links: Box<LinkCache>,
    pub attributes: Box<AttributeCache>,
    pub valuations: Box<ValuationCache>,
}

impl Caches {
    /// Open (or create) the cache files under the configured directory
    pub fn open(config: &CacheConfig) -> Result<Self> {
        let links: FileCache<i32, SeasonLinks> = FileCache::open(config.links_path())?;
        let attributes: FileCache<EntityLink, AttributeRecord> =
            FileCache::open(config.attributes_path())?;
        let valuations: FileCache<String, Option<ValuationHistory>> =
            FileCache::open(config.valuations_path())?;

        info!(
            "Opened caches in {:?}: {} seasons, {} players, {} value histories",
            config.dir,
            links.len(),
            attributes.len(),
            valuations.len()
        );

        Ok(Self {
            links: Box::new(links),
            attributes: Box::new(attributes),
            valuations: Box::new(valuations),
        })
    }

    /// Caches that are discarded at the end of the process
    pub fn in_memory() -> Self {
        Self {
            links: Box::new(MemoryCache::<i32, SeasonLinks>::new()),
            attributes: Box::new(MemoryCache::<EntityLink, AttributeRecord>::new()),
            valuations: Box::new(MemoryCache::<String, Option<ValuationHistory>>::new()),
        }
    }
}

/// Valuation cache key for a player.
///
/// Name and position are used instead of the profile link so that link format
/// changes do not orphan entries. Two same-named players in the same position
/// share a key.
pub fn valuation_key(attributes: &AttributeRecord) -> String {
    format!("{} {}", attributes.name, attributes.position.as_deref().unwrap_or("None"))
}
