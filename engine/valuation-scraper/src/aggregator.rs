use crate::align::{age_at_season_start, align_to_season_start};
use crate::attributes::extract_attributes;
use crate::cache::{valuation_key, Caches};
use crate::config::SiteConfig;
use crate::error::Result;
use crate::history::extract_history;
use crate::links::LinkResolver;
use crate::transport::Transport;
use crate::types::{AttributeRecord, Lookup, SeasonReport, SeasonSnapshot, ValuationHistory};
use tracing::{debug, info, warn};

/// Receives finished rows in the order they are produced
pub trait RowSink {
    fn emit(&mut self, row: SeasonSnapshot) -> Result<()>;
}

impl RowSink for Vec<SeasonSnapshot> {
    fn emit(&mut self, row: SeasonSnapshot) -> Result<()> {
        self.push(row);
        Ok(())
    }
}

/// Drives the per-season, per-club, per-player loop.
///
/// Every lookup goes through the caches first and writes a fresh result back
/// before moving on, so an interrupted run resumes where it stopped.
pub struct SeasonAggregator<'a, T: Transport + ?Sized> {
    transport: &'a T,
    site: &'a SiteConfig,
    caches: &'a mut Caches,
}

impl<'a, T: Transport + ?Sized> SeasonAggregator<'a, T> {
    pub fn new(transport: &'a T, site: &'a SiteConfig, caches: &'a mut Caches) -> Self {
        Self { transport, site, caches }
    }

    /// Process several seasons in order, stopping at the first season whose
    /// links cannot be resolved
    pub async fn run_years(
        &mut self,
        years: impl IntoIterator<Item = i32>,
        sink: &mut dyn RowSink,
    ) -> Result<Vec<SeasonReport>> {
        let mut reports = Vec::new();
        for year in years {
            reports.push(self.run_season(year, sink).await?);
        }
        Ok(reports)
    }

    /// Process one season and emit a row per successfully scraped player
    pub async fn run_season(&mut self, year: i32, sink: &mut dyn RowSink) -> Result<SeasonReport> {
        info!("Processing season {}", year);

        let resolver = LinkResolver::new(self.transport, self.site);
        let rosters = resolver.resolve_season(year, self.caches.links.as_mut()).await?;

        let mut report = SeasonReport { year, units: rosters.len(), ..Default::default() };

        for (unit, entities) in &rosters {
            debug!("Processing {} players for {} in {}", entities.len(), unit, year);

            for entity in entities {
                report.entities += 1;

                match self.snapshot(year, unit, entity).await? {
                    Some(row) => {
                        sink.emit(row)?;
                        report.rows += 1;
                    }
                    None => report.skipped += 1,
                }
            }
        }

        info!(
            "Season {} done: {} clubs, {} players, {} rows, {} skipped",
            year, report.units, report.entities, report.rows, report.skipped
        );
        Ok(report)
    }

    /// Build the row for one player, or `None` if the player is skipped this run
    async fn snapshot(&mut self, year: i32, unit: &str, entity: &str) -> Result<Option<SeasonSnapshot>> {
        let attributes = match self.lookup_attributes(entity).await? {
            Lookup::Present(attributes) => attributes,
            Lookup::Absent => return Ok(None),
            Lookup::Failed(reason) => {
                warn!("Skipping {} for {}: {}", entity, year, reason);
                return Ok(None);
            }
        };

        let history = match self.lookup_history(entity, &attributes).await? {
            Lookup::Present(history) => Some(history),
            Lookup::Absent => None,
            Lookup::Failed(reason) => {
                warn!("Skipping {} for {}: {}", entity, year, reason);
                return Ok(None);
            }
        };

        let aligned = align_to_season_start(history.as_ref(), year);
        let age = attributes.date_of_birth.map(|dob| age_at_season_start(dob, year));

        Ok(Some(SeasonSnapshot {
            year,
            unit: unit.to_string(),
            entity: entity.to_string(),
            attributes,
            value: aligned.value,
            value_date: aligned.date,
            age,
        }))
    }

    /// Attributes for a profile link, from cache or the profile page.
    ///
    /// Failures are reported, not cached.
    pub async fn lookup_attributes(&mut self, entity: &str) -> Result<Lookup<AttributeRecord>> {
        let key = entity.to_string();
        if let Some(attributes) = self.caches.attributes.get(&key) {
            debug!("Attributes for {} loaded from cache", entity);
            return Ok(Lookup::Present(attributes));
        }

        let url = self.site.absolute(entity);
        let page = match self.transport.fetch(&url).await {
            Ok(page) => page,
            Err(e) => return Ok(Lookup::Failed(e.to_string())),
        };

        match extract_attributes(entity, &page.body) {
            Ok(attributes) => {
                self.caches.attributes.put(key, attributes.clone())?;
                Ok(Lookup::Present(attributes))
            }
            Err(e) => Ok(Lookup::Failed(e.to_string())),
        }
    }

    /// Value history for a player, from cache or the market value page.
    ///
    /// Both a history and its absence are cached; failures are not.
    pub async fn lookup_history(
        &mut self,
        entity: &str,
        attributes: &AttributeRecord,
    ) -> Result<Lookup<ValuationHistory>> {
        let key = valuation_key(attributes);
        if let Some(cached) = self.caches.valuations.get(&key) {
            debug!("Value history for {} loaded from cache", key);
            return Ok(cached.into());
        }

        let url = self.site.market_value_url(entity);
        let page = match self.transport.fetch(&url).await {
            Ok(page) => page,
            Err(e) => return Ok(Lookup::Failed(e.to_string())),
        };

        match extract_history(&page.body) {
            Ok(history) => {
                self.caches.valuations.put(key, history.clone())?;
                Ok(history.into())
            }
            Err(e) => Ok(Lookup::Failed(e.to_string())),
        }
    }
}
