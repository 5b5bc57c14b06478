//! Club and player link resolution

use crate::cache::LinkCache;
use crate::config::SiteConfig;
use crate::error::{Result, ScrapeError};
use crate::transport::Transport;
use crate::types::{EntityLink, SeasonLinks, UnitLink};
use scrape_cache::CacheStore;
use scraper::{Html, Selector};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info};

/// Club links on the competition overview page
const UNIT_SELECTOR: &str = "a.vereinprofil_tooltip";

/// Only club links pointing at a roster page are kept
const UNIT_MARKER: &str = "startseite";

/// Player links on a club roster page
const ENTITY_SELECTOR: &str = "a.spielprofil_tooltip";

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| ScrapeError::parse(format!("selector {css}"), e.to_string()))
}

fn hrefs(html: &str, css: &str) -> Result<BTreeSet<String>> {
    let document = Html::parse_document(html);
    let selector = selector(css)?;

    Ok(document
        .select(&selector)
        .filter_map(|a| a.value().attr("href"))
        .map(str::to_string)
        .collect())
}

/// Extract the deduplicated, absolute club roster links from a season page
pub fn parse_unit_links(html: &str, site: &SiteConfig) -> Result<BTreeSet<UnitLink>> {
    Ok(hrefs(html, UNIT_SELECTOR)?
        .into_iter()
        .filter(|href| href.contains(UNIT_MARKER))
        .map(|href| site.absolute(&href))
        .collect())
}

/// Extract the deduplicated player profile links from a roster page
pub fn parse_entity_links(html: &str) -> Result<BTreeSet<EntityLink>> {
    hrefs(html, ENTITY_SELECTOR)
}

/// First path segment of a link, ignoring scheme and host.
///
/// `https://www.transfermarkt.co.uk/arsenal-fc/startseite/verein/11` gives
/// `arsenal-fc`; `/harry-kane/profil/spieler/132098` gives `harry-kane`.
pub fn slug(link: &str) -> &str {
    let path = match link.split_once("://") {
        Some((_, rest)) => rest.split_once('/').map(|(_, path)| path).unwrap_or(""),
        None => link,
    };
    path.trim_start_matches('/').split('/').next().unwrap_or("")
}

/// Club name shown in output, taken from the roster link
pub fn unit_name(unit: &str) -> String {
    slug(unit).to_string()
}

/// Resolves the clubs of a season and the players of each club
pub struct LinkResolver<'a, T: Transport + ?Sized> {
    transport: &'a T,
    site: &'a SiteConfig,
}

impl<'a, T: Transport + ?Sized> LinkResolver<'a, T> {
    pub fn new(transport: &'a T, site: &'a SiteConfig) -> Self {
        Self { transport, site }
    }

    /// Fetch the club links for a season
    pub async fn resolve_units(&self, season: i32) -> Result<BTreeSet<UnitLink>> {
        let url = self.site.season_index_url(season);
        let page = self.transport.fetch(&url).await?;
        let units = parse_unit_links(&page.body, self.site)?;

        info!("Found {} clubs for season {}", units.len(), season);
        Ok(units)
    }

    /// Fetch the player links for one club
    pub async fn resolve_entities(&self, unit: &str) -> Result<BTreeSet<EntityLink>> {
        let page = self.transport.fetch(unit).await?;
        let entities = parse_entity_links(&page.body)?;

        debug!("Found {} players for {}", entities.len(), unit);
        Ok(entities)
    }

    /// Resolve a season through the link cache.
    ///
    /// Each half of the season entry is fetched only when missing and is
    /// written back as soon as it is complete. A failure while resolving any
    /// club leaves the roster half uncached.
    pub async fn resolve_season(
        &self,
        season: i32,
        cache: &mut LinkCache,
    ) -> Result<BTreeMap<String, BTreeSet<EntityLink>>> {
        let mut entry = cache.get(&season).unwrap_or_default();

        let units = match entry.units.clone() {
            Some(units) => {
                debug!("Club links for {} loaded from cache", season);
                units
            }
            None => {
                let units = self.resolve_units(season).await?;
                entry.units = Some(units.clone());
                cache.put(season, entry.clone())?;
                units
            }
        };

        if let Some(rosters) = entry.rosters {
            debug!("Player links for {} loaded from cache", season);
            return Ok(rosters);
        }

        let mut rosters = BTreeMap::new();
        for unit in &units {
            let entities = self.resolve_entities(unit).await?;
            rosters.insert(unit_name(unit), entities);
        }

        cache.put(season, SeasonLinks { units: Some(units), rosters: Some(rosters.clone()) })?;
        Ok(rosters)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEASON_PAGE: &str = r#"
        <html><body>
          <table>
            <tr><td><a class="vereinprofil_tooltip" href="/arsenal-fc/startseite/verein/11/saison_id/2020">Arsenal</a></td></tr>
            <tr><td><a class="vereinprofil_tooltip" href="/arsenal-fc/startseite/verein/11/saison_id/2020">Arsenal FC</a></td></tr>
            <tr><td><a class="vereinprofil_tooltip" href="/arsenal-fc/spielplan/verein/11/saison_id/2020">Fixtures</a></td></tr>
            <tr><td><a class="vereinprofil_tooltip" href="/burnley-fc/startseite/verein/1132/saison_id/2020">Burnley</a></td></tr>
            <tr><td><a href="/chelsea-fc/startseite/verein/631/saison_id/2020">Chelsea</a></td></tr>
          </table>
        </body></html>
    "#;

    const ROSTER_PAGE: &str = r#"
        <html><body>
          <a class="spielprofil_tooltip" href="/bernd-leno/profil/spieler/72476">Leno</a>
          <a class="spielprofil_tooltip" href="/bernd-leno/profil/spieler/72476">B. Leno</a>
          <a class="spielprofil_tooltip" href="/kieran-tierney/profil/spieler/284857">Tierney</a>
          <a class="vereinprofil_tooltip" href="/arsenal-fc/startseite/verein/11">Arsenal</a>
        </body></html>
    "#;

    #[test]
    fn test_unit_links_filtered_deduplicated_and_absolute() {
        let site = SiteConfig::default();
        let units = parse_unit_links(SEASON_PAGE, &site).unwrap();

        let expected: BTreeSet<String> = [
            "https://www.transfermarkt.co.uk/arsenal-fc/startseite/verein/11/saison_id/2020",
            "https://www.transfermarkt.co.uk/burnley-fc/startseite/verein/1132/saison_id/2020",
        ]
        .into_iter()
        .map(str::to_string)
        .collect();
        assert_eq!(units, expected);
    }

    #[test]
    fn test_entity_links_deduplicated() {
        let entities = parse_entity_links(ROSTER_PAGE).unwrap();

        assert_eq!(entities.len(), 2);
        assert!(entities.contains("/bernd-leno/profil/spieler/72476"));
        assert!(entities.contains("/kieran-tierney/profil/spieler/284857"));
    }

    #[test]
    fn test_empty_pages_give_empty_sets() {
        let site = SiteConfig::default();
        assert!(parse_unit_links("<html></html>", &site).unwrap().is_empty());
        assert!(parse_entity_links("").unwrap().is_empty());
    }

    #[test]
    fn test_slug() {
        assert_eq!(
            slug("https://www.transfermarkt.co.uk/arsenal-fc/startseite/verein/11/saison_id/2020"),
            "arsenal-fc"
        );
        assert_eq!(slug("/harry-kane/profil/spieler/132098"), "harry-kane");
        assert_eq!(slug("https://www.transfermarkt.co.uk"), "");
        assert_eq!(unit_name("https://www.transfermarkt.co.uk/burnley-fc/startseite/verein/1132"), "burnley-fc");
    }
}
