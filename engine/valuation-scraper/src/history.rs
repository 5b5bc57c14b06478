//! Market value history extraction

use crate::error::{Result, ScrapeError};
use crate::literal;
use crate::types::{Observation, ValuationHistory};
use chrono::NaiveDate;
use scraper::{Html, Selector};
use serde::Deserialize;

/// Start of the chart series array inside the page's scripts
const SERIES_MARKERS: [&str; 2] = ["'series':[", "\"series\":["];

const VALUE_DATE_FORMAT: &str = "%b %d, %Y";

#[derive(Debug, Deserialize)]
struct RawSeries {
    #[serde(default)]
    data: Vec<RawPoint>,
}

/// One chart point. Club, age, display string and marker are ignored.
#[derive(Debug, Deserialize)]
struct RawPoint {
    y: f64,
    datum_mw: String,
}

/// Find the series literal, scanning script blocks from last to first
pub fn find_series_literal(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let scripts = Selector::parse("script").ok()?;

    let texts: Vec<String> = document.select(&scripts).map(|s| s.text().collect()).collect();

    texts.iter().rev().find_map(|text| {
        SERIES_MARKERS
            .iter()
            .find_map(|marker| literal::bracketed_after(text, marker))
            .map(str::to_string)
    })
}

/// Parse the contents of the series array into a sorted history
pub fn parse_series_literal(literal: &str) -> Result<ValuationHistory> {
    let json = literal::to_json(&format!("[{literal}]"))
        .map_err(|reason| ScrapeError::parse("market value series", reason))?;

    let series: Vec<RawSeries> = serde_json::from_str(&json)
        .map_err(|e| ScrapeError::parse("market value series", e.to_string()))?;

    let observations = series
        .into_iter()
        .flat_map(|s| s.data)
        .map(|point| {
            let date = NaiveDate::parse_from_str(point.datum_mw.trim(), VALUE_DATE_FORMAT)
                .map_err(|e| {
                    ScrapeError::parse(format!("market value date '{}'", point.datum_mw), e.to_string())
                })?;
            Ok(Observation::new(point.y.round() as i64, date))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(ValuationHistory::from_unsorted(observations))
}

/// Extract the market value history from a market value page.
///
/// `Ok(None)` means the page carries no chart data at all, which is normal
/// for some players. A chart literal that cannot be parsed is an error.
pub fn extract_history(html: &str) -> Result<Option<ValuationHistory>> {
    match find_series_literal(html) {
        Some(literal) => parse_series_literal(&literal).map(Some),
        None => Ok(None),
    }
}
