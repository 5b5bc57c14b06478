//! Player profile attribute extraction

use crate::error::{Result, ScrapeError};
use crate::links::slug;
use crate::types::AttributeRecord;
use chrono::NaiveDate;
use scraper::{ElementRef, Html, Selector};
use std::collections::BTreeMap;

const DATE_OF_BIRTH_FORMAT: &str = "%b %d, %Y";

/// Shown next to the date of birth on the player's birthday
const BIRTHDAY_SUFFIX: &str = "Happy Birthday";

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| ScrapeError::parse(format!("selector {css}"), e.to_string()))
}

fn cell_text(cell: ElementRef<'_>) -> String {
    cell.text().collect::<String>().split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Read the labelled profile table into a label -> value map.
///
/// Labels lose their trailing colon. A page without the table is a parse
/// error; rows with fewer than two cells are ignored.
pub fn parse_attribute_table(html: &str) -> Result<BTreeMap<String, String>> {
    let document = Html::parse_document(html);
    let table_selector = selector("table.auflistung")?;
    let row_selector = selector("tr")?;
    let header_selector = selector("th")?;
    let data_selector = selector("td")?;

    let table = document
        .select(&table_selector)
        .next()
        .ok_or_else(|| ScrapeError::parse("player profile", "attribute table not found"))?;

    let mut attributes = BTreeMap::new();
    for row in table.select(&row_selector) {
        let cells: Vec<String> = row
            .select(&header_selector)
            .chain(row.select(&data_selector))
            .map(cell_text)
            .collect();

        if let [label, value, ..] = cells.as_slice() {
            let label = label.trim().trim_end_matches(':').trim();
            attributes.insert(label.to_string(), value.trim().to_string());
        }
    }

    Ok(attributes)
}

/// Player name from a profile link slug (`/harry-kane/profil/...` -> `harry kane`)
pub fn player_name(profile_link: &str) -> String {
    slug(profile_link).split('-').collect::<Vec<_>>().join(" ")
}

/// Parse a date of birth in either of the profile's formats
pub fn parse_date_of_birth(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, DATE_OF_BIRTH_FORMAT).ok().or_else(|| {
        let stripped = raw.strip_suffix(BIRTHDAY_SUFFIX)?.trim_end();
        NaiveDate::parse_from_str(stripped, DATE_OF_BIRTH_FORMAT).ok()
    })
}

/// Normalize a height such as `1,88 m` to centimeters (`188`)
pub fn normalize_height(raw: &str) -> Option<String> {
    let ascii: String = raw.chars().filter(char::is_ascii).collect();
    let ascii = ascii.trim();

    // drop the unit marker
    let mut chars = ascii.chars();
    chars.next_back()?;
    let height = chars.as_str().trim().replace(',', "");

    if height.is_empty() {
        None
    } else {
        Some(height)
    }
}

/// Build an attribute record from the raw profile table
pub fn normalize_attributes(profile_link: &str, raw: &BTreeMap<String, String>) -> AttributeRecord {
    AttributeRecord {
        name: player_name(profile_link),
        date_of_birth: raw.get("Date of birth").and_then(|dob| parse_date_of_birth(dob)),
        height_cm: raw.get("Height").and_then(|height| normalize_height(height)),
        foot: raw.get("Foot").cloned(),
        citizenship: raw.get("Citizenship").cloned(),
        position: raw.get("Position").cloned(),
    }
}

/// Extract attributes from a profile page
pub fn extract_attributes(profile_link: &str, html: &str) -> Result<AttributeRecord> {
    let raw = parse_attribute_table(html)?;
    Ok(normalize_attributes(profile_link, &raw))
}
