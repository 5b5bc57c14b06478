//! CSV output of season rows and of the value history cache

use crate::aggregator::RowSink;
use crate::error::Result;
use crate::types::{SeasonSnapshot, ValuationHistory};
use chrono::NaiveDate;
use std::io::Write;

pub const SNAPSHOT_HEADERS: [&str; 12] = [
    "Year",
    "Player Name",
    "Club",
    "Transfer Value",
    "Transfer Date",
    "Age",
    "DOB",
    "Height (cm)",
    "Foot",
    "Citizenship",
    "Position",
    "Player Link",
];

pub const HISTORY_HEADERS: [&str; 3] = ["Player Name Position", "Transfer Value", "Transfer Date"];

pub const HISTORY_OUTPUT_NAME: &str = "player_market_value_history.csv";

const DATE_FORMAT: &str = "%d/%m/%Y";

/// Default season output file for a range of years
pub fn default_output_name(first: i32, last: i32) -> String {
    format!("extracted_transfer_data_{first}_to_{last}.csv")
}

fn format_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format(DATE_FORMAT).to_string()).unwrap_or_default()
}

fn format_opt<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// CSV cells for one season row; absent values become empty cells
pub fn snapshot_record(row: &SeasonSnapshot) -> Vec<String> {
    let attributes = &row.attributes;
    vec![
        row.year.to_string(),
        attributes.name.clone(),
        row.unit.clone(),
        format_opt(row.value),
        format_date(row.value_date),
        format_opt(row.age),
        format_date(attributes.date_of_birth),
        format_opt(attributes.height_cm.as_deref()),
        format_opt(attributes.foot.as_deref()),
        format_opt(attributes.citizenship.as_deref()),
        format_opt(attributes.position.as_deref()),
        row.entity.clone(),
    ]
}

/// Writes season rows as they are produced
pub struct CsvSink<W: Write> {
    writer: csv::Writer<W>,
    rows: usize,
}

impl<W: Write> CsvSink<W> {
    /// Wrap a writer and write the header row
    pub fn new(inner: W) -> Result<Self> {
        let mut writer = csv::Writer::from_writer(inner);
        writer.write_record(SNAPSHOT_HEADERS)?;
        Ok(Self { writer, rows: 0 })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Flush and return the underlying writer
    pub fn into_inner(self) -> Result<W> {
        self.writer.into_inner().map_err(|e| e.into_error().into())
    }
}

impl<W: Write> RowSink for CsvSink<W> {
    fn emit(&mut self, row: SeasonSnapshot) -> Result<()> {
        self.writer.write_record(snapshot_record(&row))?;
        self.writer.flush()?;
        self.rows += 1;
        Ok(())
    }
}

/// Write every cached history observation as one row.
///
/// Keys with an absent or empty history are skipped. Returns the number of
/// observation rows written.
pub fn write_value_history<W: Write>(
    entries: &[(String, Option<ValuationHistory>)],
    writer: W,
) -> Result<usize> {
    let mut writer = csv::Writer::from_writer(writer);
    writer.write_record(HISTORY_HEADERS)?;

    let mut rows = 0;
    for (key, history) in entries {
        let Some(history) = history else { continue };
        for observation in history.iter() {
            writer.write_record([
                key.clone(),
                observation.value.to_string(),
                observation.date.format(DATE_FORMAT).to_string(),
            ])?;
            rows += 1;
        }
    }

    writer.flush()?;
    Ok(rows)
}
