use crate::error::{ProcessingError, Result};
use crate::fetchers::directory::cell_text;
use crate::fetchers::selector;
use crate::models::{Reading, ReadingTable};
use crate::utils::constants::READING_COLUMNS;
use crate::utils::numbers::{parse_label, parse_localized_number};
use crate::utils::time::utc_to_offset;
use chrono::{FixedOffset, NaiveDateTime};
use scraper::Html;
use tracing::debug;

const YEAR_FIRST_FORMATS: [&str; 5] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
];

const DAY_FIRST_FORMATS: [&str; 5] = [
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
    "%d-%m-%Y %H:%M:%S",
    "%d-%m-%Y %H:%M",
    "%d/%m/%y %H:%M",
];

/// Parse the readings table of a station page.
///
/// Rows are taken from the first table on the page in snapshot column order.
/// Timestamps are published in UTC and are converted to `offset`.
pub fn parse_station_page(html: &str, offset: &FixedOffset) -> Result<ReadingTable> {
    let document = Html::parse_document(html);
    let table_selector = selector("table")?;
    let row_selector = selector("tr")?;
    let cell_selector = selector("td")?;

    let table = document
        .select(&table_selector)
        .next()
        .ok_or_else(|| ProcessingError::InvalidFormat("station page has no table".to_string()))?;

    let rows: Vec<Vec<String>> = table
        .select(&row_selector)
        .map(|row| row.select(&cell_selector).map(cell_text).collect::<Vec<_>>())
        .filter(|cells| !cells.is_empty())
        .collect();

    if let Some(short) = rows.iter().find(|cells| cells.len() < READING_COLUMNS.len()) {
        return Err(ProcessingError::InvalidFormat(format!(
            "expected {} columns, found {}",
            READING_COLUMNS.len(),
            short.len()
        )));
    }

    let year_first = rows.iter().any(|cells| starts_with_year(&cells[0]));

    let mut readings = ReadingTable::new();
    for cells in &rows {
        let naive = parse_source_timestamp(&cells[0], year_first)?;
        let Some(station) = parse_label(&cells[1]) else {
            debug!(timestamp = %cells[0], "row without station name");
            continue;
        };

        let reading = Reading::builder()
            .timestamp(utc_to_offset(naive, offset))
            .station(station)
            .wind_direction(parse_label(&cells[2]))
            .wind_speed(parse_localized_number(&cells[3]))
            .temperature(parse_localized_number(&cells[4]))
            .dew_point(parse_localized_number(&cells[5]))
            .relative_humidity(parse_localized_number(&cells[6]))
            .pressure(parse_localized_number(&cells[7]))
            .precipitation(parse_localized_number(&cells[8]))
            .build()?;
        readings.insert(reading);
    }

    Ok(readings)
}

/// True when the value opens with a four digit year
pub fn starts_with_year(raw: &str) -> bool {
    let trimmed = raw.trim();
    trimmed.len() >= 4 && trimmed.bytes().take(4).all(|b| b.is_ascii_digit())
}

/// Parse an upstream date, trying year-first or day-first layouts
pub fn parse_source_timestamp(raw: &str, year_first: bool) -> Result<NaiveDateTime> {
    let trimmed = raw.trim();
    let formats: &[&str] = if year_first {
        &YEAR_FIRST_FORMATS
    } else {
        &DAY_FIRST_FORMATS
    };

    formats
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(trimmed, format).ok())
        .ok_or_else(|| ProcessingError::InvalidFormat(format!("unrecognized date: {:?}", trimmed)))
}
