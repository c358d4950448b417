use chrono::{DateTime, FixedOffset};
use std::collections::BTreeMap;

use crate::models::{Reading, ReadingTable};
use crate::utils::constants::ARCHIVE_FIELDS;

/// One hour bucket of the monthly archive with a value group per station
#[derive(Debug, Clone, PartialEq)]
pub struct ArchiveRow {
    pub timestamp: DateTime<FixedOffset>,
    pub values: BTreeMap<String, Reading>,
}

/// A completed day, pivoted into the wide monthly layout
#[derive(Debug, Clone, PartialEq)]
pub struct ArchiveBlock {
    /// Start of the archived day; selects the monthly file
    pub day: DateTime<FixedOffset>,
    /// Column groups, in key order
    pub stations: Vec<String>,
    pub rows: Vec<ArchiveRow>,
}

impl ArchiveBlock {
    /// Pivot resampled rows: station moves out of the row key into column groups,
    /// and every numeric value is rounded to `decimals` places.
    pub fn from_resampled(
        day: DateTime<FixedOffset>,
        resampled: &ReadingTable,
        decimals: i32,
    ) -> Self {
        let stations: Vec<String> = resampled.stations().into_iter().map(String::from).collect();
        let mut by_bucket: BTreeMap<DateTime<FixedOffset>, BTreeMap<String, Reading>> =
            BTreeMap::new();

        for reading in resampled.iter() {
            by_bucket
                .entry(reading.timestamp)
                .or_default()
                .insert(reading.station.clone(), reading.rounded(decimals));
        }

        let rows = by_bucket
            .into_iter()
            .map(|(timestamp, values)| ArchiveRow { timestamp, values })
            .collect();

        Self {
            day,
            stations,
            rows,
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl ArchiveRow {
    /// Cells of one station group; a station absent from this bucket yields blanks
    pub fn cells_for(&self, station: &str) -> Vec<String> {
        match self.values.get(station) {
            Some(reading) => format_cells(reading),
            None => vec![String::new(); ARCHIVE_FIELDS.len()],
        }
    }
}

fn format_cells(reading: &Reading) -> Vec<String> {
    let mut cells = Vec::with_capacity(ARCHIVE_FIELDS.len());
    cells.push(reading.wind_direction.clone().unwrap_or_default());
    cells.extend(
        reading
            .numeric_values()
            .iter()
            .map(|v| v.map(|x| format!("{:.1}", x)).unwrap_or_default()),
    );
    cells
}
