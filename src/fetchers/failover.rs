use crate::error::{ProcessingError, Result};
use crate::fetchers::station_page::{parse_source_timestamp, starts_with_year};
use crate::models::{Reading, ReadingTable};
use crate::utils::constants::{
    COL_HUMIDITY, COL_PRECIPITATION, COL_PRESSURE, COL_TEMPERATURE, COL_WIND_SPEED,
    FAILOVER_SERIES,
};
use crate::utils::numbers::parse_localized_number;
use crate::utils::time::utc_to_offset;
use chrono::{DateTime, FixedOffset, NaiveDateTime, Utc};
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::debug;

/// Epoch values above this are milliseconds
const MILLIS_THRESHOLD: i64 = 100_000_000_000;

#[derive(Debug, Deserialize)]
struct Series {
    name: String,
    #[serde(default)]
    data: Vec<(Value, Value)>,
}

/// The graph feed is usually a list of named series; some deployments key it by name
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum FailoverDocument {
    Records(Vec<Series>),
    Keyed(BTreeMap<String, Vec<(Value, Value)>>),
}

impl FailoverDocument {
    fn into_series(self) -> Vec<Series> {
        match self {
            FailoverDocument::Records(series) => series,
            FailoverDocument::Keyed(map) => map
                .into_iter()
                .map(|(name, data)| Series { name, data })
                .collect(),
        }
    }
}

/// Rebuild readings from the graph feed of one station.
///
/// Only speed, temperature, humidity, pressure and precipitation are published
/// there. Unknown series are ignored.
pub fn parse_failover(json: &str, station: &str, offset: &FixedOffset) -> Result<ReadingTable> {
    let document: FailoverDocument = serde_json::from_str(json)?;

    let mut rows: BTreeMap<NaiveDateTime, Reading> = BTreeMap::new();
    for series in document.into_series() {
        let Some(column) = column_for(&series.name) else {
            debug!(series = %series.name, "ignoring failover series");
            continue;
        };

        for (raw_ts, raw_value) in &series.data {
            let naive = parse_failover_timestamp(raw_ts)?;
            let reading = rows
                .entry(naive)
                .or_insert_with(|| Reading::empty(utc_to_offset(naive, offset), station));
            set_column(reading, column, parse_value(raw_value));
        }
    }

    Ok(rows.into_values().collect())
}

fn column_for(series: &str) -> Option<&'static str> {
    FAILOVER_SERIES
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(series.trim()))
        .map(|(_, column)| *column)
}

fn set_column(reading: &mut Reading, column: &str, value: Option<f64>) {
    match column {
        COL_WIND_SPEED => reading.wind_speed = value,
        COL_TEMPERATURE => reading.temperature = value,
        COL_HUMIDITY => reading.relative_humidity = value,
        COL_PRESSURE => reading.pressure = value,
        COL_PRECIPITATION => reading.precipitation = value,
        _ => {}
    }
}

fn parse_failover_timestamp(raw: &Value) -> Result<NaiveDateTime> {
    match raw {
        Value::Number(n) => {
            let epoch = n
                .as_i64()
                .or_else(|| n.as_f64().map(|f| f as i64))
                .ok_or_else(|| invalid_timestamp(raw))?;
            let parsed = if epoch.abs() > MILLIS_THRESHOLD {
                DateTime::<Utc>::from_timestamp_millis(epoch)
            } else {
                DateTime::<Utc>::from_timestamp(epoch, 0)
            };
            parsed
                .map(|dt| dt.naive_utc())
                .ok_or_else(|| invalid_timestamp(raw))
        }
        Value::String(s) => parse_source_timestamp(s, starts_with_year(s)),
        _ => Err(invalid_timestamp(raw)),
    }
}

fn parse_value(raw: &Value) -> Option<f64> {
    match raw {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_localized_number(s),
        _ => None,
    }
}

fn invalid_timestamp(raw: &Value) -> ProcessingError {
    ProcessingError::InvalidFormat(format!("unrecognized failover timestamp: {}", raw))
}
