use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::error::{ProcessingError, Result};
use crate::utils::numbers::round_to;

/// Unique key of a reading: the instant it was taken and the station that took it
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ReadingKey {
    pub timestamp: DateTime<FixedOffset>,
    pub station: String,
}

impl ReadingKey {
    pub fn new(timestamp: DateTime<FixedOffset>, station: impl Into<String>) -> Self {
        Self {
            timestamp,
            station: station.into(),
        }
    }

    /// Smallest key at `timestamp`, used as a range bound
    pub fn lower_bound(timestamp: DateTime<FixedOffset>) -> Self {
        Self {
            timestamp,
            station: String::new(),
        }
    }
}

/// One row of station data. Column names follow the snapshot file layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    #[serde(rename = "fecha", with = "timestamp_format")]
    pub timestamp: DateTime<FixedOffset>,

    #[serde(rename = "estacion")]
    pub station: String,

    /// Compass label as published by the station ("NNE", "C", "VRB", ...)
    #[serde(rename = "viento_direccion")]
    pub wind_direction: Option<String>,

    /// Knots
    #[serde(rename = "viento_velocidad")]
    pub wind_speed: Option<f64>,

    /// Degrees Celsius
    #[serde(rename = "temperatura")]
    pub temperature: Option<f64>,

    /// Degrees Celsius
    #[serde(rename = "temperatura_de_rocio")]
    pub dew_point: Option<f64>,

    /// Percent
    #[serde(rename = "humedad_relativa")]
    pub relative_humidity: Option<f64>,

    /// Millibar
    #[serde(rename = "presion_atmosferica")]
    pub pressure: Option<f64>,

    /// mm/hour
    #[serde(rename = "precipitacion")]
    pub precipitation: Option<f64>,
}

impl Reading {
    /// A reading with every measurement missing
    pub fn empty(timestamp: DateTime<FixedOffset>, station: impl Into<String>) -> Self {
        Self {
            timestamp,
            station: station.into(),
            wind_direction: None,
            wind_speed: None,
            temperature: None,
            dew_point: None,
            relative_humidity: None,
            pressure: None,
            precipitation: None,
        }
    }

    pub fn builder() -> ReadingBuilder {
        ReadingBuilder::new()
    }

    pub fn key(&self) -> ReadingKey {
        ReadingKey::new(self.timestamp, self.station.clone())
    }

    /// Scalar measurements in column order (everything after wind direction)
    pub fn numeric_values(&self) -> [Option<f64>; 6] {
        [
            self.wind_speed,
            self.temperature,
            self.dew_point,
            self.relative_humidity,
            self.pressure,
            self.precipitation,
        ]
    }

    /// Copy with every numeric field rounded to `decimals` places
    pub fn rounded(&self, decimals: i32) -> Self {
        let round = |v: Option<f64>| v.map(|x| round_to(x, decimals));
        Self {
            timestamp: self.timestamp,
            station: self.station.clone(),
            wind_direction: self.wind_direction.clone(),
            wind_speed: round(self.wind_speed),
            temperature: round(self.temperature),
            dew_point: round(self.dew_point),
            relative_humidity: round(self.relative_humidity),
            pressure: round(self.pressure),
            precipitation: round(self.precipitation),
        }
    }
}

#[derive(Default)]
pub struct ReadingBuilder {
    timestamp: Option<DateTime<FixedOffset>>,
    station: Option<String>,
    wind_direction: Option<String>,
    wind_speed: Option<f64>,
    temperature: Option<f64>,
    dew_point: Option<f64>,
    relative_humidity: Option<f64>,
    pressure: Option<f64>,
    precipitation: Option<f64>,
}

impl ReadingBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn timestamp(mut self, timestamp: DateTime<FixedOffset>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    pub fn station(mut self, station: impl Into<String>) -> Self {
        self.station = Some(station.into());
        self
    }

    pub fn wind(mut self, direction: &str, speed: f64) -> Self {
        self.wind_direction = Some(direction.to_string());
        self.wind_speed = Some(speed);
        self
    }

    pub fn wind_direction(mut self, direction: Option<String>) -> Self {
        self.wind_direction = direction;
        self
    }

    pub fn wind_speed(mut self, speed: Option<f64>) -> Self {
        self.wind_speed = speed;
        self
    }

    pub fn temperature(mut self, temperature: Option<f64>) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn dew_point(mut self, dew_point: Option<f64>) -> Self {
        self.dew_point = dew_point;
        self
    }

    pub fn relative_humidity(mut self, humidity: Option<f64>) -> Self {
        self.relative_humidity = humidity;
        self
    }

    pub fn pressure(mut self, pressure: Option<f64>) -> Self {
        self.pressure = pressure;
        self
    }

    pub fn precipitation(mut self, precipitation: Option<f64>) -> Self {
        self.precipitation = precipitation;
        self
    }

    pub fn build(self) -> Result<Reading> {
        let station = self
            .station
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| ProcessingError::MissingData("station".to_string()))?;

        Ok(Reading {
            timestamp: self
                .timestamp
                .ok_or_else(|| ProcessingError::MissingData("timestamp".to_string()))?,
            station,
            wind_direction: self.wind_direction,
            wind_speed: self.wind_speed,
            temperature: self.temperature,
            dew_point: self.dew_point,
            relative_humidity: self.relative_humidity,
            pressure: self.pressure,
            precipitation: self.precipitation,
        })
    }
}

/// Serde adapter for `YYYY-MM-DD HH:MM:SS±HH:MM` timestamps
pub mod timestamp_format {
    use chrono::{DateTime, FixedOffset};
    use serde::{self, Deserialize, Deserializer, Serializer};

    use crate::utils::constants::TIMESTAMP_FORMAT;

    pub fn serialize<S>(ts: &DateTime<FixedOffset>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&ts.format(TIMESTAMP_FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<FixedOffset>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).map_err(serde::de::Error::custom)
    }

    /// Accepts the file layout as well as RFC 3339
    pub fn parse(raw: &str) -> Result<DateTime<FixedOffset>, chrono::ParseError> {
        let trimmed = raw.trim();
        DateTime::parse_from_str(trimmed, TIMESTAMP_FORMAT)
            .or_else(|_| DateTime::parse_from_rfc3339(trimmed))
    }
}
