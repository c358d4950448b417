use chrono::{DateTime, Duration, FixedOffset};
use std::collections::BTreeMap;

use crate::error::{ProcessingError, Result};
use crate::models::wind::normalize;
use crate::models::{Reading, ReadingTable, WindRose};
use crate::utils::constants::WIND_EPSILON;
use crate::utils::time::floor_to;

/// Aggregates readings into fixed-width buckets per station.
///
/// Scalars are averaged arithmetically. Wind is averaged as a vector, so speeds
/// from disagreeing directions cancel out.
pub struct Resampler {
    bucket: Duration,
}

#[derive(Debug, Default, Clone, Copy)]
struct Mean {
    sum: f64,
    count: usize,
}

impl Mean {
    fn push(&mut self, value: Option<f64>) {
        if let Some(v) = value {
            self.sum += v;
            self.count += 1;
        }
    }

    fn value(&self) -> Option<f64> {
        if self.count == 0 {
            None
        } else {
            Some(self.sum / self.count as f64)
        }
    }
}

#[derive(Debug, Default, Clone, Copy)]
struct WindVector {
    x: f64,
    y: f64,
    count: usize,
}

impl WindVector {
    fn push(&mut self, direction: Option<&str>, speed: Option<f64>) {
        let (Some(label), Some(speed)) = (direction, speed) else {
            return;
        };
        let Some(angle) = WindRose::angle(label) else {
            return;
        };

        let magnitude = speed + WIND_EPSILON;
        self.x += magnitude * angle.cos();
        self.y += magnitude * angle.sin();
        self.count += 1;
    }

    /// Mean direction label and vector-mean speed
    fn value(&self) -> (Option<String>, Option<f64>) {
        if self.count == 0 {
            return (None, None);
        }

        let mean_x = self.x / self.count as f64;
        let mean_y = self.y / self.count as f64;
        let angle = normalize(mean_y.atan2(mean_x));
        let speed = (mean_x * mean_x + mean_y * mean_y).sqrt();

        (Some(WindRose::nearest(angle).to_string()), Some(speed))
    }
}

#[derive(Debug, Default)]
struct Bucket {
    wind: WindVector,
    temperature: Mean,
    dew_point: Mean,
    relative_humidity: Mean,
    pressure: Mean,
    precipitation: Mean,
}

impl Bucket {
    fn push(&mut self, reading: &Reading) {
        self.wind
            .push(reading.wind_direction.as_deref(), reading.wind_speed);
        self.temperature.push(reading.temperature);
        self.dew_point.push(reading.dew_point);
        self.relative_humidity.push(reading.relative_humidity);
        self.pressure.push(reading.pressure);
        self.precipitation.push(reading.precipitation);
    }

    fn into_reading(self, timestamp: DateTime<FixedOffset>, station: String) -> Reading {
        let (wind_direction, wind_speed) = self.wind.value();
        Reading {
            timestamp,
            station,
            wind_direction,
            wind_speed,
            temperature: self.temperature.value(),
            dew_point: self.dew_point.value(),
            relative_humidity: self.relative_humidity.value(),
            pressure: self.pressure.value(),
            precipitation: self.precipitation.value(),
        }
    }
}

impl Resampler {
    pub fn new(bucket: Duration) -> Result<Self> {
        if bucket.num_seconds() <= 0 {
            return Err(ProcessingError::Config(format!(
                "Bucket width must be positive, got {} seconds",
                bucket.num_seconds()
            )));
        }
        Ok(Self { bucket })
    }

    pub fn hourly() -> Self {
        Self {
            bucket: Duration::hours(1),
        }
    }

    /// One row per (bucket start, station), sorted by that key
    pub fn resample(&self, table: &ReadingTable) -> ReadingTable {
        let mut buckets: BTreeMap<(DateTime<FixedOffset>, String), Bucket> = BTreeMap::new();

        for reading in table.iter() {
            let start = floor_to(reading.timestamp, self.bucket);
            buckets
                .entry((start, reading.station.clone()))
                .or_default()
                .push(reading);
        }

        buckets
            .into_iter()
            .map(|((start, station), bucket)| bucket.into_reading(start, station))
            .collect()
    }
}

impl Default for Resampler {
    fn default() -> Self {
        Self::hourly()
    }
}
