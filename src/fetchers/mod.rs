pub mod client;
pub mod directory;
pub mod failover;
pub mod retry;
pub mod station_page;

pub use client::{HttpClient, PageSource};
pub use directory::parse_station_directory;
pub use failover::parse_failover;
pub use retry::RetryPolicy;
pub use station_page::parse_station_page;

use crate::error::{ProcessingError, Result};
use crate::models::{ReadingTable, Station};
use crate::settings::Settings;
use crate::utils::constants::{DIRECTORY_PATH, FAILOVER_PATH, STATION_PAGE_PATH};
use crate::utils::progress::ProgressReporter;
use chrono::FixedOffset;
use scraper::Selector;
use std::time::Duration;
use tracing::{debug, info, warn};

pub(crate) fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css)
        .map_err(|e| ProcessingError::InvalidFormat(format!("bad selector {:?}: {}", css, e)))
}

/// Walks the station directory and collects every station's readings
pub struct StationFetcher<S: PageSource = HttpClient> {
    source: S,
    base_url: String,
    offset: FixedOffset,
    retry: RetryPolicy,
    timeout: Duration,
    directory_timeout: Duration,
    pause: Duration,
    show_progress: bool,
    sleeper: fn(Duration),
}

impl StationFetcher<HttpClient> {
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        Self::with_source(HttpClient::new()?, settings)
    }
}

impl<S: PageSource> StationFetcher<S> {
    pub fn with_source(source: S, settings: &Settings) -> Result<Self> {
        Ok(Self {
            source,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            offset: settings.offset()?,
            retry: settings.retry_policy(),
            timeout: settings.timeout(),
            directory_timeout: settings.directory_timeout(),
            pause: settings.pause(),
            show_progress: settings.show_progress,
            sleeper: std::thread::sleep,
        })
    }

    /// Replace the function used for backoff and pacing sleeps
    pub fn with_sleeper(mut self, sleeper: fn(Duration)) -> Self {
        self.sleeper = sleeper;
        self
    }

    pub fn directory_url(&self) -> String {
        format!("{}{}", self.base_url, DIRECTORY_PATH)
    }

    pub fn station_page_url(&self, station: &Station) -> String {
        format!("{}{}?x={}", self.base_url, STATION_PAGE_PATH, station.id)
    }

    pub fn failover_url(&self, station: &Station) -> String {
        format!("{}{}?x={}", self.base_url, FAILOVER_PATH, station.id)
    }

    /// Station list. Failure here aborts the run.
    pub fn fetch_directory(&self) -> Result<Vec<Station>> {
        let url = self.directory_url();
        let body = self.source.fetch(&url, self.directory_timeout)?;
        let stations = parse_station_directory(&body, &url)?;

        if stations.is_empty() {
            return Err(ProcessingError::MissingData(format!(
                "no stations listed at {}",
                url
            )));
        }
        info!(count = stations.len(), "station directory loaded");
        Ok(stations)
    }

    /// Readings of one station from the primary source, falling back to the graph feed.
    ///
    /// `None` when both sources fail.
    pub fn fetch_station(&self, station: &Station) -> Option<ReadingTable> {
        let url = self.station_page_url(station);
        let primary = self.retry.run(
            |attempt| {
                debug!(station = %station.name, attempt, "fetching station page");
                let body = self.source.fetch(&url, self.timeout)?;
                parse_station_page(&body, &self.offset)
            },
            self.sleeper,
        );

        let error = match primary {
            Ok(readings) => return Some(readings),
            Err(e) => e,
        };
        warn!(station = %station.name, error = %error, "station page failed, trying failover");

        match self.fetch_failover(station) {
            Ok(readings) => {
                info!(station = %station.name, rows = readings.len(), "recovered from failover");
                Some(readings)
            }
            Err(e) => {
                warn!(station = %station.name, error = %e, "failover failed, skipping station");
                None
            }
        }
    }

    fn fetch_failover(&self, station: &Station) -> Result<ReadingTable> {
        let body = self.source.fetch(&self.failover_url(station), self.timeout)?;
        parse_failover(&body, &station.name, &self.offset)
    }

    /// Readings of every listed station, merged into one table
    pub fn fetch_all(&self) -> Result<ReadingTable> {
        let stations = self.fetch_directory()?;
        let progress = ProgressReporter::new(
            stations.len() as u64,
            "Fetching stations",
            !self.show_progress,
        );
        let mut readings = ReadingTable::new();
        let mut skipped = 0usize;

        for station in &stations {
            progress.set_message(&station.name);
            match self.fetch_station(station) {
                Some(table) => {
                    debug!(station = %station.name, rows = table.len(), "station fetched");
                    readings.merge_from(&table);
                    (self.sleeper)(self.pause);
                }
                None => skipped += 1,
            }
            progress.increment(1);
        }

        progress.finish_with_message("stations fetched");
        info!(
            stations = stations.len(),
            skipped,
            rows = readings.len(),
            "fetch complete"
        );
        Ok(readings)
    }
}
