use chrono::{DateTime, FixedOffset};
use std::collections::BTreeMap;

use crate::models::{ReadingTable, StationStatus};

/// Keeps the latest-seen timestamp per station, never moving it backwards
#[derive(Debug, Default)]
pub struct StatusTracker;

impl StatusTracker {
    pub fn new() -> Self {
        Self
    }

    /// Fold this run's fetched readings into the persisted status.
    ///
    /// The result is sorted stalest first, ties broken by station name.
    pub fn update(&self, persisted: &[StationStatus], fetched: &ReadingTable) -> Vec<StationStatus> {
        let mut latest: BTreeMap<String, DateTime<FixedOffset>> = persisted
            .iter()
            .map(|s| (s.station.clone(), s.last_update))
            .collect();

        for (station, seen) in fetched.latest_by_station() {
            latest
                .entry(station)
                .and_modify(|ts| {
                    if seen > *ts {
                        *ts = seen;
                    }
                })
                .or_insert(seen);
        }

        let mut status: Vec<StationStatus> = latest
            .into_iter()
            .map(|(station, last_update)| StationStatus::new(station, last_update))
            .collect();

        status.sort_by(|a, b| {
            a.last_update
                .cmp(&b.last_update)
                .then_with(|| a.station.cmp(&b.station))
        });

        status
    }
}
