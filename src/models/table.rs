use chrono::{DateTime, FixedOffset};
use std::collections::btree_map::{self, BTreeMap};
use std::collections::BTreeSet;

use crate::models::{Reading, ReadingKey};

/// Readings keyed and sorted by (timestamp, station).
///
/// Keys are unique: inserting a reading under an existing key replaces the old one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReadingTable {
    rows: BTreeMap<ReadingKey, Reading>,
}

impl ReadingTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a reading, returning the one it replaced
    pub fn insert(&mut self, reading: Reading) -> Option<Reading> {
        self.rows.insert(reading.key(), reading)
    }

    /// Copy every row of `newer` into this table; `newer` wins on key conflicts
    pub fn merge_from(&mut self, newer: &ReadingTable) {
        for reading in newer.iter() {
            self.insert(reading.clone());
        }
    }

    /// Union of two tables where `newer` overrides `older` on shared keys
    pub fn union(older: ReadingTable, newer: &ReadingTable) -> ReadingTable {
        let mut merged = older;
        merged.merge_from(newer);
        merged
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, key: &ReadingKey) -> Option<&Reading> {
        self.rows.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Reading> {
        self.rows.values()
    }

    pub fn first_timestamp(&self) -> Option<DateTime<FixedOffset>> {
        self.rows.keys().next().map(|k| k.timestamp)
    }

    pub fn last_timestamp(&self) -> Option<DateTime<FixedOffset>> {
        self.rows.keys().next_back().map(|k| k.timestamp)
    }

    /// Split into rows before `at` and rows at or after it
    pub fn split_at(mut self, at: DateTime<FixedOffset>) -> (ReadingTable, ReadingTable) {
        let later = self.rows.split_off(&ReadingKey::lower_bound(at));
        (self, ReadingTable { rows: later })
    }

    pub fn stations(&self) -> BTreeSet<&str> {
        self.rows.keys().map(|k| k.station.as_str()).collect()
    }

    /// Latest timestamp seen per station
    pub fn latest_by_station(&self) -> BTreeMap<String, DateTime<FixedOffset>> {
        let mut latest: BTreeMap<String, DateTime<FixedOffset>> = BTreeMap::new();

        for key in self.rows.keys() {
            latest
                .entry(key.station.clone())
                .and_modify(|ts| {
                    if key.timestamp > *ts {
                        *ts = key.timestamp;
                    }
                })
                .or_insert(key.timestamp);
        }

        latest
    }

    pub fn into_readings(self) -> Vec<Reading> {
        self.rows.into_values().collect()
    }
}

impl FromIterator<Reading> for ReadingTable {
    fn from_iter<I: IntoIterator<Item = Reading>>(iter: I) -> Self {
        let mut table = ReadingTable::new();
        table.extend(iter);
        table
    }
}

impl Extend<Reading> for ReadingTable {
    fn extend<I: IntoIterator<Item = Reading>>(&mut self, iter: I) {
        for reading in iter {
            self.insert(reading);
        }
    }
}

impl IntoIterator for ReadingTable {
    type Item = Reading;
    type IntoIter = btree_map::IntoValues<ReadingKey, Reading>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.into_values()
    }
}
