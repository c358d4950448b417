use chrono::{DateTime, Duration, FixedOffset};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::error::{ProcessingError, Result};
use crate::models::{ArchiveBlock, ReadingTable};
use crate::processors::Resampler;
use crate::readers::SnapshotReader;
use crate::utils::constants::ARCHIVE_DECIMALS;
use crate::utils::time::floor_to_midnight;
use crate::writers::{ArchiveWriter, SnapshotWriter};

/// What a merge decided, before anything touches the disk
#[derive(Debug, Clone, PartialEq)]
pub struct MergePlan {
    /// Day the snapshot now covers
    pub as_of: DateTime<FixedOffset>,
    /// New contents of the daily snapshot
    pub snapshot: ReadingTable,
    /// Completed day to append to its monthly archive, if a rollover happened
    pub archive: Option<ArchiveBlock>,
}

impl MergePlan {
    pub fn rolled_over(&self) -> bool {
        self.archive.is_some()
    }
}

/// Result of a persisted merge
#[derive(Debug, Clone)]
pub struct MergeOutcome {
    pub as_of: DateTime<FixedOffset>,
    pub snapshot: ReadingTable,
    pub archived_rows: usize,
    pub archive_file: Option<PathBuf>,
}

/// Merges fetched readings into the daily snapshot and archives finished days
pub struct DailyMerger {
    resampler: Resampler,
    snapshot_path: PathBuf,
    archive_dir: PathBuf,
}

impl DailyMerger {
    pub fn new(snapshot_path: impl Into<PathBuf>, archive_dir: impl Into<PathBuf>) -> Self {
        Self {
            resampler: Resampler::hourly(),
            snapshot_path: snapshot_path.into(),
            archive_dir: archive_dir.into(),
        }
    }

    pub fn with_resampler(mut self, resampler: Resampler) -> Self {
        self.resampler = resampler;
        self
    }

    pub fn snapshot_path(&self) -> &Path {
        &self.snapshot_path
    }

    /// Reconcile `fetched` with the `persisted` snapshot.
    ///
    /// The snapshot day is anchored on the first persisted reading (or the first
    /// fetched one when the snapshot is empty). Fetched rows override persisted rows
    /// with the same key. Any reading at or after the next midnight closes the day.
    pub fn merge(&self, persisted: ReadingTable, fetched: &ReadingTable) -> Result<MergePlan> {
        let anchor = persisted
            .first_timestamp()
            .or_else(|| fetched.first_timestamp())
            .ok_or_else(|| {
                ProcessingError::MissingData(
                    "daily snapshot and fetched readings are both empty".to_string(),
                )
            })?;

        let today = floor_to_midnight(anchor);
        let tomorrow = today + Duration::days(1);

        let union = ReadingTable::union(persisted, fetched);
        let (stale, current) = union.split_at(today);
        if !stale.is_empty() {
            debug!(count = stale.len(), day = %today.date_naive(), "dropping readings older than the snapshot day");
        }

        let (working, next_day) = current.split_at(tomorrow);

        if next_day.is_empty() {
            debug!(rows = working.len(), day = %today.date_naive(), "no rollover");
            return Ok(MergePlan {
                as_of: today,
                snapshot: working,
                archive: None,
            });
        }

        let resampled = self.resampler.resample(&working);
        let block = ArchiveBlock::from_resampled(today, &resampled, ARCHIVE_DECIMALS);

        // The next snapshot holds a single day even if the data skipped ahead.
        let next_start = next_day
            .first_timestamp()
            .map(floor_to_midnight)
            .unwrap_or(tomorrow);
        let (snapshot, beyond) = next_day.split_at(next_start + Duration::days(1));
        if !beyond.is_empty() {
            warn!(
                count = beyond.len(),
                day = %next_start.date_naive(),
                "dropping readings past the next snapshot day"
            );
        }

        info!(
            day = %today.date_naive(),
            buckets = block.len(),
            stations = block.stations.len(),
            "day complete, rolling over"
        );

        Ok(MergePlan {
            as_of: next_start,
            snapshot,
            archive: Some(block),
        })
    }

    /// Write a plan: archive block first, then the snapshot
    pub fn persist(&self, plan: MergePlan) -> Result<MergeOutcome> {
        let (archived_rows, archive_file) = match plan.archive.as_ref() {
            Some(block) if !block.is_empty() => {
                let writer = ArchiveWriter::new(&self.archive_dir);
                match writer.append(block)? {
                    Some(path) => (block.len(), Some(path)),
                    None => (0, None),
                }
            }
            _ => (0, None),
        };

        SnapshotWriter::new().write(&self.snapshot_path, &plan.snapshot)?;

        Ok(MergeOutcome {
            as_of: plan.as_of,
            snapshot: plan.snapshot,
            archived_rows,
            archive_file,
        })
    }

    /// Load the persisted snapshot, merge `fetched` into it and write the result
    pub fn run(&self, fetched: &ReadingTable) -> Result<MergeOutcome> {
        let persisted = SnapshotReader::new().read(&self.snapshot_path)?;
        info!(
            persisted = persisted.len(),
            fetched = fetched.len(),
            "merging readings into daily snapshot"
        );

        let plan = self.merge(persisted, fetched)?;
        self.persist(plan)
    }
}
