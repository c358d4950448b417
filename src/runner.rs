use crate::error::Result;
use crate::fetchers::{PageSource, StationFetcher};
use crate::models::{ReadingTable, StationStatus};
use crate::processors::{DailyMerger, MergeOutcome, StatusTracker};
use crate::readers::{SnapshotReader, StatusReader};
use crate::settings::Settings;
use crate::writers::{ReportWriter, StatusWriter};
use std::time::Instant;
use tracing::info;

/// One scrape: fetch every station, merge into the daily snapshot, publish status
pub fn run(settings: &Settings) -> Result<()> {
    let fetcher = StationFetcher::from_settings(settings)?;
    run_with(settings, &fetcher).map(|_| ())
}

/// Same as [`run`] with an explicit page source
pub fn run_with<S: PageSource>(
    settings: &Settings,
    fetcher: &StationFetcher<S>,
) -> Result<MergeOutcome> {
    let start = Instant::now();

    // Both persisted inputs must load before anything is fetched or written
    let persisted_status = StatusReader::new().read(&settings.status_file)?;
    let persisted = SnapshotReader::new().read(&settings.snapshot_file)?;
    info!(
        snapshot_rows = persisted.len(),
        stations = persisted_status.len(),
        "persisted state loaded"
    );

    let fetched = fetcher.fetch_all()?;

    let merger = DailyMerger::new(&settings.snapshot_file, &settings.archive_dir);
    let plan = merger.merge(persisted, &fetched)?;
    let outcome = merger.persist(plan)?;

    let status = publish_status(settings, &persisted_status, &fetched, &outcome)?;

    info!(
        as_of = %outcome.as_of.date_naive(),
        snapshot_rows = outcome.snapshot.len(),
        archived_rows = outcome.archived_rows,
        stations = status.len(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "run complete"
    );
    Ok(outcome)
}

fn publish_status(
    settings: &Settings,
    persisted: &[StationStatus],
    fetched: &ReadingTable,
    outcome: &MergeOutcome,
) -> Result<Vec<StationStatus>> {
    let status = StatusTracker::new().update(persisted, fetched);
    StatusWriter::new().write(&settings.status_file, &status)?;
    ReportWriter::new().write(&settings.report_file, &outcome.as_of, &status)?;
    Ok(status)
}
