use chrono::{DateTime, FixedOffset};
use meteo_bolivia::fetchers::{PageSource, StationFetcher};
use meteo_bolivia::models::reading::timestamp_format;
use meteo_bolivia::models::{Reading, ReadingTable, StationStatus};
use meteo_bolivia::processors::{DailyMerger, StatusTracker};
use meteo_bolivia::readers::{SnapshotReader, StatusReader};
use meteo_bolivia::writers::{SnapshotWriter, StatusWriter};
use meteo_bolivia::{runner, ProcessingError, Result, Settings};
use pretty_assertions::assert_eq;
use std::fs;
use std::path::Path;
use std::time::Duration;
use tempfile::TempDir;

fn ts(s: &str) -> DateTime<FixedOffset> {
    timestamp_format::parse(s).unwrap()
}

fn reading(at: &str, station: &str, direction: &str, speed: f64, temperature: f64) -> Reading {
    Reading::builder()
        .timestamp(ts(at))
        .station(station)
        .wind(direction, speed)
        .temperature(Some(temperature))
        .build()
        .unwrap()
}

fn write_snapshot(path: &Path, readings: Vec<Reading>) -> Result<()> {
    SnapshotWriter::new().write(path, &readings.into_iter().collect())
}

#[test]
fn test_rollover_archives_completed_day() -> Result<()> {
    let dir = TempDir::new()?;
    let snapshot_path = dir.path().join("hoy.csv");
    let archive_dir = dir.path().join("data");

    write_snapshot(
        &snapshot_path,
        vec![
            reading("2021-03-14 10:00:00-04:00", "El Alto", "N", 4.0, 10.0),
            reading("2021-03-14 10:30:00-04:00", "El Alto", "N", 6.0, 12.0),
            reading("2021-03-14 22:00:00-04:00", "Oruro", "S", 2.0, 5.0),
        ],
    )?;
    let fetched: ReadingTable = vec![reading("2021-03-15 03:00:00-04:00", "El Alto", "NE", 3.0, 1.0)]
        .into_iter()
        .collect();

    let outcome = DailyMerger::new(&snapshot_path, &archive_dir).run(&fetched)?;

    assert_eq!(outcome.as_of, ts("2021-03-15 00:00:00-04:00"));
    assert_eq!(outcome.archived_rows, 2);
    assert_eq!(outcome.snapshot, fetched);

    let reloaded = SnapshotReader::new().read(&snapshot_path)?;
    assert_eq!(reloaded, fetched);

    let archive = fs::read_to_string(archive_dir.join("2021.03.csv"))?;
    let lines: Vec<&str> = archive.lines().collect();
    assert_eq!(lines.len(), 4);
    assert!(lines[0].starts_with("estacion,El Alto"));
    assert!(lines[2].starts_with("2021-03-14 10:00:00-04:00,N,5.0,11.0"));
    assert!(lines[3].starts_with("2021-03-14 22:00:00-04:00,"));
    Ok(())
}

#[test]
fn test_same_day_merge_leaves_archive_untouched() -> Result<()> {
    let dir = TempDir::new()?;
    let snapshot_path = dir.path().join("hoy.csv");
    let archive_dir = dir.path().join("data");

    write_snapshot(
        &snapshot_path,
        vec![reading("2021-03-14 10:00:00-04:00", "El Alto", "N", 4.0, 10.0)],
    )?;
    let fetched: ReadingTable = vec![
        reading("2021-03-14 10:00:00-04:00", "El Alto", "N", 4.0, 10.5),
        reading("2021-03-14 11:00:00-04:00", "El Alto", "N", 4.0, 11.0),
    ]
    .into_iter()
    .collect();

    let outcome = DailyMerger::new(&snapshot_path, &archive_dir).run(&fetched)?;

    assert_eq!(outcome.as_of, ts("2021-03-14 00:00:00-04:00"));
    assert_eq!(outcome.archive_file, None);
    assert_eq!(outcome.snapshot, fetched);
    assert!(!archive_dir.exists());
    Ok(())
}

#[test]
fn test_empty_fetch_is_idempotent() -> Result<()> {
    let dir = TempDir::new()?;
    let snapshot_path = dir.path().join("hoy.csv");
    let merger = DailyMerger::new(&snapshot_path, dir.path().join("data"));

    write_snapshot(
        &snapshot_path,
        vec![
            reading("2021-03-14 10:00:00-04:00", "El Alto", "N", 4.0, 10.0),
            reading("2021-03-14 11:00:00-04:00", "Oruro", "VRB", 1.0, 8.0),
        ],
    )?;

    merger.run(&ReadingTable::new())?;
    let first = fs::read_to_string(&snapshot_path)?;
    merger.run(&ReadingTable::new())?;
    let second = fs::read_to_string(&snapshot_path)?;

    assert_eq!(first, second);
    Ok(())
}

#[test]
fn test_empty_fetch_after_rollover_changes_nothing() -> Result<()> {
    let dir = TempDir::new()?;
    let snapshot_path = dir.path().join("hoy.csv");
    let archive_path = dir.path().join("data").join("2021.03.csv");
    let merger = DailyMerger::new(&snapshot_path, dir.path().join("data"));

    write_snapshot(
        &snapshot_path,
        vec![reading("2021-03-14 10:00:00-04:00", "El Alto", "N", 4.0, 10.0)],
    )?;
    let fetched: ReadingTable = vec![reading("2021-03-15 03:00:00-04:00", "El Alto", "NE", 3.0, 1.0)]
        .into_iter()
        .collect();
    let rolled = merger.run(&fetched)?;
    assert_eq!(rolled.archive_file.as_deref(), Some(archive_path.as_path()));

    let snapshot_before = fs::read(&snapshot_path)?;
    let archive_before = fs::read(&archive_path)?;

    let outcome = merger.run(&ReadingTable::new())?;

    assert_eq!(outcome.archive_file, None);
    assert_eq!(outcome.archived_rows, 0);
    assert_eq!(outcome.as_of, ts("2021-03-15 00:00:00-04:00"));
    assert_eq!(fs::read(&snapshot_path)?, snapshot_before);
    assert_eq!(fs::read(&archive_path)?, archive_before);
    Ok(())
}

#[test]
fn test_missing_snapshot_is_fatal() {
    let dir = TempDir::new().unwrap();
    let merger = DailyMerger::new(dir.path().join("hoy.csv"), dir.path().join("data"));

    let result = merger.run(&ReadingTable::new());

    assert!(matches!(result, Err(ProcessingError::SnapshotMissing { .. })));
}

#[test]
fn test_status_never_moves_backwards() -> Result<()> {
    let dir = TempDir::new()?;
    let status_path = dir.path().join("status.csv");
    StatusWriter::new().write(
        &status_path,
        &[StationStatus::new("El Alto", ts("2021-03-14 12:00:00-04:00"))],
    )?;

    let persisted = StatusReader::new().read(&status_path)?;
    let fetched: ReadingTable = vec![
        reading("2021-03-14 09:00:00-04:00", "El Alto", "N", 1.0, 1.0),
        reading("2021-03-14 08:00:00-04:00", "Oruro", "N", 1.0, 1.0),
    ]
    .into_iter()
    .collect();

    let status = StatusTracker::new().update(&persisted, &fetched);

    assert_eq!(
        status,
        vec![
            StationStatus::new("Oruro", ts("2021-03-14 08:00:00-04:00")),
            StationStatus::new("El Alto", ts("2021-03-14 12:00:00-04:00")),
        ]
    );
    Ok(())
}

/// Serves the directory and one station page, every other request fails
struct CannedSource;

impl PageSource for CannedSource {
    fn fetch(&self, url: &str, _timeout: Duration) -> Result<String> {
        if url.ends_with("scriptEstaciones_prueba.php") {
            Ok(r#"<table>
                <tr><th>N</th><th>Mapa</th><th>Estacion</th></tr>
                <tr><td>1</td><td><a href="datos.php?f=SLLP">ver</a></td><td>El Alto</td></tr>
                <tr><td>2</td><td><a href="datos.php?f=SLOR">ver</a></td><td>Oruro</td></tr>
            </table>"#
                .to_string())
        } else if url.ends_with("datos.php?x=SLLP") {
            Ok(r#"<table>
                <tr><td>14/03/2021 14:00</td><td>El Alto</td><td>NNE</td><td>5,0</td>
                    <td>12,4</td><td>*</td><td>45</td><td>1.013,2</td><td>0</td></tr>
            </table>"#
                .to_string())
        } else {
            Err(ProcessingError::Fetch {
                url: url.to_string(),
                message: "HTTP 503".to_string(),
            })
        }
    }
}

fn test_settings(root: &Path) -> Settings {
    Settings {
        base_url: "http://example.test".to_string(),
        retry_max: 1,
        sleep_secs: 0,
        timeout_secs: 1,
        directory_timeout_factor: 3,
        utc_offset_hours: -4,
        snapshot_file: root.join("hoy.csv"),
        status_file: root.join("status.csv"),
        report_file: root.join("README.md"),
        archive_dir: root.join("data"),
        show_progress: false,
    }
}

#[test]
fn test_full_run_publishes_status_and_report() -> Result<()> {
    let dir = TempDir::new()?;
    let settings = test_settings(dir.path());
    write_snapshot(&settings.snapshot_file, Vec::new())?;
    StatusWriter::new().write(&settings.status_file, &[])?;

    let fetcher = StationFetcher::with_source(CannedSource, &settings)?.with_sleeper(|_| {});
    let outcome = runner::run_with(&settings, &fetcher)?;

    assert_eq!(outcome.as_of, ts("2021-03-14 00:00:00-04:00"));
    assert_eq!(outcome.snapshot.len(), 1);

    let status = StatusReader::new().read(&settings.status_file)?;
    assert_eq!(
        status,
        vec![StationStatus::new("El Alto", ts("2021-03-14 10:00:00-04:00"))]
    );

    let report = fs::read_to_string(&settings.report_file)?;
    assert!(report.contains("#### Estado 2021-03-14:"));
    assert!(report.contains("El Alto"));
    Ok(())
}

#[test]
fn test_run_requires_status_file() -> Result<()> {
    let dir = TempDir::new()?;
    let settings = test_settings(dir.path());
    write_snapshot(&settings.snapshot_file, Vec::new())?;

    let fetcher = StationFetcher::with_source(CannedSource, &settings)?.with_sleeper(|_| {});
    let result = runner::run_with(&settings, &fetcher);

    assert!(result.is_err());
    assert!(!settings.report_file.exists());
    Ok(())
}
