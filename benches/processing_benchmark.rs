use chrono::{DateTime, Duration, FixedOffset};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use meteo_bolivia::models::reading::timestamp_format;
use meteo_bolivia::models::{Reading, ReadingTable, WindRose};
use meteo_bolivia::processors::{DailyMerger, Resampler};

// A day of readings every `step_minutes` for each station
fn create_test_day(station_count: usize, step_minutes: i64) -> (DateTime<FixedOffset>, ReadingTable) {
    let day = timestamp_format::parse("2021-03-14 00:00:00-04:00").unwrap();
    let labels: Vec<&str> = WindRose::points().map(|(label, _)| label).collect();
    let mut table = ReadingTable::new();

    for station in 0..station_count {
        let name = format!("Estacion {}", station);
        let mut offset = 0;
        while offset < 24 * 60 {
            let i = (offset / step_minutes) as usize + station;
            table.insert(
                Reading::builder()
                    .timestamp(day + Duration::minutes(offset))
                    .station(name.clone())
                    .wind(labels[i % labels.len()], (i % 12) as f64)
                    .temperature(Some(10.0 + (i % 7) as f64))
                    .relative_humidity(Some(40.0 + (i % 30) as f64))
                    .pressure(Some(650.0 + (i % 5) as f64))
                    .build()
                    .unwrap(),
            );
            offset += step_minutes;
        }
    }

    (day, table)
}

fn benchmark_resampler(c: &mut Criterion) {
    let mut group = c.benchmark_group("resampler");
    let resampler = Resampler::hourly();

    for station_count in [10, 50, 100].iter() {
        let (_, table) = create_test_day(*station_count, 10);

        group.bench_with_input(
            BenchmarkId::new("hourly", station_count),
            &table,
            |b, table| b.iter(|| resampler.resample(black_box(table))),
        );
    }

    group.finish();
}

fn benchmark_merge(c: &mut Criterion) {
    let mut group = c.benchmark_group("daily_merge");
    let merger = DailyMerger::new("hoy.csv", "data");

    for station_count in [10, 50].iter() {
        let (day, persisted) = create_test_day(*station_count, 10);
        let fetched: ReadingTable = persisted
            .iter()
            .take(*station_count)
            .map(|r| {
                let mut next = r.clone();
                next.timestamp = day + Duration::days(1) + Duration::hours(2);
                next
            })
            .collect();

        group.bench_with_input(
            BenchmarkId::new("same_day", station_count),
            &persisted,
            |b, persisted| b.iter(|| merger.merge(persisted.clone(), black_box(&ReadingTable::new()))),
        );

        group.bench_with_input(
            BenchmarkId::new("rollover", station_count),
            &(persisted, fetched),
            |b, (persisted, fetched)| b.iter(|| merger.merge(persisted.clone(), black_box(fetched))),
        );
    }

    group.finish();
}

criterion_group!(benches, benchmark_resampler, benchmark_merge);
criterion_main!(benches);
