//! Integration tests for the time-series store using temporary directories.

use camino::Utf8PathBuf;
use chrono::NaiveDate;
use pkg_pulse::fetch::{DAILY_DOWNLOADS, MetricReading, Source};
use pkg_pulse::store::{AppendResult, Store, Window};
use std::fs;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn store_path(temp_dir: &tempfile::TempDir) -> Utf8PathBuf {
    Utf8PathBuf::from_path_buf(temp_dir.path().join("readings.csv")).unwrap()
}

fn pypi_reading(value: u64, d: NaiveDate) -> MetricReading {
    MetricReading::new("armoriq-sdk", Source::PyPi, DAILY_DOWNLOADS, value, d)
}

#[tokio::test]
async fn test_append_commit_reload() {
    let temp_dir = tempfile::tempdir().unwrap();
    let path = store_path(&temp_dir);

    {
        let mut store = Store::open(&path).await.unwrap();
        assert!(store.is_empty());

        assert_eq!(store.append(&pypi_reading(3454, date(2026, 2, 19))), AppendResult::Inserted);
        assert_eq!(store.append(&pypi_reading(3465, date(2026, 2, 20))), AppendResult::Inserted);
        store.commit().unwrap();
    }

    // Reopen after the lock is released and verify persistence
    let store = Store::open(&path).await.unwrap();
    assert_eq!(store.len(), 2);

    let latest = store.latest("armoriq-sdk", Source::PyPi, DAILY_DOWNLOADS).unwrap();
    assert_eq!(latest.value, 3465);
    assert_eq!(latest.date, date(2026, 2, 20));
}

#[tokio::test]
async fn test_append_same_key_overwrites() {
    let temp_dir = tempfile::tempdir().unwrap();
    let path = store_path(&temp_dir);

    {
        let mut store = Store::open(&path).await.unwrap();
        assert_eq!(store.append(&pypi_reading(3454, date(2026, 2, 19))), AppendResult::Inserted);
        assert_eq!(store.append(&pypi_reading(3500, date(2026, 2, 19))), AppendResult::Updated);
        assert_eq!(store.append(&pypi_reading(3500, date(2026, 2, 19))), AppendResult::Unchanged);
        store.commit().unwrap();
    }

    // Exactly one record survives, equal to the latest write
    let store = Store::open(&path).await.unwrap();
    assert_eq!(store.len(), 1);
    assert_eq!(store.latest("armoriq-sdk", Source::PyPi, DAILY_DOWNLOADS).unwrap().value, 3500);
}

#[tokio::test]
async fn test_query_window_filters_and_orders() {
    let temp_dir = tempfile::tempdir().unwrap();
    let path = store_path(&temp_dir);
    let today = date(2026, 2, 20);

    let mut store = Store::open(&path).await.unwrap();
    // Insert out of date order; queries must come back ascending
    let _ = store.append(&pypi_reading(3465, date(2026, 2, 20)));
    let _ = store.append(&pypi_reading(100, date(2026, 1, 1)));
    let _ = store.append(&pypi_reading(3454, date(2026, 2, 19)));

    let readings: Vec<_> = store
        .query("armoriq-sdk", Source::PyPi, DAILY_DOWNLOADS, Window::Last7Days, today)
        .collect();

    assert_eq!(readings.len(), 2);
    assert_eq!(readings[0].value, 3454);
    assert_eq!(readings[1].value, 3465);
    assert!(readings.iter().all(|r| r.date >= Window::Last7Days.cutoff(today).unwrap()));

    // All-time window sees everything
    let all: Vec<_> = store
        .query("armoriq-sdk", Source::PyPi, DAILY_DOWNLOADS, Window::AllTime, today)
        .collect();
    assert_eq!(all.len(), 3);
    assert_eq!(all[0].date, date(2026, 1, 1));
}

#[tokio::test]
async fn test_query_is_restartable() {
    let temp_dir = tempfile::tempdir().unwrap();
    let path = store_path(&temp_dir);
    let today = date(2026, 2, 20);

    let mut store = Store::open(&path).await.unwrap();
    let _ = store.append(&pypi_reading(1, date(2026, 2, 18)));
    let _ = store.append(&pypi_reading(2, date(2026, 2, 19)));

    let first: Vec<_> = store
        .query("armoriq-sdk", Source::PyPi, DAILY_DOWNLOADS, Window::Last7Days, today)
        .collect();
    let second: Vec<_> = store
        .query("armoriq-sdk", Source::PyPi, DAILY_DOWNLOADS, Window::Last7Days, today)
        .collect();
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_query_ignores_other_series() {
    let temp_dir = tempfile::tempdir().unwrap();
    let path = store_path(&temp_dir);
    let today = date(2026, 2, 20);

    let mut store = Store::open(&path).await.unwrap();
    let _ = store.append(&pypi_reading(3454, date(2026, 2, 19)));
    let _ = store.append(&MetricReading::new("armoriq-sdk", Source::Npm, DAILY_DOWNLOADS, 90, date(2026, 2, 19)));
    let _ = store.append(&MetricReading::new("acme/widget", Source::GitHub, "Stars", 42, date(2026, 2, 19)));

    let readings: Vec<_> = store
        .query("armoriq-sdk", Source::PyPi, DAILY_DOWNLOADS, Window::AllTime, today)
        .collect();
    assert_eq!(readings.len(), 1);
    assert_eq!(readings[0].source, Source::PyPi);

    let series = store.series();
    assert_eq!(series.len(), 3);
    // Summary order: item name first, then metric name
    assert_eq!(series[0].item, "acme/widget");
    assert_eq!(series[1].item, "armoriq-sdk");
}

#[tokio::test]
async fn test_csv_layout_on_disk() {
    let temp_dir = tempfile::tempdir().unwrap();
    let path = store_path(&temp_dir);

    {
        let mut store = Store::open(&path).await.unwrap();
        let _ = store.append(&pypi_reading(3454, date(2026, 2, 19)));
        store.commit().unwrap();
    }

    let contents = fs::read_to_string(path.as_std_path()).unwrap();
    let mut lines = contents.lines();
    assert_eq!(lines.next(), Some("date,item,source,metric,value"));
    assert_eq!(lines.next(), Some("2026-02-19,armoriq-sdk,pypi,Daily Downloads,3454"));
}

#[tokio::test]
async fn test_commit_without_changes_writes_nothing() {
    let temp_dir = tempfile::tempdir().unwrap();
    let path = store_path(&temp_dir);

    let mut store = Store::open(&path).await.unwrap();
    store.commit().unwrap();
    assert!(!path.as_std_path().exists());
}

#[tokio::test]
async fn test_open_rejects_malformed_store() {
    let temp_dir = tempfile::tempdir().unwrap();
    let path = store_path(&temp_dir);
    fs::write(path.as_std_path(), "date,item,source,metric,value\nnot-a-date,x,pypi,Daily Downloads,1\n").unwrap();

    assert!(Store::open(&path).await.is_err());
}
