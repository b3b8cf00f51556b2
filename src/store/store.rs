use super::lock::{StoreLockGuard, acquire_store_lock};
use super::window::Window;
use crate::Result;
use crate::fetch::{MetricReading, Source};
use camino::{Utf8Path, Utf8PathBuf};
use chrono::NaiveDate;
use ohno::{IntoAppError, app_err};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io::Write;

const LOG_TARGET: &str = "     store";

/// One row of the store's CSV file, in column order.
#[derive(Debug, Serialize, Deserialize)]
struct CsvRow {
    date: NaiveDate,
    item: String,
    source: Source,
    metric: String,
    value: u64,
}

/// Identifies one reading. The derived ordering (item, source, metric, date)
/// keeps each series contiguous and date-ascending in the map.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct SeriesKey {
    item: String,
    source: Source,
    metric: String,
    date: NaiveDate,
}

/// One tracked series: every reading of one metric for one item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Series {
    pub item: String,
    pub source: Source,
    pub metric: String,
}

/// What [`Store::append`] did with a reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppendResult {
    /// No reading existed for the key.
    Inserted,
    /// A reading existed with a different value and was overwritten.
    Updated,
    /// A reading existed with the same value.
    Unchanged,
}

/// Append-only time series of metric readings, persisted as a CSV file.
///
/// At most one reading exists per (item, source, metric, date) key;
/// re-appending a key overwrites its value, so re-running a day's fetch is
/// idempotent. All mutations stay in memory until [`Store::commit`], which
/// rewrites the file atomically. An advisory file lock next to the CSV
/// serializes writers for the lifetime of the store.
#[derive(Debug)]
pub struct Store {
    path: Utf8PathBuf,
    rows: BTreeMap<SeriesKey, u64>,
    dirty: bool,
    _lock: StoreLockGuard,
}

impl Store {
    /// Open the store at `path`, creating the data directory if needed and
    /// loading any existing readings.
    pub async fn open(path: impl AsRef<Utf8Path>) -> Result<Self> {
        let path = path.as_ref().to_owned();

        let data_dir = match path.parent() {
            Some(parent) if !parent.as_str().is_empty() => parent.to_owned(),
            _ => Utf8PathBuf::from("."),
        };
        fs::create_dir_all(&data_dir).into_app_err_with(|| format!("unable to create data directory '{data_dir}'"))?;

        let lock = acquire_store_lock(data_dir.as_std_path()).await?;

        let mut rows = BTreeMap::new();
        if path.as_std_path().exists() {
            let mut reader = csv::Reader::from_path(path.as_std_path())
                .into_app_err_with(|| format!("unable to open store file '{path}'"))?;

            for record in reader.deserialize::<CsvRow>() {
                let row = record.into_app_err_with(|| format!("malformed row in store file '{path}'"))?;
                let _ = rows.insert(
                    SeriesKey {
                        item: row.item,
                        source: row.source,
                        metric: row.metric,
                        date: row.date,
                    },
                    row.value,
                );
            }

            log::debug!(target: LOG_TARGET, "Loaded {} readings from '{path}'", rows.len());
        }

        Ok(Self {
            path,
            rows,
            dirty: false,
            _lock: lock,
        })
    }

    /// Record a reading, overwriting any existing reading with the same
    /// (item, source, metric, date) key.
    pub fn append(&mut self, reading: &MetricReading) -> AppendResult {
        let key = SeriesKey {
            item: reading.item.clone(),
            source: reading.source,
            metric: reading.metric.clone(),
            date: reading.date,
        };

        match self.rows.insert(key, reading.value) {
            None => {
                self.dirty = true;
                AppendResult::Inserted
            }
            Some(previous) if previous != reading.value => {
                self.dirty = true;
                AppendResult::Updated
            }
            Some(_) => AppendResult::Unchanged,
        }
    }

    /// Persist all readings, rewriting the CSV file atomically.
    ///
    /// The new contents are written to a temporary file in the data directory
    /// and then renamed over the store file, so a failed write can never
    /// leave a truncated store behind.
    pub fn commit(&mut self) -> Result<()> {
        if !self.dirty {
            log::debug!(target: LOG_TARGET, "Store unchanged, skipping write");
            return Ok(());
        }

        let data_dir = match self.path.parent() {
            Some(parent) if !parent.as_str().is_empty() => parent.to_owned(),
            _ => Utf8PathBuf::from("."),
        };

        let mut writer = csv::Writer::from_writer(Vec::new());
        for (key, value) in &self.rows {
            writer
                .serialize(CsvRow {
                    date: key.date,
                    item: key.item.clone(),
                    source: key.source,
                    metric: key.metric.clone(),
                    value: *value,
                })
                .into_app_err_with(|| format!("unable to encode store file '{}'", self.path))?;
        }
        let contents = writer
            .into_inner()
            .map_err(|e| app_err!("unable to flush store rows: {e}"))?;

        // Write the new contents next to the store file, then rename over it.
        let mut tmp = tempfile::NamedTempFile::new_in(data_dir.as_std_path())
            .into_app_err_with(|| format!("unable to create temporary store file in '{data_dir}'"))?;
        tmp.write_all(&contents)
            .into_app_err_with(|| format!("unable to write store file '{}'", self.path))?;
        tmp.flush().into_app_err_with(|| format!("unable to flush store file '{}'", self.path))?;
        let _ = tmp
            .persist(self.path.as_std_path())
            .into_app_err_with(|| format!("unable to replace store file '{}'", self.path))?;

        self.dirty = false;
        log::info!(target: LOG_TARGET, "Wrote {} readings to '{}'", self.rows.len(), self.path);

        Ok(())
    }

    /// Readings for one series within a window, ordered by date ascending.
    ///
    /// The iterator is finite and the query can be re-issued at any time.
    pub fn query<'a>(
        &'a self,
        item: &str,
        source: Source,
        metric: &str,
        window: Window,
        today: NaiveDate,
    ) -> impl Iterator<Item = MetricReading> + 'a {
        let from = window.cutoff(today).unwrap_or(NaiveDate::MIN);
        self.series_range(item, source, metric, from)
    }

    /// The most recent reading for one series, if any.
    #[must_use]
    pub fn latest(&self, item: &str, source: Source, metric: &str) -> Option<MetricReading> {
        self.series_range(item, source, metric, NaiveDate::MIN).last()
    }

    /// Every distinct (item, source, metric) series, in summary-table order:
    /// item name first, then metric name.
    #[must_use]
    pub fn series(&self) -> Vec<Series> {
        let mut series: Vec<Series> = Vec::new();
        for key in self.rows.keys() {
            let current = Series {
                item: key.item.clone(),
                source: key.source,
                metric: key.metric.clone(),
            };
            if series.last() != Some(&current) {
                series.push(current);
            }
        }
        series.sort_by(|a, b| (&a.item, &a.metric, a.source).cmp(&(&b.item, &b.metric, b.source)));
        series
    }

    /// Number of stored readings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn series_range<'a>(
        &'a self,
        item: &str,
        source: Source,
        metric: &str,
        from: NaiveDate,
    ) -> impl Iterator<Item = MetricReading> + 'a {
        let lower = SeriesKey {
            item: item.to_string(),
            source,
            metric: metric.to_string(),
            date: from,
        };
        let upper = SeriesKey {
            item: item.to_string(),
            source,
            metric: metric.to_string(),
            date: NaiveDate::MAX,
        };

        self.rows
            .range(lower..=upper)
            .map(|(key, value)| MetricReading::new(key.item.clone(), key.source, key.metric.clone(), *value, key.date))
    }
}
