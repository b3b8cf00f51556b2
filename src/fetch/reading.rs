use super::Source;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One dated value for one metric of one tracked item.
///
/// Readings are immutable once recorded; the store enforces at most one
/// reading per (item, source, metric, date) key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricReading {
    pub item: String,
    pub source: Source,
    pub metric: String,
    pub value: u64,
    pub date: NaiveDate,
}

impl MetricReading {
    #[must_use]
    pub fn new(item: impl Into<String>, source: Source, metric: impl Into<String>, value: u64, date: NaiveDate) -> Self {
        Self {
            item: item.into(),
            source,
            metric: metric.into(),
            value,
            date,
        }
    }
}
