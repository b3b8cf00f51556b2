use super::{FetchOutcome, MetricReading, Source, http};
use crate::Result;
use chrono::NaiveDate;
use reqwest::Client;
use serde::Deserialize;

const LOG_TARGET: &str = "      pypi";

/// Base URL of the pypistats.org API.
const DEFAULT_API_BASE: &str = "https://pypistats.org/api";

/// Download counts are reported per mirror category; only the inclusive one
/// is recorded.
const MIRROR_CATEGORY: &str = "with_mirrors";

/// Daily download counts from pypistats.org.
#[derive(Debug, Clone)]
pub struct Provider {
    client: Client,
    api_base: String,
}

#[derive(Debug, Deserialize)]
struct OverallResponse {
    #[serde(default)]
    data: Vec<OverallEntry>,
}

#[derive(Debug, Deserialize)]
struct OverallEntry {
    category: String,
    date: NaiveDate,
    downloads: u64,
}

impl Provider {
    /// Create a new PyPI stats client. `api_base` overrides the pypistats.org
    /// endpoint, for tests.
    pub fn new(api_base: Option<&str>) -> Result<Self> {
        Ok(Self {
            client: http::client()?,
            api_base: api_base.unwrap_or(DEFAULT_API_BASE).trim_end_matches('/').to_string(),
        })
    }

    /// Fetch all available daily download counts for a package.
    ///
    /// pypistats returns roughly the trailing six months of per-day counts;
    /// every returned day becomes a reading, so gaps from missed runs are
    /// backfilled by the store's idempotent append.
    pub async fn fetch(&self, package: &str) -> FetchOutcome<Vec<MetricReading>> {
        let url = format!("{}/packages/{package}/overall", self.api_base);
        let context = format!("PyPI download counts for '{package}'");

        log::info!(target: LOG_TARGET, "Querying pypistats for package '{package}'");

        match http::get_json::<OverallResponse>(&self.client, &url, &context).await {
            FetchOutcome::Found(payload) => {
                let readings: Vec<_> = payload
                    .data
                    .into_iter()
                    .filter(|entry| entry.category == MIRROR_CATEGORY)
                    .map(|entry| MetricReading::new(package, Source::PyPi, super::DAILY_DOWNLOADS, entry.downloads, entry.date))
                    .collect();

                if readings.is_empty() {
                    log::warn!(target: LOG_TARGET, "No download data found for PyPI package '{package}'");
                }

                FetchOutcome::Found(readings)
            }
            FetchOutcome::NotFound => FetchOutcome::NotFound,
            FetchOutcome::Error(e) => FetchOutcome::Error(e),
        }
    }
}
