use super::{FetchOutcome, MetricReading, Source, http};
use crate::Result;
use chrono::{Days, NaiveDate};
use reqwest::Client;
use serde::Deserialize;

const LOG_TARGET: &str = "       npm";

/// Base URL of the npm downloads API.
const DEFAULT_API_BASE: &str = "https://api.npmjs.org";

/// The npm range API serves at most one year per request.
const RANGE_DAYS: u64 = 365;

/// Daily download counts from the npm registry.
#[derive(Debug, Clone)]
pub struct Provider {
    client: Client,
    api_base: String,
}

#[derive(Debug, Deserialize)]
struct RangeResponse {
    #[serde(default)]
    downloads: Vec<RangeEntry>,
}

#[derive(Debug, Deserialize)]
struct RangeEntry {
    day: NaiveDate,
    downloads: u64,
}

impl Provider {
    /// Create a new npm downloads client. `api_base` overrides the
    /// api.npmjs.org endpoint, for tests.
    pub fn new(api_base: Option<&str>) -> Result<Self> {
        Ok(Self {
            client: http::client()?,
            api_base: api_base.unwrap_or(DEFAULT_API_BASE).trim_end_matches('/').to_string(),
        })
    }

    /// Fetch daily download counts for the trailing year ending yesterday.
    ///
    /// Today's count is excluded because npm reports it as partial until the
    /// day rolls over.
    pub async fn fetch(&self, package: &str, today: NaiveDate) -> FetchOutcome<Vec<MetricReading>> {
        let end = today - Days::new(1);
        let start = end - Days::new(RANGE_DAYS - 1);
        let url = format!("{}/downloads/range/{start}:{end}/{package}", self.api_base);
        let context = format!("npm download counts for '{package}'");

        log::info!(target: LOG_TARGET, "Querying npm registry for package '{package}'");

        match http::get_json::<RangeResponse>(&self.client, &url, &context).await {
            FetchOutcome::Found(payload) => {
                let readings: Vec<_> = payload
                    .downloads
                    .into_iter()
                    .map(|entry| MetricReading::new(package, Source::Npm, super::DAILY_DOWNLOADS, entry.downloads, entry.day))
                    .collect();

                if readings.is_empty() {
                    log::warn!(target: LOG_TARGET, "No download data found for npm package '{package}'");
                }

                FetchOutcome::Found(readings)
            }
            FetchOutcome::NotFound => FetchOutcome::NotFound,
            FetchOutcome::Error(e) => FetchOutcome::Error(e),
        }
    }
}
