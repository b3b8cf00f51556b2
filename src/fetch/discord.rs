use super::{FetchOutcome, MetricReading, Source, http};
use crate::Result;
use chrono::NaiveDate;
use reqwest::Client;
use serde::Deserialize;

const LOG_TARGET: &str = "   discord";

/// Base URL of the Discord REST API.
const DEFAULT_API_BASE: &str = "https://discord.com/api/v10";

/// Community size snapshots from a Discord invite.
///
/// The invite endpoint exposes approximate member and presence counts without
/// authentication, which is all this tool needs. The tracked item's name is
/// the invite code.
#[derive(Debug, Clone)]
pub struct Provider {
    client: Client,
    api_base: String,
}

#[derive(Debug, Deserialize)]
struct InviteResponse {
    approximate_member_count: Option<u64>,
    approximate_presence_count: Option<u64>,
}

impl Provider {
    /// Create a new Discord invite client. `api_base` overrides the
    /// discord.com endpoint, for tests.
    pub fn new(api_base: Option<&str>) -> Result<Self> {
        Ok(Self {
            client: http::client()?,
            api_base: api_base.unwrap_or(DEFAULT_API_BASE).trim_end_matches('/').to_string(),
        })
    }

    /// Fetch member and presence counts for an invite, dated `today`.
    pub async fn fetch(&self, invite: &str, today: NaiveDate) -> FetchOutcome<Vec<MetricReading>> {
        let url = format!("{}/invites/{invite}?with_counts=true", self.api_base);
        let context = format!("Discord counts for invite '{invite}'");

        log::info!(target: LOG_TARGET, "Querying Discord for invite '{invite}'");

        match http::get_json::<InviteResponse>(&self.client, &url, &context).await {
            FetchOutcome::Found(payload) => {
                let mut readings = Vec::with_capacity(2);

                if let Some(members) = payload.approximate_member_count {
                    readings.push(MetricReading::new(invite, Source::Discord, super::MEMBERS, members, today));
                }
                if let Some(online) = payload.approximate_presence_count {
                    readings.push(MetricReading::new(invite, Source::Discord, super::ONLINE, online, today));
                }

                if readings.is_empty() {
                    log::warn!(target: LOG_TARGET, "Discord invite '{invite}' returned no counts");
                }

                FetchOutcome::Found(readings)
            }
            FetchOutcome::NotFound => FetchOutcome::NotFound,
            FetchOutcome::Error(e) => FetchOutcome::Error(e),
        }
    }
}
