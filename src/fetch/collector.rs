use super::progress::Progress;
use super::repo_ref::RepoRef;
use super::{FetchOutcome, MetricReading, Source, discord, github, npm, pypi};
use crate::Result;
use crate::config::TrackedItem;
use chrono::NaiveDate;
use core::time::Duration;
use futures_util::StreamExt;
use futures_util::stream;
use ohno::app_err;
use std::sync::Arc;

const LOG_TARGET: &str = " collector";

/// The outcome of fetching one tracked item.
#[derive(Debug)]
pub struct ItemOutcome {
    pub item: TrackedItem,
    pub outcome: FetchOutcome<Vec<MetricReading>>,
}

/// Collector for gathering metric readings from the different sources.
///
/// Items are fetched concurrently with bounded parallelism and a per-fetch
/// timeout; one item failing never blocks the others. Readings are filtered
/// down to the metrics each item asks for.
pub struct Collector {
    pypi_provider: pypi::Provider,
    npm_provider: npm::Provider,
    github_provider: github::Provider,
    discord_provider: discord::Provider,
    progress: Arc<dyn Progress>,
    fetch_timeout: Duration,
    max_concurrent: usize,
}

impl core::fmt::Debug for Collector {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Collector")
            .field("pypi_provider", &self.pypi_provider)
            .field("npm_provider", &self.npm_provider)
            .field("github_provider", &self.github_provider)
            .field("discord_provider", &self.discord_provider)
            .field("progress", &"<dyn Progress>")
            .field("fetch_timeout", &self.fetch_timeout)
            .field("max_concurrent", &self.max_concurrent)
            .finish()
    }
}

impl Collector {
    pub fn new(
        github_token: Option<&str>,
        fetch_timeout: Duration,
        max_concurrent: usize,
        progress: Arc<dyn Progress>,
    ) -> Result<Self> {
        Ok(Self::with_providers(
            pypi::Provider::new(None)?,
            npm::Provider::new(None)?,
            github::Provider::new(github_token, None)?,
            discord::Provider::new(None)?,
            fetch_timeout,
            max_concurrent,
            progress,
        ))
    }

    /// Assemble a collector from pre-built providers, e.g. ones pointed at
    /// mock endpoints.
    #[must_use]
    pub fn with_providers(
        pypi_provider: pypi::Provider,
        npm_provider: npm::Provider,
        github_provider: github::Provider,
        discord_provider: discord::Provider,
        fetch_timeout: Duration,
        max_concurrent: usize,
        progress: Arc<dyn Progress>,
    ) -> Self {
        Self {
            pypi_provider,
            npm_provider,
            github_provider,
            discord_provider,
            progress,
            fetch_timeout,
            max_concurrent: max_concurrent.max(1),
        }
    }

    /// Fetch readings for multiple tracked items.
    ///
    /// Returns one outcome per item, in no particular order.
    pub async fn collect(&self, items: Vec<TrackedItem>, today: NaiveDate) -> Vec<ItemOutcome> {
        if items.is_empty() {
            return Vec::new();
        }

        self.progress.set_phase("Fetching");
        self.progress.start_items(items.len() as u64);

        let outcomes: Vec<_> = stream::iter(items.into_iter().map(|item| self.fetch_item(item, today)))
            .buffer_unordered(self.max_concurrent)
            .collect()
            .await;

        self.progress.done();

        outcomes
    }

    async fn fetch_item(&self, item: TrackedItem, today: NaiveDate) -> ItemOutcome {
        let outcome = match tokio::time::timeout(self.fetch_timeout, self.dispatch(&item, today)).await {
            Ok(outcome) => outcome,
            Err(_) => {
                log::warn!(target: LOG_TARGET, "Fetch for '{}' ({}) timed out", item.name, item.source);
                FetchOutcome::Error(Arc::new(app_err!(
                    "fetch for '{}' timed out after {}s",
                    item.name,
                    self.fetch_timeout.as_secs()
                )))
            }
        };

        let outcome = retain_requested_metrics(outcome, &item);
        self.progress.item_done(&item.name);

        ItemOutcome { item, outcome }
    }

    async fn dispatch(&self, item: &TrackedItem, today: NaiveDate) -> FetchOutcome<Vec<MetricReading>> {
        match item.source {
            Source::PyPi => self.pypi_provider.fetch(&item.name).await,
            Source::Npm => self.npm_provider.fetch(&item.name, today).await,
            Source::GitHub => match RepoRef::parse(&item.name) {
                Ok(repo_ref) => self.github_provider.fetch(&repo_ref, today).await,
                Err(e) => FetchOutcome::Error(Arc::new(e)),
            },
            Source::Discord => self.discord_provider.fetch(&item.name, today).await,
        }
    }
}

/// Drop readings for metrics the item's configuration did not ask for.
fn retain_requested_metrics(outcome: FetchOutcome<Vec<MetricReading>>, item: &TrackedItem) -> FetchOutcome<Vec<MetricReading>> {
    match outcome {
        FetchOutcome::Found(mut readings) => {
            let wanted = item.metric_names();
            readings.retain(|reading| wanted.iter().any(|name| *name == reading.metric));
            FetchOutcome::Found(readings)
        }
        other => other,
    }
}
