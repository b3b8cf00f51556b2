use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Metric name for per-day download counts (PyPI and npm).
pub const DAILY_DOWNLOADS: &str = "Daily Downloads";

/// Metric name for GitHub stargazer counts.
pub const STARS: &str = "Stars";

/// Metric name for GitHub fork counts.
pub const FORKS: &str = "Forks";

/// Metric name for GitHub open issue counts.
pub const OPEN_ISSUES: &str = "Open Issues";

/// Metric name for Discord member counts.
pub const MEMBERS: &str = "Members";

/// Metric name for Discord online presence counts.
pub const ONLINE: &str = "Online";

/// Metric names understood by the PyPI fetcher.
pub const PYPI_METRICS: &[&str] = &[DAILY_DOWNLOADS];

/// Metric names understood by the npm fetcher.
pub const NPM_METRICS: &[&str] = &[DAILY_DOWNLOADS];

/// Metric names understood by the GitHub fetcher.
pub const GITHUB_METRICS: &[&str] = &[STARS, FORKS, OPEN_ISSUES];

/// Metric names understood by the Discord fetcher.
pub const DISCORD_METRICS: &[&str] = &[MEMBERS, ONLINE];

/// A metric source that readings are collected from.
///
/// The lowercase serde names are what appears in configuration files and in
/// the store's CSV rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display, EnumIter, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Source {
    PyPi,
    Npm,
    GitHub,
    Discord,
}

impl Source {
    /// The metric names a source can produce.
    #[must_use]
    pub const fn known_metrics(self) -> &'static [&'static str] {
        match self {
            Self::PyPi => PYPI_METRICS,
            Self::Npm => NPM_METRICS,
            Self::GitHub => GITHUB_METRICS,
            Self::Discord => DISCORD_METRICS,
        }
    }
}
