use crate::Result;
use crate::fetch::{RepoRef, Source};
use camino::{Utf8Path, Utf8PathBuf};
use ohno::{IntoAppError, app_err, bail};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;

/// The default configuration YAML content, embedded from `default_config.yml`
pub const DEFAULT_CONFIG_YAML: &str = include_str!("../../default_config.yml");

/// File names probed, in order, when no configuration path is given.
pub const DEFAULT_SEARCH_NAMES: &[&str] = &["pulse.yml", "pulse.yaml", "pulse.toml", "pulse.json"];

fn default_data_file() -> Utf8PathBuf {
    Utf8PathBuf::from("data/readings.csv")
}

fn default_report_file() -> Utf8PathBuf {
    Utf8PathBuf::from("README.md")
}

fn default_plots_dir() -> Utf8PathBuf {
    Utf8PathBuf::from("plots")
}

const fn default_fetch_timeout_secs() -> u64 {
    60
}

const fn default_max_concurrent_fetches() -> usize {
    4
}

/// A package or repository being monitored.
///
/// Items are created and removed only by editing the configuration file;
/// nothing mutates them at runtime.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TrackedItem {
    /// Package name, `owner/repo`, or Discord invite code, depending on source.
    pub name: String,

    pub source: Source,

    /// Metric names to collect; defaults to everything the source produces.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metrics: Option<Vec<String>>,

    /// Optional display name for console output.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl TrackedItem {
    /// The metric names to collect for this item.
    #[must_use]
    pub fn metric_names(&self) -> Vec<&str> {
        match &self.metrics {
            Some(metrics) => metrics.iter().map(String::as_str).collect(),
            None => self.source.known_metrics().to_vec(),
        }
    }

    /// The name to show in console output.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.name)
    }
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub items: Vec<TrackedItem>,

    /// CSV file the time series is persisted to.
    #[serde(default = "default_data_file")]
    pub data_file: Utf8PathBuf,

    /// Markdown file the dashboard is rendered to.
    #[serde(default = "default_report_file")]
    pub report_file: Utf8PathBuf,

    /// Directory the external plotting tool writes trend images to.
    #[serde(default = "default_plots_dir")]
    pub plots_dir: Utf8PathBuf,

    /// Per-item fetch timeout in seconds.
    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,

    /// Upper bound on concurrently running fetches.
    #[serde(default = "default_max_concurrent_fetches")]
    pub max_concurrent_fetches: usize,
}

impl Config {
    /// Load and validate a configuration file.
    ///
    /// With no explicit path, the default file names are probed in order.
    /// Returns the configuration together with non-fatal validation warnings.
    pub fn load(explicit: Option<&Utf8Path>) -> Result<(Self, Vec<String>)> {
        let path = match explicit {
            Some(path) => path.to_owned(),
            None => DEFAULT_SEARCH_NAMES
                .iter()
                .map(Utf8PathBuf::from)
                .find(|candidate| candidate.as_std_path().exists())
                .ok_or_else(|| app_err!("no configuration file found: expected one of {}", DEFAULT_SEARCH_NAMES.join(", ")))?,
        };

        let contents =
            fs::read_to_string(path.as_std_path()).into_app_err_with(|| format!("unable to read configuration file '{path}'"))?;

        let config = Self::parse(&contents, path.extension().unwrap_or(""))
            .into_app_err_with(|| format!("unable to parse configuration file '{path}'"))?;

        let warnings = config.validate()?;
        Ok((config, warnings))
    }

    /// Parse configuration text in the format implied by a file extension.
    pub fn parse(contents: &str, extension: &str) -> Result<Self> {
        match extension {
            "yml" | "yaml" => Ok(serde_yaml::from_str(contents)?),
            "toml" => Ok(toml::from_str(contents)?),
            "json" => Ok(serde_json::from_str(contents)?),
            other => bail!("unsupported configuration format '.{other}': expected .yml, .yaml, .toml, or .json"),
        }
    }

    /// Check the configuration for problems.
    ///
    /// Unusable settings are hard errors; suspicious-but-runnable settings
    /// come back as warnings for the caller to surface.
    pub fn validate(&self) -> Result<Vec<String>> {
        if self.fetch_timeout_secs == 0 {
            bail!("fetch_timeout_secs must be greater than zero");
        }
        if self.max_concurrent_fetches == 0 {
            bail!("max_concurrent_fetches must be greater than zero");
        }

        let mut warnings = Vec::new();

        if self.items.is_empty() {
            warnings.push("no tracked items configured; fetch runs will collect nothing".to_string());
        }

        let mut seen = HashSet::new();
        for item in &self.items {
            if item.name.is_empty() {
                bail!("tracked item with empty name");
            }

            if !seen.insert((item.name.as_str(), item.source)) {
                warnings.push(format!("duplicate tracked item '{}' for source {}", item.name, item.source));
            }

            if item.source == Source::GitHub
                && let Err(e) = RepoRef::parse(&item.name)
            {
                warnings.push(e.to_string());
            }

            if let Some(metrics) = &item.metrics {
                if metrics.is_empty() {
                    warnings.push(format!("tracked item '{}' requests no metrics", item.name));
                }
                for metric in metrics {
                    if !item.source.known_metrics().contains(&metric.as_str()) {
                        warnings.push(format!("unknown metric '{metric}' for {} item '{}'", item.source, item.name));
                    }
                }
            }
        }

        Ok(warnings)
    }

    /// Write the embedded default configuration to a file.
    pub fn save_default(path: impl AsRef<Utf8Path>) -> Result<()> {
        let path = path.as_ref();
        fs::write(path.as_std_path(), DEFAULT_CONFIG_YAML)
            .into_app_err_with(|| format!("unable to write configuration file '{path}'"))
    }
}
