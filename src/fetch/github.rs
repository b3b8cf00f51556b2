use super::repo_ref::RepoRef;
use super::{FetchOutcome, MetricReading, Source};
use crate::Result;
use chrono::NaiveDate;
use ohno::EnrichableExt;
use octocrab::Octocrab;
use std::sync::Arc;

const LOG_TARGET: &str = "    github";

/// Repository traction snapshots from the GitHub API.
#[derive(Debug, Clone)]
pub struct Provider {
    octocrab: Octocrab,
}

impl Provider {
    /// Create a new GitHub API client.
    ///
    /// A personal access token raises the rate limit from 60 to 5000
    /// requests per hour; no special permissions are needed for public
    /// repositories. `base_uri` overrides the API endpoint, for tests.
    pub fn new(token: Option<&str>, base_uri: Option<&str>) -> Result<Self> {
        let mut builder = Octocrab::builder();

        if let Some(t) = token {
            builder = builder.personal_token(t.to_string());
        }
        if let Some(uri) = base_uri {
            builder = builder.base_uri(uri)?;
        }

        Ok(Self { octocrab: builder.build()? })
    }

    /// Fetch star, fork, and open-issue counts for a repository, dated `today`.
    pub async fn fetch(&self, repo_ref: &RepoRef, today: NaiveDate) -> FetchOutcome<Vec<MetricReading>> {
        log::info!(target: LOG_TARGET, "Querying GitHub for repository '{repo_ref}'");

        let repo = match self.octocrab.repos(repo_ref.owner(), repo_ref.repo()).get().await {
            Ok(repo) => repo,
            Err(octocrab::Error::GitHub { source, .. }) if source.status_code.as_u16() == 404 => {
                log::info!(target: LOG_TARGET, "Repository '{repo_ref}' not found (404)");
                return FetchOutcome::NotFound;
            }
            Err(e) => {
                return FetchOutcome::Error(Arc::new(
                    ohno::AppError::from(e).enrich_with(|| format!("could not fetch repository info for '{repo_ref}'")),
                ));
            }
        };

        let item = repo_ref.to_string();
        let readings = vec![
            MetricReading::new(item.as_str(), Source::GitHub, super::STARS, u64::from(repo.stargazers_count.unwrap_or(0)), today),
            MetricReading::new(item.as_str(), Source::GitHub, super::FORKS, u64::from(repo.forks_count.unwrap_or(0)), today),
            MetricReading::new(
                item.as_str(),
                Source::GitHub,
                super::OPEN_ISSUES,
                u64::from(repo.open_issues_count.unwrap_or(0)),
                today,
            ),
        ];

        FetchOutcome::Found(readings)
    }
}
