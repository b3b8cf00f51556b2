use crate::Result;
use core::fmt::{Display, Formatter};
use ohno::bail;

/// A GitHub repository reference in `owner/repo` form, as written in the
/// configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepoRef {
    owner: Box<str>,
    repo: Box<str>,
}

impl RepoRef {
    pub fn parse(name: &str) -> Result<Self> {
        let mut segments = name.split('/');
        let (Some(owner), Some(repo), None) = (segments.next(), segments.next(), segments.next()) else {
            bail!("invalid GitHub repository '{name}': expected 'owner/repo'");
        };

        if owner.is_empty() || repo.is_empty() {
            bail!("invalid GitHub repository '{name}': empty owner or repo name");
        }

        Ok(Self {
            owner: Box::from(owner),
            repo: Box::from(repo.trim_end_matches(".git")),
        })
    }

    #[must_use]
    pub fn owner(&self) -> &str {
        &self.owner
    }

    #[must_use]
    pub fn repo(&self) -> &str {
        &self.repo
    }
}

impl Display for RepoRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}
