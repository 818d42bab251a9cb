//! The `owner/repo` + branch triple identifying what to fetch.

use crate::config::DEFAULT_BRANCH;
use crate::url_model::archive_filename;
use std::fmt;

/// Error for a missing or malformed `owner/repo` argument.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RepoRefError {
    #[error("you must specify an owner/repo as -r argument")]
    Missing,
    #[error("usage: -r owner/repo (got {0:?})")]
    Malformed(String),
}

/// Repository to archive. Immutable for the duration of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoRef {
    pub owner: String,
    pub name: String,
    pub branch: String,
}

impl RepoRef {
    /// Parses `owner/repo`. A trailing `.git` on the repo is dropped; an empty
    /// or absent branch falls back to `master`.
    pub fn parse(input: &str, branch: Option<&str>) -> Result<Self, RepoRefError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(RepoRefError::Missing);
        }
        let malformed = || RepoRefError::Malformed(input.to_string());

        let (owner, name) = input.split_once('/').ok_or_else(malformed)?;
        let owner = owner.trim();
        let name = name.trim();
        let name = name.strip_suffix(".git").unwrap_or(name);
        if owner.is_empty() || name.is_empty() || name.contains('/') {
            return Err(malformed());
        }

        let branch = branch
            .map(str::trim)
            .filter(|b| !b.is_empty())
            .unwrap_or(DEFAULT_BRANCH);

        Ok(Self {
            owner: owner.to_string(),
            name: name.to_string(),
            branch: branch.to_string(),
        })
    }

    /// `owner/repo`, as the user typed it (minus `.git`).
    pub fn slug(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }

    /// Filename of the temporary archive in the working directory.
    pub fn archive_filename(&self) -> String {
        archive_filename(&self.owner, &self.name, &self.branch)
    }
}

impl fmt::Display for RepoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}@{}", self.owner, self.name, self.branch)
    }
}
