use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Full object name of a commit
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommitId(String);

impl CommitId {
    pub fn new(sha: impl Into<String>) -> Self {
        Self(sha.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Abbreviated form used in log output
    pub fn short(&self) -> &str {
        let end = self.0.len().min(7);
        self.0.get(..end).unwrap_or(&self.0)
    }
}

impl fmt::Display for CommitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CommitId {
    fn from(sha: &str) -> Self {
        Self::new(sha)
    }
}

impl From<String> for CommitId {
    fn from(sha: String) -> Self {
        Self(sha)
    }
}

/// A commit as reported by the history query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Commit {
    pub sha: CommitId,
    /// First line of the commit message
    pub summary: String,
}

impl Commit {
    pub fn new(sha: impl Into<CommitId>, summary: impl Into<String>) -> Self {
        Self {
            sha: sha.into(),
            summary: summary.into(),
        }
    }
}

/// Commits selected for removal, keyed by sha.
///
/// Ids that never show up in the resolved range are simply never matched.
#[derive(Debug, Clone, Default)]
pub struct DropSet {
    shas: HashSet<CommitId>,
}

impl DropSet {
    pub fn from_commits(commits: &[Commit]) -> Self {
        Self {
            shas: commits.iter().map(|c| c.sha.clone()).collect(),
        }
    }

    pub fn contains(&self, sha: &CommitId) -> bool {
        self.shas.contains(sha)
    }

    pub fn is_empty(&self) -> bool {
        self.shas.is_empty()
    }

    pub fn len(&self) -> usize {
        self.shas.len()
    }
}

impl FromIterator<CommitId> for DropSet {
    fn from_iter<I: IntoIterator<Item = CommitId>>(iter: I) -> Self {
        Self {
            shas: iter.into_iter().collect(),
        }
    }
}
