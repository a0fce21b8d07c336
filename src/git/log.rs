use super::{GitError, GitRunner};
use crate::commit::{Commit, CommitId};
use crate::repository::Repository;
use async_trait::async_trait;
use tracing::debug;

/// Field separator in the log format, git's `%x00`
const FIELD_SEPARATOR: char = '\0';

/// Turns a baseline into the commits that come after it.
///
/// Commits are returned newest-first and cover `(last_retained, HEAD]`.
/// `None` means the whole history back to the root commit.
#[async_trait]
pub trait CommitRangeResolver: Send + Sync {
    async fn resolve(
        &self,
        repository: &Repository,
        last_retained: Option<&CommitId>,
    ) -> Result<Vec<Commit>, GitError>;
}

/// `from..to` revision range
pub fn rev_range(from: &str, to: &str) -> String {
    format!("{}..{}", from, to)
}

/// Parse `git log --format=%H%x00%s` output
pub fn parse_log_output(output: &str) -> Result<Vec<Commit>, GitError> {
    output
        .lines()
        .filter(|line| !line.is_empty())
        .map(|line| {
            let (sha, summary) = line
                .split_once(FIELD_SEPARATOR)
                .ok_or_else(|| GitError::InvalidOutput(line.to_string()))?;
            if sha.is_empty() {
                return Err(GitError::InvalidOutput(line.to_string()));
            }
            Ok(Commit::new(sha, summary))
        })
        .collect()
}

/// Resolves ranges with `git log`
#[derive(Debug, Clone, Default)]
pub struct GitLogResolver {
    runner: GitRunner,
}

impl GitLogResolver {
    pub fn new(runner: GitRunner) -> Self {
        Self { runner }
    }
}

#[async_trait]
impl CommitRangeResolver for GitLogResolver {
    async fn resolve(
        &self,
        repository: &Repository,
        last_retained: Option<&CommitId>,
    ) -> Result<Vec<Commit>, GitError> {
        let range = match last_retained {
            Some(sha) => rev_range(sha.as_str(), "HEAD"),
            None => "HEAD".to_string(),
        };

        let output = self
            .runner
            .run(
                repository,
                &["log", "--no-color", "--format=%H%x00%s", range.as_str(), "--"],
            )
            .await?;

        let commits = parse_log_output(&output)?;
        debug!(range = %range, count = commits.len(), "Resolved commit range");
        Ok(commits)
    }
}
