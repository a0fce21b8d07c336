use crate::commit::{Commit, CommitId};
use crate::git::GitError;
use crate::operation::MultiCommitOperationKind;
use crate::progress::ProgressSender;
use crate::repository::Repository;
use async_trait::async_trait;
use serde::Serialize;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RebaseError {
    #[error("Git error: {0}")]
    GitError(#[from] GitError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Another rebase is already in progress ({0})")]
    InProgress(String),

    #[error("Rebase exited with {code:?}: {output}")]
    Failed { code: Option<i32>, output: String },
}

/// Outcome of a multi-commit operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum RebaseResult {
    Completed,
    /// The rebase stopped on conflicting changes and is waiting for the user
    ConflictsPending,
    Error,
}

/// Everything the rebase engine needs for one run
#[derive(Debug, Clone, Copy)]
pub struct RebaseRequest<'a> {
    pub repository: &'a Repository,
    /// Todo file that replaces the one git generates
    pub plan_path: &'a Path,
    /// Last commit kept as is, `None` to rebase from the root
    pub baseline: Option<&'a CommitId>,
    pub kind: MultiCommitOperationKind,
    /// Editor git runs when it needs a message after a conflict is resolved
    pub conflict_continuation: Option<&'a str>,
    pub progress: Option<&'a ProgressSender>,
    /// Commits in range before the plan was applied, newest-first
    pub original_commits: &'a [Commit],
}

#[async_trait]
pub trait RebaseExecutor: Send + Sync {
    async fn execute(&self, request: RebaseRequest<'_>) -> Result<RebaseResult, RebaseError>;
}
