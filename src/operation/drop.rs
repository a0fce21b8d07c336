use super::kind::MultiCommitOperationKind;
use super::report::report_failure;
use crate::commit::{Commit, CommitId, DropSet};
use crate::config::DropConfig;
use crate::git::{CommitRangeResolver, GitError, GitLogResolver, GitRunner};
use crate::plan::{build_plan, Plan, ScopedPlanFile};
use crate::progress::ProgressSender;
use crate::rebase::{GitRebaseExecutor, RebaseError, RebaseExecutor, RebaseRequest, RebaseResult};
use crate::repository::Repository;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum DropError {
    #[error("No commits provided to drop")]
    NoCommitsToDrop,

    #[error("Could not resolve commit range: {0}")]
    ResolveError(#[from] GitError),

    #[error("Could not find commits in log after {0}")]
    EmptyRange(String),

    #[error("Plan file error: {0}")]
    PlanFileError(#[from] std::io::Error),

    #[error("Rebase error: {0}")]
    RebaseError(#[from] RebaseError),
}

/// Collaborators and settings for dropping commits
#[derive(Clone)]
pub struct DropContext {
    resolver: Arc<dyn CommitRangeResolver>,
    executor: Arc<dyn RebaseExecutor>,
    plan_dir: PathBuf,
    plan_file_prefix: String,
}

impl DropContext {
    pub fn new(
        resolver: Arc<dyn CommitRangeResolver>,
        executor: Arc<dyn RebaseExecutor>,
        plan_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            resolver,
            executor,
            plan_dir: plan_dir.into(),
            plan_file_prefix: DropConfig::default().plan_file_prefix,
        }
    }

    /// Git-backed context built from configuration
    pub fn from_config(config: &DropConfig) -> Self {
        let runner = GitRunner::new(config.git_path.clone());
        Self {
            resolver: Arc::new(GitLogResolver::new(runner.clone())),
            executor: Arc::new(GitRebaseExecutor::new(runner)),
            plan_dir: config.plan_dir(),
            plan_file_prefix: config.plan_file_prefix.clone(),
        }
    }

    pub fn with_plan_file_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.plan_file_prefix = prefix.into();
        self
    }

    pub fn plan_dir(&self) -> &Path {
        &self.plan_dir
    }

    /// Drop `to_drop` from the history after `last_retained`.
    ///
    /// Never fails: every error is logged and reported as
    /// `RebaseResult::Error`. The plan file is gone by the time this returns.
    pub async fn drop_commits(
        &self,
        repository: &Repository,
        to_drop: &[Commit],
        last_retained: Option<&CommitId>,
        progress: Option<ProgressSender>,
    ) -> RebaseResult {
        match self
            .try_drop(repository, to_drop, last_retained, progress.as_ref())
            .await
        {
            Ok(result) => result,
            Err(e) => report_failure(repository, MultiCommitOperationKind::Drop, &e),
        }
    }

    async fn try_drop(
        &self,
        repository: &Repository,
        to_drop: &[Commit],
        last_retained: Option<&CommitId>,
        progress: Option<&ProgressSender>,
    ) -> Result<RebaseResult, DropError> {
        let drop_set = DropSet::from_commits(to_drop);
        if drop_set.is_empty() {
            return Err(DropError::NoCommitsToDrop);
        }

        let commits = self.resolver.resolve(repository, last_retained).await?;
        if commits.is_empty() {
            return Err(DropError::EmptyRange(
                last_retained
                    .map(|sha| sha.to_string())
                    .unwrap_or_else(|| "root".to_string()),
            ));
        }

        let plan = build_plan(&commits, &drop_set);
        info!(
            repo = %repository.name(),
            commits = plan.entries.len(),
            requested = drop_set.len(),
            dropping = plan.dropped().count(),
            "Built drop plan"
        );

        let file = ScopedPlanFile::acquire(&self.plan_dir, &self.plan_file_prefix).await?;
        let outcome = self
            .write_and_execute(&file, &plan, repository, last_retained, progress, &commits)
            .await;
        file.release().await;

        outcome
    }

    async fn write_and_execute(
        &self,
        file: &ScopedPlanFile,
        plan: &Plan,
        repository: &Repository,
        last_retained: Option<&CommitId>,
        progress: Option<&ProgressSender>,
        original_commits: &[Commit],
    ) -> Result<RebaseResult, DropError> {
        file.write(plan).await?;

        let result = self
            .executor
            .execute(RebaseRequest {
                repository,
                plan_path: file.path(),
                baseline: last_retained,
                kind: MultiCommitOperationKind::Drop,
                conflict_continuation: None,
                progress,
                original_commits,
            })
            .await?;

        Ok(result)
    }
}

/// Drop commits using git from PATH and the system temp dir
pub async fn drop_commits(
    repository: &Repository,
    to_drop: &[Commit],
    last_retained: Option<&CommitId>,
    progress: Option<ProgressSender>,
) -> RebaseResult {
    DropContext::from_config(&DropConfig::default())
        .drop_commits(repository, to_drop, last_retained, progress)
        .await
}
