use super::dispatch::Dispatcher;
use super::kind::MultiCommitOperationKind;
use super::variant::{variant_for, OperationVariant};
use crate::commit::{Commit, CommitId};
use crate::rebase::RebaseResult;
use crate::repository::Repository;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Error, Debug, PartialEq, Eq)]
pub enum FlowError {
    #[error("Operation state is {actual}, expected {expected}")]
    InvalidState {
        expected: MultiCommitOperationKind,
        actual: MultiCommitOperationKind,
    },

    #[error("Unsupported operation: {0}")]
    UnsupportedKind(MultiCommitOperationKind),
}

/// What the user asked for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationDetail {
    Drop {
        commits: Vec<Commit>,
        /// `None` when dropping back to the root commit
        last_retained_commit_ref: Option<CommitId>,
    },
    /// An operation driven by another flow
    Other(MultiCommitOperationKind),
}

impl OperationDetail {
    pub fn kind(&self) -> MultiCommitOperationKind {
        match self {
            OperationDetail::Drop { .. } => MultiCommitOperationKind::Drop,
            OperationDetail::Other(kind) => *kind,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationState {
    pub detail: OperationDetail,
    /// Branch being rewritten, `None` on a detached HEAD
    pub target_branch: Option<String>,
}

/// Where the flow goes after the operation returns
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowStep {
    /// State did not match the flow; the flow was ended without running anything
    InvalidState,
    Completed,
    Failed,
    /// Hand over to conflict resolution
    Conflicts {
        title: String,
        continue_automatically: bool,
    },
}

/// Drives one multi-commit operation from start to its first stop
pub struct MultiCommitOperationFlow {
    variant: Box<dyn OperationVariant>,
    dispatcher: Arc<Dispatcher>,
    repository: Repository,
    state: OperationState,
    ended: bool,
}

impl MultiCommitOperationFlow {
    pub fn new(
        kind: MultiCommitOperationKind,
        dispatcher: Arc<Dispatcher>,
        repository: Repository,
        state: OperationState,
    ) -> Result<Self, FlowError> {
        let variant = variant_for(kind).ok_or(FlowError::UnsupportedKind(kind))?;
        Ok(Self {
            variant,
            dispatcher,
            repository,
            state,
            ended: false,
        })
    }

    pub fn is_ended(&self) -> bool {
        self.ended
    }

    pub fn conflict_dialog_title(&self) -> String {
        format!(
            "{} {}",
            self.variant.conflict_dialog_prefix(),
            self.state.target_branch.as_deref().unwrap_or("HEAD")
        )
    }

    pub async fn begin(&mut self) -> FlowStep {
        let begun = self
            .variant
            .begin_operation(&self.dispatcher, &self.repository, &self.state)
            .await;

        let outcome = match begun {
            Ok(outcome) => outcome,
            Err(e) => {
                self.end_flow_invalid_state(&e);
                return FlowStep::InvalidState;
            }
        };

        let step = match outcome.result {
            RebaseResult::Completed => FlowStep::Completed,
            RebaseResult::Error => FlowStep::Failed,
            RebaseResult::ConflictsPending => FlowStep::Conflicts {
                title: self.conflict_dialog_title(),
                continue_automatically: outcome.continue_automatically,
            },
        };

        info!(kind = %self.variant.kind(), step = ?step, "Operation returned");

        // A conflict pause leaves the flow open for the resolution step
        if !matches!(step, FlowStep::Conflicts { .. }) {
            self.ended = true;
        }
        step
    }

    fn end_flow_invalid_state(&mut self, err: &FlowError) {
        warn!(error = %err, "Ending operation flow in invalid state");
        self.ended = true;
    }
}
