use super::dispatch::{DispatchOutcome, Dispatcher};
use super::flow::{FlowError, OperationDetail, OperationState};
use super::kind::MultiCommitOperationKind;
use crate::repository::Repository;
use async_trait::async_trait;

/// Kind-specific hooks of a multi-commit operation flow
#[async_trait]
pub trait OperationVariant: Send + Sync {
    fn kind(&self) -> MultiCommitOperationKind;

    /// Conflict dialog title prefix, completed with the branch name
    fn conflict_dialog_prefix(&self) -> &'static str;

    /// Start the operation described by `state`
    async fn begin_operation(
        &self,
        dispatcher: &Dispatcher,
        repository: &Repository,
        state: &OperationState,
    ) -> Result<DispatchOutcome, FlowError>;
}

pub struct DropVariant;

#[async_trait]
impl OperationVariant for DropVariant {
    fn kind(&self) -> MultiCommitOperationKind {
        MultiCommitOperationKind::Drop
    }

    fn conflict_dialog_prefix(&self) -> &'static str {
        "dropping commits on"
    }

    async fn begin_operation(
        &self,
        dispatcher: &Dispatcher,
        repository: &Repository,
        state: &OperationState,
    ) -> Result<DispatchOutcome, FlowError> {
        let OperationDetail::Drop {
            commits,
            last_retained_commit_ref,
        } = &state.detail
        else {
            return Err(FlowError::InvalidState {
                expected: self.kind(),
                actual: state.detail.kind(),
            });
        };

        Ok(dispatcher
            .drop_commits(repository, commits, last_retained_commit_ref.as_ref(), true)
            .await)
    }
}

/// Hooks for `kind`, if this crate runs that operation
pub fn variant_for(kind: MultiCommitOperationKind) -> Option<Box<dyn OperationVariant>> {
    match kind {
        MultiCommitOperationKind::Drop => Some(Box::new(DropVariant)),
        _ => None,
    }
}
