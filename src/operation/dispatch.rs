use super::drop::DropContext;
use crate::commit::{Commit, CommitId};
use crate::progress::ProgressSender;
use crate::rebase::RebaseResult;
use crate::repository::Repository;
use tracing::info;

/// Result of a dispatched operation plus how a later conflict
/// resolution should proceed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchOutcome {
    pub result: RebaseResult,
    /// Continue the rebase without asking once all conflicts are resolved
    pub continue_automatically: bool,
}

/// Entry point the operation flows call into
pub struct Dispatcher {
    context: DropContext,
    progress: Option<ProgressSender>,
}

impl Dispatcher {
    pub fn new(context: DropContext) -> Self {
        Self {
            context,
            progress: None,
        }
    }

    /// Forward progress of every dispatched operation to `sender`
    pub fn with_progress(mut self, sender: ProgressSender) -> Self {
        self.progress = Some(sender);
        self
    }

    pub async fn drop_commits(
        &self,
        repository: &Repository,
        commits: &[Commit],
        last_retained: Option<&CommitId>,
        continue_on_conflict_automatically: bool,
    ) -> DispatchOutcome {
        info!(
            repo = %repository.name(),
            count = commits.len(),
            base = %last_retained.map(|s| s.short()).unwrap_or("root"),
            "Dispatching drop"
        );

        let result = self
            .context
            .drop_commits(repository, commits, last_retained, self.progress.clone())
            .await;

        DispatchOutcome {
            result,
            continue_automatically: continue_on_conflict_automatically,
        }
    }
}
