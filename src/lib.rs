pub mod commit;
pub mod config;
pub mod git;
pub mod operation;
pub mod plan;
pub mod progress;
pub mod rebase;
pub mod repository;
pub mod utils;

// Re-export commonly used types
pub use commit::{Commit, CommitId, DropSet};
pub use config::{read_config, ConfigError, DropConfig};
pub use git::{CommitRangeResolver, GitError, GitLogResolver, GitRunner};
pub use operation::{
    drop_commits, variant_for, DispatchOutcome, Dispatcher, DropContext, DropError, FlowError,
    FlowStep, MultiCommitOperationFlow, MultiCommitOperationKind, OperationDetail,
    OperationState, OperationVariant,
};
pub use plan::{build_plan, Plan, PlanAction, PlanEntry, ScopedPlanFile};
pub use progress::{progress_channel, ProgressReceiver, ProgressSender, ProgressUpdate};
pub use rebase::{GitRebaseExecutor, RebaseError, RebaseExecutor, RebaseRequest, RebaseResult};
pub use repository::{Repository, RepositoryError};
