mod dispatch;
mod drop;
mod flow;
mod kind;
mod report;
mod variant;

pub use dispatch::{DispatchOutcome, Dispatcher};
pub use drop::{drop_commits, DropContext, DropError};
pub use flow::{FlowError, FlowStep, MultiCommitOperationFlow, OperationDetail, OperationState};
pub use kind::MultiCommitOperationKind;
pub use report::{error_chain, report_failure};
pub use variant::{variant_for, DropVariant, OperationVariant};
