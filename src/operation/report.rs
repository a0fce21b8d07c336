use super::drop::DropError;
use super::kind::MultiCommitOperationKind;
use crate::rebase::RebaseResult;
use crate::repository::Repository;
use std::error::Error;
use tracing::error;

/// Render an error and all of its sources as `outer: inner: root`
pub fn error_chain(err: &dyn Error) -> String {
    let mut out = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        out.push_str(": ");
        out.push_str(&cause.to_string());
        source = cause.source();
    }
    out
}

/// Log a failed operation and collapse it into the `Error` outcome
pub fn report_failure(
    repository: &Repository,
    kind: MultiCommitOperationKind,
    err: &DropError,
) -> RebaseResult {
    error!(
        repo = %repository.path().display(),
        kind = %kind,
        error = %error_chain(err),
        details = ?err,
        "Multi-commit operation failed"
    );
    RebaseResult::Error
}
