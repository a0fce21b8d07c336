use serde::{Deserialize, Serialize};
use std::fmt;

/// Tag identifying which multi-commit operation is running
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MultiCommitOperationKind {
    Drop,
    Squash,
    Reorder,
    Reword,
}

impl MultiCommitOperationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MultiCommitOperationKind::Drop => "drop",
            MultiCommitOperationKind::Squash => "squash",
            MultiCommitOperationKind::Reorder => "reorder",
            MultiCommitOperationKind::Reword => "reword",
        }
    }

    /// Prefix for progress descriptions
    pub fn progress_title(&self) -> &'static str {
        match self {
            MultiCommitOperationKind::Drop => "Dropping commits",
            MultiCommitOperationKind::Squash => "Squashing commits",
            MultiCommitOperationKind::Reorder => "Reordering commits",
            MultiCommitOperationKind::Reword => "Rewording commit",
        }
    }
}

impl fmt::Display for MultiCommitOperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
