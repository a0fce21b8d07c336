mod types;

pub use types::{Commit, CommitId, DropSet};
