mod executor;
mod progress;
mod types;

pub use executor::{sequence_editor_command, GitRebaseExecutor};
pub use progress::{parse_progress_line, ProgressParser};
pub use types::{RebaseError, RebaseExecutor, RebaseRequest, RebaseResult};
