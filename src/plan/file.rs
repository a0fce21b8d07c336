use super::types::Plan;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, warn};
use uuid::Uuid;

/// Temporary file holding a serialized plan for one operation.
///
/// The path is freshly allocated on every `acquire`. `release` deletes the
/// file; if the handle goes out of scope without being released (an early
/// return, a panic, a cancelled future) the file is removed on drop.
#[derive(Debug)]
pub struct ScopedPlanFile {
    path: PathBuf,
    released: bool,
}

impl ScopedPlanFile {
    /// Create a new empty file `<dir>/<prefix>-<uuid>`
    pub async fn acquire(dir: &Path, prefix: &str) -> Result<Self, std::io::Error> {
        fs::create_dir_all(dir).await?;

        let path = dir.join(format!("{}-{}", prefix, Uuid::new_v4()));
        fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await?;

        debug!(path = %path.display(), "Acquired plan file");
        Ok(Self {
            path,
            released: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn write(&self, plan: &Plan) -> Result<(), std::io::Error> {
        fs::write(&self.path, plan.to_todo()).await
    }

    /// Delete the file. Failures are logged and swallowed.
    pub async fn release(mut self) {
        self.released = true;
        match fs::remove_file(&self.path).await {
            Ok(()) => debug!(path = %self.path.display(), "Released plan file"),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "Plan file already gone")
            }
            Err(e) => warn!(
                path = %self.path.display(),
                error = %e,
                "Failed to remove plan file"
            ),
        }
    }
}

impl Drop for ScopedPlanFile {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        match std::fs::remove_file(&self.path) {
            Ok(()) => debug!(path = %self.path.display(), "Removed unreleased plan file"),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => warn!(
                path = %self.path.display(),
                error = %e,
                "Failed to remove unreleased plan file"
            ),
        }
    }
}
