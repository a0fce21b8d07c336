//! Thin async wrapper around the `git` executable.

mod log;

pub use log::{parse_log_output, rev_range, CommitRangeResolver, GitLogResolver};

use crate::repository::Repository;
use std::path::PathBuf;
use std::process::Stdio;
use thiserror::Error;
use tokio::process::Command;
use tracing::debug;

#[derive(Error, Debug)]
pub enum GitError {
    #[error("Failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("git {args} exited with {code:?}: {stderr}")]
    CommandFailed {
        args: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("Unexpected git output: {0}")]
    InvalidOutput(String),
}

/// Runs git commands against a repository
#[derive(Debug, Clone)]
pub struct GitRunner {
    git_path: String,
}

impl Default for GitRunner {
    fn default() -> Self {
        Self::new("git")
    }
}

impl GitRunner {
    pub fn new(git_path: impl Into<String>) -> Self {
        Self {
            git_path: git_path.into(),
        }
    }

    pub fn git_path(&self) -> &str {
        &self.git_path
    }

    /// A `git` command rooted at the repository with a stable locale.
    /// Callers add arguments, environment and stdio.
    pub fn command(&self, repository: &Repository) -> Command {
        let mut cmd = Command::new(&self.git_path);
        cmd.current_dir(repository.path())
            .env("LC_ALL", "C")
            .stdin(Stdio::null());
        cmd
    }

    /// Run a command to completion and return its stdout
    pub async fn run(&self, repository: &Repository, args: &[&str]) -> Result<String, GitError> {
        debug!(repo = %repository.path().display(), args = ?args, "Running git");

        let output = self
            .command(repository)
            .args(args)
            .output()
            .await
            .map_err(|source| GitError::Spawn {
                program: self.git_path.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(GitError::CommandFailed {
                args: args.join(" "),
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }

    /// Absolute path of the repository's git directory
    pub async fn git_dir(&self, repository: &Repository) -> Result<PathBuf, GitError> {
        let out = self.run(repository, &["rev-parse", "--git-dir"]).await?;
        let dir = out.trim();
        if dir.is_empty() {
            return Err(GitError::InvalidOutput("empty --git-dir".to_string()));
        }
        Ok(repository.path().join(dir))
    }

    /// Short name of the checked out branch, `None` when HEAD is detached
    pub async fn current_branch(&self, repository: &Repository) -> Result<Option<String>, GitError> {
        match self
            .run(repository, &["symbolic-ref", "--quiet", "--short", "HEAD"])
            .await
        {
            Ok(out) => Ok(Some(out.trim().to_string())),
            Err(GitError::CommandFailed { code: Some(1), .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Paths with unresolved merge conflicts in the index
    pub async fn conflicted_files(&self, repository: &Repository) -> Result<Vec<String>, GitError> {
        let out = self
            .run(repository, &["diff", "--name-only", "--diff-filter=U"])
            .await?;
        Ok(out
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect())
    }
}
