#![allow(dead_code)]

use async_trait::async_trait;
use rebase_drop::{
    Commit, CommitId, CommitRangeResolver, GitError, ProgressUpdate, RebaseError,
    RebaseExecutor, RebaseRequest, RebaseResult, Repository,
};
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use tempfile::TempDir;

/// Create a temporary directory for testing
pub fn create_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// Entries left in a directory
pub fn dir_entries(dir: &Path) -> Vec<PathBuf> {
    std::fs::read_dir(dir)
        .expect("Failed to read dir")
        .map(|e| e.expect("Failed to read entry").path())
        .collect()
}

/// The three-commit history used across tests, newest-first
pub fn sample_history() -> Vec<Commit> {
    vec![
        Commit::new("C3", "c3"),
        Commit::new("C2", "c2"),
        Commit::new("C1", "c1"),
    ]
}

/// Resolver returning a fixed list and counting calls
pub struct MockResolver {
    commits: Result<Vec<Commit>, String>,
    pub calls: AtomicUsize,
    pub last_baseline: Mutex<Option<Option<CommitId>>>,
}

impl MockResolver {
    pub fn returning(commits: Vec<Commit>) -> Self {
        Self {
            commits: Ok(commits),
            calls: AtomicUsize::new(0),
            last_baseline: Mutex::new(None),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            commits: Err(message.to_string()),
            calls: AtomicUsize::new(0),
            last_baseline: Mutex::new(None),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CommitRangeResolver for MockResolver {
    async fn resolve(
        &self,
        _repository: &Repository,
        last_retained: Option<&CommitId>,
    ) -> Result<Vec<Commit>, GitError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_baseline.lock().unwrap() = Some(last_retained.cloned());
        self.commits
            .clone()
            .map_err(GitError::InvalidOutput)
    }
}

/// What the executor should do when called
#[derive(Clone)]
pub enum ExecutorBehavior {
    Return(RebaseResult),
    Fail,
    Panic,
}

/// Executor that records the plan it was handed
pub struct MockExecutor {
    behavior: ExecutorBehavior,
    progress: Vec<ProgressUpdate>,
    pub calls: AtomicUsize,
    pub seen_plan: Mutex<Option<String>>,
    pub seen_plan_path: Mutex<Option<PathBuf>>,
    pub seen_baseline: Mutex<Option<Option<CommitId>>>,
    pub seen_original_commits: Mutex<Vec<Commit>>,
}

impl MockExecutor {
    pub fn new(behavior: ExecutorBehavior) -> Self {
        Self {
            behavior,
            progress: Vec::new(),
            calls: AtomicUsize::new(0),
            seen_plan: Mutex::new(None),
            seen_plan_path: Mutex::new(None),
            seen_baseline: Mutex::new(None),
            seen_original_commits: Mutex::new(Vec::new()),
        }
    }

    pub fn returning(result: RebaseResult) -> Self {
        Self::new(ExecutorBehavior::Return(result))
    }

    /// Push these updates before returning
    pub fn with_progress(mut self, updates: Vec<ProgressUpdate>) -> Self {
        self.progress = updates;
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn plan(&self) -> Option<String> {
        self.seen_plan.lock().unwrap().clone()
    }

    pub fn plan_path(&self) -> Option<PathBuf> {
        self.seen_plan_path.lock().unwrap().clone()
    }
}

#[async_trait]
impl RebaseExecutor for MockExecutor {
    async fn execute(&self, request: RebaseRequest<'_>) -> Result<RebaseResult, RebaseError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.seen_plan.lock().unwrap() = std::fs::read_to_string(request.plan_path).ok();
        *self.seen_plan_path.lock().unwrap() = Some(request.plan_path.to_path_buf());
        *self.seen_baseline.lock().unwrap() = Some(request.baseline.cloned());
        *self.seen_original_commits.lock().unwrap() = request.original_commits.to_vec();

        if let Some(tx) = request.progress {
            for update in &self.progress {
                let _ = tx.send(update.clone());
            }
        }

        match &self.behavior {
            ExecutorBehavior::Return(result) => Ok(*result),
            ExecutorBehavior::Fail => Err(RebaseError::Failed {
                code: Some(128),
                output: "fatal: simulated failure".to_string(),
            }),
            ExecutorBehavior::Panic => panic!("executor blew up"),
        }
    }
}

/// Whether a usable git binary is on PATH
pub fn has_git() -> bool {
    Command::new("git")
        .arg("--version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

/// Run git in `dir`, panicking on failure, and return trimmed stdout
pub fn git(dir: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .env("GIT_AUTHOR_NAME", "Test")
        .env("GIT_AUTHOR_EMAIL", "test@example.com")
        .env("GIT_COMMITTER_NAME", "Test")
        .env("GIT_COMMITTER_EMAIL", "test@example.com")
        .output()
        .expect("Failed to run git");
    assert!(
        output.status.success(),
        "git {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

/// Initialize an empty repository on branch `main`
pub fn init_repo(dir: &Path) {
    git(dir, &["init", "--quiet"]);
    git(dir, &["checkout", "--quiet", "-b", "main"]);
    git(dir, &["config", "user.name", "Test"]);
    git(dir, &["config", "user.email", "test@example.com"]);
    git(dir, &["config", "commit.gpgsign", "false"]);
}

/// Write `content` to `file` and commit it; returns the new sha
pub fn commit_file(dir: &Path, file: &str, content: &str, message: &str) -> String {
    std::fs::write(dir.join(file), content).expect("Failed to write file");
    git(dir, &["add", file]);
    git(dir, &["commit", "--quiet", "-m", message]);
    git(dir, &["rev-parse", "HEAD"])
}

/// Subjects on HEAD, newest-first
pub fn log_subjects(dir: &Path) -> Vec<String> {
    git(dir, &["log", "--format=%s"])
        .lines()
        .map(str::to_string)
        .collect()
}
