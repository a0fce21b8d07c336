use super::progress::ProgressParser;
use super::types::{RebaseError, RebaseExecutor, RebaseRequest, RebaseResult};
use crate::git::{GitError, GitRunner};
use crate::progress::notify;
use async_trait::async_trait;
use std::path::Path;
use std::process::Stdio;
use tokio::io::{AsyncRead, AsyncReadExt};
use tracing::{debug, info, warn};

/// State directories git leaves behind while a rebase is stopped
const REBASE_STATE_DIRS: [&str; 2] = ["rebase-merge", "rebase-apply"];

/// Editor used when the caller gives none, so git never waits on a terminal
const NO_OP_EDITOR: &str = ":";

/// Sequence editor that overwrites git's generated todo list with the plan.
///
/// Git appends the todo path, giving `cat '<plan>' > "<todo>"`.
pub fn sequence_editor_command(plan_path: &Path) -> String {
    let quoted = plan_path.display().to_string().replace('\'', r"'\''");
    format!("cat '{}' >", quoted)
}

/// Runs `git rebase --interactive` with a prepared plan
#[derive(Debug, Clone, Default)]
pub struct GitRebaseExecutor {
    runner: GitRunner,
}

impl GitRebaseExecutor {
    pub fn new(runner: GitRunner) -> Self {
        Self { runner }
    }

    /// Refuse to start while an earlier rebase is still stopped, so its
    /// leftover conflicts are never reported as ours
    async fn ensure_no_rebase_in_progress(
        &self,
        request: &RebaseRequest<'_>,
    ) -> Result<(), RebaseError> {
        let git_dir = self.runner.git_dir(request.repository).await?;
        if let Some(dir) = REBASE_STATE_DIRS
            .iter()
            .map(|name| git_dir.join(name))
            .find(|path| path.exists())
        {
            warn!(kind = %request.kind, state = %dir.display(), "Rebase already in progress");
            return Err(RebaseError::InProgress(dir.display().to_string()));
        }
        Ok(())
    }

    async fn classify_failure(
        &self,
        request: &RebaseRequest<'_>,
        code: Option<i32>,
        stdout: &str,
        stderr: &str,
    ) -> Result<RebaseResult, RebaseError> {
        let git_dir = self.runner.git_dir(request.repository).await?;
        let in_progress = git_dir.join("rebase-merge").exists();

        if in_progress {
            let reported = [stdout, stderr]
                .iter()
                .any(|s| s.contains("CONFLICT") || s.contains("could not apply"));
            let conflicted = self.runner.conflicted_files(request.repository).await?;

            if reported || !conflicted.is_empty() {
                info!(
                    kind = %request.kind,
                    files = conflicted.len(),
                    "Rebase paused on conflicts"
                );
                return Ok(RebaseResult::ConflictsPending);
            }
        }

        warn!(kind = %request.kind, code = ?code, in_progress, "Rebase failed");
        Err(RebaseError::Failed {
            code,
            output: stderr.trim().to_string(),
        })
    }
}

#[async_trait]
impl RebaseExecutor for GitRebaseExecutor {
    async fn execute(&self, request: RebaseRequest<'_>) -> Result<RebaseResult, RebaseError> {
        let base = request
            .baseline
            .map(|sha| sha.to_string())
            .unwrap_or_else(|| "--root".to_string());

        info!(
            repo = %request.repository.name(),
            kind = %request.kind,
            base = %base,
            commits = request.original_commits.len(),
            "Starting interactive rebase"
        );

        self.ensure_no_rebase_in_progress(&request).await?;

        let mut child = self
            .runner
            .command(request.repository)
            .args(["rebase", "--interactive", "--no-autosquash", base.as_str()])
            .env("GIT_SEQUENCE_EDITOR", sequence_editor_command(request.plan_path))
            .env(
                "GIT_EDITOR",
                request.conflict_continuation.unwrap_or(NO_OP_EDITOR),
            )
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| GitError::Spawn {
                program: self.runner.git_path().to_string(),
                source,
            })?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| GitError::InvalidOutput("rebase stdout unavailable".to_string()))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| GitError::InvalidOutput("rebase stderr unavailable".to_string()))?;

        let mut parser = ProgressParser::new(request.kind, request.original_commits);
        let progress = request.progress;

        let (stdout, stderr, status) = tokio::join!(
            scan_lines(stdout, |_| {}),
            scan_lines(stderr, |line| {
                if let Some(update) = parser.parse(line) {
                    debug!(
                        step = update.completed_steps,
                        total = update.total_steps,
                        "Rebase progress"
                    );
                    notify(progress, update);
                }
            }),
            child.wait(),
        );
        let (stdout, stderr, status) = (stdout?, stderr?, status?);

        if status.success() {
            info!(kind = %request.kind, "Rebase completed");
            return Ok(RebaseResult::Completed);
        }

        self.classify_failure(&request, status.code(), &stdout, &stderr)
            .await
    }
}

/// Read a stream to the end, calling `on_line` for every line as it
/// arrives. Git redraws progress with `\r`, so both `\r` and `\n` end a line.
async fn scan_lines<R, F>(mut reader: R, mut on_line: F) -> Result<String, std::io::Error>
where
    R: AsyncRead + Unpin,
    F: FnMut(&str),
{
    let mut all = Vec::new();
    let mut pending = Vec::new();
    let mut buf = [0u8; 4096];

    loop {
        let n = reader.read(&mut buf).await?;
        if n == 0 {
            break;
        }
        all.extend_from_slice(&buf[..n]);

        for &byte in &buf[..n] {
            if byte == b'\r' || byte == b'\n' {
                if !pending.is_empty() {
                    on_line(&*String::from_utf8_lossy(&pending));
                    pending.clear();
                }
            } else {
                pending.push(byte);
            }
        }
    }

    if !pending.is_empty() {
        on_line(&*String::from_utf8_lossy(&pending));
    }

    Ok(String::from_utf8_lossy(&all).to_string())
}
