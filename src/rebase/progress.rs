use crate::commit::Commit;
use crate::operation::MultiCommitOperationKind;
use crate::progress::ProgressUpdate;
use once_cell::sync::Lazy;
use regex::Regex;

static REBASING_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Rebasing \((\d+)/(\d+)\)").expect("valid progress regex"));

/// Extract `(step, total)` from a `Rebasing (n/m)` line
pub fn parse_progress_line(line: &str) -> Option<(usize, usize)> {
    let caps = REBASING_RE.captures(line)?;
    let step = caps.get(1)?.as_str().parse().ok()?;
    let total = caps.get(2)?.as_str().parse().ok()?;
    Some((step, total))
}

/// Turns rebase output into progress updates.
///
/// Step `n` of the todo list is the n-th oldest of the original commits.
pub struct ProgressParser<'a> {
    kind: MultiCommitOperationKind,
    original_commits: &'a [Commit],
    last_step: usize,
}

impl<'a> ProgressParser<'a> {
    pub fn new(kind: MultiCommitOperationKind, original_commits: &'a [Commit]) -> Self {
        Self {
            kind,
            original_commits,
            last_step: 0,
        }
    }

    /// Returns an update for a new step; repeated lines for a step yield nothing
    pub fn parse(&mut self, line: &str) -> Option<ProgressUpdate> {
        let (step, total) = parse_progress_line(line)?;
        if step <= self.last_step {
            return None;
        }
        self.last_step = step;

        let summary = self
            .original_commits
            .len()
            .checked_sub(step)
            .and_then(|i| self.original_commits.get(i))
            .map(|c| c.summary.as_str());

        let description = match summary {
            Some(summary) => format!("{}: {}", self.kind.progress_title(), summary),
            None => format!("{}: step {} of {}", self.kind.progress_title(), step, total),
        };

        Some(ProgressUpdate::new(step, total, description))
    }
}
