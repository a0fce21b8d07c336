use super::types::{Plan, PlanAction, PlanEntry};
use crate::commit::{Commit, DropSet};
use std::collections::VecDeque;

/// Build the rebase plan for a newest-first commit list.
///
/// Each commit is pushed to the front, so the plan comes out oldest-first
/// and holds exactly one entry per resolved commit. The caller guarantees
/// `to_drop` is non-empty.
pub fn build_plan(resolved: &[Commit], to_drop: &DropSet) -> Plan {
    let mut entries = VecDeque::with_capacity(resolved.len());

    for commit in resolved {
        let action = if to_drop.contains(&commit.sha) {
            PlanAction::Drop
        } else {
            PlanAction::Pick
        };

        entries.push_front(PlanEntry {
            action,
            sha: commit.sha.clone(),
            summary: commit.summary.clone(),
        });
    }

    Plan {
        entries: entries.into(),
    }
}
