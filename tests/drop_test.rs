mod common;

use common::{
    create_test_dir, dir_entries, sample_history, ExecutorBehavior, MockExecutor, MockResolver,
};
use rebase_drop::{
    progress_channel, Commit, CommitId, DropContext, ProgressUpdate, RebaseResult, Repository,
};
use std::sync::Arc;

struct Harness {
    _repo_dir: tempfile::TempDir,
    plan_dir: tempfile::TempDir,
    repository: Repository,
    resolver: Arc<MockResolver>,
    executor: Arc<MockExecutor>,
    context: DropContext,
}

fn harness(resolver: MockResolver, executor: MockExecutor) -> Harness {
    let repo_dir = create_test_dir();
    let plan_dir = create_test_dir();
    let repository = Repository::open(repo_dir.path()).expect("Should open repository");
    let resolver = Arc::new(resolver);
    let executor = Arc::new(executor);
    let context = DropContext::new(resolver.clone(), executor.clone(), plan_dir.path());

    Harness {
        _repo_dir: repo_dir,
        plan_dir,
        repository,
        resolver,
        executor,
        context,
    }
}

#[tokio::test]
async fn test_drop_middle_commit_builds_oldest_first_plan() {
    let h = harness(
        MockResolver::returning(sample_history()),
        MockExecutor::returning(RebaseResult::Completed),
    );
    let base = CommitId::from("C0");

    let result = h
        .context
        .drop_commits(&h.repository, &[Commit::new("C2", "c2")], Some(&base), None)
        .await;

    assert_eq!(result, RebaseResult::Completed);
    assert_eq!(
        h.executor.plan().as_deref(),
        Some("pick C1 c1\ndrop C2 c2\npick C3 c3")
    );
    assert_eq!(
        *h.executor.seen_baseline.lock().unwrap(),
        Some(Some(base.clone()))
    );
    assert_eq!(
        *h.resolver.last_baseline.lock().unwrap(),
        Some(Some(base))
    );
    // Original commits are passed through untouched, newest-first
    assert_eq!(*h.executor.seen_original_commits.lock().unwrap(), sample_history());
}

#[tokio::test]
async fn test_plan_file_removed_after_completion() {
    let h = harness(
        MockResolver::returning(sample_history()),
        MockExecutor::returning(RebaseResult::Completed),
    );

    h.context
        .drop_commits(&h.repository, &[Commit::new("C1", "c1")], None, None)
        .await;

    let path = h.executor.plan_path().expect("Executor should see a plan path");
    assert!(path.starts_with(h.plan_dir.path()));
    assert!(!path.exists(), "Plan file should be deleted");
    assert!(dir_entries(h.plan_dir.path()).is_empty());
}

#[tokio::test]
async fn test_empty_drop_set_is_error_without_io() {
    let h = harness(
        MockResolver::returning(sample_history()),
        MockExecutor::returning(RebaseResult::Completed),
    );

    let result = h.context.drop_commits(&h.repository, &[], None, None).await;

    assert_eq!(result, RebaseResult::Error);
    assert_eq!(h.resolver.call_count(), 0, "Resolver should not be called");
    assert_eq!(h.executor.call_count(), 0);
    assert!(dir_entries(h.plan_dir.path()).is_empty(), "No plan file created");
}

#[tokio::test]
async fn test_empty_range_is_error_without_plan_file() {
    let h = harness(
        MockResolver::returning(vec![]),
        MockExecutor::returning(RebaseResult::Completed),
    );
    let base = CommitId::from("missing");

    let result = h
        .context
        .drop_commits(&h.repository, &[Commit::new("C2", "c2")], Some(&base), None)
        .await;

    assert_eq!(result, RebaseResult::Error);
    assert_eq!(h.resolver.call_count(), 1);
    assert_eq!(h.executor.call_count(), 0);
    assert!(dir_entries(h.plan_dir.path()).is_empty());
}

#[tokio::test]
async fn test_resolver_failure_is_error() {
    let h = harness(
        MockResolver::failing("bad revision"),
        MockExecutor::returning(RebaseResult::Completed),
    );

    let result = h
        .context
        .drop_commits(&h.repository, &[Commit::new("C2", "c2")], None, None)
        .await;

    assert_eq!(result, RebaseResult::Error);
    assert_eq!(h.executor.call_count(), 0);
    assert!(dir_entries(h.plan_dir.path()).is_empty());
}

#[tokio::test]
async fn test_conflicts_pending_is_forwarded_and_file_removed() {
    let h = harness(
        MockResolver::returning(sample_history()),
        MockExecutor::returning(RebaseResult::ConflictsPending),
    );

    let result = h
        .context
        .drop_commits(&h.repository, &[Commit::new("C2", "c2")], None, None)
        .await;

    assert_eq!(result, RebaseResult::ConflictsPending);
    assert!(!h.executor.plan_path().unwrap().exists());
}

#[tokio::test]
async fn test_executor_error_is_error_and_file_removed() {
    let h = harness(
        MockResolver::returning(sample_history()),
        MockExecutor::new(ExecutorBehavior::Fail),
    );

    let result = h
        .context
        .drop_commits(&h.repository, &[Commit::new("C2", "c2")], None, None)
        .await;

    assert_eq!(result, RebaseResult::Error);
    assert_eq!(h.executor.call_count(), 1);
    assert!(!h.executor.plan_path().unwrap().exists());
    assert!(dir_entries(h.plan_dir.path()).is_empty());
}

#[tokio::test]
async fn test_executor_error_result_is_forwarded() {
    let h = harness(
        MockResolver::returning(sample_history()),
        MockExecutor::returning(RebaseResult::Error),
    );

    let result = h
        .context
        .drop_commits(&h.repository, &[Commit::new("C3", "c3")], None, None)
        .await;

    assert_eq!(result, RebaseResult::Error);
    assert!(dir_entries(h.plan_dir.path()).is_empty());
}

#[tokio::test]
async fn test_executor_panic_still_removes_plan_file() {
    let h = harness(
        MockResolver::returning(sample_history()),
        MockExecutor::new(ExecutorBehavior::Panic),
    );
    let context = h.context.clone();
    let repository = h.repository.clone();

    let joined = tokio::spawn(async move {
        context
            .drop_commits(&repository, &[Commit::new("C2", "c2")], None, None)
            .await
    })
    .await;

    assert!(joined.unwrap_err().is_panic());
    assert!(!h.executor.plan_path().unwrap().exists());
    assert!(dir_entries(h.plan_dir.path()).is_empty());
}

#[tokio::test]
async fn test_root_baseline_covers_full_history() {
    let history: Vec<Commit> = (1..=6)
        .rev()
        .map(|i| Commit::new(format!("C{}", i), format!("c{}", i)))
        .collect();
    let h = harness(
        MockResolver::returning(history),
        MockExecutor::returning(RebaseResult::Completed),
    );

    let to_drop = vec![Commit::new("C1", "c1"), Commit::new("C4", "c4")];
    let result = h.context.drop_commits(&h.repository, &to_drop, None, None).await;

    assert_eq!(result, RebaseResult::Completed);
    assert_eq!(*h.resolver.last_baseline.lock().unwrap(), Some(None));
    assert_eq!(*h.executor.seen_baseline.lock().unwrap(), Some(None));
    assert_eq!(
        h.executor.plan().as_deref(),
        Some("drop C1 c1\npick C2 c2\npick C3 c3\ndrop C4 c4\npick C5 c5\npick C6 c6")
    );
}

#[tokio::test]
async fn test_ids_outside_range_are_ignored() {
    let h = harness(
        MockResolver::returning(sample_history()),
        MockExecutor::returning(RebaseResult::Completed),
    );

    let to_drop = vec![Commit::new("C2", "c2"), Commit::new("elsewhere", "not in range")];
    let result = h.context.drop_commits(&h.repository, &to_drop, None, None).await;

    assert_eq!(result, RebaseResult::Completed);
    assert_eq!(
        h.executor.plan().as_deref(),
        Some("pick C1 c1\ndrop C2 c2\npick C3 c3")
    );
}

#[tokio::test]
async fn test_progress_is_forwarded() {
    let updates = vec![
        ProgressUpdate::new(1, 3, "Dropping commits: c1"),
        ProgressUpdate::new(2, 3, "Dropping commits: c2"),
    ];
    let h = harness(
        MockResolver::returning(sample_history()),
        MockExecutor::returning(RebaseResult::Completed).with_progress(updates.clone()),
    );
    let (tx, mut rx) = progress_channel();

    let result = h
        .context
        .drop_commits(&h.repository, &[Commit::new("C2", "c2")], None, Some(tx))
        .await;

    assert_eq!(result, RebaseResult::Completed);
    let mut received = Vec::new();
    while let Some(update) = rx.recv().await {
        received.push(update);
    }
    assert_eq!(received, updates);
}

#[tokio::test]
async fn test_custom_plan_file_prefix() {
    let h = harness(
        MockResolver::returning(sample_history()),
        MockExecutor::returning(RebaseResult::Completed),
    );
    let context = h.context.clone().with_plan_file_prefix("customTodo");

    context
        .drop_commits(&h.repository, &[Commit::new("C2", "c2")], None, None)
        .await;

    let path = h.executor.plan_path().unwrap();
    assert!(path
        .file_name()
        .unwrap()
        .to_string_lossy()
        .starts_with("customTodo-"));
}

#[tokio::test]
async fn test_unusable_plan_dir_is_error_without_execution() {
    let repo_dir = create_test_dir();
    let scratch = create_test_dir();
    // A regular file where the plan directory should be
    let blocked = scratch.path().join("not-a-dir");
    std::fs::write(&blocked, "occupied").unwrap();

    let repository = Repository::open(repo_dir.path()).unwrap();
    let resolver = Arc::new(MockResolver::returning(sample_history()));
    let executor = Arc::new(MockExecutor::returning(RebaseResult::Completed));
    let context = DropContext::new(resolver.clone(), executor.clone(), &blocked);

    let result = context
        .drop_commits(&repository, &[Commit::new("C2", "c2")], None, None)
        .await;

    assert_eq!(result, RebaseResult::Error);
    assert_eq!(resolver.call_count(), 1);
    assert_eq!(executor.call_count(), 0, "Executor should not run");
    assert_eq!(dir_entries(scratch.path()), vec![blocked.clone()]);
    assert_eq!(std::fs::read_to_string(&blocked).unwrap(), "occupied");
}
