use anyhow::Context;
use clap::Parser;
use rebase_drop::utils::{default_config_path, match_commits, now_iso};
use rebase_drop::{
    progress_channel, read_config, CommitId, CommitRangeResolver, Dispatcher, DropConfig,
    DropContext, FlowStep, GitLogResolver, GitRunner, MultiCommitOperationFlow,
    MultiCommitOperationKind, OperationDetail, OperationState, Repository,
};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Rebase Drop - remove commits from the current branch with an interactive rebase
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Repository to operate on
    #[arg(short, long, env = "REBASE_DROP_REPO", default_value = ".")]
    repo: PathBuf,

    /// Path to a JSON config file. Defaults to ~/.rebase-drop/config.json
    #[arg(short, long, env = "REBASE_DROP_CONFIG")]
    config: Option<PathBuf>,

    /// Last commit to keep unchanged. Omit to rewrite from the root commit.
    #[arg(short, long)]
    base: Option<String>,

    /// Commits to drop (full or abbreviated shas)
    #[arg(required = true)]
    commits: Vec<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    // Parse CLI arguments
    let args = Args::parse();

    let config_path = args.config.clone().or_else(default_config_path);
    let config = match &config_path {
        Some(path) => read_config(path)
            .await
            .with_context(|| format!("Failed to read config {}", path.display()))?
            .unwrap_or_default(),
        None => DropConfig::default(),
    };

    let repository = Repository::open(&args.repo)?;
    let runner = GitRunner::new(config.git_path.clone());
    let base = args.base.as_deref().map(CommitId::from);

    // Look the shas up in the same range the plan is built from
    let in_range = GitLogResolver::new(runner.clone())
        .resolve(&repository, base.as_ref())
        .await
        .context("Failed to list commits")?;
    let commits = match_commits(&args.commits, &in_range);
    for commit in commits.iter().filter(|c| !in_range.contains(c)) {
        warn!(sha = %commit.sha, "Commit not found in range, it will be ignored");
    }

    let target_branch = runner.current_branch(&repository).await.ok().flatten();

    let (progress_tx, mut progress_rx) = progress_channel();
    let printer = tokio::spawn(async move {
        while let Some(update) = progress_rx.recv().await {
            println!(
                "[{}/{} {:>3.0}%] {}",
                update.completed_steps,
                update.total_steps,
                update.value() * 100.0,
                update.description
            );
        }
    });

    let dispatcher = Dispatcher::new(DropContext::from_config(&config)).with_progress(progress_tx);
    let state = OperationState {
        detail: OperationDetail::Drop {
            commits,
            last_retained_commit_ref: base,
        },
        target_branch,
    };

    info!(started_at = %now_iso(), repo = %repository.path().display(), "Dropping commits");

    let mut flow = MultiCommitOperationFlow::new(
        MultiCommitOperationKind::Drop,
        Arc::new(dispatcher),
        repository,
        state,
    )?;
    let step = flow.begin().await;

    // Closes the progress channel so the printer can finish
    drop(flow);
    printer.await?;

    info!(finished_at = %now_iso(), "Done");

    let code = match step {
        FlowStep::Completed => {
            println!("Commits dropped");
            ExitCode::SUCCESS
        }
        FlowStep::Conflicts { title, .. } => {
            println!("Conflicts found while {}", title);
            println!("Resolve them, then run `git rebase --continue` or `git rebase --abort`");
            ExitCode::from(2)
        }
        FlowStep::Failed | FlowStep::InvalidState => {
            eprintln!("Dropping commits failed, see log for details");
            ExitCode::from(1)
        }
    };

    Ok(code)
}
