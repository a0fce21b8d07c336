use serde::Serialize;
use tokio::sync::mpsc;

/// Progress of a running multi-commit operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressUpdate {
    pub completed_steps: usize,
    pub total_steps: usize,
    pub description: String,
}

impl ProgressUpdate {
    pub fn new(completed_steps: usize, total_steps: usize, description: impl Into<String>) -> Self {
        Self {
            completed_steps,
            total_steps,
            description: description.into(),
        }
    }

    /// Fraction complete in `0.0..=1.0`
    pub fn value(&self) -> f64 {
        if self.total_steps == 0 {
            return 0.0;
        }
        (self.completed_steps as f64 / self.total_steps as f64).min(1.0)
    }
}

/// Sending half of the progress stream. Consumers never answer.
pub type ProgressSender = mpsc::UnboundedSender<ProgressUpdate>;
pub type ProgressReceiver = mpsc::UnboundedReceiver<ProgressUpdate>;

pub fn progress_channel() -> (ProgressSender, ProgressReceiver) {
    mpsc::unbounded_channel()
}

/// Push an update if anyone is listening. A closed receiver is not an error.
pub fn notify(sender: Option<&ProgressSender>, update: ProgressUpdate) {
    if let Some(tx) = sender {
        let _ = tx.send(update);
    }
}
