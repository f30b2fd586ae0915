use serde::{Deserialize, Serialize};

/// Statistics for one completed pass over the training data.
///
/// Sent on `TrainOptions::progress_tx` at the end of every pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpochStats {
    /// 1-based pass number.
    pub pass: usize,
    pub total_passes: usize,
    /// Mean cross-entropy over all examples seen during the pass.
    pub loss: f64,
    /// Fraction of examples whose argmax matches the target after the pass.
    pub accuracy: f64,
    pub elapsed_ms: u64,
}

/// Summary of a finished run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrainingReport {
    /// Passes actually completed; lower than requested if stopped early.
    pub passes_run: usize,
    pub final_loss: f64,
    pub final_accuracy: f64,
    pub loss_history: Vec<f64>,
}
