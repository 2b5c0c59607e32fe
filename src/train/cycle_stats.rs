use serde::{Deserialize, Serialize};

/// Per-cycle statistics handed to a [`TrainingObserver`](super::TrainingObserver).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CycleStats {
    /// 1-based cycle number.
    pub cycle: usize,
    /// Cycles requested for this run.
    pub total_cycles: usize,
    /// Mean squared error of this cycle's sweep.
    pub train_error: f64,
    /// Validation MSE, only on cycles where validation ran.
    pub validation_error: Option<f64>,
    /// Generalization loss in percent, only when a terminator validated.
    pub generalization_loss: Option<f64>,
    /// Wall-clock duration of this cycle in milliseconds.
    pub elapsed_ms: u64,
}
