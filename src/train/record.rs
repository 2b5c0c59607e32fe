use serde::{Deserialize, Serialize};

/// History of one [`Trainer::train`](super::Trainer::train) run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrainingRecord {
    /// Training MSE per cycle, truncated to `cycles_trained`.
    pub training_errors: Vec<f64>,
    /// Validation MSE per validation, truncated likewise.
    pub validation_errors: Vec<f64>,
    /// Cycles the returned network state reflects: the checkpoint cycle if
    /// weights were restored, else every cycle run.
    pub cycles_trained: usize,
    /// Cycles actually run before the loop ended.
    pub total_cycles: usize,
    /// Generalization loss at the last validation.
    pub generalization_loss: Option<f64>,
    /// Whether the best saved weights were written back.
    pub restored: bool,
}

impl TrainingRecord {
    pub(crate) fn with_capacity(cycles: usize) -> TrainingRecord {
        TrainingRecord {
            training_errors: Vec::with_capacity(cycles),
            ..TrainingRecord::default()
        }
    }

    pub fn final_training_error(&self) -> Option<f64> {
        self.training_errors.last().copied()
    }

    /// Smallest validation error seen, if any validation ran.
    pub fn best_validation_error(&self) -> Option<f64> {
        self.validation_errors.iter().copied().reduce(f64::min)
    }
}
