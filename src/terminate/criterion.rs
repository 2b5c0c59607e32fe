use std::fmt;

use serde::{Deserialize, Serialize};

/// Progress floor below which the combined criterion stops regardless.
pub const DEFAULT_PROGRESS_FLOOR: f64 = 0.1;
/// Consecutive raises the combined criterion requires.
pub const DEFAULT_STRIPS: usize = 8;
/// GL / progress ratio the combined criterion requires.
pub const DEFAULT_QUOTIENT: f64 = 3.0;

/// Stopping rule of a [`Terminator`](super::Terminator).
///
/// Thresholds on generalization loss are percentages: `GL5` stops once the
/// validation error is 5% above its minimum.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Criterion {
    /// Never stops.
    Dummy,
    /// Stops after `max_raises` consecutive validations without improvement.
    RaiseCount { max_raises: usize },
    /// Stops once the generalization loss reaches `threshold`.
    GeneralizationLoss { threshold: f64 },
    /// Stops once generalization loss divided by training progress exceeds
    /// `threshold`.
    ProgressQuotient { threshold: f64 },
    /// Stops when generalization loss, raise count and quotient have each
    /// crossed their threshold at some point, or when training progress
    /// falls below `progress_floor`.
    Combined {
        gl_threshold: f64,
        progress_floor: f64,
        strips: usize,
        quotient: f64,
    },
}

impl Criterion {
    pub fn combined(gl_threshold: f64) -> Criterion {
        Criterion::Combined {
            gl_threshold,
            progress_floor: DEFAULT_PROGRESS_FLOOR,
            strips: DEFAULT_STRIPS,
            quotient: DEFAULT_QUOTIENT,
        }
    }

    /// Whether the rule needs training errors to decide.
    pub fn uses_progress(&self) -> bool {
        matches!(self, Criterion::ProgressQuotient { .. } | Criterion::Combined { .. })
    }
}

impl fmt::Display for Criterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Criterion::Dummy => write!(f, "dummy"),
            Criterion::RaiseCount { max_raises } => write!(f, "raise count {max_raises}"),
            Criterion::GeneralizationLoss { threshold } => write!(f, "GL {threshold}"),
            Criterion::ProgressQuotient { threshold } => write!(f, "PQ {threshold}"),
            Criterion::Combined {
                gl_threshold,
                progress_floor,
                strips,
                quotient,
            } => write!(f, "PR {gl_threshold},{progress_floor},{strips},{quotient}"),
        }
    }
}

/// Training progress over the last `strip` training errors:
/// `1000 * (sum / (k * min) - 1)` with `k` the number of errors used.
///
/// A strip that never improved on its best error scores 0, as does an empty
/// strip or one whose best error is 0.
pub fn training_progress(training_errors: &[f64], strip: usize) -> f64 {
    let window = &training_errors[training_errors.len().saturating_sub(strip.max(1))..];
    if window.is_empty() {
        return 0.0;
    }
    let min = window.iter().copied().fold(f64::INFINITY, f64::min);
    if min <= 0.0 || !min.is_finite() {
        return 0.0;
    }
    let sum: f64 = window.iter().sum();
    1000.0 * (sum / (window.len() as f64 * min) - 1.0)
}
