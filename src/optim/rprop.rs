use log::trace;

use crate::data::PatternSource;
use crate::error::{Error, Result};
use crate::math::sign;
use crate::network::Network;
use crate::optim::algorithm::TrainingAlgorithm;
use crate::optim::error_signal::{check_slots, mean_error, ErrorSignals};

const STEP_GROWTH: f64 = 1.2;
const STEP_SHRINK: f64 = 0.5;
const STEP_MIN: f64 = 1e-6;

/// Resilient propagation.
///
/// Gradients are summed over a whole sweep. Each weight then moves by its
/// own adaptive step against the sign of its gradient; the magnitude of the
/// gradient is never used. See [`adapt`] for the step rule.
#[derive(Debug, Clone)]
pub struct RPropTrainer {
    pub delta0: f64,
    pub delta_max: f64,
    /// Weight-decay factor; the gradient gets `(1 - decay) * w` added, so
    /// 1.0 turns decay off.
    pub decay: f64,
    gradients: Vec<f64>,
    steps: Vec<f64>,
    last_deltas: Vec<f64>,
    signals: ErrorSignals,
}

impl Default for RPropTrainer {
    fn default() -> Self {
        RPropTrainer::new()
    }
}

impl RPropTrainer {
    pub fn new() -> RPropTrainer {
        RPropTrainer {
            delta0: 0.1,
            delta_max: 50.0,
            decay: 1.0,
            gradients: Vec::new(),
            steps: Vec::new(),
            last_deltas: Vec::new(),
            signals: ErrorSignals::default(),
        }
    }

    /// Initial step size of every weight.
    pub fn with_delta0(mut self, delta0: f64) -> RPropTrainer {
        self.delta0 = delta0;
        self
    }

    pub fn with_delta_max(mut self, delta_max: f64) -> RPropTrainer {
        self.delta_max = delta_max;
        self
    }

    pub fn with_decay(mut self, decay: f64) -> RPropTrainer {
        self.decay = decay;
        self
    }

    /// Current step size of a weight slot.
    pub fn step(&self, slot: usize) -> Option<f64> {
        self.steps.get(slot).copied()
    }

    fn validate(&self) -> Result<()> {
        if !(self.delta0.is_finite() && self.delta0 > 0.0) {
            return Err(Error::InvalidConfig(format!("delta0 must be positive, got {}", self.delta0)));
        }
        if !(self.delta_max.is_finite() && self.delta_max > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "delta_max must be positive, got {}",
                self.delta_max
            )));
        }
        if !self.decay.is_finite() {
            return Err(Error::InvalidConfig(format!("decay must be finite, got {}", self.decay)));
        }
        Ok(())
    }
}

/// One RProp step for a single weight.
///
/// `direction = gradient * last_delta` tells whether the gradient kept its
/// sign since the last move (the last move went against it):
///
/// - `direction < 0`: the step grows by 1.2, capped at `delta_max`, and the
///   weight moves against the gradient;
/// - `direction > 0`: the gradient flipped, so the step halves (floored at
///   1e-6) and the weight stays put this cycle;
/// - `direction == 0`: no previous move, the weight moves by the current
///   step against the gradient.
///
/// Returns the weight delta and the new step size.
pub fn adapt(gradient: f64, last_delta: f64, step: f64, delta_max: f64) -> (f64, f64) {
    let direction = gradient * last_delta;
    if direction < 0.0 {
        let step = (step * STEP_GROWTH).min(delta_max);
        (-sign(gradient) * step, step)
    } else if direction > 0.0 {
        (0.0, (step * STEP_SHRINK).max(STEP_MIN))
    } else {
        (-sign(gradient) * step, step)
    }
}

impl TrainingAlgorithm for RPropTrainer {
    fn name(&self) -> &'static str {
        "rprop"
    }

    fn init_train(&mut self, network: &Network) -> Result<()> {
        self.validate()?;
        let slots = network.weight_slot_count();
        self.gradients = vec![0.0; slots];
        self.steps = vec![self.delta0.min(self.delta_max); slots];
        self.last_deltas = vec![0.0; slots];
        trace!(
            "rprop: {slots} weight slots, delta0 {} delta_max {} decay {}",
            self.delta0,
            self.delta_max,
            self.decay
        );
        Ok(())
    }

    fn train_once(&mut self, network: &mut Network, patterns: &dyn PatternSource) -> Result<f64> {
        network.check_pattern_dimensions(patterns)?;
        check_slots(self.gradients.len(), network)?;

        let mut sse = 0.0;
        for p in 0..patterns.pattern_count() {
            sse += self.signals.backpropagate(network, patterns, p);
            let signals = &self.signals;
            let gradients = &mut self.gradients;
            network.for_each_slot(|slot, j, source, _| {
                gradients[slot] -= signals.get(j) * source.unwrap_or(1.0);
            });
        }

        let RPropTrainer {
            delta_max,
            decay,
            gradients,
            steps,
            last_deltas,
            ..
        } = self;
        network.for_each_slot_mut(|slot, _, _, w| {
            let gradient = gradients[slot] + (1.0 - *decay) * *w;
            let (delta, step) = adapt(gradient, last_deltas[slot], steps[slot], *delta_max);
            *w += delta;
            last_deltas[slot] = delta;
            steps[slot] = step;
            gradients[slot] = 0.0;
        });
        Ok(mean_error(sse, patterns))
    }
}
