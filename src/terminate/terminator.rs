use log::debug;

use crate::data::PatternSource;
use crate::error::Result;
use crate::math::{guarded_ratio, percent_growth};
use crate::network::Network;
use crate::terminate::criterion::{training_progress, Criterion};
use crate::terminate::snapshot::WeightSnapshot;

/// Number of training errors the progress measure looks back over.
pub const DEFAULT_STRIP_LENGTH: usize = 5;

/// Early-stopping state for one training run.
///
/// Each call to [`Terminator::validate`] measures the validation error,
/// updates the running minimum and asks the [`Criterion`] whether to stop.
/// A saving terminator also snapshots the weights on every improvement so
/// [`Terminator::restore`] can bring back the best state seen.
#[derive(Debug, Clone)]
pub struct Terminator {
    criterion: Criterion,
    saving: bool,
    strip_length: usize,
    min_error: f64,
    last_error: f64,
    cycle_at_minimum: usize,
    raises: usize,
    snapshot: Option<WeightSnapshot>,
    gl_reached: bool,
    raises_reached: bool,
    quotient_reached: bool,
}

impl Terminator {
    pub fn new(criterion: Criterion, saving: bool) -> Terminator {
        Terminator {
            criterion,
            saving,
            strip_length: DEFAULT_STRIP_LENGTH,
            min_error: f64::INFINITY,
            last_error: f64::INFINITY,
            cycle_at_minimum: 0,
            raises: 0,
            snapshot: None,
            gl_reached: false,
            raises_reached: false,
            quotient_reached: false,
        }
    }

    pub fn dummy() -> Terminator {
        Terminator::new(Criterion::Dummy, false)
    }

    /// Raise counting without saving: cheapest, keeps the final state.
    pub fn fast(max_raises: usize) -> Terminator {
        Terminator::new(Criterion::RaiseCount { max_raises }, false)
    }

    /// Raise counting with save/restore of the best state.
    pub fn up(max_raises: usize) -> Terminator {
        Terminator::new(Criterion::RaiseCount { max_raises }, true)
    }

    /// Generalization-loss threshold, saving.
    pub fn gl(threshold: f64) -> Terminator {
        Terminator::new(Criterion::GeneralizationLoss { threshold }, true)
    }

    /// Progress-quotient threshold, saving.
    pub fn pq(threshold: f64) -> Terminator {
        Terminator::new(Criterion::ProgressQuotient { threshold }, true)
    }

    /// Combined criterion with default floor, strips and quotient, saving.
    pub fn pr(gl_threshold: f64) -> Terminator {
        Terminator::new(Criterion::combined(gl_threshold), true)
    }

    pub fn with_strip_length(mut self, strip_length: usize) -> Terminator {
        self.strip_length = strip_length.max(1);
        self
    }

    pub fn criterion(&self) -> &Criterion {
        &self.criterion
    }

    pub fn is_saving(&self) -> bool {
        self.saving
    }

    /// Most recent validation error, +inf before the first validation.
    pub fn validation_error(&self) -> f64 {
        self.last_error
    }

    pub fn minimum_error(&self) -> f64 {
        self.min_error
    }

    pub fn cycle_at_minimum(&self) -> usize {
        self.cycle_at_minimum
    }

    /// Consecutive validations without improvement.
    pub fn raises(&self) -> usize {
        self.raises
    }

    /// Percentual growth of the last validation error over the minimum.
    pub fn generalization_loss(&self) -> f64 {
        percent_growth(self.last_error, self.min_error)
    }

    pub fn snapshot(&self) -> Option<&WeightSnapshot> {
        self.snapshot.as_ref()
    }

    /// Measures the validation error of `network` on `validation` and
    /// decides whether to stop. `training_errors` is the training history
    /// so far, used by the progress-based rules.
    pub fn validate(
        &mut self,
        network: &mut Network,
        validation: &dyn PatternSource,
        training_errors: &[f64],
        cycle: usize,
    ) -> Result<bool> {
        let error = network.test(validation)?;
        Ok(self.check(error, network, training_errors, cycle))
    }

    /// Records one validation error and applies the stopping rule.
    ///
    /// An error equal to the minimum counts as an improvement.
    pub fn check(&mut self, error: f64, network: &Network, training_errors: &[f64], cycle: usize) -> bool {
        self.last_error = error;
        if error <= self.min_error {
            self.min_error = error;
            self.cycle_at_minimum = cycle;
            self.raises = 0;
            if self.saving {
                self.snapshot = Some(WeightSnapshot::capture(network, cycle));
            }
        } else {
            self.raises += 1;
        }

        let gl = self.generalization_loss();
        let progress = if self.criterion.uses_progress() {
            training_progress(training_errors, self.strip_length)
        } else {
            0.0
        };
        let stop = match self.criterion {
            Criterion::Dummy => {
                self.cycle_at_minimum = cycle;
                false
            }
            Criterion::RaiseCount { max_raises } => self.raises >= max_raises,
            Criterion::GeneralizationLoss { threshold } => gl >= threshold,
            Criterion::ProgressQuotient { threshold } => guarded_ratio(gl, progress) > threshold,
            Criterion::Combined {
                gl_threshold,
                progress_floor,
                strips,
                quotient,
            } => {
                self.gl_reached |= gl >= gl_threshold;
                self.raises_reached |= self.raises >= strips;
                self.quotient_reached |= guarded_ratio(gl, progress) > quotient;
                let stalled = training_errors.len() >= self.strip_length && progress < progress_floor;
                (self.gl_reached && self.raises_reached && self.quotient_reached) || stalled
            }
        };
        debug!(
            "{} at cycle {cycle}: error {error:.6} min {:.6} GL {gl:.3} P {progress:.3} raises {} -> {}",
            self.criterion,
            self.min_error,
            self.raises,
            if stop { "stop" } else { "go on" }
        );
        stop
    }

    /// Writes the best saved weights back into `network`. Returns whether a
    /// snapshot existed.
    pub fn restore(&self, network: &mut Network) -> Result<bool> {
        match &self.snapshot {
            Some(snapshot) => {
                snapshot.restore(network)?;
                debug!("restored weights from cycle {}", snapshot.cycle());
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed(t: &mut Terminator, errors: &[f64]) -> Vec<bool> {
        let net = Network::with_size(1);
        errors
            .iter()
            .enumerate()
            .map(|(i, &e)| t.check(e, &net, &[], i + 1))
            .collect()
    }

    #[test]
    fn raise_count_stops_on_the_second_consecutive_raise() {
        let mut t = Terminator::fast(2);
        assert_eq!(feed(&mut t, &[1.0, 1.1, 1.2]), vec![false, false, true]);
        assert_eq!(t.cycle_at_minimum(), 1);
        assert!(t.snapshot().is_none());
    }

    #[test]
    fn improvement_resets_the_raise_count() {
        let mut t = Terminator::up(2);
        assert_eq!(feed(&mut t, &[1.0, 1.1, 0.9, 1.0, 0.9]), vec![false; 5]);
        assert_eq!(t.raises(), 0);
        assert_eq!(t.snapshot().map(|s| s.cycle()), Some(5));
    }

    #[test]
    fn dummy_never_stops() {
        let mut t = Terminator::dummy();
        let decisions = feed(&mut t, &[0.1, 0.5, 0.9, 2.0, 8.0]);
        assert!(decisions.iter().all(|stop| !stop));
        assert_eq!(t.cycle_at_minimum(), 5);
        assert_eq!(t.minimum_error(), 0.1);
    }

    #[test]
    fn generalization_loss_threshold() {
        let mut t = Terminator::gl(5.0);
        assert_eq!(feed(&mut t, &[1.0, 1.04, 1.05]), vec![false, false, true]);
        assert!((t.generalization_loss() - 5.0).abs() < 1e-9);
        assert_eq!(t.snapshot().map(|s| s.cycle()), Some(1));
    }

    #[test]
    fn progress_quotient_needs_generalization_loss() {
        let net = Network::with_size(1);
        let training = [0.5, 0.4, 0.3, 0.2, 0.1];
        let mut t = Terminator::pq(0.001);
        assert!(!t.check(1.0, &net, &training, 1));
        // GL 10 over progress 2000 is 0.005.
        assert!(t.check(1.1, &net, &training, 2));
    }

    #[test]
    fn combined_stops_when_training_stalls() {
        let net = Network::with_size(1);
        let mut t = Terminator::pr(5.0);
        let flat = [0.2; 5];
        assert!(!t.check(1.0, &net, &flat[..3], 1));
        assert!(t.check(0.9, &net, &flat, 2));
    }

    #[test]
    fn combined_latches_each_condition() {
        let net = Network::with_size(1);
        let training = [0.5, 0.4, 0.3, 0.2, 0.1];
        let mut t = Terminator::new(
            Criterion::Combined {
                gl_threshold: 5.0,
                progress_floor: 0.1,
                strips: 2,
                quotient: 0.001,
            },
            true,
        );
        assert!(!t.check(1.0, &net, &training, 1));
        // GL and quotient reached, one raise only.
        assert!(!t.check(1.2, &net, &training, 2));
        // GL drops below its threshold but stays latched; raises reach 2.
        assert!(t.check(1.01, &net, &training, 3));
    }

    #[test]
    fn restore_without_snapshot_is_a_no_op() {
        let mut net = Network::with_size(2);
        let t = Terminator::fast(1);
        assert!(!t.restore(&mut net).unwrap());
    }
}
