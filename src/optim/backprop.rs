use log::trace;

use crate::data::PatternSource;
use crate::error::{Error, Result};
use crate::network::Network;
use crate::optim::algorithm::TrainingAlgorithm;
use crate::optim::error_signal::{check_slots, mean_error, ErrorSignals};

/// Gradient descent with momentum and weight decay.
///
/// Every weight slot moves by `d = eta * err * a_src + momentum * d_prev`
/// (a bias uses `a_src = 1`), and the new weight is `decay * w + d`.
///
/// By default the update is applied after every pattern (online learning).
/// With batch learning the per-pattern gradient terms are summed over the
/// sweep and applied once at its end.
#[derive(Debug, Clone)]
pub struct BackpropTrainer {
    pub eta: f64,
    pub momentum: f64,
    pub decay: f64,
    pub batch_learning: bool,
    deltas: Vec<f64>,
    batch_gradient: Vec<f64>,
    signals: ErrorSignals,
}

impl BackpropTrainer {
    pub fn new(eta: f64, momentum: f64) -> BackpropTrainer {
        BackpropTrainer {
            eta,
            momentum,
            decay: 1.0,
            batch_learning: false,
            deltas: Vec::new(),
            batch_gradient: Vec::new(),
            signals: ErrorSignals::default(),
        }
    }

    /// Weight multiplier applied on every update; 1.0 disables decay.
    pub fn with_decay(mut self, decay: f64) -> BackpropTrainer {
        self.decay = decay;
        self
    }

    pub fn with_batch_learning(mut self, batch: bool) -> BackpropTrainer {
        self.batch_learning = batch;
        self
    }

    fn validate(&self) -> Result<()> {
        if !(self.eta.is_finite() && self.eta > 0.0) {
            return Err(Error::InvalidConfig(format!("learning rate must be positive, got {}", self.eta)));
        }
        if !(0.0..1.0).contains(&self.momentum) {
            return Err(Error::InvalidConfig(format!("momentum must be in [0, 1), got {}", self.momentum)));
        }
        if !(self.decay > 0.0 && self.decay <= 1.0) {
            return Err(Error::InvalidConfig(format!("decay must be in (0, 1], got {}", self.decay)));
        }
        Ok(())
    }
}

impl TrainingAlgorithm for BackpropTrainer {
    fn name(&self) -> &'static str {
        "backprop"
    }

    fn init_train(&mut self, network: &Network) -> Result<()> {
        self.validate()?;
        let slots = network.weight_slot_count();
        self.deltas = vec![0.0; slots];
        self.batch_gradient = vec![0.0; slots];
        trace!(
            "backprop: {slots} weight slots, eta {} momentum {} decay {} batch {}",
            self.eta,
            self.momentum,
            self.decay,
            self.batch_learning
        );
        Ok(())
    }

    fn train_once(&mut self, network: &mut Network, patterns: &dyn PatternSource) -> Result<f64> {
        network.check_pattern_dimensions(patterns)?;
        check_slots(self.deltas.len(), network)?;

        let eta = self.eta;
        let mut sse = 0.0;
        for p in 0..patterns.pattern_count() {
            sse += self.signals.backpropagate(network, patterns, p);
            if self.batch_learning {
                let signals = &self.signals;
                let batch = &mut self.batch_gradient;
                network.for_each_slot(|slot, j, source, _| {
                    batch[slot] += eta * signals.get(j) * source.unwrap_or(1.0);
                });
            } else {
                let signals = &self.signals;
                apply_deltas(network, &mut self.deltas, self.momentum, self.decay, |_, j, source| {
                    eta * signals.get(j) * source.unwrap_or(1.0)
                });
            }
        }

        if self.batch_learning && !patterns.is_empty() {
            let batch = &self.batch_gradient;
            apply_deltas(network, &mut self.deltas, self.momentum, self.decay, |slot, _, _| batch[slot]);
            self.batch_gradient.iter_mut().for_each(|g| *g = 0.0);
        }
        Ok(mean_error(sse, patterns))
    }
}

/// Moves every slot by `gradient(slot, neuron, source) + momentum * d_prev`
/// after scaling the old weight by `decay`.
fn apply_deltas<G>(network: &mut Network, deltas: &mut [f64], momentum: f64, decay: f64, gradient: G)
where
    G: Fn(usize, usize, Option<f64>) -> f64,
{
    network.for_each_slot_mut(|slot, j, source, w| {
        let delta = gradient(slot, j, source) + momentum * deltas[slot];
        *w = decay * *w + delta;
        deltas[slot] = delta;
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::PatternSet;
    use approx::assert_relative_eq;

    fn single_weight() -> (Network, PatternSet) {
        let mut net = Network::from_description("1-1").unwrap();
        net.connect_weighted(0, 1, 0.0).unwrap();
        let set = PatternSet::from_rows(&[vec![1.0]], &[vec![1.0]]).unwrap();
        (net, set)
    }

    #[test]
    fn online_step_matches_hand_computation() {
        let (mut net, set) = single_weight();
        let mut bp = BackpropTrainer::new(0.5, 0.0);
        bp.init_train(&net).unwrap();
        let mse = bp.train_once(&mut net, &set).unwrap();

        // a = 0.5, err = 0.5 * 0.25 = 0.125, delta = 0.0625
        assert_relative_eq!(mse, 0.25);
        assert_relative_eq!(net.incoming(1).unwrap().next().unwrap().weight, 0.0625);
        assert_relative_eq!(net.neuron(1).unwrap().bias, 0.0625);
    }

    #[test]
    fn momentum_carries_the_previous_delta() {
        let (mut net, set) = single_weight();
        let mut bp = BackpropTrainer::new(0.5, 0.9);
        bp.init_train(&net).unwrap();
        bp.train_once(&mut net, &set).unwrap();
        let w1 = net.incoming(1).unwrap().next().unwrap().weight;
        bp.train_once(&mut net, &set).unwrap();
        let w2 = net.incoming(1).unwrap().next().unwrap().weight;
        // Second delta is at least 0.9 of the first plus a fresh positive term.
        assert!(w2 - w1 > 0.9 * w1);
    }

    #[test]
    fn decay_shrinks_unused_weights() {
        let mut net = Network::from_description("1-1").unwrap();
        net.connect_weighted(0, 1, 1.0).unwrap();
        // Input 0 contributes no gradient to the weight.
        let set = PatternSet::from_rows(&[vec![0.0]], &[vec![0.5]]).unwrap();
        let mut bp = BackpropTrainer::new(0.1, 0.0).with_decay(0.5);
        bp.init_train(&net).unwrap();
        bp.train_once(&mut net, &set).unwrap();
        assert_relative_eq!(net.incoming(1).unwrap().next().unwrap().weight, 0.5);
    }

    #[test]
    fn batch_mode_applies_the_summed_gradient_once() {
        let mut net = Network::from_description("1-1").unwrap();
        net.connect_weighted(0, 1, 0.0).unwrap();
        let set = PatternSet::from_rows(&[vec![1.0], vec![1.0]], &[vec![1.0], vec![1.0]]).unwrap();
        let mut bp = BackpropTrainer::new(0.5, 0.0).with_batch_learning(true);
        bp.init_train(&net).unwrap();
        bp.train_once(&mut net, &set).unwrap();
        // Both patterns saw the untouched weights.
        assert_relative_eq!(net.incoming(1).unwrap().next().unwrap().weight, 2.0 * 0.0625);
    }

    #[test]
    fn bad_parameters_are_rejected() {
        let net = Network::from_description("1-1").unwrap();
        assert!(matches!(BackpropTrainer::new(0.0, 0.5).init_train(&net), Err(Error::InvalidConfig(_))));
        assert!(matches!(BackpropTrainer::new(0.1, 1.0).init_train(&net), Err(Error::InvalidConfig(_))));
        assert!(matches!(
            BackpropTrainer::new(0.1, 0.5).with_decay(0.0).init_train(&net),
            Err(Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn edited_network_is_detected() {
        let (mut net, set) = single_weight();
        let mut bp = BackpropTrainer::new(0.5, 0.0);
        bp.init_train(&net).unwrap();
        net.connect(0, 1).unwrap();
        assert!(matches!(bp.train_once(&mut net, &set), Err(Error::DimensionMismatch { .. })));
    }
}
