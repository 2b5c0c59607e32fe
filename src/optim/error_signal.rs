use crate::data::PatternSource;
use crate::error::{Error, Result};
use crate::network::Network;

/// Per-neuron error signals of the current pattern, indexed by neuron id.
#[derive(Debug, Clone, Default)]
pub(crate) struct ErrorSignals {
    errors: Vec<f64>,
}

impl ErrorSignals {
    pub(crate) fn get(&self, neuron: usize) -> f64 {
        self.errors[neuron]
    }

    /// Feeds pattern `p`, runs a forward pass and propagates the output error
    /// backwards from the last neuron to the first. Returns the pattern's
    /// sum of squared output errors.
    ///
    /// Output units get `(t - a) f'(a)`; every other unit gets
    /// `f'(a) * sum(w * err_target)` over its outgoing connections. A
    /// disabled unit carries no error.
    pub(crate) fn backpropagate(&mut self, network: &mut Network, patterns: &dyn PatternSource, p: usize) -> f64 {
        network.load_pattern(patterns, p);
        network.forward_pass();

        let n = network.len();
        self.errors.clear();
        self.errors.resize(n, 0.0);
        let output_base = n - patterns.output_count();
        let mut sse = 0.0;

        for j in (0..n).rev() {
            let neuron = &network.neurons()[j];
            if !neuron.enabled {
                continue;
            }
            let slope = neuron.transfer.derivative_from_output(neuron.activation);
            self.errors[j] = if j >= output_base {
                let diff = patterns.output(p, j - output_base) - neuron.activation;
                sse += diff * diff;
                diff * slope
            } else {
                let downstream: f64 = network
                    .outgoing_iter(j)
                    .map(|c| c.weight * self.errors[c.target()])
                    .sum();
                slope * downstream
            };
        }
        sse
    }
}

/// Fails unless the per-weight buffers still match the network's slots,
/// which changes if the graph was edited after `init_train`.
pub(crate) fn check_slots(buffer: usize, network: &Network) -> Result<()> {
    let slots = network.weight_slot_count();
    if buffer != slots {
        return Err(Error::DimensionMismatch {
            what: "weight slot count",
            expected: buffer,
            actual: slots,
        });
    }
    Ok(())
}

/// Mean over patterns and outputs, 0 for an empty set.
pub(crate) fn mean_error(sse: f64, patterns: &dyn PatternSource) -> f64 {
    let count = patterns.pattern_count() * patterns.output_count();
    if count == 0 {
        0.0
    } else {
        sse / count as f64
    }
}
