use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::network::Network;

/// Every bias and weight of a network in slot order, tagged with the cycle
/// it was taken at.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightSnapshot {
    cycle: usize,
    weights: Vec<f64>,
}

impl WeightSnapshot {
    pub fn capture(network: &Network, cycle: usize) -> WeightSnapshot {
        WeightSnapshot {
            cycle,
            weights: network.weight_vector(),
        }
    }

    /// Writes the captured values back verbatim. Fails with
    /// `DimensionMismatch` if the graph changed shape since the capture.
    pub fn restore(&self, network: &mut Network) -> Result<()> {
        network.set_weight_vector(&self.weights)
    }

    pub fn cycle(&self) -> usize {
        self.cycle
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }
}
