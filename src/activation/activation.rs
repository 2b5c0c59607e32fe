use serde::{Deserialize, Serialize};

use crate::math::sigmoid;

/// Transfer function applied to a neuron's net input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransferFunction {
    /// Logistic sigmoid `1 / (1 + e^-x)`.
    #[default]
    Logistic,
    /// Identity.
    Linear,
    /// Elliott's sigmoid `x / (1 + |x|)`, a cheap squashing function with
    /// range (-1, 1).
    Elliott,
}

impl TransferFunction {
    pub fn function(&self, x: f64) -> f64 {
        match self {
            TransferFunction::Logistic => sigmoid(x),
            TransferFunction::Linear => x,
            TransferFunction::Elliott => x / (1.0 + x.abs()),
        }
    }

    /// Derivative expressed in terms of the activation `a = f(x)`, which is
    /// what the error-signal pass has at hand.
    ///
    /// - logistic: `a (1 - a)`
    /// - linear: `1`
    /// - elliott: `(1 - |a|)^2`, since `1 / (1 + |x|) = 1 - |a|`
    pub fn derivative_from_output(&self, a: f64) -> f64 {
        match self {
            TransferFunction::Logistic => a * (1.0 - a),
            TransferFunction::Linear => 1.0,
            TransferFunction::Elliott => {
                let d = 1.0 - a.abs();
                d * d
            }
        }
    }

    /// Single-letter code used by the network's text rendering.
    pub fn letter(&self) -> char {
        match self {
            TransferFunction::Logistic => 'S',
            TransferFunction::Linear => 'L',
            TransferFunction::Elliott => 'E',
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn derivative_matches_finite_difference() {
        let h = 1e-6;
        for tf in [
            TransferFunction::Logistic,
            TransferFunction::Linear,
            TransferFunction::Elliott,
        ] {
            for &x in &[-2.0, -0.3, 0.4, 1.7] {
                let numeric = (tf.function(x + h) - tf.function(x - h)) / (2.0 * h);
                let analytic = tf.derivative_from_output(tf.function(x));
                assert_relative_eq!(numeric, analytic, epsilon = 1e-6);
            }
        }
    }

    #[test]
    fn elliott_is_bounded() {
        assert!(TransferFunction::Elliott.function(1e9) < 1.0);
        assert!(TransferFunction::Elliott.function(-1e9) > -1.0);
        assert_eq!(TransferFunction::Elliott.function(0.0), 0.0);
    }
}
