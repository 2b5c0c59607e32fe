use crate::math::sqr;

pub struct MseLoss;

impl MseLoss {
    /// Scalar MSE: mean((expected - predicted)²)
    pub fn loss(predicted: &[f64], expected: &[f64]) -> f64 {
        if predicted.is_empty() {
            return 0.0;
        }
        MseLoss::sum_squared(predicted, expected) / predicted.len() as f64
    }

    /// Sum of squared errors over one pattern.
    pub fn sum_squared(predicted: &[f64], expected: &[f64]) -> f64 {
        predicted
            .iter()
            .zip(expected.iter())
            .map(|(a, b)| sqr(b - a))
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn mse_averages_over_outputs() {
        assert_relative_eq!(MseLoss::loss(&[1.0, 0.0], &[0.0, 0.0]), 0.5);
        assert_relative_eq!(MseLoss::sum_squared(&[1.0, 0.5], &[0.0, 1.0]), 1.25);
        assert_eq!(MseLoss::loss(&[], &[]), 0.0);
    }
}
