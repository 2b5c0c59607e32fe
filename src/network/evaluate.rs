use serde::{Deserialize, Serialize};

use crate::data::PatternSource;
use crate::error::{Error, Result};
use crate::loss::MseLoss;
use crate::math::argmax;
use crate::network::network::Network;

/// Outcome of [`Network::test_classify`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationReport {
    /// Mean squared error over all patterns and outputs.
    pub mse: f64,
    /// Total number of misclassified patterns.
    pub failures: usize,
    /// Misclassified patterns per true class.
    pub class_failures: Vec<usize>,
    /// Patterns per true class.
    pub class_sizes: Vec<usize>,
}

impl ClassificationReport {
    pub fn accuracy(&self) -> f64 {
        let total: usize = self.class_sizes.iter().sum();
        if total == 0 {
            return 0.0;
        }
        1.0 - self.failures as f64 / total as f64
    }
}

impl Network {
    /// Checks that a pattern source fits the network: its inputs and outputs
    /// must match the first and last layer when a topology is present, and
    /// fit inside the neuron count otherwise.
    pub fn check_pattern_dimensions<S: PatternSource + ?Sized>(&self, set: &S) -> Result<()> {
        let (inputs, outputs) = match self.topology() {
            Some(t) => (t.input_size(), t.output_size()),
            None => (self.len(), self.len()),
        };
        let exact = self.topology().is_some();
        let fits = |expected: usize, actual: usize| if exact { expected == actual } else { actual <= expected };
        if !fits(inputs, set.input_count()) {
            return Err(Error::DimensionMismatch {
                what: "pattern input count",
                expected: inputs,
                actual: set.input_count(),
            });
        }
        if !fits(outputs, set.output_count()) {
            return Err(Error::DimensionMismatch {
                what: "pattern output count",
                expected: outputs,
                actual: set.output_count(),
            });
        }
        Ok(())
    }

    /// Feeds pattern `p` into the input units. Dimensions are not checked.
    pub(crate) fn load_pattern<S: PatternSource + ?Sized>(&mut self, set: &S, p: usize) {
        for i in 0..set.input_count() {
            self.neurons[i].activation = set.input(p, i);
        }
    }

    /// Sum of squared output errors for pattern `p` after a forward pass.
    pub(crate) fn pattern_sse<S: PatternSource + ?Sized>(&self, set: &S, p: usize) -> f64 {
        let base = self.len() - set.output_count();
        (0..set.output_count())
            .map(|j| {
                let e = set.output(p, j) - self.neurons[base + j].activation;
                e * e
            })
            .sum()
    }

    /// Runs pattern `p` through the network and returns the output values.
    pub fn test_pattern<S: PatternSource + ?Sized>(&mut self, set: &S, p: usize) -> Result<Vec<f64>> {
        self.check_pattern_dimensions(set)?;
        if p >= set.pattern_count() {
            return Err(Error::InvalidIndex {
                index: p,
                len: set.pattern_count(),
            });
        }
        self.load_pattern(set, p);
        self.forward_pass();
        self.outputs(set.output_count())
    }

    /// Mean squared error over all patterns and outputs of `set`.
    pub fn test<S: PatternSource + ?Sized>(&mut self, set: &S) -> Result<f64> {
        self.check_pattern_dimensions(set)?;
        let patterns = set.pattern_count();
        if patterns == 0 || set.output_count() == 0 {
            return Ok(0.0);
        }
        let mut sse = 0.0;
        for p in 0..patterns {
            self.load_pattern(set, p);
            self.forward_pass();
            sse += self.pattern_sse(set, p);
        }
        Ok(sse / (patterns * set.output_count()) as f64)
    }

    /// Classifies every pattern of `set`.
    ///
    /// A single output unit separates two classes at 0.5; with several
    /// outputs the largest one names the class.
    pub fn test_classify<S: PatternSource + ?Sized>(&mut self, set: &S) -> Result<ClassificationReport> {
        self.check_pattern_dimensions(set)?;
        let classes = set.class_count();
        let mut report = ClassificationReport {
            mse: 0.0,
            failures: 0,
            class_failures: vec![0; classes],
            class_sizes: vec![0; classes],
        };
        let patterns = set.pattern_count();
        if patterns == 0 || set.output_count() == 0 {
            return Ok(report);
        }

        let mut sse = 0.0;
        for p in 0..patterns {
            let expected_class = set.class_of(p);
            let result = self.test_pattern(set, p)?;
            let expected: Vec<f64> = (0..set.output_count()).map(|j| set.output(p, j)).collect();
            sse += MseLoss::sum_squared(&result, &expected);

            let predicted_class = if result.len() == 1 {
                usize::from(result[0] >= 0.5)
            } else {
                argmax(&result)
            };
            report.class_sizes[expected_class] += 1;
            if predicted_class != expected_class {
                report.failures += 1;
                report.class_failures[expected_class] += 1;
            }
        }
        report.mse = sse / (patterns * set.output_count()) as f64;
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::PatternSet;
    use approx::assert_relative_eq;

    fn identity_net() -> Network {
        let mut net = Network::from_description("1-1").unwrap();
        net.neuron_mut(1).unwrap().transfer = crate::activation::TransferFunction::Linear;
        net.connect_weighted(0, 1, 1.0).unwrap();
        net
    }

    #[test]
    fn test_computes_mse_over_patterns() {
        let mut net = identity_net();
        let set = PatternSet::from_rows(&[vec![0.0], vec![1.0]], &[vec![0.5], vec![1.0]]).unwrap();
        assert_relative_eq!(net.test(&set).unwrap(), 0.125);
    }

    #[test]
    fn dimension_mismatch_is_reported() {
        let mut net = identity_net();
        let set = PatternSet::new(1, 2, 1);
        assert!(matches!(net.test(&set), Err(Error::DimensionMismatch { .. })));
    }

    #[test]
    fn classify_counts_failures_per_class() {
        let mut net = identity_net();
        let set = PatternSet::from_rows(
            &[vec![0.2], vec![0.9], vec![0.4]],
            &[vec![0.0], vec![1.0], vec![1.0]],
        )
        .unwrap();
        let report = net.test_classify(&set).unwrap();
        assert_eq!(report.class_sizes, vec![1, 2]);
        assert_eq!(report.failures, 1);
        assert_eq!(report.class_failures, vec![0, 1]);
        assert_relative_eq!(report.accuracy(), 2.0 / 3.0);
    }
}
