use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::math::argmax;

/// Read-only access to a table of training patterns.
///
/// Trainers and terminators consume pattern data only through this trait;
/// they never mutate a pattern source.
pub trait PatternSource {
    fn input_count(&self) -> usize;
    fn output_count(&self) -> usize;
    fn pattern_count(&self) -> usize;
    fn input(&self, pattern: usize, index: usize) -> f64;
    fn output(&self, pattern: usize, index: usize) -> f64;

    fn is_empty(&self) -> bool {
        self.pattern_count() == 0
    }

    /// Class of a pattern: with one output the value rounded to 0 or 1,
    /// otherwise the index of the largest output.
    fn class_of(&self, pattern: usize) -> usize {
        if self.output_count() == 1 {
            if self.output(pattern, 0) >= 0.5 {
                1
            } else {
                0
            }
        } else {
            let outputs: Vec<f64> = (0..self.output_count())
                .map(|j| self.output(pattern, j))
                .collect();
            argmax(&outputs)
        }
    }

    /// Number of classes: 2 for a single output, else one per output.
    fn class_count(&self) -> usize {
        if self.output_count() == 1 {
            2
        } else {
            self.output_count()
        }
    }
}

/// In-memory pattern table, stored row-major.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternSet {
    inputs: usize,
    outputs: usize,
    input_data: Vec<f64>,
    output_data: Vec<f64>,
}

impl PatternSet {
    /// Zero-filled set of `patterns` rows.
    pub fn new(patterns: usize, inputs: usize, outputs: usize) -> PatternSet {
        PatternSet {
            inputs,
            outputs,
            input_data: vec![0.0; patterns * inputs],
            output_data: vec![0.0; patterns * outputs],
        }
    }

    /// Builds a set from parallel input/output rows.
    pub fn from_rows(inputs: &[Vec<f64>], outputs: &[Vec<f64>]) -> Result<PatternSet> {
        if inputs.len() != outputs.len() {
            return Err(Error::DimensionMismatch {
                what: "pattern count",
                expected: inputs.len(),
                actual: outputs.len(),
            });
        }
        let input_width = inputs.first().map_or(0, Vec::len);
        let output_width = outputs.first().map_or(0, Vec::len);
        let mut set = PatternSet {
            inputs: input_width,
            outputs: output_width,
            input_data: Vec::with_capacity(inputs.len() * input_width),
            output_data: Vec::with_capacity(outputs.len() * output_width),
        };
        for (x, y) in inputs.iter().zip(outputs) {
            if x.len() != input_width {
                return Err(Error::DimensionMismatch {
                    what: "pattern input width",
                    expected: input_width,
                    actual: x.len(),
                });
            }
            if y.len() != output_width {
                return Err(Error::DimensionMismatch {
                    what: "pattern output width",
                    expected: output_width,
                    actual: y.len(),
                });
            }
            set.input_data.extend_from_slice(x);
            set.output_data.extend_from_slice(y);
        }
        Ok(set)
    }

    pub fn set_input(&mut self, pattern: usize, index: usize, value: f64) {
        self.input_data[pattern * self.inputs + index] = value;
    }

    pub fn set_output(&mut self, pattern: usize, index: usize, value: f64) {
        self.output_data[pattern * self.outputs + index] = value;
    }

    pub fn input_row(&self, pattern: usize) -> &[f64] {
        &self.input_data[pattern * self.inputs..(pattern + 1) * self.inputs]
    }

    pub fn output_row(&self, pattern: usize) -> &[f64] {
        &self.output_data[pattern * self.outputs..(pattern + 1) * self.outputs]
    }

    /// Splits into the first `n` patterns and the rest, e.g. to hold out a
    /// validation set.
    pub fn split_at(&self, n: usize) -> (PatternSet, PatternSet) {
        let n = n.min(self.pattern_count());
        let head = PatternSet {
            inputs: self.inputs,
            outputs: self.outputs,
            input_data: self.input_data[..n * self.inputs].to_vec(),
            output_data: self.output_data[..n * self.outputs].to_vec(),
        };
        let tail = PatternSet {
            inputs: self.inputs,
            outputs: self.outputs,
            input_data: self.input_data[n * self.inputs..].to_vec(),
            output_data: self.output_data[n * self.outputs..].to_vec(),
        };
        (head, tail)
    }

    /// Appends every pattern of `other`.
    pub fn join(&mut self, other: &PatternSet) -> Result<()> {
        if other.inputs != self.inputs {
            return Err(Error::DimensionMismatch {
                what: "pattern input width",
                expected: self.inputs,
                actual: other.inputs,
            });
        }
        if other.outputs != self.outputs {
            return Err(Error::DimensionMismatch {
                what: "pattern output width",
                expected: self.outputs,
                actual: other.outputs,
            });
        }
        self.input_data.extend_from_slice(&other.input_data);
        self.output_data.extend_from_slice(&other.output_data);
        Ok(())
    }
}

impl PatternSource for PatternSet {
    fn input_count(&self) -> usize {
        self.inputs
    }

    fn output_count(&self) -> usize {
        self.outputs
    }

    fn pattern_count(&self) -> usize {
        if self.inputs > 0 {
            self.input_data.len() / self.inputs
        } else if self.outputs > 0 {
            self.output_data.len() / self.outputs
        } else {
            0
        }
    }

    fn input(&self, pattern: usize, index: usize) -> f64 {
        self.input_data[pattern * self.inputs + index]
    }

    fn output(&self, pattern: usize, index: usize) -> f64 {
        self.output_data[pattern * self.outputs + index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn xor() -> PatternSet {
        PatternSet::from_rows(
            &[vec![0.0, 0.0], vec![0.0, 1.0], vec![1.0, 0.0], vec![1.0, 1.0]],
            &[vec![0.0], vec![1.0], vec![1.0], vec![0.0]],
        )
        .unwrap()
    }

    #[test]
    fn from_rows_lays_out_row_major() {
        let set = xor();
        assert_eq!(set.pattern_count(), 4);
        assert_eq!(set.input_count(), 2);
        assert_eq!(set.output_count(), 1);
        assert_eq!(set.input(2, 0), 1.0);
        assert_eq!(set.input_row(1), &[0.0, 1.0]);
        assert_eq!(set.output(3, 0), 0.0);
    }

    #[test]
    fn ragged_rows_are_rejected() {
        let err = PatternSet::from_rows(&[vec![0.0, 1.0], vec![1.0]], &[vec![0.0], vec![1.0]]);
        assert!(matches!(err, Err(Error::DimensionMismatch { .. })));
        let err = PatternSet::from_rows(&[vec![0.0]], &[]);
        assert!(matches!(err, Err(Error::DimensionMismatch { .. })));
    }

    #[test]
    fn split_and_join_preserve_patterns() {
        let set = xor();
        let (mut head, tail) = set.split_at(3);
        assert_eq!(head.pattern_count(), 3);
        assert_eq!(tail.pattern_count(), 1);
        assert_eq!(tail.input_row(0), &[1.0, 1.0]);
        head.join(&tail).unwrap();
        assert_eq!(head, set);
    }

    #[test]
    fn classes_follow_outputs() {
        let set = xor();
        assert_eq!(set.class_count(), 2);
        assert_eq!(set.class_of(0), 0);
        assert_eq!(set.class_of(1), 1);

        let mut multi = PatternSet::new(1, 1, 3);
        multi.set_output(0, 2, 0.9);
        assert_eq!(multi.class_count(), 3);
        assert_eq!(multi.class_of(0), 2);
    }
}
