use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Configuration for a [`Trainer`](super::Trainer) run.
///
/// # Fields
/// - `cycles`: maximum number of sweeps over the training set
/// - `validation_interval`: validate every this many cycles
/// - `terminator`: early-stopping strategy name (`"GL2"`, `"UP3"`, `"none"`,
///   ...); a leading `-` switches off the validation-above-training policy
/// - `ensure_validation_above_training`: veto a stop while the validation
///   error is still below the training error
/// - `init_range`: draw initial weights from `[-r, r]`; `None` keeps the
///   network's current weights
/// - `seed`: seed for the weight initializer; `None` uses entropy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainConfig {
    pub cycles: usize,
    pub validation_interval: usize,
    pub terminator: String,
    pub ensure_validation_above_training: bool,
    pub init_range: Option<f64>,
    pub seed: Option<u64>,
}

impl Default for TrainConfig {
    fn default() -> Self {
        TrainConfig::new(1000)
    }
}

impl TrainConfig {
    pub fn new(cycles: usize) -> Self {
        TrainConfig {
            cycles,
            validation_interval: 5,
            terminator: "GL2".to_string(),
            ensure_validation_above_training: true,
            init_range: Some(0.5),
            seed: None,
        }
    }

    pub fn with_validation_interval(mut self, interval: usize) -> Self {
        self.validation_interval = interval;
        self
    }

    pub fn with_terminator(mut self, name: &str) -> Self {
        self.terminator = name.to_string();
        self
    }

    pub fn with_ensure_validation_above_training(mut self, ensure: bool) -> Self {
        self.ensure_validation_above_training = ensure;
        self
    }

    pub fn with_init_range(mut self, range: Option<f64>) -> Self {
        self.init_range = range;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub(crate) fn validate(&self, has_validation: bool) -> Result<()> {
        if self.cycles == 0 {
            return Err(Error::InvalidConfig("cycles must be at least 1".into()));
        }
        if has_validation && self.validation_interval == 0 {
            return Err(Error::InvalidConfig("validation interval must be at least 1".into()));
        }
        if let Some(range) = self.init_range {
            if !(range.is_finite() && range >= 0.0) {
                return Err(Error::InvalidConfig(format!("init range must be non-negative, got {range}")));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = TrainConfig::new(50);
        assert_eq!(config.terminator, "GL2");
        assert!(config.ensure_validation_above_training);
        assert_eq!(config.init_range, Some(0.5));
        assert!(config.validate(true).is_ok());
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(TrainConfig::new(0).validate(false).is_err());
        assert!(TrainConfig::new(5).with_validation_interval(0).validate(true).is_err());
        assert!(TrainConfig::new(5).with_validation_interval(0).validate(false).is_ok());
        assert!(TrainConfig::new(5).with_init_range(Some(-1.0)).validate(false).is_err());
    }
}
