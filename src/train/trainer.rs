use std::time::Instant;

use log::{debug, info, trace, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::data::PatternSource;
use crate::error::Result;
use crate::network::Network;
use crate::optim::TrainingAlgorithm;
use crate::terminate::{Terminator, TerminatorName, TerminatorRegistry};
use crate::train::cycle_stats::CycleStats;
use crate::train::observer::TrainingObserver;
use crate::train::record::TrainingRecord;
use crate::train::train_config::TrainConfig;

/// Runs a [`TrainingAlgorithm`] for a number of cycles with optional early
/// stopping.
///
/// Each cycle is one sweep over the training set. With a validation set,
/// every `validation_interval` cycles the configured [`Terminator`] measures
/// the validation error and may end the run; an observer may end it too.
/// At the end a saving terminator's best weights are written back.
pub struct Trainer<A> {
    algorithm: A,
    config: TrainConfig,
    registry: TerminatorRegistry,
    record: TrainingRecord,
    terminator: Option<Terminator>,
}

impl<A: TrainingAlgorithm> Trainer<A> {
    pub fn new(algorithm: A, config: TrainConfig) -> Trainer<A> {
        Trainer {
            algorithm,
            config,
            registry: TerminatorRegistry::standard(),
            record: TrainingRecord::default(),
            terminator: None,
        }
    }

    /// Replaces the table terminator names are looked up in.
    pub fn with_registry(mut self, registry: TerminatorRegistry) -> Trainer<A> {
        self.registry = registry;
        self
    }

    pub fn algorithm(&self) -> &A {
        &self.algorithm
    }

    pub fn algorithm_mut(&mut self) -> &mut A {
        &mut self.algorithm
    }

    pub fn config(&self) -> &TrainConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut TrainConfig {
        &mut self.config
    }

    /// History of the last run.
    pub fn record(&self) -> &TrainingRecord {
        &self.record
    }

    /// Terminator of the last run, if one was used.
    pub fn terminator(&self) -> Option<&Terminator> {
        self.terminator.as_ref()
    }

    /// Trains `network` and returns the final training MSE.
    ///
    /// When weights are restored from a checkpoint the returned error is
    /// measured again on the restored network.
    pub fn train(
        &mut self,
        network: &mut Network,
        train_set: &dyn PatternSource,
        validation: Option<&dyn PatternSource>,
        mut observer: Option<&mut dyn TrainingObserver>,
    ) -> Result<f64> {
        self.config.validate(validation.is_some())?;
        network.check_pattern_dimensions(train_set)?;
        if let Some(v) = validation {
            network.check_pattern_dimensions(v)?;
        }
        let validation = validation.filter(|v| {
            if v.is_empty() {
                warn!("validation set is empty, early stopping disabled");
            }
            !v.is_empty()
        });

        let name = TerminatorName::parse(&self.config.terminator);
        let ensure = self.config.ensure_validation_above_training && name.ensure_validation_above_training;
        let mut terminator = match validation {
            Some(_) if !name.is_none() => Some(self.registry.create(name.name)?),
            _ => None,
        };

        if let Some(range) = self.config.init_range {
            let mut rng = match self.config.seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_entropy(),
            };
            network.init(range, &mut rng);
        }
        self.algorithm.init_train(network)?;

        let cycles = self.config.cycles;
        let interval = self.config.validation_interval;
        info!(
            "training with {} for up to {cycles} cycles on {} patterns (terminator: {})",
            self.algorithm.name(),
            train_set.pattern_count(),
            terminator
                .as_ref()
                .map(|t| t.criterion().to_string())
                .unwrap_or_else(|| "none".into())
        );

        let mut record = TrainingRecord::with_capacity(cycles);
        let run_start = Instant::now();
        let mut mse = 0.0;

        for cycle in 1..=cycles {
            let cycle_start = Instant::now();
            mse = self.algorithm.train_once(network, train_set)?;
            record.training_errors.push(mse);
            record.total_cycles = cycle;
            trace!("cycle {cycle}: training error {mse:.6}");

            let mut validation_error = None;
            let mut generalization_loss = None;
            let mut stop = false;
            if let Some(v) = validation.filter(|_| cycle % interval == 0) {
                match terminator.as_mut() {
                    Some(t) => {
                        let wants_stop = t.validate(network, v, &record.training_errors, cycle)?;
                        let error = t.validation_error();
                        validation_error = Some(error);
                        generalization_loss = Some(t.generalization_loss());
                        if wants_stop {
                            if ensure && error < mse {
                                debug!(
                                    "cycle {cycle}: stop vetoed, validation error {error:.6} below training error {mse:.6}"
                                );
                            } else {
                                stop = true;
                            }
                        }
                    }
                    None => validation_error = Some(network.test(v)?),
                }
                if let Some(error) = validation_error {
                    record.validation_errors.push(error);
                }
            }

            if let Some(obs) = observer.as_mut() {
                let stats = CycleStats {
                    cycle,
                    total_cycles: cycles,
                    train_error: mse,
                    validation_error,
                    generalization_loss,
                    elapsed_ms: cycle_start.elapsed().as_millis() as u64,
                };
                if obs.cycle_trained(&stats).is_break() {
                    info!("training stopped by observer after cycle {cycle}");
                    stop = true;
                }
            }
            if stop {
                break;
            }
        }

        record.cycles_trained = record.total_cycles;
        if let Some(t) = &terminator {
            record.generalization_loss = Some(t.generalization_loss());
            if !ensure || t.minimum_error() > mse {
                if t.restore(network)? {
                    record.restored = true;
                    record.cycles_trained = t.cycle_at_minimum();
                    mse = network.test(train_set)?;
                }
            } else {
                debug!(
                    "keeping final weights: best validation error {:.6} not above training error {mse:.6}",
                    t.minimum_error()
                );
            }
        }
        record.training_errors.truncate(record.cycles_trained);
        if interval > 0 {
            record.validation_errors.truncate(record.cycles_trained / interval);
        }

        info!(
            "trained {} of {} cycles in {:.2}s, final training error {mse:.6}{}",
            record.cycles_trained,
            record.total_cycles,
            run_start.elapsed().as_secs_f64(),
            if record.restored { " (restored)" } else { "" }
        );
        self.record = record;
        self.terminator = terminator;
        Ok(mse)
    }
}
