use crate::data::PatternSource;
use crate::error::Result;
use crate::network::Network;

/// One weight-update rule driven by the [`Trainer`](crate::train::Trainer)
/// loop.
///
/// `init_train` is called once per training run, before the first sweep; it
/// sizes the per-weight buffers for the network's current slot layout.
/// `train_once` then performs one full sweep over the training patterns and
/// returns the mean squared error of that sweep.
pub trait TrainingAlgorithm {
    fn name(&self) -> &'static str;

    fn init_train(&mut self, network: &Network) -> Result<()>;

    fn train_once(&mut self, network: &mut Network, patterns: &dyn PatternSource) -> Result<f64>;
}
