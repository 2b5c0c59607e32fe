pub mod activation;
pub mod data;
pub mod error;
pub mod loss;
pub mod math;
pub mod network;
pub mod optim;
pub mod terminate;
pub mod train;

// Convenience re-exports
pub use activation::TransferFunction;
pub use data::{PatternSet, PatternSource};
pub use error::{Error, Result};
pub use loss::MseLoss;
pub use network::{Connection, ConnectionId, Network, Neuron, NeuronKind, Topology};
pub use optim::{BackpropTrainer, RPropTrainer, TrainingAlgorithm};
pub use terminate::{Criterion, Terminator, TerminatorRegistry, WeightSnapshot};
pub use train::{ChannelObserver, CycleStats, TrainConfig, Trainer, TrainingObserver, TrainingRecord};
