pub mod algorithm;
pub mod backprop;
pub(crate) mod error_signal;
pub mod rprop;

pub use algorithm::TrainingAlgorithm;
pub use backprop::BackpropTrainer;
pub use rprop::RPropTrainer;
