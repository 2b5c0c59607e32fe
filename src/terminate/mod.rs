pub mod criterion;
pub mod registry;
pub mod snapshot;
pub mod terminator;

pub use criterion::{training_progress, Criterion};
pub use registry::{TerminatorFactory, TerminatorName, TerminatorRegistry};
pub use snapshot::WeightSnapshot;
pub use terminator::Terminator;
