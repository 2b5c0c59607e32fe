pub mod cycle_stats;
pub mod observer;
pub mod record;
pub mod train_config;
pub mod trainer;

pub use cycle_stats::CycleStats;
pub use observer::{ChannelObserver, TrainingObserver};
pub use record::TrainingRecord;
pub use train_config::TrainConfig;
pub use trainer::Trainer;
