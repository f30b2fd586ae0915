pub mod engine;
pub mod epoch_stats;
pub mod loop_fn;
pub mod train_config;
pub mod trainer;

pub use engine::{DenseTrainer, Trainer};
pub use epoch_stats::{EpochStats, TrainingReport};
pub use loop_fn::{train_loop, TrainingOutcome};
pub use train_config::TrainOptions;
pub use trainer::{train, train_digits, train_with, train_with_report};
