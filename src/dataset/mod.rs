pub mod builder;

pub use builder::{build_inputs, build_targets, build_training_set, TrainingSet};
