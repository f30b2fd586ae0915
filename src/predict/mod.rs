pub mod predictor;

pub use predictor::{predict, predict_all, predict_pattern, predict_with, ProbabilityDistribution};
