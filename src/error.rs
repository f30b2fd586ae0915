//! Crate-wide error type.

use thiserror::Error;

/// Errors raised by the codec, the model factory, and the training engine.
///
/// Every variant is raised synchronously at the offending call; nothing is
/// retried or recovered internally.
#[derive(Debug, Error)]
pub enum SegmentError {
    #[error("invalid digit {0}: expected an integer in 0..=9")]
    InvalidDigit(String),

    #[error("invalid segment pattern length: expected 7, got {0}")]
    InvalidPatternLength(usize),

    #[error("segment pattern {0} does not match any digit")]
    UnknownPattern(String),

    #[error("invalid architecture: {0}")]
    InvalidArchitecture(String),

    #[error("shape mismatch: expected {expected}, got {actual}")]
    ShapeMismatch { expected: usize, actual: usize },

    #[error("training set is empty")]
    EmptyDataset,

    #[error("invalid training options: {0}")]
    InvalidOptions(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SegmentError>;
