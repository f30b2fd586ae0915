pub mod adam;
pub mod sgd;

pub use adam::Adam;
pub use sgd::Sgd;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SegmentError;
use crate::layers::dense::DenseParams;
use crate::math::matrix::Matrix;

/// Which update rule the training loop uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptimizerKind {
    #[default]
    Adam,
    Sgd,
}

impl FromStr for OptimizerKind {
    type Err = SegmentError;

    fn from_str(s: &str) -> Result<OptimizerKind, SegmentError> {
        match s.trim().to_ascii_lowercase().as_str() {
            "adam" => Ok(OptimizerKind::Adam),
            "sgd" => Ok(OptimizerKind::Sgd),
            other => Err(SegmentError::InvalidOptions(format!("unknown optimizer '{other}'"))),
        }
    }
}

impl fmt::Display for OptimizerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptimizerKind::Adam => write!(f, "adam"),
            OptimizerKind::Sgd => write!(f, "sgd"),
        }
    }
}

/// A configured optimizer, holding whatever per-layer state its rule needs.
pub enum Optimizer {
    Adam(Adam),
    Sgd(Sgd),
}

impl Optimizer {
    pub fn new(kind: OptimizerKind, learning_rate: f64, layer_shapes: &[(usize, usize)]) -> Optimizer {
        match kind {
            OptimizerKind::Adam => Optimizer::Adam(Adam::new(learning_rate, layer_shapes)),
            OptimizerKind::Sgd => Optimizer::Sgd(Sgd::new(learning_rate)),
        }
    }

    /// Applies one update to layer `index`.
    pub fn step(&mut self, index: usize, params: &mut DenseParams, weights_grad: Matrix, biases_grad: Matrix) {
        match self {
            Optimizer::Adam(adam) => adam.step(index, params, weights_grad, biases_grad),
            Optimizer::Sgd(sgd) => sgd.step(params, weights_grad, biases_grad),
        }
    }
}
