use serde::{Deserialize, Serialize};

use crate::math::matrix::Matrix;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActivationFunction {
    ReLU,
    /// Vector-valued; normalizes each row into a probability distribution.
    Softmax,
}

impl ActivationFunction {
    /// Applies the activation to pre-activation values `z`, row by row.
    pub fn apply(&self, z: &Matrix) -> Matrix {
        match self {
            ActivationFunction::ReLU => z.map(|x| if x > 0.0 { x } else { 0.0 }),
            ActivationFunction::Softmax => {
                Matrix::from_data(z.data.iter().map(|row| softmax(row)).collect())
            }
        }
    }

    /// Element-wise derivative with respect to the pre-activation.
    ///
    /// For `Softmax` the trainer pairs it with cross-entropy, whose gradient
    /// (`predicted - expected`) is already taken w.r.t. the logits. Returning
    /// `1.0` passes that delta through without applying the Jacobian twice.
    pub fn derivative(&self, x: f64) -> f64 {
        match self {
            ActivationFunction::ReLU => if x > 0.0 { 1.0 } else { 0.0 },
            ActivationFunction::Softmax => 1.0,
        }
    }
}

/// Numerically stable softmax: the row maximum is subtracted before `exp`.
pub fn softmax(logits: &[f64]) -> Vec<f64> {
    let max = logits.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = logits.iter().map(|&z| (z - max).exp()).collect();
    let sum: f64 = exps.iter().sum();
    exps.into_iter().map(|e| e / sum).collect()
}
