use crate::{layers::dense::DenseParams, math::matrix::Matrix};

pub struct Sgd {
    pub learning_rate: f64,
}

impl Sgd {
    pub fn new(learning_rate: f64) -> Sgd {
        Sgd { learning_rate }
    }

    /// Plain gradient step: θ ← θ - lr·∇θ.
    pub fn step(&self, params: &mut DenseParams, weights_grad: Matrix, biases_grad: Matrix) {
        let lr = self.learning_rate;
        params.weights = std::mem::take(&mut params.weights) - weights_grad.map(|g| g * lr);
        params.biases = std::mem::take(&mut params.biases) - biases_grad.map(|g| g * lr);
    }
}
