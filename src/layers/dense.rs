use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::activation::activation::ActivationFunction;
use crate::math::{backend::Backend, matrix::Matrix};

/// Learned weights and biases of one dense layer.
///
/// `weights` is `(input_size, size)` and `biases` is `(1, size)`, so a row
/// input `x` maps to `z = x·W + b`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DenseParams {
    pub weights: Matrix,
    pub biases: Matrix,
}

impl DenseParams {
    /// Fresh parameters: He weights ahead of ReLU, Xavier ahead of softmax,
    /// zero biases.
    pub fn init<R: Rng + ?Sized>(
        input_size: usize,
        size: usize,
        activation: ActivationFunction,
        rng: &mut R,
    ) -> DenseParams {
        let weights = match activation {
            ActivationFunction::ReLU => Matrix::he(input_size, size, rng),
            ActivationFunction::Softmax => Matrix::xavier(input_size, size, rng),
        };
        DenseParams {
            weights,
            biases: Matrix::zeros(1, size),
        }
    }

    pub fn input_size(&self) -> usize {
        self.weights.rows
    }

    pub fn size(&self) -> usize {
        self.weights.cols
    }

    pub fn pre_activation(&self, input: &Matrix, backend: Backend) -> Matrix {
        input.matmul(&self.weights, backend) + self.biases.clone()
    }
}

/// A dense layer during training: parameters plus the activations cached by
/// the last forward pass, which backprop reads.
#[derive(Debug)]
pub struct Layer {
    pub params: DenseParams,
    pub activator: ActivationFunction,
    pub neurons: Matrix,
    pre_neurons: Matrix, // z = xW + b, needed for the activation derivative
}

impl Layer {
    pub fn new(params: DenseParams, activator: ActivationFunction) -> Layer {
        let size = params.size();
        Layer {
            params,
            activator,
            neurons: Matrix::zeros(1, size),
            pre_neurons: Matrix::zeros(1, size),
        }
    }

    pub fn feed_from(&mut self, input: &Matrix, backend: Backend) -> Matrix {
        let z = self.params.pre_activation(input, backend);
        let a = self.activator.apply(&z);
        self.pre_neurons = z;
        self.neurons = a.clone();
        a
    }

    /// Returns `(weights_grad, biases_grad)`.
    ///
    /// `next_layer_delta` is ∂L/∂a for this layer. The biases gradient equals
    /// the layer delta δ = error ⊙ σ'(z), which the caller reuses to push the
    /// error one layer back.
    pub fn compute_gradients(
        &self,
        next_layer_delta: &Matrix,
        inputs: &Matrix,
        backend: Backend,
    ) -> (Matrix, Matrix) {
        let act_derivative = self.pre_neurons.map(|x| self.activator.derivative(x));
        let layer_delta = next_layer_delta.hadamard(&act_derivative);

        let weights_grad = inputs.transpose().matmul(&layer_delta, backend);
        (weights_grad, layer_delta)
    }

    pub fn into_params(self) -> DenseParams {
        self.params
    }
}
