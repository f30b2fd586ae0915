use crate::{layers::dense::DenseParams, math::matrix::Matrix};

/// Adam with bias-corrected first and second moment estimates.
///
/// Moments are kept per layer; each layer is stepped exactly once per batch,
/// so the per-layer step counter doubles as the global one.
pub struct Adam {
    pub learning_rate: f64,
    pub beta1: f64,
    pub beta2: f64,
    pub epsilon: f64,
    moments: Vec<Moments>,
}

struct Moments {
    m_w: Matrix,
    v_w: Matrix,
    m_b: Matrix,
    v_b: Matrix,
    t: i32,
}

impl Adam {
    pub const DEFAULT_BETA1: f64 = 0.9;
    pub const DEFAULT_BETA2: f64 = 0.999;
    pub const DEFAULT_EPSILON: f64 = 1e-7;

    /// `layer_shapes` lists `(input_size, size)` for each layer, input → output.
    pub fn new(learning_rate: f64, layer_shapes: &[(usize, usize)]) -> Adam {
        let moments = layer_shapes
            .iter()
            .map(|&(input_size, size)| Moments {
                m_w: Matrix::zeros(input_size, size),
                v_w: Matrix::zeros(input_size, size),
                m_b: Matrix::zeros(1, size),
                v_b: Matrix::zeros(1, size),
                t: 0,
            })
            .collect();
        Adam {
            learning_rate,
            beta1: Adam::DEFAULT_BETA1,
            beta2: Adam::DEFAULT_BETA2,
            epsilon: Adam::DEFAULT_EPSILON,
            moments,
        }
    }

    pub fn step(&mut self, index: usize, params: &mut DenseParams, weights_grad: Matrix, biases_grad: Matrix) {
        let (lr, beta1, beta2, eps) = (self.learning_rate, self.beta1, self.beta2, self.epsilon);
        let state = &mut self.moments[index];
        state.t += 1;
        let correction1 = 1.0 - beta1.powi(state.t);
        let correction2 = 1.0 - beta2.powi(state.t);

        let update = |param: &mut Matrix, m: &mut Matrix, v: &mut Matrix, grad: &Matrix| {
            for i in 0..param.rows {
                for j in 0..param.cols {
                    let g = grad.data[i][j];
                    m.data[i][j] = beta1 * m.data[i][j] + (1.0 - beta1) * g;
                    v.data[i][j] = beta2 * v.data[i][j] + (1.0 - beta2) * g * g;
                    let m_hat = m.data[i][j] / correction1;
                    let v_hat = v.data[i][j] / correction2;
                    param.data[i][j] -= lr * m_hat / (v_hat.sqrt() + eps);
                }
            }
        };

        update(&mut params.weights, &mut state.m_w, &mut state.v_w, &weights_grad);
        update(&mut params.biases, &mut state.m_b, &mut state.v_b, &biases_grad);
    }
}
