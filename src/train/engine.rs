use crate::error::Result;
use crate::math::backend::Backend;
use crate::network::{network::Parameters, spec::Model};
use crate::train::loop_fn::{self, TrainingOutcome};
use crate::train::train_config::TrainOptions;

/// The numeric collaborator behind training and inference.
///
/// Implementations own all of the tensor math; callers only hand over an
/// architecture, data, and options, and get parameters or outputs back.
pub trait Trainer {
    /// Fits fresh parameters for `model` on row-major `inputs`/`targets`.
    fn fit(
        &self,
        model: &Model,
        inputs: &[Vec<f64>],
        targets: &[Vec<f64>],
        options: &TrainOptions,
    ) -> Result<TrainingOutcome>;

    /// Runs one example through `model` with `params`.
    fn infer(&self, model: &Model, params: &Parameters, input: &[f64]) -> Result<Vec<f64>>;
}

/// The built-in dense-network engine.
///
/// Training uses the backend named in its options; inference uses
/// `inference_backend`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DenseTrainer {
    pub inference_backend: Backend,
}

impl DenseTrainer {
    pub fn new(inference_backend: Backend) -> DenseTrainer {
        DenseTrainer { inference_backend }
    }
}

impl Trainer for DenseTrainer {
    fn fit(
        &self,
        model: &Model,
        inputs: &[Vec<f64>],
        targets: &[Vec<f64>],
        options: &TrainOptions,
    ) -> Result<TrainingOutcome> {
        loop_fn::train_loop(model, inputs, targets, options)
    }

    fn infer(&self, model: &Model, params: &Parameters, input: &[f64]) -> Result<Vec<f64>> {
        loop_fn::forward(model, params, input, self.inference_backend)
    }
}
