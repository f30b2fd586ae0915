use log::info;

use crate::dataset::build_training_set;
use crate::error::Result;
use crate::network::{network::Parameters, spec::Model};
use crate::train::engine::{DenseTrainer, Trainer};
use crate::train::epoch_stats::TrainingReport;
use crate::train::train_config::TrainOptions;

/// Trains `model` on `inputs`/`targets` with the built-in engine.
///
/// `options` starts from the fixed defaults (cross-entropy, Adam, 1000
/// passes, batch size 1); whatever the caller changed overrides them. A run
/// that fails to converge still returns its parameters.
pub fn train(
    model: &Model,
    inputs: &[Vec<f64>],
    targets: &[Vec<f64>],
    options: &TrainOptions,
) -> Result<Parameters> {
    train_with(&DenseTrainer::default(), model, inputs, targets, options).map(|(params, _)| params)
}

/// Like [`train`], also returning the run's [`TrainingReport`].
pub fn train_with_report(
    model: &Model,
    inputs: &[Vec<f64>],
    targets: &[Vec<f64>],
    options: &TrainOptions,
) -> Result<(Parameters, TrainingReport)> {
    train_with(&DenseTrainer::default(), model, inputs, targets, options)
}

/// Orchestrates a run on any [`Trainer`].
pub fn train_with<T: Trainer + ?Sized>(
    trainer: &T,
    model: &Model,
    inputs: &[Vec<f64>],
    targets: &[Vec<f64>],
    options: &TrainOptions,
) -> Result<(Parameters, TrainingReport)> {
    let outcome = trainer.fit(model, inputs, targets, options)?;
    Ok((outcome.parameters, outcome.report))
}

/// Builds the exhaustive digit dataset and trains `model` on it.
pub fn train_digits(model: &Model, options: &TrainOptions) -> Result<(Parameters, TrainingReport)> {
    let (inputs, targets) = build_training_set().as_f64();
    info!("training on the {}-digit set with hidden layers {:?}", inputs.len(), model.hidden_sizes());
    train_with_report(model, &inputs, &targets, options)
}
