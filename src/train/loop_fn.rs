use std::sync::atomic::Ordering;
use std::time::Instant;

use log::{debug, info};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use crate::error::{Result, SegmentError};
use crate::layers::dense::Layer;
use crate::loss::cross_entropy::CrossEntropyLoss;
use crate::math::{backend::Backend, matrix::Matrix};
use crate::network::{network::Parameters, spec::Model};
use crate::optim::Optimizer;
use crate::train::epoch_stats::{EpochStats, TrainingReport};
use crate::train::train_config::TrainOptions;

/// Learned parameters plus how the run went.
#[derive(Debug, Clone)]
pub struct TrainingOutcome {
    pub parameters: Parameters,
    pub report: TrainingReport,
}

// ---------------------------------------------------------------------------
// Public entry point
// ---------------------------------------------------------------------------

/// Fits fresh parameters for `model` to `inputs`/`targets`.
///
/// Runs `options.passes` passes of mini-batch gradient descent under
/// softmax cross-entropy, with the optimizer `options.optimizer` names.
///
/// # Early termination
/// The loop breaks early if:
/// - the `progress_tx` receiver has been dropped, **or**
/// - `options.stop_flag` is set to `true`.
///
/// # Errors
/// `EmptyDataset` for no rows, `ShapeMismatch` when the rows do not fit the
/// model, `InvalidOptions` for a zero batch size or non-positive learning rate.
pub fn train_loop(
    model: &Model,
    inputs: &[Vec<f64>],
    targets: &[Vec<f64>],
    options: &TrainOptions,
) -> Result<TrainingOutcome> {
    options.validate()?;
    check_data(model, inputs, targets)?;

    let mut rng = options.rng();
    let mut layers: Vec<Layer> = Parameters::initialize(model, &mut rng)
        .into_layers()
        .into_iter()
        .zip(model.layers())
        .map(|(params, spec)| Layer::new(params, spec.activation))
        .collect();

    let shapes: Vec<(usize, usize)> = model
        .layers()
        .iter()
        .map(|spec| (spec.input_size, spec.size))
        .collect();
    let mut optimizer = Optimizer::new(options.optimizer, options.learning_rate, &shapes);

    info!(
        "training {} layer(s) on {} examples: passes={} batch_size={} optimizer={} lr={} backend={}",
        layers.len(),
        inputs.len(),
        options.passes,
        options.batch_size,
        options.optimizer,
        options.learning_rate,
        options.backend
    );

    // `passes` may be effectively unbounded when a stop flag ends the run.
    let mut report = TrainingReport::default();

    for pass in 1..=options.passes {
        if stop_requested(options) {
            break;
        }

        let t_start = Instant::now();

        // ── One full pass over the training data ───────────────────────────
        let loss = run_one_pass(&mut layers, inputs, targets, &mut optimizer, options, &mut rng);
        let accuracy = compute_accuracy(&mut layers, inputs, targets, options.backend);

        report.passes_run = pass;
        report.final_loss = loss;
        report.final_accuracy = accuracy;
        report.loss_history.push(loss);

        let stats = EpochStats {
            pass,
            total_passes: options.passes,
            loss,
            accuracy,
            elapsed_ms: t_start.elapsed().as_millis() as u64,
        };
        debug!("pass {}/{}: loss={:.6} accuracy={:.2}", pass, options.passes, loss, accuracy);

        if let Some(ref tx) = options.progress_tx {
            if tx.send(stats).is_err() {
                info!("progress receiver dropped; stopping after pass {pass}");
                break;
            }
        }
    }

    info!(
        "training finished after {} pass(es): loss={:.6} accuracy={:.2}",
        report.passes_run, report.final_loss, report.final_accuracy
    );

    let parameters = Parameters::from_layers(layers.into_iter().map(Layer::into_params).collect());
    Ok(TrainingOutcome { parameters, report })
}

/// Runs `input` through the model described by `model` and `params`.
pub fn forward(model: &Model, params: &Parameters, input: &[f64], backend: Backend) -> Result<Vec<f64>> {
    params.check_fits(model)?;
    if input.len() != model.input_size() {
        return Err(SegmentError::ShapeMismatch {
            expected: model.input_size(),
            actual: input.len(),
        });
    }

    let mut current = Matrix::row(input);
    for (layer, spec) in params.layers().iter().zip(model.layers()) {
        let z = layer.pre_activation(&current, backend);
        current = spec.activation.apply(&z);
    }
    Ok(current.into_row())
}

// ---------------------------------------------------------------------------
// Private helpers
// ---------------------------------------------------------------------------

fn check_data(model: &Model, inputs: &[Vec<f64>], targets: &[Vec<f64>]) -> Result<()> {
    if inputs.is_empty() {
        return Err(SegmentError::EmptyDataset);
    }
    if inputs.len() != targets.len() {
        return Err(SegmentError::ShapeMismatch {
            expected: inputs.len(),
            actual: targets.len(),
        });
    }
    for (input, target) in inputs.iter().zip(targets) {
        if input.len() != model.input_size() {
            return Err(SegmentError::ShapeMismatch {
                expected: model.input_size(),
                actual: input.len(),
            });
        }
        if target.len() != model.output_size() {
            return Err(SegmentError::ShapeMismatch {
                expected: model.output_size(),
                actual: target.len(),
            });
        }
    }
    Ok(())
}

fn stop_requested(options: &TrainOptions) -> bool {
    options
        .stop_flag
        .as_ref()
        .is_some_and(|flag| flag.load(Ordering::Relaxed))
}

fn forward_cached(layers: &mut [Layer], input: &[f64], backend: Backend) -> Vec<f64> {
    let mut current = Matrix::row(input);
    for layer in layers.iter_mut() {
        current = layer.feed_from(&current, backend);
    }
    current.into_row()
}

/// One pass of mini-batch updates. Returns the mean loss over all examples.
fn run_one_pass(
    layers: &mut [Layer],
    inputs: &[Vec<f64>],
    targets: &[Vec<f64>],
    optimizer: &mut Optimizer,
    options: &TrainOptions,
    rng: &mut StdRng,
) -> f64 {
    let n = inputs.len();
    let backend = options.backend;
    let mut total_loss = 0.0;

    let mut indices: Vec<usize> = (0..n).collect();
    if options.shuffle {
        indices.shuffle(rng);
    }

    for batch in indices.chunks(options.batch_size) {
        let mut acc_grads: Vec<(Matrix, Matrix)> = layers
            .iter()
            .map(|layer| {
                (
                    Matrix::zeros(layer.params.weights.rows, layer.params.weights.cols),
                    Matrix::zeros(1, layer.params.size()),
                )
            })
            .collect();

        for &idx in batch {
            let input = &inputs[idx];
            let expected = &targets[idx];

            let output = forward_cached(layers, input, backend);
            total_loss += CrossEntropyLoss::loss(&output, expected);

            let mut delta = Matrix::row(&CrossEntropyLoss::derivative(&output, expected));

            // Backward pass.
            for i in (0..layers.len()).rev() {
                let input_for_layer = if i == 0 {
                    Matrix::row(input)
                } else {
                    layers[i - 1].neurons.clone()
                };

                let (w_grad, b_grad) = layers[i].compute_gradients(&delta, &input_for_layer, backend);

                if i > 0 {
                    delta = b_grad.matmul(&layers[i].params.weights.transpose(), backend);
                }

                let (w_acc, b_acc) = std::mem::take(&mut acc_grads[i]);
                acc_grads[i] = (w_acc + w_grad, b_acc + b_grad);
            }
        }

        let inv_batch = 1.0 / batch.len() as f64;
        for (i, (w_acc, b_acc)) in acc_grads.into_iter().enumerate() {
            optimizer.step(
                i,
                &mut layers[i].params,
                w_acc.map(|x| x * inv_batch),
                b_acc.map(|x| x * inv_batch),
            );
        }
    }

    total_loss / n as f64
}

/// Fraction of examples classified correctly (argmax match).
fn compute_accuracy(layers: &mut [Layer], inputs: &[Vec<f64>], targets: &[Vec<f64>], backend: Backend) -> f64 {
    let correct = inputs
        .iter()
        .zip(targets)
        .filter(|(input, target)| argmax(&forward_cached(layers, input, backend)) == argmax(target))
        .count();
    correct as f64 / inputs.len() as f64
}

/// Index of the maximum element in a slice.
fn argmax(v: &[f64]) -> usize {
    v.iter()
        .enumerate()
        .max_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(i, _)| i)
        .unwrap_or(0)
}
