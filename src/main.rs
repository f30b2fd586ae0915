//! Trains the digit classifier once and logs how it reads every digit.
//!
//! Run with:
//!   RUST_LOG=info cargo run --release
//!
//! `SEGMENT_NN_OPTIONS` may name a JSON file of training options, e.g.
//! `{"passes": 300, "backend": "parallel"}`; omitted keys keep their defaults.

use log::{error, info};

use segment_nn::predict::predict_all;
use segment_nn::{train_digits, ModelFactory, Result, TrainOptions};

const HIDDEN_LAYERS: [i64; 1] = [16];

fn run() -> Result<()> {
    let options = match std::env::var("SEGMENT_NN_OPTIONS") {
        Ok(path) => {
            info!("loading training options from {path}");
            TrainOptions::load_json(&path)?
        }
        Err(_) => TrainOptions::default(),
    };

    let model = ModelFactory::build(&HIDDEN_LAYERS)?;
    info!(
        "model: 7 -> {:?} -> 10 ({} parameters)",
        model.hidden_sizes(),
        model.parameter_count()
    );

    let (params, report) = train_digits(&model, &options)?;
    info!(
        "trained for {} passes: loss={:.5} accuracy={:.0}%",
        report.passes_run,
        report.final_loss,
        report.final_accuracy * 100.0
    );

    for (digit, dist) in predict_all(&model, &params)? {
        let guess = dist.argmax();
        info!(
            "{digit} {} -> {guess} (p={:.3}){}",
            digit.pattern(),
            dist.probability(guess),
            if guess == digit { "" } else { "  MISREAD" }
        );
    }
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run() {
        error!("{e}");
        std::process::exit(1);
    }
}
