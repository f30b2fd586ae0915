use std::sync::mpsc;
use std::sync::{atomic::AtomicBool, Arc};

use rand::{rngs::StdRng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SegmentError};
use crate::math::backend::Backend;
use crate::optim::OptimizerKind;
use crate::train::epoch_stats::EpochStats;

/// Options for a training run.
///
/// The defaults are the fixed configuration the digit classifier is trained
/// with: Adam at 0.001, 1000 passes, one example per gradient step. Any key
/// present in a JSON object (or passed to [`TrainOptions::set`]) overrides
/// just that default.
///
/// # Fields
/// - `passes`        — full sweeps over the training data
/// - `batch_size`    — examples per gradient step; `1` is online training
/// - `learning_rate` — optimizer step size
/// - `optimizer`     — `adam` or `sgd`
/// - `backend`       — numerical engine for the matrix products
/// - `shuffle`       — visit rows in a fresh random order every pass
/// - `seed`          — fixes weight init and shuffling when set
/// - `progress_tx`   — receives one `EpochStats` per completed pass; the run
///                     ends early if the receiver is dropped
/// - `stop_flag`     — checked between passes; `true` ends the run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TrainOptions {
    pub passes: usize,
    pub batch_size: usize,
    pub learning_rate: f64,
    pub optimizer: OptimizerKind,
    pub backend: Backend,
    pub shuffle: bool,
    pub seed: Option<u64>,
    #[serde(skip)]
    pub progress_tx: Option<mpsc::Sender<EpochStats>>,
    #[serde(skip)]
    pub stop_flag: Option<Arc<AtomicBool>>,
}

impl Default for TrainOptions {
    fn default() -> Self {
        TrainOptions {
            passes: 1000,
            batch_size: 1,
            learning_rate: 0.001,
            optimizer: OptimizerKind::Adam,
            backend: Backend::Sequential,
            shuffle: true,
            seed: None,
            progress_tx: None,
            stop_flag: None,
        }
    }
}

impl TrainOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn passes(mut self, passes: usize) -> Self {
        self.passes = passes;
        self
    }

    pub fn batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn learning_rate(mut self, learning_rate: f64) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    pub fn optimizer(mut self, optimizer: OptimizerKind) -> Self {
        self.optimizer = optimizer;
        self
    }

    pub fn backend(mut self, backend: Backend) -> Self {
        self.backend = backend;
        self
    }

    pub fn shuffle(mut self, shuffle: bool) -> Self {
        self.shuffle = shuffle;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn progress(mut self, tx: mpsc::Sender<EpochStats>) -> Self {
        self.progress_tx = Some(tx);
        self
    }

    pub fn stop_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.stop_flag = Some(flag);
        self
    }

    /// Overrides a single option by name, parsing `value` from text.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let value = value.trim();
        match key {
            "passes" | "epochs" => self.passes = parse(key, value)?,
            "batch_size" => self.batch_size = parse(key, value)?,
            "learning_rate" => self.learning_rate = parse(key, value)?,
            "optimizer" => self.optimizer = value.parse()?,
            "backend" => self.backend = value.parse()?,
            "shuffle" => self.shuffle = parse(key, value)?,
            "seed" => {
                self.seed = if value.is_empty() { None } else { Some(parse(key, value)?) }
            }
            other => {
                return Err(SegmentError::InvalidOptions(format!("unknown option '{other}'")))
            }
        }
        Ok(())
    }

    /// Parses a partial JSON object; keys it omits keep their defaults.
    pub fn from_json_str(json: &str) -> Result<TrainOptions> {
        serde_json::from_str(json).map_err(|e| SegmentError::InvalidOptions(e.to_string()))
    }

    pub fn load_json(path: &str) -> Result<TrainOptions> {
        let json = std::fs::read_to_string(path)?;
        TrainOptions::from_json_str(&json)
    }

    /// Rejects values the training loop cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.batch_size == 0 {
            return Err(SegmentError::InvalidOptions("batch_size must be at least 1".to_owned()));
        }
        if !(self.learning_rate.is_finite() && self.learning_rate > 0.0) {
            return Err(SegmentError::InvalidOptions(format!(
                "learning_rate must be positive, got {}",
                self.learning_rate
            )));
        }
        Ok(())
    }

    pub(crate) fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}

fn parse<T: std::str::FromStr>(key: &str, value: &str) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    value
        .parse()
        .map_err(|e| SegmentError::InvalidOptions(format!("{key}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_fixed_configuration() {
        let options = TrainOptions::default();
        assert_eq!(options.passes, 1000);
        assert_eq!(options.batch_size, 1);
        assert!((options.learning_rate - 0.001).abs() < 1e-12);
        assert_eq!(options.optimizer, OptimizerKind::Adam);
        assert_eq!(options.backend, Backend::Sequential);
    }

    #[test]
    fn json_overrides_only_named_keys() {
        let options = TrainOptions::from_json_str(r#"{"passes": 200, "backend": "parallel"}"#).unwrap();
        assert_eq!(options.passes, 200);
        assert_eq!(options.backend, Backend::Parallel);
        assert_eq!(options.batch_size, 1);
        assert_eq!(options.optimizer, OptimizerKind::Adam);
    }

    #[test]
    fn unknown_json_keys_are_rejected() {
        assert!(matches!(
            TrainOptions::from_json_str(r#"{"epochz": 5}"#),
            Err(SegmentError::InvalidOptions(_))
        ));
    }

    #[test]
    fn set_parses_by_key() {
        let mut options = TrainOptions::default();
        options.set("passes", "50").unwrap();
        options.set("optimizer", "sgd").unwrap();
        options.set("seed", "42").unwrap();
        assert_eq!(options.passes, 50);
        assert_eq!(options.optimizer, OptimizerKind::Sgd);
        assert_eq!(options.seed, Some(42));
        assert!(options.set("passes", "many").is_err());
        assert!(options.set("momentum", "0.9").is_err());
    }

    #[test]
    fn validate_rejects_zero_batch() {
        assert!(TrainOptions::default().batch_size(0).validate().is_err());
        assert!(TrainOptions::default().learning_rate(0.0).validate().is_err());
        assert!(TrainOptions::default().validate().is_ok());
    }
}
