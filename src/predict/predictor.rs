use serde::Serialize;

use crate::codec::{encode, Digit, SegmentPattern, DIGIT_COUNT};
use crate::error::{Result, SegmentError};
use crate::network::{network::Parameters, spec::Model};
use crate::train::engine::{DenseTrainer, Trainer};

/// Softmax output over the ten digit classes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProbabilityDistribution {
    probabilities: [f64; DIGIT_COUNT],
}

impl ProbabilityDistribution {
    fn from_output(output: Vec<f64>) -> Result<ProbabilityDistribution> {
        let probabilities: [f64; DIGIT_COUNT] =
            output.try_into().map_err(|output: Vec<f64>| SegmentError::ShapeMismatch {
                expected: DIGIT_COUNT,
                actual: output.len(),
            })?;
        Ok(ProbabilityDistribution { probabilities })
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.probabilities
    }

    pub fn probability(&self, digit: Digit) -> f64 {
        self.probabilities[digit.index()]
    }

    /// The most likely digit; ties go to the lower digit.
    pub fn argmax(&self) -> Digit {
        Digit::all().fold(Digit::ZERO, |best, digit| {
            if self.probability(digit) > self.probability(best) {
                digit
            } else {
                best
            }
        })
    }
}

/// Probability of each digit class for `digit`'s segment pattern.
///
/// Fails with `InvalidDigit` outside `0..=9` and with `ShapeMismatch` when
/// `parameters` were not trained for `model`.
pub fn predict(model: &Model, parameters: &Parameters, digit: i64) -> Result<ProbabilityDistribution> {
    predict_with(&DenseTrainer::default(), model, parameters, digit)
}

pub fn predict_with<T: Trainer + ?Sized>(
    trainer: &T,
    model: &Model,
    parameters: &Parameters,
    digit: i64,
) -> Result<ProbabilityDistribution> {
    let pattern = encode(digit)?;
    predict_pattern(trainer, model, parameters, &pattern)
}

/// Inference on an already-encoded pattern.
pub fn predict_pattern<T: Trainer + ?Sized>(
    trainer: &T,
    model: &Model,
    parameters: &Parameters,
    pattern: &SegmentPattern,
) -> Result<ProbabilityDistribution> {
    let output = trainer.infer(model, parameters, &pattern.to_f64())?;
    ProbabilityDistribution::from_output(output)
}

/// Predictions for digits 0 through 9, in order.
pub fn predict_all(model: &Model, parameters: &Parameters) -> Result<Vec<(Digit, ProbabilityDistribution)>> {
    let trainer = DenseTrainer::default();
    Digit::all()
        .map(|digit| {
            predict_pattern(&trainer, model, parameters, &digit.pattern()).map(|dist| (digit, dist))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::spec::ModelFactory;
    use rand::{rngs::StdRng, SeedableRng};

    fn untrained(hidden: &[i64]) -> (Model, Parameters) {
        let model = ModelFactory::build(hidden).unwrap();
        let params = Parameters::initialize(&model, &mut StdRng::seed_from_u64(4));
        (model, params)
    }

    #[test]
    fn output_is_a_distribution_for_every_digit() {
        let (model, params) = untrained(&[9, 5]);
        for digit in 0..10 {
            let dist = predict(&model, &params, digit).unwrap();
            assert_eq!(dist.as_slice().len(), 10);
            assert!(dist.as_slice().iter().all(|&p| p >= 0.0));
            assert!((dist.as_slice().iter().sum::<f64>() - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn invalid_digit_propagates() {
        let (model, params) = untrained(&[]);
        assert!(matches!(predict(&model, &params, 10), Err(SegmentError::InvalidDigit(_))));
        assert!(matches!(predict(&model, &params, -1), Err(SegmentError::InvalidDigit(_))));
    }

    #[test]
    fn mismatched_parameters_are_rejected() {
        let (model, _) = untrained(&[3]);
        let (_, other) = untrained(&[4]);
        assert!(matches!(
            predict(&model, &other, 2),
            Err(SegmentError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn prediction_does_not_touch_parameters() {
        let (model, params) = untrained(&[3]);
        let before = params.clone();
        predict_all(&model, &params).unwrap();
        assert_eq!(params, before);
    }

    #[test]
    fn argmax_and_probability_agree() {
        let dist = ProbabilityDistribution::from_output(vec![
            0.05, 0.05, 0.05, 0.55, 0.05, 0.05, 0.05, 0.05, 0.05, 0.05,
        ])
        .unwrap();
        assert_eq!(dist.argmax().value(), 3);
        assert_eq!(dist.probability(dist.argmax()), 0.55);
        assert!(ProbabilityDistribution::from_output(vec![1.0; 3]).is_err());
    }
}
