/// Categorical cross-entropy over a softmax output.
pub struct CrossEntropyLoss;

/// Keeps `ln()` away from zero probabilities.
const EPS: f64 = 1e-12;

impl CrossEntropyLoss {
    /// L = -Σ expected[i] · ln(predicted[i] + ε)
    pub fn loss(predicted: &[f64], expected: &[f64]) -> f64 {
        predicted
            .iter()
            .zip(expected.iter())
            .map(|(p, e)| -e * (p + EPS).ln())
            .sum()
    }

    /// Gradient of softmax + cross-entropy w.r.t. the logits: `predicted - expected`.
    pub fn derivative(predicted: &[f64], expected: &[f64]) -> Vec<f64> {
        predicted
            .iter()
            .zip(expected.iter())
            .map(|(p, e)| p - e)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn confident_correct_prediction_has_low_loss() {
        let expected = [0.0, 1.0, 0.0];
        let good = CrossEntropyLoss::loss(&[0.01, 0.98, 0.01], &expected);
        let bad = CrossEntropyLoss::loss(&[0.49, 0.02, 0.49], &expected);
        assert!(good < 0.05);
        assert!(bad > good);
    }

    #[test]
    fn derivative_is_difference() {
        let grad = CrossEntropyLoss::derivative(&[0.2, 0.8], &[0.0, 1.0]);
        assert!((grad[0] - 0.2).abs() < 1e-12);
        assert!((grad[1] + 0.2).abs() < 1e-12);
    }
}
