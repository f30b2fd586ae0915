use crate::codec::{Digit, DIGIT_COUNT, SEGMENT_COUNT};

/// The exhaustive training set: one row per digit, digit-ascending.
///
/// Row `i` of `inputs` is the segment pattern of digit `i` and row `i` of
/// `targets` is its one-hot class vector. Nothing is sampled or shuffled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainingSet {
    pub inputs: [[u8; SEGMENT_COUNT]; DIGIT_COUNT],
    pub targets: [[u8; DIGIT_COUNT]; DIGIT_COUNT],
}

impl TrainingSet {
    pub fn len(&self) -> usize {
        self.inputs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inputs.is_empty()
    }

    /// Both halves converted to `f64` rows, the layout the training engine takes.
    pub fn as_f64(&self) -> (Vec<Vec<f64>>, Vec<Vec<f64>>) {
        (rows_to_f64(&self.inputs), rows_to_f64(&self.targets))
    }
}

fn rows_to_f64<const N: usize>(rows: &[[u8; N]]) -> Vec<Vec<f64>> {
    rows.iter()
        .map(|row| row.iter().map(|&v| v as f64).collect())
        .collect()
}

/// Segment patterns for digits 0 through 9, one row each.
pub fn build_inputs() -> [[u8; SEGMENT_COUNT]; DIGIT_COUNT] {
    let mut inputs = [[0u8; SEGMENT_COUNT]; DIGIT_COUNT];
    for digit in Digit::all() {
        inputs[digit.index()] = digit.pattern().bits();
    }
    inputs
}

/// One-hot targets: row `i`, column `j` is `1` iff `i == j`.
pub fn build_targets() -> [[u8; DIGIT_COUNT]; DIGIT_COUNT] {
    let mut targets = [[0u8; DIGIT_COUNT]; DIGIT_COUNT];
    for digit in Digit::all() {
        targets[digit.index()] = digit.one_hot();
    }
    targets
}

pub fn build_training_set() -> TrainingSet {
    TrainingSet {
        inputs: build_inputs(),
        targets: build_targets(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::encode;

    #[test]
    fn inputs_follow_the_codec() {
        let inputs = build_inputs();
        assert_eq!(inputs.len(), 10);
        for (i, row) in inputs.iter().enumerate() {
            assert_eq!(*row, encode(i as i64).unwrap().bits());
        }
    }

    #[test]
    fn targets_are_the_identity() {
        let targets = build_targets();
        for (i, row) in targets.iter().enumerate() {
            for (j, &value) in row.iter().enumerate() {
                assert_eq!(value, u8::from(i == j), "row {i}, column {j}");
            }
        }
    }

    #[test]
    fn training_set_rows_line_up() {
        let set = build_training_set();
        assert_eq!(set.len(), 10);
        let (inputs, targets) = set.as_f64();
        assert_eq!(inputs.len(), targets.len());
        assert_eq!(inputs[8], vec![1.0; 7]);
        assert_eq!(targets[8][8], 1.0);
        assert_eq!(targets[8].iter().sum::<f64>(), 1.0);
    }

    #[test]
    fn construction_is_deterministic() {
        assert_eq!(build_training_set(), build_training_set());
    }
}
