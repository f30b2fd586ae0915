use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SegmentError};

/// Number of digit classes the display can show.
pub const DIGIT_COUNT: usize = 10;

/// A decimal digit in `0..=9`.
///
/// The only way to obtain a `Digit` is through [`Digit::new`] (or the
/// `TryFrom` impls), so every value in circulation is already validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct Digit(u8);

impl Digit {
    pub const ZERO: Digit = Digit(0);

    pub fn new(value: i64) -> Result<Digit> {
        if (0..DIGIT_COUNT as i64).contains(&value) {
            Ok(Digit(value as u8))
        } else {
            Err(SegmentError::InvalidDigit(value.to_string()))
        }
    }

    /// Digits `0` through `9` in ascending order.
    pub fn all() -> impl Iterator<Item = Digit> {
        (0..DIGIT_COUNT as u8).map(Digit)
    }

    pub fn value(self) -> u8 {
        self.0
    }

    /// Position of this digit's class in a one-hot target or an output vector.
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// One-hot target vector with a `1` at this digit's index.
    pub fn one_hot(self) -> [u8; DIGIT_COUNT] {
        let mut target = [0u8; DIGIT_COUNT];
        target[self.index()] = 1;
        target
    }
}

impl TryFrom<i64> for Digit {
    type Error = SegmentError;

    fn try_from(value: i64) -> Result<Digit> {
        Digit::new(value)
    }
}

impl TryFrom<usize> for Digit {
    type Error = SegmentError;

    fn try_from(value: usize) -> Result<Digit> {
        i64::try_from(value)
            .map_err(|_| SegmentError::InvalidDigit(value.to_string()))
            .and_then(Digit::new)
    }
}

impl From<Digit> for u8 {
    fn from(digit: Digit) -> u8 {
        digit.0
    }
}

impl fmt::Display for Digit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
