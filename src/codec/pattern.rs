use std::fmt;

use serde::{Deserialize, Serialize};

use crate::codec::digit::{Digit, DIGIT_COUNT};
use crate::error::{Result, SegmentError};

/// Number of segments in a 7-segment display.
pub const SEGMENT_COUNT: usize = 7;

/// Physical segment positions, in the order used by every pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Segment {
    Top,
    UpperLeft,
    UpperRight,
    Middle,
    LowerLeft,
    LowerRight,
    Bottom,
}

impl Segment {
    pub const ALL: [Segment; SEGMENT_COUNT] = [
        Segment::Top,
        Segment::UpperLeft,
        Segment::UpperRight,
        Segment::Middle,
        Segment::LowerLeft,
        Segment::LowerRight,
        Segment::Bottom,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            Segment::Top => "top",
            Segment::UpperLeft => "upper-left",
            Segment::UpperRight => "upper-right",
            Segment::Middle => "middle",
            Segment::LowerLeft => "lower-left",
            Segment::LowerRight => "lower-right",
            Segment::Bottom => "bottom",
        }
    }
}

/// Canonical lit segments for each digit, indexed by digit value.
const CANONICAL: [[u8; SEGMENT_COUNT]; DIGIT_COUNT] = [
    [1, 1, 1, 0, 1, 1, 1], // 0
    [0, 0, 1, 0, 0, 1, 0], // 1
    [1, 0, 1, 1, 1, 0, 1], // 2
    [1, 0, 1, 1, 0, 1, 1], // 3
    [0, 1, 1, 1, 0, 1, 0], // 4
    [1, 1, 0, 1, 0, 1, 1], // 5
    [1, 1, 0, 1, 1, 1, 1], // 6
    [1, 0, 1, 0, 0, 1, 0], // 7
    [1, 1, 1, 1, 1, 1, 1], // 8
    [1, 1, 1, 1, 0, 1, 1], // 9
];

/// The on/off state of all seven segments for one canonical digit.
///
/// Deserialization goes through [`decode`], so only the ten canonical
/// patterns can be read back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "[u8; 7]")]
pub struct SegmentPattern([u8; SEGMENT_COUNT]);

impl TryFrom<[u8; SEGMENT_COUNT]> for SegmentPattern {
    type Error = SegmentError;

    fn try_from(bits: [u8; SEGMENT_COUNT]) -> Result<SegmentPattern> {
        decode(&bits).map(Digit::pattern)
    }
}

impl SegmentPattern {
    pub fn bits(&self) -> [u8; SEGMENT_COUNT] {
        self.0
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }

    pub fn is_lit(&self, segment: Segment) -> bool {
        self.0[segment.index()] == 1
    }

    pub fn lit_count(&self) -> usize {
        self.0.iter().filter(|&&bit| bit == 1).count()
    }

    /// The pattern as network input.
    pub fn to_f64(&self) -> Vec<f64> {
        self.0.iter().map(|&bit| bit as f64).collect()
    }
}

impl Digit {
    /// Canonical segment pattern of this digit. Infallible for a validated digit.
    pub fn pattern(self) -> SegmentPattern {
        SegmentPattern(CANONICAL[self.index()])
    }
}

impl fmt::Display for SegmentPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, bit) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{bit}")?;
        }
        write!(f, "]")
    }
}

/// Returns the canonical segment pattern for `digit`.
///
/// Fails with `InvalidDigit` for anything outside `0..=9`.
pub fn encode(digit: i64) -> Result<SegmentPattern> {
    Digit::new(digit).map(Digit::pattern)
}

/// Like [`encode`], for callers holding a float. Any non-integral or
/// non-finite value is an `InvalidDigit`.
pub fn encode_f64(value: f64) -> Result<SegmentPattern> {
    if !value.is_finite() || value.fract() != 0.0 {
        return Err(SegmentError::InvalidDigit(value.to_string()));
    }
    if value < i64::MIN as f64 || value > i64::MAX as f64 {
        return Err(SegmentError::InvalidDigit(value.to_string()));
    }
    encode(value as i64)
}

/// Returns the digit whose canonical pattern equals `pattern` exactly.
///
/// Digits are tried in ascending order and the first match wins. The
/// comparison is strict: a `2` in any position never matches.
pub fn decode<T>(pattern: &[T]) -> Result<Digit>
where
    T: Copy + PartialEq + From<u8> + fmt::Debug,
{
    if pattern.len() != SEGMENT_COUNT {
        return Err(SegmentError::InvalidPatternLength(pattern.len()));
    }

    Digit::all()
        .find(|digit| {
            digit
                .pattern()
                .as_slice()
                .iter()
                .zip(pattern)
                .all(|(&bit, &value)| value == T::from(bit))
        })
        .ok_or_else(|| SegmentError::UnknownPattern(format!("{pattern:?}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialization_accepts_only_canonical_patterns() {
        let pattern: SegmentPattern = serde_json::from_str("[0,0,1,0,0,1,0]").unwrap();
        assert_eq!(pattern, encode(1).unwrap());
        assert!(serde_json::from_str::<SegmentPattern>("[9,9,9,9,9,9,9]").is_err());
        assert!(serde_json::from_str::<SegmentPattern>("[0,0,0,0,0,0,0]").is_err());
    }

    #[test]
    fn decode_inverts_encode() {
        for value in 0..10 {
            let pattern = encode(value).unwrap();
            assert_eq!(decode(pattern.as_slice()).unwrap().value() as i64, value);
        }
    }

    #[test]
    fn encode_inverts_decode() {
        for bits in CANONICAL {
            let digit = decode(&bits).unwrap();
            assert_eq!(encode(digit.value() as i64).unwrap().bits(), bits);
        }
    }

    #[test]
    fn table_is_a_bijection() {
        for (i, a) in CANONICAL.iter().enumerate() {
            for b in &CANONICAL[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn one_and_eight() {
        assert_eq!(encode(1).unwrap().bits(), [0, 0, 1, 0, 0, 1, 0]);
        assert_eq!(decode(&[0u8, 0, 1, 0, 0, 1, 0]).unwrap().value(), 1);
        assert_eq!(encode(8).unwrap().bits(), [1, 1, 1, 1, 1, 1, 1]);
        assert_eq!(decode(&[1u8, 1, 1, 1, 1, 1, 1]).unwrap().value(), 8);
    }

    #[test]
    fn encode_rejects_out_of_range() {
        assert!(matches!(encode(-1), Err(SegmentError::InvalidDigit(_))));
        assert!(matches!(encode(10), Err(SegmentError::InvalidDigit(_))));
    }

    #[test]
    fn encode_f64_rejects_non_integers() {
        assert!(matches!(encode_f64(2.5), Err(SegmentError::InvalidDigit(_))));
        assert!(matches!(encode_f64(f64::NAN), Err(SegmentError::InvalidDigit(_))));
        assert!(matches!(encode_f64(f64::INFINITY), Err(SegmentError::InvalidDigit(_))));
        assert!(matches!(encode_f64(-1.0), Err(SegmentError::InvalidDigit(_))));
        assert_eq!(encode_f64(4.0).unwrap(), encode(4).unwrap());
    }

    #[test]
    fn decode_checks_length_first() {
        assert!(matches!(
            decode(&[1u8, 1, 1, 1, 1, 1]),
            Err(SegmentError::InvalidPatternLength(6))
        ));
        assert!(matches!(
            decode(&[1u8, 1, 1, 1, 1, 1, 1, 1]),
            Err(SegmentError::InvalidPatternLength(8))
        ));
    }

    #[test]
    fn decode_rejects_non_canonical() {
        assert!(matches!(decode(&[0u8; 7]), Err(SegmentError::UnknownPattern(_))));
        assert!(matches!(
            decode(&[0u8, 0, 2, 0, 0, 1, 0]),
            Err(SegmentError::UnknownPattern(_))
        ));
    }

    #[test]
    fn decode_accepts_wider_integer_and_float_inputs() {
        assert_eq!(decode(&[1i32, 0, 1, 0, 0, 1, 0]).unwrap().value(), 7);
        assert_eq!(decode(&[1.0f64, 1.0, 1.0, 1.0, 0.0, 1.0, 1.0]).unwrap().value(), 9);
    }

    #[test]
    fn pattern_accessors() {
        let four = encode(4).unwrap();
        assert!(four.is_lit(Segment::UpperLeft));
        assert!(!four.is_lit(Segment::Top));
        assert_eq!(four.lit_count(), 4);
        assert_eq!(four.to_string(), "[0,1,1,1,0,1,0]");
    }
}
