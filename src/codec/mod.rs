pub mod digit;
pub mod pattern;

pub use digit::{Digit, DIGIT_COUNT};
pub use pattern::{decode, encode, encode_f64, Segment, SegmentPattern, SEGMENT_COUNT};
