pub mod dense;

pub use dense::{DenseParams, Layer};
