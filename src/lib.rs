//! # segment-nn
//!
//! Teaches a tiny dense network to read 7-segment LED digits.
//!
//! The pieces, leaf first:
//!
//! - [`codec`] maps digits 0-9 to their segment patterns and back.
//! - [`dataset`] builds the exhaustive ten-row training set.
//! - [`network`] declares architectures ([`ModelFactory`]) and holds learned
//!   [`Parameters`] separately from them.
//! - [`train`] runs the dense-network engine behind the [`Trainer`] trait.
//! - [`predict`] turns a digit into a probability distribution.
//! - [`render`] draws a pattern as SVG.
//!
//! ```no_run
//! use segment_nn::{predict, train_digits, ModelFactory, TrainOptions};
//!
//! let model = ModelFactory::build(&[16]).unwrap();
//! let (params, _report) = train_digits(&model, &TrainOptions::default()).unwrap();
//! let dist = predict(&model, &params, 7).unwrap();
//! println!("7 reads as {}", dist.argmax());
//! ```

pub mod activation;
pub mod codec;
pub mod dataset;
pub mod error;
pub mod layers;
pub mod loss;
pub mod math;
pub mod network;
pub mod optim;
pub mod predict;
pub mod render;
pub mod train;

// Convenience re-exports
pub use codec::{decode, encode, Digit, Segment, SegmentPattern};
pub use dataset::{build_inputs, build_targets, build_training_set, TrainingSet};
pub use error::{Result, SegmentError};
pub use math::Backend;
pub use network::{Model, ModelFactory, Parameters};
pub use optim::OptimizerKind;
pub use predict::{predict, ProbabilityDistribution};
pub use render::render;
pub use train::{train, train_digits, DenseTrainer, EpochStats, TrainOptions, Trainer, TrainingReport};
