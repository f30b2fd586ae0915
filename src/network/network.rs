use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SegmentError};
use crate::layers::dense::DenseParams;
use crate::network::spec::Model;

/// Learned weights for a [`Model`], one [`DenseParams`] per layer.
///
/// Produced once by training and only ever read afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameters {
    layers: Vec<DenseParams>,
}

impl Parameters {
    pub(crate) fn from_layers(layers: Vec<DenseParams>) -> Parameters {
        Parameters { layers }
    }

    /// Randomly initialized parameters shaped for `model`.
    pub fn initialize<R: Rng + ?Sized>(model: &Model, rng: &mut R) -> Parameters {
        let layers = model
            .layers()
            .iter()
            .map(|spec| DenseParams::init(spec.input_size, spec.size, spec.activation, rng))
            .collect();
        Parameters { layers }
    }

    pub fn layers(&self) -> &[DenseParams] {
        &self.layers
    }

    pub(crate) fn into_layers(self) -> Vec<DenseParams> {
        self.layers
    }

    /// Fails with `ShapeMismatch` unless every layer matches `model`'s shapes.
    pub fn check_fits(&self, model: &Model) -> Result<()> {
        if self.layers.len() != model.layers().len() {
            return Err(SegmentError::ShapeMismatch {
                expected: model.layers().len(),
                actual: self.layers.len(),
            });
        }
        for (params, spec) in self.layers.iter().zip(model.layers()) {
            if !params.weights.has_shape(spec.input_size, spec.size) {
                return Err(SegmentError::ShapeMismatch {
                    expected: spec.input_size.saturating_mul(spec.size),
                    actual: element_count(&params.weights.data),
                });
            }
            if !params.biases.has_shape(1, spec.size) {
                return Err(SegmentError::ShapeMismatch {
                    expected: spec.size,
                    actual: element_count(&params.biases.data),
                });
            }
        }
        Ok(())
    }

    /// Serializes the weights to a pretty-printed JSON file.
    pub fn save_json(&self, path: &str) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Deserializes weights previously written by `save_json`.
    pub fn load_json(path: &str) -> Result<Parameters> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        Ok(serde_json::from_reader(reader)?)
    }
}

fn element_count(data: &[Vec<f64>]) -> usize {
    data.iter().map(Vec::len).sum()
}
