use serde::{Deserialize, Serialize};

use crate::activation::activation::ActivationFunction;
use crate::codec::{DIGIT_COUNT, SEGMENT_COUNT};
use crate::error::{Result, SegmentError};

/// Describes one dense layer of a [`Model`].
///
/// Fields:
/// - `size`       — number of neurons in this layer
/// - `input_size` — width of whatever feeds this layer (the previous layer's
///                  size, or the 7 segment inputs for the first layer)
/// - `activation` — activation applied after the linear transform
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerSpec {
    pub size: usize,
    pub input_size: usize,
    pub activation: ActivationFunction,
}

/// A classifier architecture: 7 segment inputs, any number of dense+ReLU
/// hidden layers, and a 10-way dense+softmax output.
///
/// A `Model` carries no weights. The same architecture can be paired with
/// any number of [`Parameters`](crate::network::Parameters) snapshots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Model {
    layers: Vec<LayerSpec>,
}

impl Model {
    pub fn layers(&self) -> &[LayerSpec] {
        &self.layers
    }

    pub fn input_size(&self) -> usize {
        SEGMENT_COUNT
    }

    pub fn output_size(&self) -> usize {
        DIGIT_COUNT
    }

    /// Widths of the hidden layers, input → output.
    pub fn hidden_sizes(&self) -> Vec<usize> {
        self.layers[..self.layers.len() - 1]
            .iter()
            .map(|layer| layer.size)
            .collect()
    }

    pub fn hidden_layer_count(&self) -> usize {
        self.layers.len() - 1
    }

    /// Total number of weights and biases, saturating at `usize::MAX`.
    pub fn parameter_count(&self) -> usize {
        self.layers.iter().fold(0usize, |total, layer| {
            let layer_count = layer.input_size.saturating_add(1).saturating_mul(layer.size);
            total.saturating_add(layer_count)
        })
    }

    /// Serializes the architecture to a pretty-printed JSON file.
    pub fn save_json(&self, path: &str) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Loads an architecture written by `save_json`, re-validating it.
    pub fn load_json(path: &str) -> Result<Model> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        let raw: RawModel = serde_json::from_reader(reader)?;
        Model::try_from(raw)
    }

    fn check(&self) -> Result<()> {
        let last = self.layers.len() - 1;
        let mut expected_input = SEGMENT_COUNT;
        for (i, layer) in self.layers.iter().enumerate() {
            if layer.input_size != expected_input {
                return Err(SegmentError::InvalidArchitecture(format!(
                    "layer {i} takes {} inputs but receives {expected_input}",
                    layer.input_size
                )));
            }
            if layer.size == 0 {
                return Err(SegmentError::InvalidArchitecture(format!("layer {i} has no neurons")));
            }
            let wanted = if i == last { ActivationFunction::Softmax } else { ActivationFunction::ReLU };
            if layer.activation != wanted {
                return Err(SegmentError::InvalidArchitecture(format!(
                    "layer {i} must use {wanted:?}, found {:?}",
                    layer.activation
                )));
            }
            expected_input = layer.size;
        }
        if expected_input != DIGIT_COUNT {
            return Err(SegmentError::InvalidArchitecture(format!(
                "output layer has {expected_input} neurons, expected {DIGIT_COUNT}"
            )));
        }
        Ok(())
    }
}

#[derive(Deserialize)]
struct RawModel {
    layers: Vec<LayerSpec>,
}

impl TryFrom<RawModel> for Model {
    type Error = SegmentError;

    fn try_from(raw: RawModel) -> Result<Model> {
        if raw.layers.is_empty() {
            return Err(SegmentError::InvalidArchitecture("no layers".to_owned()));
        }
        let model = Model { layers: raw.layers };
        model.check()?;
        Ok(model)
    }
}

impl<'de> Deserialize<'de> for Model {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> std::result::Result<Model, D::Error> {
        let raw = RawModel::deserialize(deserializer)?;
        Model::try_from(raw).map_err(serde::de::Error::custom)
    }
}

/// Builds [`Model`]s from a list of hidden-layer widths.
pub struct ModelFactory;

impl ModelFactory {
    /// One dense+ReLU layer per entry of `hidden_layer_sizes`, in order,
    /// followed by a dense+softmax layer of width 10.
    ///
    /// An empty list gives a direct 7 → 10 softmax model. Any width that is
    /// not a positive integer is an `InvalidArchitecture`.
    pub fn build(hidden_layer_sizes: &[i64]) -> Result<Model> {
        let mut layers = Vec::with_capacity(hidden_layer_sizes.len() + 1);
        let mut input_size = SEGMENT_COUNT;

        for (i, &width) in hidden_layer_sizes.iter().enumerate() {
            let size = usize::try_from(width)
                .ok()
                .filter(|&size| size > 0)
                .ok_or_else(|| {
                    SegmentError::InvalidArchitecture(format!(
                        "hidden layer {i} has width {width}; widths must be positive"
                    ))
                })?;
            layers.push(LayerSpec {
                size,
                input_size,
                activation: ActivationFunction::ReLU,
            });
            input_size = size;
        }

        layers.push(LayerSpec {
            size: DIGIT_COUNT,
            input_size,
            activation: ActivationFunction::Softmax,
        });

        Ok(Model { layers })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_hidden_list_is_direct_softmax() {
        let model = ModelFactory::build(&[]).unwrap();
        assert_eq!(model.hidden_layer_count(), 0);
        assert_eq!(model.layers().len(), 1);
        assert_eq!(model.layers()[0].input_size, 7);
        assert_eq!(model.layers()[0].size, 10);
        assert_eq!(model.layers()[0].activation, ActivationFunction::Softmax);
        assert_eq!(model.parameter_count(), 7 * 10 + 10);
    }

    #[test]
    fn hidden_layers_chain_in_order() {
        let model = ModelFactory::build(&[16, 8]).unwrap();
        assert_eq!(model.hidden_sizes(), vec![16, 8]);
        let shapes: Vec<(usize, usize)> =
            model.layers().iter().map(|l| (l.input_size, l.size)).collect();
        assert_eq!(shapes, vec![(7, 16), (16, 8), (8, 10)]);
        assert!(model.layers()[..2]
            .iter()
            .all(|l| l.activation == ActivationFunction::ReLU));
    }

    #[test]
    fn non_positive_widths_are_rejected() {
        for bad in [[-1i64], [0]] {
            assert!(matches!(
                ModelFactory::build(&bad),
                Err(SegmentError::InvalidArchitecture(_))
            ));
        }
        assert!(matches!(
            ModelFactory::build(&[4, -3]),
            Err(SegmentError::InvalidArchitecture(_))
        ));
    }

    #[test]
    fn parameter_count_sums_weights_and_biases() {
        let model = ModelFactory::build(&[4]).unwrap();
        assert_eq!(model.parameter_count(), (7 * 4 + 4) + (4 * 10 + 10));
    }

    #[test]
    fn parameter_count_saturates_for_huge_widths() {
        let model = ModelFactory::build(&[i64::MAX]).unwrap();
        assert_eq!(model.parameter_count(), usize::MAX);
    }

    #[test]
    fn json_round_trip_revalidates() {
        let model = ModelFactory::build(&[5]).unwrap();
        let json = serde_json::to_string(&model).unwrap();
        assert_eq!(serde_json::from_str::<Model>(&json).unwrap(), model);

        let tampered = json.replace("\"size\":10", "\"size\":9");
        assert!(serde_json::from_str::<Model>(&tampered).is_err());
    }
}
