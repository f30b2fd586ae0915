pub mod network;
pub mod spec;

pub use network::Parameters;
pub use spec::{LayerSpec, Model, ModelFactory};
