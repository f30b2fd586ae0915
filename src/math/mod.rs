pub mod backend;
pub mod matrix;

pub use backend::Backend;
pub use matrix::Matrix;
