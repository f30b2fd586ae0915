pub mod digits;
pub mod predict;
pub mod train;
