pub mod svg;

pub use svg::{render, render_digit, render_with_style, RenderStyle};
