use std::fmt::Write;

use crate::codec::{encode, Segment, SEGMENT_COUNT};
use crate::error::{Result, SegmentError};

/// Side of the square drawing area, in SVG user units.
pub const VIEWBOX_SIZE: u32 = 300;
pub const STROKE_WIDTH: u32 = 3;

/// Outline of each segment in a 300×300 box, indexed like [`Segment::ALL`].
const SEGMENT_PATHS: [&str; SEGMENT_COUNT] = [
    "M 100 40 L 110 30 L 190 30 L 200 40 L 190 50 L 110 50 Z",
    "M 95 45 L 105 55 L 105 135 L 95 145 L 85 135 L 85 55 Z",
    "M 205 45 L 215 55 L 215 135 L 205 145 L 195 135 L 195 55 Z",
    "M 100 150 L 110 140 L 190 140 L 200 150 L 190 160 L 110 160 Z",
    "M 95 155 L 105 165 L 105 245 L 95 255 L 85 245 L 85 165 Z",
    "M 205 155 L 215 165 L 215 245 L 205 255 L 195 245 L 195 165 Z",
    "M 100 260 L 110 250 L 190 250 L 200 260 L 190 270 L 110 270 Z",
];

/// Colours for lit and unlit segments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderStyle {
    pub active_fill: String,
    pub inactive_fill: String,
    pub stroke: String,
}

impl Default for RenderStyle {
    fn default() -> Self {
        RenderStyle {
            active_fill: "#e53935".to_owned(),
            inactive_fill: "#eeeeee".to_owned(),
            stroke: "#333333".to_owned(),
        }
    }
}

/// Draws `pattern` as SVG markup with the default style.
///
/// Only a value exactly equal to `1` lights a segment; every other value,
/// `2` included, is drawn unlit. The length must still be 7.
/// `transform` is applied to the group holding all seven segments.
pub fn render<T>(pattern: &[T], transform: Option<&str>) -> Result<String>
where
    T: Copy + PartialEq + From<u8>,
{
    render_with_style(pattern, transform, &RenderStyle::default())
}

pub fn render_with_style<T>(pattern: &[T], transform: Option<&str>, style: &RenderStyle) -> Result<String>
where
    T: Copy + PartialEq + From<u8>,
{
    if pattern.len() != SEGMENT_COUNT {
        return Err(SegmentError::InvalidPatternLength(pattern.len()));
    }

    let mut svg = String::new();
    let _ = write!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {size} {size}" width="{size}" height="{size}">"#,
        size = VIEWBOX_SIZE
    );
    let _ = write!(
        svg,
        r#"<g stroke="{}" stroke-width="{}""#,
        escape_attr(&style.stroke),
        STROKE_WIDTH
    );
    if let Some(transform) = transform {
        let _ = write!(svg, r#" transform="{}""#, escape_attr(transform));
    }
    svg.push('>');

    for segment in Segment::ALL {
        let lit = pattern[segment.index()] == T::from(1);
        let fill = if lit { &style.active_fill } else { &style.inactive_fill };
        let _ = write!(
            svg,
            r#"<path class="segment {}{}" d="{}" fill="{}"/>"#,
            segment.name(),
            if lit { " on" } else { "" },
            SEGMENT_PATHS[segment.index()],
            escape_attr(fill)
        );
    }

    svg.push_str("</g></svg>");
    Ok(svg)
}

/// Encodes `digit` and draws its canonical pattern.
pub fn render_digit(digit: i64, transform: Option<&str>) -> Result<String> {
    let pattern = encode(digit)?;
    render(pattern.as_slice(), transform)
}

fn escape_attr(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}
