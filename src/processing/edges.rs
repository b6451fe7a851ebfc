//! Outline rendering and label marker placement

use crate::io::configuration::{
    DEFAULT_FONT_SIZE, DEFAULT_MARKER_COLOR, EDGE_COLOR, FONT_SIZE_PER_PIXEL, MARKER_OFFSET_X,
    MARKER_OFFSET_Y, MAX_FONT_SIZE, MIN_FONT_SIZE, OUTLINE_FILL_COLOR,
};
use crate::regions::labeler::{LabelEntry, LabelPoint};
use crate::spatial::grid::{PixelGrid, Rgba};

/// Renders region borders of a flat-colored grid
///
/// A pixel is an edge when it differs from its left or upper neighbour.
/// Edges take `edge_color`; other pixels take `fill`, or keep their own
/// color when `fill` is `None`. The outermost frame is always an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeRenderer {
    /// Color of border pixels
    pub edge_color: Rgba,
    /// Color of interior pixels, `None` keeps the source color
    pub fill: Option<Rgba>,
}

impl EdgeRenderer {
    /// Black borders on white, the printable template
    pub const fn outline() -> Self {
        Self {
            edge_color: EDGE_COLOR,
            fill: Some(OUTLINE_FILL_COLOR),
        }
    }

    /// Black borders over the original colors, the preview
    pub const fn colored() -> Self {
        Self {
            edge_color: EDGE_COLOR,
            fill: None,
        }
    }

    /// Check whether `(x, y)` is an edge pixel of `grid`
    ///
    /// Frame pixels always count as edges.
    pub fn is_edge(grid: &PixelGrid, x: usize, y: usize) -> bool {
        if x == 0 || y == 0 || x + 1 >= grid.width() || y + 1 >= grid.height() {
            return true;
        }
        let current = grid.get(x, y);
        current != grid.get(x - 1, y) || current != grid.get(x, y - 1)
    }

    /// Render into a fresh grid of the same size
    pub fn render(&self, grid: &PixelGrid) -> PixelGrid {
        let mut out = grid.clone();
        for (x, y, color) in grid.enumerate() {
            let rendered = if Self::is_edge(grid, x, y) {
                self.edge_color
            } else {
                self.fill.unwrap_or(color)
            };
            out.set(x, y, rendered);
        }
        out
    }
}

/// Positioned label text for one component
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelMarker {
    /// Region index as text
    pub text: String,
    /// Left edge of the text in pixels
    pub x: i64,
    /// Top edge of the text in pixels
    pub y: i64,
    /// Font size in pixels
    pub font_size: u32,
    /// Text color
    pub color: Rgba,
}

// Halves round towards positive infinity, matching browser layout rounding
fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

/// Font size for a component of `size` pixels
pub fn font_size(size: usize, alternative_label_on: bool) -> u32 {
    if !alternative_label_on {
        return DEFAULT_FONT_SIZE;
    }
    let scaled = round_half_up(size as f64 * FONT_SIZE_PER_PIXEL);
    scaled.clamp(i64::from(MIN_FONT_SIZE), i64::from(MAX_FONT_SIZE)) as u32
}

/// Marker for one label point of region `region_index`
pub fn marker_for(
    region_index: usize,
    point: &LabelPoint,
    label_color: Rgba,
    alternative_label_on: bool,
) -> LabelMarker {
    LabelMarker {
        text: region_index.to_string(),
        x: round_half_up(point.x - MARKER_OFFSET_X),
        y: round_half_up(point.y - MARKER_OFFSET_Y),
        font_size: font_size(point.component_size, alternative_label_on),
        color: if point.inside {
            label_color
        } else {
            DEFAULT_MARKER_COLOR
        },
    }
}

/// One marker per label point, in region then component order
pub fn place_labels(
    regions: &[LabelEntry],
    label_color: Rgba,
    alternative_label_on: bool,
) -> Vec<LabelMarker> {
    regions
        .iter()
        .flat_map(|entry| {
            entry
                .points
                .iter()
                .map(move |point| marker_for(entry.region_index, point, label_color, alternative_label_on))
        })
        .collect()
}
