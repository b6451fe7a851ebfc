//! RGBA pixel grid shared by every pipeline stage
//!
//! The grid is a `height x width` matrix backed by `ndarray`, so rows can
//! never be ragged. Coordinates are `(x, y)` with `y` selecting the row.

use ndarray::Array2;

use crate::io::error::{PipelineError, Result, invalid_parameter};

/// One 8-bit RGBA color
pub type Rgba = [u8; 4];

/// Scalar ordering key used wherever colors are sorted: `r^2 + g^2 + b^2`
///
/// Alpha does not take part in the ordering.
pub const fn color_magnitude(color: &Rgba) -> u32 {
    let r = color[0] as u32;
    let g = color[1] as u32;
    let b = color[2] as u32;
    r * r + g * g + b * b
}

/// Rectangular RGBA buffer with 2-D access
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelGrid {
    pixels: Array2<Rgba>,
}

impl PixelGrid {
    /// Create a grid filled with a single color
    pub fn filled(width: usize, height: usize, color: Rgba) -> Self {
        Self {
            pixels: Array2::from_elem((height, width), color),
        }
    }

    /// Wrap an existing `(rows, cols)` array
    pub const fn from_array(pixels: Array2<Rgba>) -> Self {
        Self { pixels }
    }

    /// Build a grid from rows of colors
    ///
    /// # Errors
    ///
    /// Returns an error if the rows differ in length
    pub fn from_rows(rows: &[Vec<Rgba>]) -> Result<Self> {
        let height = rows.len();
        let width = rows.first().map_or(0, Vec::len);
        if let Some(ragged) = rows.iter().position(|row| row.len() != width) {
            return Err(invalid_parameter(
                "rows",
                &ragged,
                &format!("row {ragged} differs in length from row 0 ({width} pixels)"),
            ));
        }

        let flat: Vec<Rgba> = rows.iter().flatten().copied().collect();
        Array2::from_shape_vec((height, width), flat)
            .map(Self::from_array)
            .map_err(|e| invalid_parameter("rows", &height, &e))
    }

    /// Grid width in pixels
    pub fn width(&self) -> usize {
        self.pixels.ncols()
    }

    /// Grid height in pixels
    pub fn height(&self) -> usize {
        self.pixels.nrows()
    }

    /// Number of pixels
    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    /// Test for a zero-area grid
    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    /// Color at `(x, y)`, `None` when out of bounds
    pub fn get(&self, x: usize, y: usize) -> Option<Rgba> {
        self.pixels.get([y, x]).copied()
    }

    /// Color at signed coordinates, `None` when out of bounds
    pub fn get_signed(&self, x: i64, y: i64) -> Option<Rgba> {
        if x < 0 || y < 0 {
            return None;
        }
        self.get(x as usize, y as usize)
    }

    /// Overwrite the color at `(x, y)`; out-of-bounds writes are ignored
    pub fn set(&mut self, x: usize, y: usize, color: Rgba) {
        if let Some(pixel) = self.pixels.get_mut([y, x]) {
            *pixel = color;
        }
    }

    /// Row-major iterator over `(x, y, color)`
    pub fn enumerate(&self) -> impl Iterator<Item = (usize, usize, Rgba)> + '_ {
        self.pixels
            .indexed_iter()
            .map(|((y, x), &color)| (x, y, color))
    }

    /// Borrow the backing array
    pub const fn as_array(&self) -> &Array2<Rgba> {
        &self.pixels
    }

    /// Consume the grid and return the backing array
    pub fn into_array(self) -> Array2<Rgba> {
        self.pixels
    }

    /// Colors of one row, empty when out of bounds
    pub fn row(&self, y: usize) -> Vec<Rgba> {
        if y >= self.height() {
            return Vec::new();
        }
        self.pixels.row(y).to_vec()
    }
}

/// Convert a flattened RGBA buffer into a `height x width` grid
///
/// # Errors
///
/// Returns an error if the buffer length is not `width * height * 4`
pub fn flatten_to_dimensional(buffer: &[u8], width: usize, height: usize) -> Result<PixelGrid> {
    let expected = width
        .checked_mul(height)
        .and_then(|area| area.checked_mul(4))
        .ok_or_else(|| {
            invalid_parameter("width", &width, &format!("{width}x{height} overflows"))
        })?;

    if buffer.len() != expected {
        return Err(PipelineError::InvalidParameters {
            parameter: "pixels",
            value: buffer.len().to_string(),
            reason: format!("expected {expected} bytes for a {width}x{height} RGBA image"),
        });
    }

    let colors: Vec<Rgba> = buffer
        .chunks_exact(4)
        .map(|chunk| <Rgba>::try_from(chunk).unwrap_or([0; 4]))
        .collect();

    Array2::from_shape_vec((height, width), colors)
        .map(PixelGrid::from_array)
        .map_err(|e| invalid_parameter("pixels", &buffer.len(), &e))
}

/// Convert a grid back into a flattened row-major RGBA buffer
pub fn dimensional_to_flatten(grid: &PixelGrid) -> Vec<u8> {
    grid.pixels.iter().flat_map(|color| color.iter().copied()).collect()
}
