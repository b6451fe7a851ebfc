//! Pipeline parameters and their validation

use crate::io::configuration::{
    DEFAULT_K_COLORS, DEFAULT_LABEL_COLOR, DEFAULT_MAX_ITERATIONS, DEFAULT_MAX_PIXELS,
    DEFAULT_SIZE_LIMIT, DEFAULT_SLIDING_SIZE,
};
use crate::io::error::{PipelineError, Result, invalid_parameter};
use crate::spatial::grid::Rgba;

/// User-tunable settings for one pipeline run
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PipelineParams {
    /// Largest accepted `width * height`
    pub max_pixels: usize,
    /// K-means iteration cap
    pub max_iterations: usize,
    /// Number of palette colors
    pub k_colors: usize,
    /// Seed string, empty for a nondeterministic run
    pub random_seed: String,
    /// Denoise window side, odd
    pub sliding_size: usize,
    /// Particle size threshold in pixels
    pub size_limit: usize,
    /// Produce one isolated layer per color
    pub isolate_regions_on: bool,
    /// Scale label fonts with component size
    pub alternative_label_on: bool,
    /// Marker color for labels inside their component
    pub label_color: [u8; 3],
}

impl Default for PipelineParams {
    fn default() -> Self {
        Self {
            max_pixels: DEFAULT_MAX_PIXELS,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            k_colors: DEFAULT_K_COLORS,
            random_seed: String::new(),
            sliding_size: DEFAULT_SLIDING_SIZE,
            size_limit: DEFAULT_SIZE_LIMIT,
            isolate_regions_on: false,
            alternative_label_on: false,
            label_color: DEFAULT_LABEL_COLOR,
        }
    }
}

impl PipelineParams {
    /// Check every numeric field
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameters` naming the first offending field
    pub fn validate(&self) -> Result<()> {
        if self.max_pixels == 0 {
            return Err(invalid_parameter("max_pixels", &self.max_pixels, &"must be > 0"));
        }
        if self.k_colors == 0 {
            return Err(invalid_parameter("k_colors", &self.k_colors, &"must be >= 1"));
        }
        if self.sliding_size == 0 || self.sliding_size % 2 == 0 {
            return Err(invalid_parameter(
                "sliding_size",
                &self.sliding_size,
                &"must be an odd number >= 1",
            ));
        }
        if self.size_limit == 0 {
            return Err(invalid_parameter("size_limit", &self.size_limit, &"must be >= 1"));
        }
        Ok(())
    }

    /// Check the input geometry against these parameters
    ///
    /// # Errors
    ///
    /// Returns `EmptyInput` for a zero-area image, or `InvalidParameters`
    /// when the image exceeds `max_pixels` or the buffer has the wrong length
    pub fn validate_input(&self, buffer_len: usize, width: usize, height: usize) -> Result<()> {
        if width == 0 || height == 0 {
            return Err(PipelineError::EmptyInput { width, height });
        }

        let area = width.checked_mul(height).ok_or_else(|| {
            invalid_parameter("width", &width, &format!("{width}x{height} overflows"))
        })?;
        if area > self.max_pixels {
            return Err(invalid_parameter(
                "max_pixels",
                &self.max_pixels,
                &format!("image has {area} pixels, resize it first"),
            ));
        }

        let expected = area.saturating_mul(4);
        if buffer_len != expected {
            return Err(invalid_parameter(
                "pixels",
                &buffer_len,
                &format!("expected {expected} bytes for a {width}x{height} RGBA image"),
            ));
        }
        Ok(())
    }

    /// Label color as an opaque RGBA value
    pub const fn label_rgba(&self) -> Rgba {
        let [r, g, b] = self.label_color;
        [r, g, b, 255]
    }
}
