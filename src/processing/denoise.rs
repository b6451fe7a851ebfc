//! Windowed vector-median filter
//!
//! Each pixel is replaced by the middle element of its `N x N` window sorted
//! by `r^2 + g^2 + b^2`. This is a scalar surrogate ordering, not a
//! per-channel median, and ties keep window scan order.

use ndarray::Array2;
use rayon::prelude::*;

use crate::io::configuration::{BACKGROUND_COLOR, DENOISE_BAND_ROWS};
use crate::io::error::{Result, invalid_parameter};
use crate::pipeline::context::{RunContext, Stage};
use crate::spatial::grid::{PixelGrid, Rgba, color_magnitude};

/// Median of the window centred on `(x, y)`
///
/// Out-of-bounds positions contribute [`BACKGROUND_COLOR`].
pub fn window_median(grid: &PixelGrid, x: usize, y: usize, window: usize) -> Rgba {
    let half = (window / 2) as i64;
    let mut samples = Vec::with_capacity(window * window);

    for wy in (y as i64 - half)..=(y as i64 + half) {
        for wx in (x as i64 - half)..=(x as i64 + half) {
            samples.push(grid.get_signed(wx, wy).unwrap_or(BACKGROUND_COLOR));
        }
    }

    samples.sort_by_key(color_magnitude);
    samples
        .get(samples.len() / 2)
        .copied()
        .unwrap_or(BACKGROUND_COLOR)
}

/// Filter one row against the unmodified source grid
fn filter_row(grid: &PixelGrid, y: usize, window: usize) -> Vec<Rgba> {
    (0..grid.width())
        .map(|x| window_median(grid, x, y, window))
        .collect()
}

/// Apply the median filter with an odd window side
///
/// Output is written into a fresh grid, so every window reads pre-filter
/// values. Rows are computed in parallel bands and reassembled in order.
///
/// # Errors
///
/// Returns an error if `window` is even or zero, or `CancellationRequested`
/// between bands
pub fn median_filter(
    grid: &PixelGrid,
    window: usize,
    ctx: &mut RunContext<'_>,
) -> Result<PixelGrid> {
    if window == 0 || window % 2 == 0 {
        return Err(invalid_parameter(
            "sliding_size",
            &window,
            &"window side must be an odd number >= 1",
        ));
    }

    ctx.info(Stage::Denoise, "Starting noise reduction");

    let height = grid.height();
    let width = grid.width();
    let mut filtered: Vec<Rgba> = Vec::with_capacity(grid.len());

    let mut band_start = 0;
    while band_start < height {
        ctx.checkpoint(Stage::Denoise)?;

        let band_end = (band_start + DENOISE_BAND_ROWS).min(height);
        let rows: Vec<Vec<Rgba>> = (band_start..band_end)
            .into_par_iter()
            .map(|y| filter_row(grid, y, window))
            .collect();
        filtered.extend(rows.into_iter().flatten());

        ctx.detail(
            Stage::Denoise,
            format!("Rows {band_start}..{band_end} filtered"),
        );
        band_start = band_end;
    }

    let result = Array2::from_shape_vec((height, width), filtered)
        .map(PixelGrid::from_array)
        .map_err(|e| invalid_parameter("grid", &grid.len(), &e))?;

    ctx.info(Stage::Denoise, "Noise reduction completed");
    Ok(result)
}
