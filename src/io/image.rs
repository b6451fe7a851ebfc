//! Image decoding, pixel-budget resizing and PNG export

use std::path::Path;

use image::{RgbaImage, imageops::FilterType};

use crate::io::error::{PipelineError, Result};
use crate::io::glyphs::text_offsets;
use crate::processing::edges::LabelMarker;
use crate::spatial::grid::{PixelGrid, dimensional_to_flatten};

/// Dimensions that fit `max_pixels` while keeping the aspect ratio
///
/// Images already within budget are returned unchanged. Otherwise the new
/// height is `round(sqrt(max_pixels / aspect))` and the width
/// `round(aspect * height)`, each at least one pixel. Rounding can overshoot
/// the budget, in which case the height steps down until the area fits.
pub fn fit_dimensions(width: usize, height: usize, max_pixels: usize) -> (usize, usize) {
    if width == 0 || height == 0 || width.saturating_mul(height) <= max_pixels {
        return (width, height);
    }

    let aspect = width as f64 / height as f64;
    let width_for = |h: usize| ((aspect * h as f64).round() as usize).max(1);

    let mut fitted_height = ((max_pixels as f64 / aspect).sqrt().round() as usize).max(1);
    let mut fitted_width = width_for(fitted_height);
    while fitted_height > 1 && fitted_width.saturating_mul(fitted_height) > max_pixels {
        fitted_height -= 1;
        fitted_width = width_for(fitted_height);
    }

    // A single row can still be too wide for very flat images
    (fitted_width.min(max_pixels).max(1), fitted_height)
}

/// Decode an image file into RGBA, shrunk to fit `max_pixels`
///
/// Returns the flattened buffer with its width and height.
///
/// # Errors
///
/// Returns `ImageLoad` if the file cannot be opened or decoded
pub fn load_rgba(path: &Path, max_pixels: usize) -> Result<(Vec<u8>, usize, usize)> {
    let decoded = image::open(path)
        .map_err(|e| PipelineError::ImageLoad {
            path: path.to_path_buf(),
            source: e,
        })?
        .to_rgba8();

    let (width, height) = (decoded.width() as usize, decoded.height() as usize);
    let (fit_width, fit_height) = fit_dimensions(width, height, max_pixels);

    let rgba = if (fit_width, fit_height) == (width, height) {
        decoded
    } else {
        log::debug!(
            "Resizing {} from {width}x{height} to {fit_width}x{fit_height}",
            path.display()
        );
        image::imageops::resize(
            &decoded,
            fit_width as u32,
            fit_height as u32,
            FilterType::Triangle,
        )
    };

    Ok((rgba.into_raw(), fit_width, fit_height))
}

/// Copy a grid into an image buffer
pub fn grid_to_image(grid: &PixelGrid) -> RgbaImage {
    let width = grid.width() as u32;
    let height = grid.height() as u32;
    RgbaImage::from_raw(width, height, dimensional_to_flatten(grid))
        .unwrap_or_else(|| RgbaImage::new(width, height))
}

/// Draw every marker's text into `image`, clipping at the image border
pub fn stamp_markers(image: &mut RgbaImage, markers: &[LabelMarker]) {
    let (width, height) = (i64::from(image.width()), i64::from(image.height()));

    for marker in markers {
        let color = image::Rgba(marker.color);
        for (dx, dy) in text_offsets(&marker.text, marker.font_size) {
            let x = marker.x + i64::from(dx);
            let y = marker.y + i64::from(dy);
            if (0..width).contains(&x) && (0..height).contains(&y) {
                image.put_pixel(x as u32, y as u32, color);
            }
        }
    }
}

/// Save an image as PNG, creating parent directories as needed
///
/// # Errors
///
/// Returns an error if:
/// - The parent directory cannot be created
/// - The image cannot be encoded or written
pub fn export_png(image: &RgbaImage, output_path: &Path) -> Result<()> {
    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| PipelineError::FileSystem {
                path: parent.to_path_buf(),
                operation: "create directory",
                source: e,
            })?;
        }
    }

    image
        .save_with_format(output_path, image::ImageFormat::Png)
        .map_err(|e| PipelineError::ImageExport {
            path: output_path.to_path_buf(),
            source: e,
        })
}

/// Render a grid with markers and save it as PNG
///
/// # Errors
///
/// Returns an error if the directory cannot be created or the PNG cannot be written
pub fn export_grid_as_png(
    grid: &PixelGrid,
    markers: &[LabelMarker],
    output_path: &Path,
) -> Result<()> {
    let mut image = grid_to_image(grid);
    stamp_markers(&mut image, markers);
    export_png(&image, output_path)
}
