//! Plain-text legend listing the palette and every label point

use std::fmt::Write as _;
use std::path::Path;

use crate::io::error::{PipelineError, Result};
use crate::pipeline::executor::PipelineOutput;
use crate::spatial::grid::Rgba;

/// Hex notation `#rrggbb` of a color, alpha dropped
pub fn hex_color(color: Rgba) -> String {
    format!("#{:02x}{:02x}{:02x}", color[0], color[1], color[2])
}

/// Render the legend of one pipeline run
///
/// One line per region with its number, color, share and component count,
/// followed by an indented line per label point.
pub fn format_legend(output: &PipelineOutput) -> String {
    let mut text = String::new();
    let _ = writeln!(text, "size: {}x{}", output.width, output.height);
    let _ = writeln!(text, "k-means iterations: {}", output.iterations);
    let _ = writeln!(text, "regions: {}", output.regions.len());

    for (entry, share) in output.regions.iter().zip(&output.palette) {
        let _ = writeln!(
            text,
            "{:>3}  {}  {:>6.2}%  {:>8} px  {} components",
            entry.region_index,
            hex_color(entry.color),
            share.percentage,
            share.pixel_count,
            entry.points.len()
        );
        for point in &entry.points {
            let _ = writeln!(
                text,
                "       at ({:.1}, {:.1}) size {}{}",
                point.x,
                point.y,
                point.component_size,
                if point.inside { "" } else { " (outside)" }
            );
        }
    }

    text
}

/// Write the legend next to the exported images
///
/// # Errors
///
/// Returns `FileSystem` if the file cannot be written
pub fn write_legend(output: &PipelineOutput, path: &Path) -> Result<()> {
    std::fs::write(path, format_legend(output)).map_err(|e| PipelineError::FileSystem {
        path: path.to_path_buf(),
        operation: "write legend",
        source: e,
    })
}
