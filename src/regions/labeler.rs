//! Region labeling: per-color components, label points and isolated layers
//!
//! Every distinct color is split into its 4-connected components. Each
//! component is traced into a polygon (outer ring plus validated holes) and
//! labeled at its pole of inaccessibility. Colors are processed in parallel
//! and collected back in order of first occurrence.

use std::collections::HashMap;

use rayon::prelude::*;

use crate::geometry::distance::{Point, Polygon};
use crate::geometry::pole::pole_of_inaccessibility;
use crate::io::configuration::POI_PRECISION;
use crate::io::error::{PipelineError, Result};
use crate::pipeline::context::{CancellationToken, RunContext, Stage};
use crate::processing::edges::EdgeRenderer;
use crate::regions::boundary::{hole_boundaries, outer_boundary, valid_holes};
use crate::regions::components::{BinaryMask, label_components};
use crate::spatial::coords::{Bounds, Coord};
use crate::spatial::grid::{PixelGrid, Rgba};

/// Label position for one connected component
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelPoint {
    /// Horizontal position in pixels
    pub x: f64,
    /// Vertical position in pixels
    pub y: f64,
    /// Distance to the nearest boundary edge
    pub distance: f64,
    /// Whether the rounded point falls on a pixel of the component
    pub inside: bool,
    /// Pixel count of the component
    pub component_size: usize,
}

/// All label points of one color
#[derive(Debug, Clone, PartialEq)]
pub struct LabelEntry {
    /// Region color
    pub color: Rgba,
    /// Zero-based index in order of first occurrence, also the printed number
    pub region_index: usize,
    /// One point per component, in component order
    pub points: Vec<LabelPoint>,
}

/// Proportion of the image covered by one color
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorShare {
    /// Region color
    pub color: Rgba,
    /// Number of pixels of this color
    pub pixel_count: usize,
    /// Share of the image in percent, rounded to two decimals
    pub percentage: f64,
}

/// One color drawn alone over an unused gray
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionLayer {
    /// Index of the region this layer shows
    pub region_index: usize,
    /// Region color
    pub color: Rgba,
    /// Gray filling every other pixel
    pub background: Rgba,
    /// Full-size grid holding the isolated region
    pub grid: PixelGrid,
}

/// Everything the labeler produces for one grid
#[derive(Debug, Clone, PartialEq)]
pub struct RegionLabeling {
    /// One entry per distinct color
    pub regions: Vec<LabelEntry>,
    /// Pixel shares per color, in region order
    pub palette: Vec<ColorShare>,
    /// Isolated layers, empty unless requested and a background was found
    pub layers: Vec<RegionLayer>,
    /// Colored grid with black region borders
    pub preview: PixelGrid,
}

/// Distinct colors with their pixels, in order of first occurrence
pub fn color_groups(grid: &PixelGrid) -> Vec<(Rgba, Vec<Coord>)> {
    let mut index: HashMap<Rgba, usize> = HashMap::new();
    let mut groups: Vec<(Rgba, Vec<Coord>)> = Vec::new();

    for (x, y, color) in grid.enumerate() {
        let slot = *index.entry(color).or_insert_with(|| {
            groups.push((color, Vec::new()));
            groups.len() - 1
        });
        if let Some((_, coords)) = groups.get_mut(slot) {
            coords.push(Coord::new(x, y));
        }
    }

    groups
}

/// Pixel share of every color group
pub fn color_shares(groups: &[(Rgba, Vec<Coord>)]) -> Vec<ColorShare> {
    let total: usize = groups.iter().map(|(_, coords)| coords.len()).sum();

    groups
        .iter()
        .map(|(color, coords)| {
            let percentage = if total == 0 {
                0.0
            } else {
                (coords.len() as f64 / total as f64 * 10_000.0).round() / 100.0
            };
            ColorShare {
                color: *color,
                pixel_count: coords.len(),
                percentage,
            }
        })
        .collect()
}

/// First gray `[v, v, v, 255]` with `v` in `0..255` not used by any group
///
/// # Errors
///
/// Returns `BackgroundExhausted` when every such gray occurs in the image
pub fn background_gray(groups: &[(Rgba, Vec<Coord>)]) -> Result<Rgba> {
    (0..u8::MAX)
        .map(|v| [v, v, v, 255])
        .find(|gray| groups.iter().all(|(color, _)| color != gray))
        .ok_or(PipelineError::BackgroundExhausted)
}

fn to_ring(ring: &[Coord]) -> Vec<Point> {
    ring.iter().map(|c| [c.x as f64, c.y as f64]).collect()
}

/// Label point of one component
///
/// The polygon is the traced outer boundary plus every hole whose ring is
/// bordered by `color_mask`.
pub fn label_point(component: &[Coord], color_mask: &BinaryMask) -> LabelPoint {
    let outer = to_ring(&outer_boundary(component));
    let holes: Vec<Vec<Point>> = valid_holes(hole_boundaries(component), color_mask)
        .iter()
        .map(|ring| to_ring(ring))
        .collect();

    let pole = pole_of_inaccessibility(&Polygon::new(outer, holes), POI_PRECISION);
    let (rx, ry) = (pole.x.round(), pole.y.round());
    let inside = rx >= 0.0
        && ry >= 0.0
        && component
            .binary_search_by_key(&(ry as usize, rx as usize), |c| (c.y, c.x))
            .is_ok();

    LabelPoint {
        x: pole.x,
        y: pole.y,
        distance: pole.distance,
        inside,
        component_size: component.len(),
    }
}

/// Paint one color alone over `background`
pub fn isolated_layer(
    grid: &PixelGrid,
    region_index: usize,
    color: Rgba,
    coords: &[Coord],
    background: Rgba,
) -> RegionLayer {
    let mut layer = PixelGrid::filled(grid.width(), grid.height(), background);
    for c in coords {
        layer.set(c.x, c.y, color);
    }
    RegionLayer {
        region_index,
        color,
        background,
        grid: layer,
    }
}

/// Region labeler producing label points, shares, layers and the preview
#[derive(Debug, Clone, Copy)]
pub struct RegionLabeler {
    renderer: EdgeRenderer,
    isolate_regions_on: bool,
}

impl RegionLabeler {
    /// Create a labeler, optionally producing isolated layers
    pub const fn new(isolate_regions_on: bool) -> Self {
        Self {
            renderer: EdgeRenderer::colored(),
            isolate_regions_on,
        }
    }

    /// Label every region of a flat-colored grid
    ///
    /// # Errors
    ///
    /// Returns `CancellationRequested` when the context is cancelled before
    /// or during per-color work
    pub fn label(&self, grid: &PixelGrid, ctx: &mut RunContext<'_>) -> Result<RegionLabeling> {
        ctx.info(Stage::Regions, "Starting Region labeling");

        let groups = color_groups(grid);
        let palette = color_shares(&groups);
        ctx.info(
            Stage::Regions,
            format!("Region separation completed with {} colors", groups.len()),
        );

        let background = if self.isolate_regions_on {
            match background_gray(&groups) {
                Ok(gray) => {
                    ctx.info(Stage::Regions, format!("Using background color: {gray:?}"));
                    Some(gray)
                }
                Err(e) => {
                    ctx.warn(Stage::Regions, format!("{e}, skipping isolated layers"));
                    None
                }
            }
        } else {
            None
        };

        ctx.checkpoint(Stage::Regions)?;

        let full = Bounds {
            min_x: 0,
            max_x: grid.width().saturating_sub(1),
            min_y: 0,
            max_y: grid.height().saturating_sub(1),
        };
        let token = ctx.cancellation();

        let labeled: Vec<(LabelEntry, Option<RegionLayer>)> = groups
            .par_iter()
            .enumerate()
            .map(|(region_index, (color, coords))| {
                if token.as_ref().is_some_and(CancellationToken::is_cancelled) {
                    return Err(PipelineError::CancellationRequested {
                        stage: Stage::Regions.name(),
                    });
                }

                let color_mask = BinaryMask::covering(coords, full);
                let points = label_components(&color_mask)
                    .iter()
                    .map(|component| label_point(component, &color_mask))
                    .collect();

                let layer = background
                    .map(|gray| isolated_layer(grid, region_index, *color, coords, gray));

                Ok((
                    LabelEntry {
                        color: *color,
                        region_index,
                        points,
                    },
                    layer,
                ))
            })
            .collect::<Result<_>>()?;

        let mut regions = Vec::with_capacity(labeled.len());
        let mut layers = Vec::new();
        for (entry, layer) in labeled {
            ctx.detail(
                Stage::Regions,
                format!(
                    "Extracted boundaries of {:?}: {} components",
                    entry.color,
                    entry.points.len()
                ),
            );
            if let Some(layer) = layer {
                ctx.detail(
                    Stage::Regions,
                    format!("Created region {}", layer.region_index),
                );
                layers.push(layer);
            }
            regions.push(entry);
        }

        let preview = self.renderer.render(grid);
        ctx.info(Stage::Regions, "Region labeling completed");

        Ok(RegionLabeling {
            regions,
            palette,
            layers,
            preview,
        })
    }
}
