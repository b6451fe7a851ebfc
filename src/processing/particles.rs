//! Particle cleanup: undersized islands and one-pixel spurs
//!
//! Pass A flood-fills every pixel's same-color patch up to the size limit.
//! Small patches are repainted with their most frequent neighbour color;
//! large ones get their narrow horizontal runs merged into the surrounding
//! color. Pass B removes single-pixel spurs. Both passes scan row-major and
//! repaint in place, so later pixels see earlier repaints.

use crate::io::configuration::MAX_REMOVALS;
use crate::io::error::Result;
use crate::pipeline::context::{RunContext, Stage};
use crate::spatial::coords::{Coord, OrderedCoordSet, contiguous_runs, group_by_row};
use crate::spatial::grid::{PixelGrid, Rgba, color_magnitude};

/// Most frequent color among a set of coordinates
///
/// Coordinates are stable-sorted by color magnitude and runs of identical
/// colors are counted; the first longest run wins. Returns the color and its
/// count, `None` for an empty set.
pub fn majority_color(grid: &PixelGrid, coords: &[Coord]) -> Option<(Rgba, usize)> {
    let mut colors: Vec<Rgba> = coords
        .iter()
        .filter_map(|c| grid.get(c.x, c.y))
        .collect();
    colors.sort_by_key(color_magnitude);

    let mut best: Option<(Rgba, usize)> = None;
    let mut iter = colors.into_iter();
    let mut current = iter.next()?;
    let mut count = 1;

    for color in iter {
        if color == current {
            count += 1;
        } else {
            if best.is_none_or(|(_, max)| count > max) {
                best = Some((current, count));
            }
            current = color;
            count = 1;
        }
    }
    if best.is_none_or(|(_, max)| count > max) {
        best = Some((current, count));
    }

    best
}

/// Transient state of one particle decision
#[derive(Debug, Default)]
pub struct ParticleRegion {
    /// Pixels confirmed as part of the particle
    pub visited: OrderedCoordSet,
    /// Neighbours of visited pixels not yet classified
    pub frontier: OrderedCoordSet,
    /// Pixels barred from the frontier
    pub excluded: OrderedCoordSet,
}

impl ParticleRegion {
    /// Create an empty region
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget every coordinate
    pub fn reset(&mut self) {
        self.visited.clear();
        self.frontier.clear();
        self.excluded.clear();
    }

    /// Flood-fill 4-connected pixels of `target` starting at `start`
    ///
    /// Traversal order is right, down, left, up, depth first, and stops once
    /// `cap` pixels are visited.
    pub fn flood(&mut self, grid: &PixelGrid, start: Coord, target: Rgba, cap: usize) {
        let width = grid.width();
        let height = grid.height();
        let mut stack = vec![start];

        while let Some(coord) = stack.pop() {
            if grid.get(coord.x, coord.y) != Some(target) || self.visited.contains(coord) {
                continue;
            }
            if self.visited.len() >= cap {
                break;
            }
            self.visited.insert(coord);

            // Pushed in reverse so the right neighbour is explored first
            stack.extend(coord.up());
            stack.extend(coord.left());
            stack.extend(coord.down(height));
            stack.extend(coord.right(width));
        }
    }

    /// Collect the 4-neighbours of visited pixels into the frontier
    ///
    /// Neighbours already visited or excluded are skipped.
    pub fn expand_frontier(&mut self, width: usize, height: usize) {
        for &coord in self.visited.iter() {
            let neighbours = [
                coord.left(),
                coord.right(width),
                coord.up(),
                coord.down(height),
            ];
            for n in neighbours.into_iter().flatten() {
                if !self.visited.contains(n) && !self.excluded.contains(n) {
                    self.frontier.insert(n);
                }
            }
        }
    }

    /// Most frequent frontier color
    pub fn majority_neighbour(&self, grid: &PixelGrid) -> Option<(Rgba, usize)> {
        majority_color(grid, self.frontier.as_slice())
    }
}

/// Particle cleaner holding the size threshold
#[derive(Debug, Clone, Copy)]
pub struct ParticleCleaner {
    size_limit: usize,
}

impl ParticleCleaner {
    /// Create a cleaner for the given size threshold
    pub const fn new(size_limit: usize) -> Self {
        Self { size_limit }
    }

    /// Longest horizontal run treated as narrow, exclusive
    pub fn narrow_width(&self) -> usize {
        (self.size_limit as f64).sqrt().round() as usize
    }

    /// Run both passes in place
    ///
    /// # Errors
    ///
    /// Returns `CancellationRequested` when the context is cancelled between rows
    pub fn clean(&self, grid: &mut PixelGrid, ctx: &mut RunContext<'_>) -> Result<()> {
        ctx.info(Stage::Particles, "Starting particle removal");
        self.remove_islands(grid, ctx)?;
        ctx.info(Stage::Particles, "Removing exceeding rows");
        Self::remove_spurs(grid, ctx)?;
        ctx.info(Stage::Particles, "Particle removal completed");
        Ok(())
    }

    /// Pass A: repaint small islands and narrow runs of large particles
    ///
    /// # Errors
    ///
    /// Returns `CancellationRequested` when the context is cancelled between rows
    pub fn remove_islands(&self, grid: &mut PixelGrid, ctx: &mut RunContext<'_>) -> Result<()> {
        let mut region = ParticleRegion::new();
        let mut row_region = ParticleRegion::new();

        for y in 0..grid.height() {
            ctx.checkpoint(Stage::Particles)?;

            for x in 0..grid.width() {
                let mut attempts = 0;
                loop {
                    let modified = self.classify(grid, Coord::new(x, y), &mut region, &mut row_region);
                    region.reset();
                    attempts += 1;

                    if attempts > MAX_REMOVALS {
                        ctx.warn(
                            Stage::Particles,
                            format!("Attempt exceeded {MAX_REMOVALS} at ({x}, {y})"),
                        );
                        break;
                    }
                    if !modified {
                        break;
                    }
                }
            }

            ctx.detail(Stage::Particles, format!("Row {y} done!"));
        }

        Ok(())
    }

    /// One classification attempt for the particle containing `start`
    ///
    /// Returns whether any pixel was repainted.
    fn classify(
        &self,
        grid: &mut PixelGrid,
        start: Coord,
        region: &mut ParticleRegion,
        row_region: &mut ParticleRegion,
    ) -> bool {
        let Some(target) = grid.get(start.x, start.y) else {
            return false;
        };
        region.flood(grid, start, target, self.size_limit);

        if region.visited.len() < self.size_limit {
            region.expand_frontier(grid.width(), grid.height());
            match region.majority_neighbour(grid) {
                Some((color, count)) if count > 0 && color != target => {
                    for c in region.visited.iter() {
                        grid.set(c.x, c.y, color);
                    }
                    true
                }
                _ => false,
            }
        } else {
            let rows = group_by_row(region.visited.as_slice());
            self.merge_narrow_runs(grid, &rows, row_region)
        }
    }

    /// Merge narrow horizontal runs of a large particle into their surroundings
    ///
    /// A run qualifies when it is shorter than [`Self::narrow_width`] and both
    /// the pixel left of it and the pixel right of it have another color. The
    /// particle's rows directly above and below are excluded from the vote.
    fn merge_narrow_runs(
        &self,
        grid: &mut PixelGrid,
        rows: &[Vec<Coord>],
        row_region: &mut ParticleRegion,
    ) -> bool {
        let narrow = self.narrow_width();
        let width = grid.width();
        let height = grid.height();
        let mut modified = false;

        for (k, row) in rows.iter().enumerate() {
            if row.len() == 1 {
                row_region.visited.extend_from(row);
                row_region.expand_frontier(width, height);
                modified |= Self::repaint_with_majority(grid, row, row_region);
                row_region.reset();
                continue;
            }

            for run in contiguous_runs(row) {
                if run.len() >= narrow || !Self::is_narrow(grid, run) {
                    continue;
                }

                row_region.visited.extend_from(run);
                let neighbours_rows = [k.checked_sub(1).and_then(|i| rows.get(i)), rows.get(k + 1)];
                for excluded_row in neighbours_rows.into_iter().flatten() {
                    row_region.excluded.extend_from(excluded_row);
                }
                row_region.expand_frontier(width, height);
                modified |= Self::repaint_with_majority(grid, run, row_region);
                row_region.reset();
            }
        }

        modified
    }

    // Both outside neighbours exist and differ from the run's end colors
    fn is_narrow(grid: &PixelGrid, run: &[Coord]) -> bool {
        let (Some(first), Some(last)) = (run.first(), run.last()) else {
            return false;
        };
        let left = first.left().and_then(|c| grid.get(c.x, c.y));
        let right = last.right(grid.width()).and_then(|c| grid.get(c.x, c.y));
        let start_color = grid.get(first.x, first.y);
        let end_color = grid.get(last.x, last.y);

        matches!((left, right), (Some(l), Some(r)) if Some(l) != start_color && Some(r) != end_color)
    }

    // Repaint `pixels` with the frontier majority when it differs from the first pixel
    fn repaint_with_majority(grid: &mut PixelGrid, pixels: &[Coord], region: &ParticleRegion) -> bool {
        let Some(first) = pixels.first() else {
            return false;
        };
        let own = grid.get(first.x, first.y);
        match region.majority_neighbour(grid) {
            Some((color, count)) if count > 0 && Some(color) != own => {
                for c in pixels {
                    grid.set(c.x, c.y, color);
                }
                true
            }
            _ => false,
        }
    }

    /// Pass B: repaint pixels that differ from both vertical or both horizontal neighbours
    ///
    /// # Errors
    ///
    /// Returns `CancellationRequested` when the context is cancelled between rows
    pub fn remove_spurs(grid: &mut PixelGrid, ctx: &mut RunContext<'_>) -> Result<()> {
        for y in 0..grid.height() {
            ctx.checkpoint(Stage::Particles)?;
            for x in 0..grid.width() {
                Self::remove_spur_at(grid, Coord::new(x, y));
            }
        }
        Ok(())
    }

    /// Single-shot spur check at one pixel
    pub fn remove_spur_at(grid: &mut PixelGrid, coord: Coord) {
        let Some(own) = grid.get(coord.x, coord.y) else {
            return;
        };
        let color_at = |coord: Option<Coord>| coord.and_then(|n| grid.get(n.x, n.y));
        let differs = |c: Option<Rgba>| c.is_some_and(|color| color != own);

        let up = color_at(coord.up());
        let down = color_at(coord.down(grid.height()));
        let left = color_at(coord.left());
        let right = color_at(coord.right(grid.width()));

        let vertical_spur = differs(up) && differs(down);
        let horizontal_spur = differs(left) && differs(right);
        if !vertical_spur && !horizontal_spur {
            return;
        }

        let candidates = [
            (coord.up(), up),
            (coord.down(grid.height()), down),
            (coord.left(), left),
            (coord.right(grid.width()), right),
        ];
        let neighbours: Vec<Coord> = candidates
            .into_iter()
            .filter_map(|(c, color)| c.filter(|_| differs(color)))
            .collect();

        if let Some((color, count)) = majority_color(grid, &neighbours) {
            if count > 0 && color != own {
                grid.set(coord.x, coord.y, color);
            }
        }
    }
}
