//! Moore-neighbour boundary tracing and hole detection

use crate::io::configuration::TRACE_STEPS_PER_PIXEL;
use crate::regions::components::{BinaryMask, label_components};
use crate::spatial::coords::{Coord, OrderedCoordSet};

/// Moore neighbourhood offsets, clockwise from the bottom-left neighbour
pub const MOORE_DIRECTIONS: [(i64, i64); 8] = [
    (-1, 1),
    (-1, 0),
    (-1, -1),
    (0, -1),
    (1, -1),
    (1, 0),
    (1, 1),
    (0, 1),
];

/// Trace the outer boundary of the first foreground blob of `mask`
///
/// Starts at the first set cell in raster order with the backtrack on its
/// left. Each step scans the neighbourhood clockwise from just past the
/// backtrack direction and moves to the first set cell. The walk stops when
/// it returns to the start, when no neighbour is set, or after
/// [`TRACE_STEPS_PER_PIXEL`] steps per mask cell. Coordinates are absolute,
/// unique and in visiting order; an empty mask yields an empty boundary.
pub fn trace_boundary(mask: &BinaryMask) -> Vec<Coord> {
    let Some((sx, sy)) = mask.first_set() else {
        return Vec::new();
    };
    let start = (sx as i64, sy as i64);
    let mut current = start;
    let mut backtrack = (start.0 - 1, start.1);

    let mut boundary = OrderedCoordSet::new();
    boundary.insert(mask.to_absolute(sx, sy));

    let max_steps = mask.area().saturating_mul(TRACE_STEPS_PER_PIXEL).max(1);
    for _ in 0..max_steps {
        let offset = (backtrack.0 - current.0, backtrack.1 - current.1);
        let Some(start_direction) = MOORE_DIRECTIONS.iter().position(|&d| d == offset) else {
            break;
        };

        let next = (1..=MOORE_DIRECTIONS.len())
            .filter_map(|step| MOORE_DIRECTIONS.get((start_direction + step) % MOORE_DIRECTIONS.len()))
            .map(|&(dx, dy)| (current.0 + dx, current.1 + dy))
            .find(|&(nx, ny)| mask.get_local(nx, ny));

        let Some(found) = next else {
            break;
        };
        boundary.insert(mask.to_absolute(found.0 as usize, found.1 as usize));
        backtrack = current;
        current = found;

        if current == start {
            break;
        }
    }

    boundary.as_slice().to_vec()
}

/// Outer boundary of a component given as absolute coordinates
pub fn outer_boundary(component: &[Coord]) -> Vec<Coord> {
    BinaryMask::foreground(component)
        .map(|mask| trace_boundary(&mask))
        .unwrap_or_default()
}

/// Outer boundaries of every hole candidate of a component
///
/// Candidates are background runs enclosed left and right on their row;
/// they are not yet checked against the surrounding color.
pub fn hole_boundaries(component: &[Coord]) -> Vec<Vec<Coord>> {
    let Some(mask) = BinaryMask::hole_candidates(component) else {
        return Vec::new();
    };
    if mask.is_clear() {
        return Vec::new();
    }

    label_components(&mask)
        .iter()
        .map(Vec::as_slice)
        .map(outer_boundary)
        .filter(|ring| !ring.is_empty())
        .collect()
}

/// Check that every pixel of `ring` touches `color_mask` in its 8-neighbourhood
pub fn touches_color(ring: &[Coord], color_mask: &BinaryMask) -> bool {
    ring.iter().all(|pixel| {
        MOORE_DIRECTIONS.iter().any(|&(dx, dy)| {
            let nx = pixel.x as i64 + dx;
            let ny = pixel.y as i64 + dy;
            nx >= 0 && ny >= 0 && color_mask.contains(Coord::new(nx as usize, ny as usize))
        })
    })
}

/// Keep only hole rings bordered by the component's own color
pub fn valid_holes(holes: Vec<Vec<Coord>>, color_mask: &BinaryMask) -> Vec<Vec<Coord>> {
    holes
        .into_iter()
        .filter(|ring| touches_color(ring, color_mask))
        .collect()
}
