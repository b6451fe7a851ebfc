//! Pole of inaccessibility by branch-and-bound over square cells
//!
//! The pole is the interior point farthest from every edge of a polygon
//! with holes. Unlike the centroid it always lies in the filled area, which
//! makes it a stable anchor for region labels on concave shapes.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::f64::consts::SQRT_2;

use crate::geometry::distance::{Polygon, ring_centroid, signed_distance};

/// Best label point found by the solver
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PoleOfInaccessibility {
    /// Horizontal coordinate
    pub x: f64,
    /// Vertical coordinate
    pub y: f64,
    /// Signed distance to the nearest edge
    pub distance: f64,
}

/// Square search cell
#[derive(Debug, Clone, Copy)]
struct Cell {
    x: f64,
    y: f64,
    half: f64,
    distance: f64,
    max: f64,
}

impl Cell {
    fn new(x: f64, y: f64, half: f64, polygon: &Polygon) -> Self {
        let distance = signed_distance([x, y], polygon);
        Self {
            x,
            y,
            half,
            distance,
            max: half.mul_add(SQRT_2, distance),
        }
    }
}

// BinaryHeap is a max-heap, so the cell with the largest upper bound pops first
impl PartialEq for Cell {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Cell {}

impl PartialOrd for Cell {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Cell {
    fn cmp(&self, other: &Self) -> Ordering {
        self.max.total_cmp(&other.max)
    }
}

/// Centroid of the outer ring, falling back to its first vertex
///
/// The fallback applies when the ring has no area or the centroid lies
/// outside the polygon.
fn centroid_cell(polygon: &Polygon) -> Cell {
    let outer = polygon.outer();
    let first = outer.first().copied().unwrap_or([0.0, 0.0]);

    ring_centroid(outer)
        .map(|c| Cell::new(c[0], c[1], 0.0, polygon))
        .filter(|cell| cell.distance >= 0.0)
        .unwrap_or_else(|| Cell::new(first[0], first[1], 0.0, polygon))
}

/// Find the pole of inaccessibility of `polygon` to within `precision`
///
/// Degenerate boxes whose smaller side does not exceed `precision` return the
/// minimum corner of the bounding box with distance 0. A polygon without an
/// outer ring returns the origin.
pub fn pole_of_inaccessibility(polygon: &Polygon, precision: f64) -> PoleOfInaccessibility {
    let Some((min, max)) = polygon.bounding_box() else {
        return PoleOfInaccessibility::default();
    };

    let width = max[0] - min[0];
    let height = max[1] - min[1];
    let cell_size = precision.max(width.min(height));

    if cell_size <= precision {
        return PoleOfInaccessibility {
            x: min[0],
            y: min[1],
            distance: 0.0,
        };
    }

    let mut best = centroid_cell(polygon);

    let bbox_cell = Cell::new(min[0] + width / 2.0, min[1] + height / 2.0, 0.0, polygon);
    if bbox_cell.distance > best.distance {
        best = bbox_cell;
    }

    let mut queue = BinaryHeap::new();
    let probe = |x: f64, y: f64, half: f64, best: &mut Cell, queue: &mut BinaryHeap<Cell>| {
        let cell = Cell::new(x, y, half, polygon);
        if cell.max > best.distance + precision {
            queue.push(cell);
        }
        if cell.distance > best.distance {
            *best = cell;
        }
    };

    // Cover the bounding box with the initial cells
    let half = cell_size / 2.0;
    let mut x = min[0];
    while x < max[0] {
        let mut y = min[1];
        while y < max[1] {
            probe(x + half, y + half, half, &mut best, &mut queue);
            y += cell_size;
        }
        x += cell_size;
    }

    while let Some(cell) = queue.pop() {
        if cell.max - best.distance <= precision {
            break;
        }

        let h = cell.half / 2.0;
        probe(cell.x - h, cell.y - h, h, &mut best, &mut queue);
        probe(cell.x + h, cell.y - h, h, &mut best, &mut queue);
        probe(cell.x - h, cell.y + h, h, &mut best, &mut queue);
        probe(cell.x + h, cell.y + h, h, &mut best, &mut queue);
    }

    PoleOfInaccessibility {
        x: best.x,
        y: best.y,
        distance: best.distance,
    }
}
