//! Binary masks and two-pass connected-component labeling
//!
//! Masks cover a rectangular window of the image and remember its origin,
//! so component coordinates come back in absolute image space.

use bitvec::prelude::*;

use crate::spatial::coords::{Bounds, Coord, group_by_row};

/// Bit mask over a rectangular window of the image
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BinaryMask {
    origin: Coord,
    width: usize,
    height: usize,
    bits: BitVec,
}

impl BinaryMask {
    /// Create an all-clear mask over `bounds`
    pub fn new(bounds: Bounds) -> Self {
        let width = bounds.width();
        let height = bounds.height();
        Self {
            origin: Coord::new(bounds.min_x, bounds.min_y),
            width,
            height,
            bits: bitvec![0; width * height],
        }
    }

    /// Mask over `bounds` with every given coordinate set
    ///
    /// Coordinates outside `bounds` are ignored.
    pub fn covering(coords: &[Coord], bounds: Bounds) -> Self {
        let mut mask = Self::new(bounds);
        for &coord in coords {
            mask.set(coord);
        }
        mask
    }

    /// Mask over the bounding box of `coords`, `None` for an empty list
    pub fn foreground(coords: &[Coord]) -> Option<Self> {
        Bounds::of(coords).map(|bounds| Self::covering(coords, bounds))
    }

    /// Hole candidates of a component
    ///
    /// Sets every pixel outside the component lying strictly between the
    /// leftmost and rightmost component pixel of its row. The mask spans
    /// the component's bounding box. Returns `None` for an empty component.
    pub fn hole_candidates(component: &[Coord]) -> Option<Self> {
        let bounds = Bounds::of(component)?;
        let mut mask = Self::new(bounds);

        for row in group_by_row(component) {
            for pair in row.windows(2) {
                if let [left, right] = pair {
                    for x in (left.x + 1)..right.x {
                        mask.set(Coord::new(x, left.y));
                    }
                }
            }
        }

        Some(mask)
    }

    /// Absolute coordinate of the top-left mask cell
    pub const fn origin(&self) -> Coord {
        self.origin
    }

    /// Window width
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Window height
    pub const fn height(&self) -> usize {
        self.height
    }

    /// Number of cells in the window
    pub const fn area(&self) -> usize {
        self.width * self.height
    }

    /// Number of set cells
    pub fn count(&self) -> usize {
        self.bits.count_ones()
    }

    /// Test for a mask with no set cell
    pub fn is_clear(&self) -> bool {
        self.bits.not_any()
    }

    fn index(&self, x: i64, y: i64) -> Option<usize> {
        if x < 0 || y < 0 {
            return None;
        }
        let (x, y) = (x as usize, y as usize);
        (x < self.width && y < self.height).then_some(y * self.width + x)
    }

    /// Test a cell by window-local signed coordinates
    ///
    /// Out-of-window positions read as clear.
    pub fn get_local(&self, x: i64, y: i64) -> bool {
        self.index(x, y)
            .and_then(|i| self.bits.get(i).as_deref().copied())
            .unwrap_or(false)
    }

    /// Test a cell by absolute image coordinate
    pub fn contains(&self, coord: Coord) -> bool {
        if coord.x < self.origin.x || coord.y < self.origin.y {
            return false;
        }
        self.get_local(
            (coord.x - self.origin.x) as i64,
            (coord.y - self.origin.y) as i64,
        )
    }

    /// Set a cell by absolute image coordinate, ignored outside the window
    pub fn set(&mut self, coord: Coord) {
        if coord.x < self.origin.x || coord.y < self.origin.y {
            return;
        }
        let local = self.index(
            (coord.x - self.origin.x) as i64,
            (coord.y - self.origin.y) as i64,
        );
        if let Some(i) = local {
            self.bits.set(i, true);
        }
    }

    /// First set cell in raster order, window-local
    pub fn first_set(&self) -> Option<(usize, usize)> {
        self.bits
            .first_one()
            .map(|i| (i % self.width, i / self.width))
    }

    /// Convert window-local coordinates to absolute ones
    pub const fn to_absolute(&self, x: usize, y: usize) -> Coord {
        Coord::new(self.origin.x + x, self.origin.y + y)
    }
}

/// Disjoint-set forest over provisional labels
///
/// Label 0 is reserved for background and never handed out.
#[derive(Clone, Debug)]
pub struct UnionFind {
    parent: Vec<usize>,
}

impl Default for UnionFind {
    fn default() -> Self {
        Self::new()
    }
}

impl UnionFind {
    /// Create a forest holding only the background label
    pub fn new() -> Self {
        Self { parent: vec![0] }
    }

    /// Allocate a fresh label as its own root
    pub fn make_set(&mut self) -> usize {
        let label = self.parent.len();
        self.parent.push(label);
        label
    }

    /// Root of `label`, compressing the path behind it
    pub fn find(&mut self, label: usize) -> usize {
        let mut root = label;
        while let Some(&parent) = self.parent.get(root) {
            if parent == root {
                break;
            }
            root = parent;
        }

        let mut current = label;
        while current != root {
            let Some(slot) = self.parent.get_mut(current) else {
                break;
            };
            current = std::mem::replace(slot, root);
        }

        root
    }

    /// Merge the sets of `a` and `b`, `a`'s root becomes the parent
    pub fn union(&mut self, a: usize, b: usize) {
        let root_a = self.find(a);
        let root_b = self.find(b);
        if root_a != root_b {
            if let Some(slot) = self.parent.get_mut(root_b) {
                *slot = root_a;
            }
        }
    }
}

/// Label the 4-connected components of a mask
///
/// Classic two-pass labeling: the first pass takes the smallest label of the
/// left and upper neighbours and records equivalences, the second flattens
/// them. Components come out in order of their first pixel in raster order,
/// each as absolute coordinates in raster order.
pub fn label_components(mask: &BinaryMask) -> Vec<Vec<Coord>> {
    let width = mask.width();
    let height = mask.height();
    let mut labels = vec![0usize; mask.area()];
    let mut forest = UnionFind::new();

    for y in 0..height {
        for x in 0..width {
            if !mask.get_local(x as i64, y as i64) {
                continue;
            }

            let up = y
                .checked_sub(1)
                .and_then(|uy| labels.get(uy * width + x).copied())
                .filter(|&l| l != 0);
            let left = x
                .checked_sub(1)
                .and_then(|lx| labels.get(y * width + lx).copied())
                .filter(|&l| l != 0);

            let label = match (up, left) {
                (None, None) => forest.make_set(),
                (Some(a), None) | (None, Some(a)) => a,
                (Some(a), Some(b)) => {
                    let smallest = a.min(b);
                    forest.union(a, smallest);
                    forest.union(b, smallest);
                    smallest
                }
            };
            if let Some(slot) = labels.get_mut(y * width + x) {
                *slot = label;
            }
        }
    }

    let mut final_labels: Vec<Option<usize>> = vec![None; forest.parent.len()];
    let mut components: Vec<Vec<Coord>> = Vec::new();

    for (i, &label) in labels.iter().enumerate() {
        if label == 0 {
            continue;
        }
        let root = forest.find(label);
        let Some(slot) = final_labels.get_mut(root) else {
            continue;
        };
        let index = *slot.get_or_insert_with(|| {
            components.push(Vec::new());
            components.len() - 1
        });
        if let Some(component) = components.get_mut(index) {
            component.push(mask.to_absolute(i % width, i / width));
        }
    }

    components
}
