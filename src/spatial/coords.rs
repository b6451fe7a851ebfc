//! Packed coordinate keys and insertion-ordered coordinate sets
//!
//! Flood fills and neighbour scans need set semantics and a reproducible
//! iteration order at the same time. Keys are packed into a `u64` so the
//! hash set never sees formatted strings.

use std::collections::HashSet;

/// Pixel coordinate, `x` is the column and `y` the row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Coord {
    /// Column index
    pub x: usize,
    /// Row index
    pub y: usize,
}

impl Coord {
    /// Create a coordinate from column and row
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    /// Pack into a single key, row in the high half
    pub const fn key(self) -> u64 {
        ((self.y as u64) << 32) | (self.x as u64 & 0xFFFF_FFFF)
    }

    /// Left neighbour, `None` on the first column
    pub const fn left(self) -> Option<Self> {
        if self.x == 0 {
            None
        } else {
            Some(Self::new(self.x - 1, self.y))
        }
    }

    /// Upper neighbour, `None` on the first row
    pub const fn up(self) -> Option<Self> {
        if self.y == 0 {
            None
        } else {
            Some(Self::new(self.x, self.y - 1))
        }
    }

    /// Right neighbour, `None` past `width`
    pub const fn right(self, width: usize) -> Option<Self> {
        if self.x + 1 < width {
            Some(Self::new(self.x + 1, self.y))
        } else {
            None
        }
    }

    /// Lower neighbour, `None` past `height`
    pub const fn down(self, height: usize) -> Option<Self> {
        if self.y + 1 < height {
            Some(Self::new(self.x, self.y + 1))
        } else {
            None
        }
    }
}

/// Set of coordinates that iterates in insertion order
#[derive(Debug, Clone, Default)]
pub struct OrderedCoordSet {
    order: Vec<Coord>,
    keys: HashSet<u64>,
}

impl OrderedCoordSet {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a coordinate, returns `false` if it was already present
    pub fn insert(&mut self, coord: Coord) -> bool {
        if self.keys.insert(coord.key()) {
            self.order.push(coord);
            true
        } else {
            false
        }
    }

    /// Insert every coordinate of a slice in order
    pub fn extend_from(&mut self, coords: &[Coord]) {
        for &coord in coords {
            self.insert(coord);
        }
    }

    /// Test membership
    pub fn contains(&self, coord: Coord) -> bool {
        self.keys.contains(&coord.key())
    }

    /// Number of coordinates
    pub const fn len(&self) -> usize {
        self.order.len()
    }

    /// Test for emptiness
    pub const fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Coordinates in insertion order
    pub const fn as_slice(&self) -> &[Coord] {
        self.order.as_slice()
    }

    /// Iterate in insertion order
    pub fn iter(&self) -> std::slice::Iter<'_, Coord> {
        self.order.iter()
    }

    /// Remove every coordinate, keeping allocations
    pub fn clear(&mut self) {
        self.order.clear();
        self.keys.clear();
    }
}

impl<'a> IntoIterator for &'a OrderedCoordSet {
    type Item = &'a Coord;
    type IntoIter = std::slice::Iter<'a, Coord>;

    fn into_iter(self) -> Self::IntoIter {
        self.order.iter()
    }
}

impl FromIterator<Coord> for OrderedCoordSet {
    fn from_iter<I: IntoIterator<Item = Coord>>(iter: I) -> Self {
        let mut set = Self::new();
        for coord in iter {
            set.insert(coord);
        }
        set
    }
}

/// Group coordinates into rows
///
/// Rows come out top to bottom and each row is sorted left to right. Rows
/// with no coordinates are skipped.
pub fn group_by_row(coords: &[Coord]) -> Vec<Vec<Coord>> {
    let mut sorted = coords.to_vec();
    sorted.sort_by_key(|c| (c.y, c.x));

    let mut rows: Vec<Vec<Coord>> = Vec::new();
    for coord in sorted {
        match rows.last_mut() {
            Some(row) if row.first().is_some_and(|first| first.y == coord.y) => row.push(coord),
            _ => rows.push(vec![coord]),
        }
    }
    rows
}

/// Split a sorted row into maximal runs of horizontally adjacent coordinates
pub fn contiguous_runs(row: &[Coord]) -> Vec<&[Coord]> {
    let mut runs = Vec::new();
    let mut start = 0;
    for i in 1..=row.len() {
        let breaks = match (row.get(i - 1), row.get(i)) {
            (Some(prev), Some(curr)) => curr.x != prev.x + 1,
            _ => true,
        };
        if breaks {
            if let Some(run) = row.get(start..i) {
                if !run.is_empty() {
                    runs.push(run);
                }
            }
            start = i;
        }
    }
    runs
}

/// Inclusive bounding box of a coordinate list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    /// Smallest column
    pub min_x: usize,
    /// Largest column
    pub max_x: usize,
    /// Smallest row
    pub min_y: usize,
    /// Largest row
    pub max_y: usize,
}

impl Bounds {
    /// Bounding box of the given coordinates, `None` when empty
    pub fn of(coords: &[Coord]) -> Option<Self> {
        let first = coords.first()?;
        let mut bounds = Self {
            min_x: first.x,
            max_x: first.x,
            min_y: first.y,
            max_y: first.y,
        };
        for c in coords {
            bounds.min_x = bounds.min_x.min(c.x);
            bounds.max_x = bounds.max_x.max(c.x);
            bounds.min_y = bounds.min_y.min(c.y);
            bounds.max_y = bounds.max_y.max(c.y);
        }
        Some(bounds)
    }

    /// Width in pixels
    pub const fn width(&self) -> usize {
        self.max_x - self.min_x + 1
    }

    /// Height in pixels
    pub const fn height(&self) -> usize {
        self.max_y - self.min_y + 1
    }

    /// Check if a coordinate lies within the box
    pub const fn contains(&self, coord: Coord) -> bool {
        coord.x >= self.min_x
            && coord.x <= self.max_x
            && coord.y >= self.min_y
            && coord.y <= self.max_y
    }
}
