//! Point, segment and ring primitives for polygons with holes

/// 2-D point `[x, y]`
pub type Point = [f64; 2];

/// Polygon made of one outer ring followed by zero or more hole rings
///
/// Rings are implicitly closed: the last point connects back to the first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Polygon {
    rings: Vec<Vec<Point>>,
}

impl Polygon {
    /// Create a polygon from its outer ring and hole rings
    pub fn new(outer: Vec<Point>, holes: Vec<Vec<Point>>) -> Self {
        let mut rings = Vec::with_capacity(holes.len() + 1);
        rings.push(outer);
        rings.extend(holes);
        Self { rings }
    }

    /// Outer ring, empty for a default polygon
    pub fn outer(&self) -> &[Point] {
        self.rings.first().map(Vec::as_slice).unwrap_or_default()
    }

    /// All rings, outer first
    pub fn rings(&self) -> &[Vec<Point>] {
        &self.rings
    }

    /// Bounding box of the outer ring as `(min, max)`
    pub fn bounding_box(&self) -> Option<(Point, Point)> {
        let outer = self.outer();
        let first = outer.first()?;
        let mut min = *first;
        let mut max = *first;
        for p in outer {
            min = [min[0].min(p[0]), min[1].min(p[1])];
            max = [max[0].max(p[0]), max[1].max(p[1])];
        }
        Some((min, max))
    }
}

/// Squared distance from `p` to the segment `a`-`b`
pub fn segment_distance_squared(p: Point, a: Point, b: Point) -> f64 {
    let mut x = a[0];
    let mut y = a[1];
    let mut dx = b[0] - x;
    let mut dy = b[1] - y;

    if dx != 0.0 || dy != 0.0 {
        let t = ((p[0] - x) * dx + (p[1] - y) * dy) / (dx * dx + dy * dy);
        if t > 1.0 {
            x = b[0];
            y = b[1];
        } else if t > 0.0 {
            x += dx * t;
            y += dy * t;
        }
    }

    dx = p[0] - x;
    dy = p[1] - y;
    dx * dx + dy * dy
}

/// Iterate the closed edges `(current, previous)` of a ring
fn ring_edges(ring: &[Point]) -> impl Iterator<Item = (Point, Point)> + '_ {
    let last = ring.len().saturating_sub(1);
    ring.iter().enumerate().filter_map(move |(i, &a)| {
        let j = if i == 0 { last } else { i - 1 };
        ring.get(j).map(|&b| (a, b))
    })
}

/// Even-odd crossing test of a single ring
pub fn ring_contains(point: Point, ring: &[Point]) -> bool {
    let mut inside = false;
    for (a, b) in ring_edges(ring) {
        if crosses(point, a, b) {
            inside = !inside;
        }
    }
    inside
}

// Horizontal ray from `point` towards +x crosses the edge a-b
fn crosses(point: Point, a: Point, b: Point) -> bool {
    (a[1] > point[1]) != (b[1] > point[1])
        && point[0] < (b[0] - a[0]) * (point[1] - a[1]) / (b[1] - a[1]) + a[0]
}

/// Signed distance from `point` to the polygon outline
///
/// Positive inside, negative outside, using the even-odd rule across every
/// ring. A point exactly on an edge has distance 0.
pub fn signed_distance(point: Point, polygon: &Polygon) -> f64 {
    let mut inside = false;
    let mut min_dist_sq = f64::INFINITY;

    for ring in polygon.rings() {
        for (a, b) in ring_edges(ring) {
            if crosses(point, a, b) {
                inside = !inside;
            }
            min_dist_sq = min_dist_sq.min(segment_distance_squared(point, a, b));
        }
    }

    if min_dist_sq == 0.0 {
        0.0
    } else if inside {
        min_dist_sq.sqrt()
    } else {
        -min_dist_sq.sqrt()
    }
}

/// Area centroid of a ring, `None` for a zero-area ring
pub fn ring_centroid(ring: &[Point]) -> Option<Point> {
    let mut area = 0.0;
    let mut x = 0.0;
    let mut y = 0.0;

    for (a, b) in ring_edges(ring) {
        let f = a[0] * b[1] - b[0] * a[1];
        x += (a[0] + b[0]) * f;
        y += (a[1] + b[1]) * f;
        area += f * 3.0;
    }

    if area == 0.0 {
        None
    } else {
        Some([x / area, y / area])
    }
}
