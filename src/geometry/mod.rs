//! Geometry kernel for label placement

/// Segment distance, point-in-ring and signed polygon distance
pub mod distance;
/// Pole-of-inaccessibility solver
pub mod pole;

pub use distance::{Point, Polygon};
pub use pole::{PoleOfInaccessibility, pole_of_inaccessibility};
