//! Spatial data structures shared by the pipeline stages
//!
//! This module contains:
//! - The RGBA pixel grid and its flat-buffer conversions
//! - Packed coordinate keys, ordered coordinate sets and row grouping

/// Packed coordinates, ordered sets and bounding boxes
pub mod coords;
/// RGBA pixel grid and flat-buffer conversions
pub mod grid;

pub use coords::{Bounds, Coord, OrderedCoordSet};
pub use grid::{PixelGrid, Rgba};
