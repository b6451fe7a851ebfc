//! Connected regions of a flat-colored grid and their label points

/// Binary masks and two-pass union-find labeling
pub mod components;
/// Moore boundary tracing and hole detection
pub mod boundary;
/// Per-color orchestration, palette shares and isolated layers
pub mod labeler;

pub use labeler::{ColorShare, LabelEntry, LabelPoint, RegionLabeler, RegionLabeling, RegionLayer};
