//! Paint-by-number template generation from raster photographs
//!
//! The pipeline quantizes an RGBA image to a small palette, removes noise and
//! undersized particles, labels every connected region at its pole of
//! inaccessibility and renders a numbered outline ready for printing.

#![forbid(unsafe_code)]

/// Segment distances, polygon containment and the pole-of-inaccessibility solver
pub mod geometry;
/// Input/output operations, configuration and error handling
pub mod io;
/// Run context, parameters and stage orchestration
pub mod pipeline;
/// Quantization, denoising, particle cleanup and edge rendering stages
pub mod processing;
/// Connected components, boundary tracing and region labeling
pub mod regions;
/// Pixel grid and coordinate utilities
pub mod spatial;

pub use io::error::{PipelineError, Result};
pub use pipeline::{Pipeline, PipelineOutput, PipelineParams, run_pipeline};
