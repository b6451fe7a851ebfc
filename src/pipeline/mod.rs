//! Pipeline parameters, run context and orchestration

/// Diagnostics channel, progress callback and cancellation
pub mod context;
/// Stage sequencing and the public entry point
pub mod executor;
/// Parameters and their validation
pub mod params;

pub use context::{CancellationToken, Diagnostic, Level, RunContext, Stage};
pub use executor::{Pipeline, PipelineOutput, run_pipeline};
pub use params::PipelineParams;
