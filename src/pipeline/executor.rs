//! Pipeline orchestration
//!
//! Runs quantization, noise reduction, particle cleanup, region labeling and
//! edge rendering strictly in sequence, handing the grid from one stage to
//! the next. Nothing here touches the filesystem.

use crate::io::configuration::EDGE_COLOR;
use crate::io::error::Result;
use crate::pipeline::context::{CancellationToken, Diagnostic, ProgressCallback, RunContext, Stage};
use crate::pipeline::params::PipelineParams;
use crate::processing::denoise::median_filter;
use crate::processing::edges::{EdgeRenderer, LabelMarker, place_labels};
use crate::processing::kmeans::{KMeans, quantize};
use crate::processing::particles::ParticleCleaner;
use crate::regions::labeler::{ColorShare, LabelEntry, RegionLabeler, RegionLayer};
use crate::spatial::grid::{PixelGrid, dimensional_to_flatten, flatten_to_dimensional};

/// Everything one pipeline run produces
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    /// Image width in pixels
    pub width: usize,
    /// Image height in pixels
    pub height: usize,
    /// Flattened RGBA outline rendering, the printable template
    pub final_pixels: Vec<u8>,
    /// Outline rendering as a grid
    pub outline: PixelGrid,
    /// Cleaned flat-colored grid the regions were labeled on
    pub segmented: PixelGrid,
    /// Colored grid with black region borders
    pub labeled_preview: PixelGrid,
    /// One entry per distinct color, in order of first occurrence
    pub regions: Vec<LabelEntry>,
    /// Pixel share of every region color
    pub palette: Vec<ColorShare>,
    /// Isolated per-color layers when requested
    pub layers: Vec<RegionLayer>,
    /// Markers for the colored preview, inside labels in the label color
    pub markers: Vec<LabelMarker>,
    /// Markers for the outline rendering, always black
    pub outline_markers: Vec<LabelMarker>,
    /// K-means assignment passes performed
    pub iterations: usize,
    /// Every diagnostic recorded during the run
    pub diagnostics: Vec<Diagnostic>,
}

/// Configured pipeline with optional progress and cancellation hooks
pub struct Pipeline<'a> {
    params: PipelineParams,
    progress: Option<ProgressCallback<'a>>,
    cancellation: Option<CancellationToken>,
}

impl<'a> Pipeline<'a> {
    /// Create a pipeline without hooks
    pub const fn new(params: PipelineParams) -> Self {
        Self {
            params,
            progress: None,
            cancellation: None,
        }
    }

    /// Invoke `callback` with every diagnostic as it is recorded
    #[must_use]
    pub fn with_progress(mut self, callback: impl FnMut(&Diagnostic) + 'a) -> Self {
        self.progress = Some(Box::new(callback));
        self
    }

    /// Abandon the run once `token` is cancelled
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    /// Parameters this pipeline runs with
    pub const fn params(&self) -> &PipelineParams {
        &self.params
    }

    /// Run every stage on a flattened RGBA buffer
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - A parameter is out of range or the buffer does not match the size
    /// - The image has zero area
    /// - Cancellation was requested before the run finished
    pub fn run(self, pixels: &[u8], width: usize, height: usize) -> Result<PipelineOutput> {
        let Self {
            params,
            progress,
            cancellation,
        } = self;
        let mut ctx = RunContext::with_hooks(progress, cancellation);

        ctx.info(Stage::Validation, "Validating parameters");
        params.validate()?;
        params.validate_input(pixels.len(), width, height)?;
        let grid = flatten_to_dimensional(pixels, width, height)?;

        ctx.checkpoint(Stage::Quantize)?;
        let mut kmeans = KMeans::new(params.k_colors, params.max_iterations, &params.random_seed);
        let (quantized, clustering) = quantize(&grid, &mut kmeans, &mut ctx)?;

        ctx.checkpoint(Stage::Denoise)?;
        let mut segmented = median_filter(&quantized, params.sliding_size, &mut ctx)?;

        ctx.checkpoint(Stage::Particles)?;
        ParticleCleaner::new(params.size_limit).clean(&mut segmented, &mut ctx)?;

        ctx.checkpoint(Stage::Regions)?;
        let labeling = RegionLabeler::new(params.isolate_regions_on).label(&segmented, &mut ctx)?;
        let markers = place_labels(
            &labeling.regions,
            params.label_rgba(),
            params.alternative_label_on,
        );

        ctx.checkpoint(Stage::Edges)?;
        ctx.info(Stage::Edges, "Starting Edge detection");
        let outline = EdgeRenderer::outline().render(&segmented);
        let outline_markers = place_labels(&labeling.regions, EDGE_COLOR, params.alternative_label_on);
        ctx.info(Stage::Edges, "Edge detection completed");

        Ok(PipelineOutput {
            width,
            height,
            final_pixels: dimensional_to_flatten(&outline),
            outline,
            segmented,
            labeled_preview: labeling.preview,
            regions: labeling.regions,
            palette: labeling.palette,
            layers: labeling.layers,
            markers,
            outline_markers,
            iterations: clustering.iterations,
            diagnostics: ctx.into_diagnostics(),
        })
    }
}

/// Run the pipeline without hooks
///
/// # Errors
///
/// Returns an error if a parameter is out of range, the buffer does not
/// match `width * height * 4`, or the image has zero area
pub fn run_pipeline(
    pixels: &[u8],
    width: usize,
    height: usize,
    params: &PipelineParams,
) -> Result<PipelineOutput> {
    Pipeline::new(params.clone()).run(pixels, width, height)
}
