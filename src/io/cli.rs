//! Command-line interface for batch conversion of images into templates

use crate::io::configuration::{
    COLORS_SUFFIX, DEFAULT_K_COLORS, DEFAULT_MAX_ITERATIONS, DEFAULT_MAX_PIXELS,
    DEFAULT_SIZE_LIMIT, DEFAULT_SLIDING_SIZE, INPUT_EXTENSIONS, LAYER_SUFFIX, LEGEND_SUFFIX,
    OUTLINE_SUFFIX,
};
use crate::io::error::{Result, target_error};
use crate::io::image::{export_grid_as_png, load_rgba};
use crate::io::legend::write_legend;
use crate::io::progress::ProgressManager;
use crate::pipeline::executor::{Pipeline, PipelineOutput};
use crate::pipeline::params::PipelineParams;
use crate::processing::edges::place_labels;
use clap::{ArgAction, Parser};
use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Parser)]
#[command(name = "paintnumber")]
#[command(
    author,
    version,
    about = "Turn photographs into numbered paint-by-number templates"
)]
/// Command-line arguments for the template generator
// CLI tools commonly need multiple boolean flags for various features and user preferences
#[allow(clippy::struct_excessive_bools)]
pub struct Cli {
    /// Input PNG/JPEG file or directory to process
    #[arg(value_name = "TARGET")]
    pub target: PathBuf,

    /// Number of palette colors
    #[arg(short = 'k', long = "colors", default_value_t = DEFAULT_K_COLORS)]
    pub colors: usize,

    /// Maximum k-means iterations
    #[arg(short, long, default_value_t = DEFAULT_MAX_ITERATIONS)]
    pub iterations: usize,

    /// Seed string for reproducible palettes, empty for a random run
    #[arg(short, long, default_value = "")]
    pub seed: String,

    /// Pixel budget, larger images are scaled down first
    #[arg(short, long, default_value_t = DEFAULT_MAX_PIXELS)]
    pub max_pixels: usize,

    /// Side of the denoise window, odd
    #[arg(short = 'w', long = "sliding", default_value_t = DEFAULT_SLIDING_SIZE)]
    pub sliding: usize,

    /// Regions smaller than this many pixels are merged away
    #[arg(short = 'l', long, default_value_t = DEFAULT_SIZE_LIMIT)]
    pub size_limit: usize,

    /// Export one isolated layer image per color
    #[arg(long)]
    pub isolate: bool,

    /// Scale label numbers with region size
    #[arg(short, long)]
    pub alternative_label: bool,

    /// Color of label numbers inside their region, `r,g,b` or `#rrggbb`
    #[arg(short = 'c', long, default_value = "0,0,0", value_parser = parse_label_color)]
    pub label_color: [u8; 3],

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,

    /// Process files even if output exists
    #[arg(short, long)]
    pub no_skip: bool,

    /// Log more detail, repeat for per-row diagnostics
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

/// Parse a label color given as `r,g,b` or `#rrggbb`
///
/// # Errors
///
/// Returns a message describing the accepted formats
pub fn parse_label_color(value: &str) -> std::result::Result<[u8; 3], String> {
    let invalid = || format!("invalid color '{value}', expected r,g,b or #rrggbb");
    let trimmed = value.trim();

    if let Some(hex) = trimmed.strip_prefix('#') {
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(invalid());
        }
        let channel = |range: std::ops::Range<usize>| {
            hex.get(range)
                .and_then(|digits| u8::from_str_radix(digits, 16).ok())
        };
        return match (channel(0..2), channel(2..4), channel(4..6)) {
            (Some(r), Some(g), Some(b)) => Ok([r, g, b]),
            _ => Err(invalid()),
        };
    }

    let channels: Vec<u8> = trimmed
        .split(',')
        .map(|part| part.trim().parse::<u8>())
        .collect::<std::result::Result<_, _>>()
        .map_err(|e| format!("{}: {e}", invalid()))?;
    <[u8; 3]>::try_from(channels)
        .map_err(|channels| format!("{}: got {} channels", invalid(), channels.len()))
}

impl Cli {
    /// Check if existing output files should be skipped
    pub const fn skip_existing(&self) -> bool {
        !self.no_skip
    }

    /// Check if progress should be displayed
    pub const fn should_show_progress(&self) -> bool {
        !self.quiet
    }

    /// Log filter for the configured verbosity
    pub const fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        }
    }

    /// Pipeline parameters taken from the flags
    pub fn params(&self) -> PipelineParams {
        PipelineParams {
            max_pixels: self.max_pixels,
            max_iterations: self.iterations,
            k_colors: self.colors,
            random_seed: self.seed.clone(),
            sliding_size: self.sliding,
            size_limit: self.size_limit,
            isolate_regions_on: self.isolate,
            alternative_label_on: self.alternative_label,
            label_color: self.label_color,
        }
    }
}

/// Orchestrates batch processing of image files with progress tracking
pub struct FileProcessor {
    cli: Cli,
    progress_manager: Option<ProgressManager>,
}

impl FileProcessor {
    /// Create a new file processor with the given CLI arguments
    pub fn new(cli: Cli) -> Self {
        let progress_manager = cli.should_show_progress().then(ProgressManager::new);

        Self {
            cli,
            progress_manager,
        }
    }

    /// Process files according to CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if target validation or file processing fails
    pub fn process(&mut self) -> Result<()> {
        self.cli.params().validate()?;
        let files = self.collect_files()?;

        if files.is_empty() {
            log::info!("Nothing to process in {}", self.cli.target.display());
            return Ok(());
        }

        if let Some(ref mut pm) = self.progress_manager {
            pm.initialize(files.len());
        }

        for (index, file) in files.iter().enumerate() {
            self.process_file(file, index)?;
        }

        if let Some(ref mut pm) = self.progress_manager {
            pm.finish();
        }

        Ok(())
    }

    /// Check whether a path has one of the accepted image extensions
    pub fn is_supported_image(path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| {
                INPUT_EXTENSIONS
                    .iter()
                    .any(|accepted| ext.eq_ignore_ascii_case(accepted))
            })
    }

    /// Input files selected by the target argument, sorted by path
    ///
    /// # Errors
    ///
    /// Returns an error if the target is neither a supported image nor a
    /// readable directory
    pub fn collect_files(&self) -> Result<Vec<PathBuf>> {
        let target = &self.cli.target;

        if target.is_file() {
            if !Self::is_supported_image(target) {
                return Err(target_error(target, "Target file must be a PNG or JPEG image"));
            }
            Ok(if self.should_process_file(target) {
                vec![target.clone()]
            } else {
                vec![]
            })
        } else if target.is_dir() {
            let mut files = Vec::new();
            for entry in std::fs::read_dir(target)? {
                let path = entry?.path();
                if Self::is_supported_image(&path)
                    && !Self::is_generated_output(&path)
                    && self.should_process_file(&path)
                {
                    files.push(path);
                }
            }
            files.sort();
            Ok(files)
        } else {
            Err(target_error(
                target,
                "Target must be a PNG/JPEG file or directory",
            ))
        }
    }

    // Outputs of earlier runs share the directory with their sources
    fn is_generated_output(path: &Path) -> bool {
        let stem = path.file_stem().unwrap_or_default().to_string_lossy();
        stem.ends_with(OUTLINE_SUFFIX) || stem.ends_with(COLORS_SUFFIX) || stem.contains(LAYER_SUFFIX)
    }

    fn should_process_file(&self, input_path: &Path) -> bool {
        if !self.cli.skip_existing() {
            return true;
        }

        let output_path = Self::get_output_path(input_path, OUTLINE_SUFFIX, "png");
        if output_path.exists() {
            // Allow print for user feedback for progress messages
            #[allow(clippy::print_stderr)]
            if !self.cli.quiet {
                eprintln!("Skipping: {} (output exists)", input_path.display());
            }
            false
        } else {
            true
        }
    }

    fn process_file(&mut self, input_path: &Path, index: usize) -> Result<()> {
        let start_time = Instant::now();
        let params = self.cli.params();

        if let Some(ref mut pm) = self.progress_manager {
            pm.start_file(index, input_path);
        }

        let (pixels, width, height) = load_rgba(input_path, params.max_pixels)?;
        log::info!(
            "Processing {} at {width}x{height}",
            input_path.display()
        );

        let mut progress = self.progress_manager.as_mut();
        let output = Pipeline::new(params.clone())
            .with_progress(|diagnostic| {
                if let Some(pm) = progress.as_deref_mut() {
                    pm.update_stage(index, diagnostic.stage);
                }
            })
            .run(&pixels, width, height)?;

        Self::export_outputs(input_path, &output, &params)?;

        if let Some(ref mut pm) = self.progress_manager {
            pm.complete_file(index, start_time.elapsed());
        }

        Ok(())
    }

    fn export_outputs(
        input_path: &Path,
        output: &PipelineOutput,
        params: &PipelineParams,
    ) -> Result<()> {
        export_grid_as_png(
            &output.outline,
            &output.outline_markers,
            &Self::get_output_path(input_path, OUTLINE_SUFFIX, "png"),
        )?;
        export_grid_as_png(
            &output.segmented,
            &output.markers,
            &Self::get_output_path(input_path, COLORS_SUFFIX, "png"),
        )?;
        write_legend(
            output,
            &Self::get_output_path(input_path, LEGEND_SUFFIX, "txt"),
        )?;

        for layer in &output.layers {
            let entries = output
                .regions
                .iter()
                .filter(|entry| entry.region_index == layer.region_index)
                .cloned()
                .collect::<Vec<_>>();
            let markers = place_labels(&entries, params.label_rgba(), params.alternative_label_on);
            let suffix = format!("{LAYER_SUFFIX}{}", layer.region_index);
            export_grid_as_png(
                &layer.grid,
                &markers,
                &Self::get_output_path(input_path, &suffix, "png"),
            )?;
        }

        Ok(())
    }

    /// Path of an output file next to `input_path`: `<stem><suffix>.<extension>`
    pub fn get_output_path(input_path: &Path, suffix: &str, extension: &str) -> PathBuf {
        let stem = input_path.file_stem().unwrap_or_default();
        let output_name = format!("{}{suffix}.{extension}", stem.to_string_lossy());

        if let Some(parent) = input_path.parent() {
            parent.join(output_name)
        } else {
            PathBuf::from(output_name)
        }
    }
}
