//! Algorithm constants and runtime configuration defaults

// Particle cleanup
/// Extra classification attempts allowed per pixel while repaints keep happening
pub const MAX_REMOVALS: usize = 5;

/// Color standing in for out-of-bounds window positions in the denoise filter
pub const BACKGROUND_COLOR: [u8; 4] = [0, 0, 0, 255];

/// Rows handed to worker threads per parallel band in the denoise filter
pub const DENOISE_BAND_ROWS: usize = 32;

// Region labeling
/// Precision handed to the pole-of-inaccessibility solver for label points
pub const POI_PRECISION: f64 = 0.1;

/// Upper bound on boundary trace steps per mask pixel
pub const TRACE_STEPS_PER_PIXEL: usize = 8;

// Edge rendering and labels
/// Color of edges and of the image frame
pub const EDGE_COLOR: [u8; 4] = [0, 0, 0, 255];
/// Fill color for non-edge pixels in outline mode
pub const OUTLINE_FILL_COLOR: [u8; 4] = [255, 255, 255, 255];
/// Marker color for label points that miss their component
pub const DEFAULT_MARKER_COLOR: [u8; 4] = [0, 0, 0, 255];
/// Label font size when size-proportional labels are off
pub const DEFAULT_FONT_SIZE: u32 = 8;
/// Smallest font size for size-proportional labels
pub const MIN_FONT_SIZE: u32 = 8;
/// Largest font size for size-proportional labels
pub const MAX_FONT_SIZE: u32 = 12;
/// Font size per component pixel for size-proportional labels
pub const FONT_SIZE_PER_PIXEL: f64 = 0.05;
/// Horizontal shift from label point to marker anchor
pub const MARKER_OFFSET_X: f64 = 2.0;
/// Vertical shift from label point to marker anchor
pub const MARKER_OFFSET_Y: f64 = 4.0;

// Default values for configurable parameters
/// Default pixel budget for the resized source image
pub const DEFAULT_MAX_PIXELS: usize = 1_000_000;
/// Default k-means iteration cap
pub const DEFAULT_MAX_ITERATIONS: usize = 50;
/// Default palette size
pub const DEFAULT_K_COLORS: usize = 16;
/// Default denoise window side
pub const DEFAULT_SLIDING_SIZE: usize = 3;
/// Default particle size threshold
pub const DEFAULT_SIZE_LIMIT: usize = 25;
/// Default marker color for labels inside their region
pub const DEFAULT_LABEL_COLOR: [u8; 3] = [0, 0, 0];

// Output settings
/// Suffix for the numbered outline image
pub const OUTLINE_SUFFIX: &str = "_pbn";
/// Suffix for the cleaned palette image
pub const COLORS_SUFFIX: &str = "_colors";
/// Suffix for the palette and label legend
pub const LEGEND_SUFFIX: &str = "_legend";
/// Suffix prefix for isolated region layers
pub const LAYER_SUFFIX: &str = "_layer_";
/// Input extensions picked up when the target is a directory
pub const INPUT_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

// Progress bar display settings
/// Threshold for switching to batch progress mode
pub const MAX_INDIVIDUAL_PROGRESS_BARS: usize = 5;
/// Number of pipeline stages reported to progress bars
pub const STAGE_COUNT: usize = 5;
