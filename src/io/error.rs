//! Error types for pipeline runs and the file front end

use std::fmt;
use std::path::PathBuf;

/// Main error type for all pipeline operations
#[derive(Debug)]
pub enum PipelineError {
    /// A required parameter is missing, empty or out of range
    InvalidParameters {
        /// Name of the invalid parameter
        parameter: &'static str,
        /// Provided value that failed validation
        value: String,
        /// Explanation of why the value is invalid
        reason: String,
    },

    /// The input grid has zero area
    EmptyInput {
        /// Supplied width in pixels
        width: usize,
        /// Supplied height in pixels
        height: usize,
    },

    /// The caller asked the run to stop
    CancellationRequested {
        /// Stage that observed the cancellation signal
        stage: &'static str,
    },

    /// Every pure gray `[v, v, v, 255]` with `v < 255` already occurs in the image
    ///
    /// Isolated region layers need one unused gray as their background.
    BackgroundExhausted,

    /// Failed to load a source image from the filesystem
    ImageLoad {
        /// Path to the image file
        path: PathBuf,
        /// Underlying image loading error
        source: image::ImageError,
    },

    /// Failed to save a rendered image to disk
    ImageExport {
        /// Path where export was attempted
        path: PathBuf,
        /// Underlying image export error
        source: image::ImageError,
    },

    /// General file system operation failure
    FileSystem {
        /// Path involved in the operation
        path: PathBuf,
        /// Description of the operation that failed
        operation: &'static str,
        /// Underlying I/O error
        source: std::io::Error,
    },
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidParameters {
                parameter,
                value,
                reason,
            } => {
                write!(f, "Invalid parameter '{parameter}' = '{value}': {reason}")
            }
            Self::EmptyInput { width, height } => {
                write!(f, "Input image is empty ({width}x{height})")
            }
            Self::CancellationRequested { stage } => {
                write!(f, "Cancellation requested during {stage}")
            }
            Self::BackgroundExhausted => {
                write!(
                    f,
                    "No unused gray is left to serve as the isolated layer background"
                )
            }
            Self::ImageLoad { path, source } => {
                write!(f, "Failed to load image '{}': {source}", path.display())
            }
            Self::ImageExport { path, source } => {
                write!(
                    f,
                    "Failed to export image to '{}': {source}",
                    path.display()
                )
            }
            Self::FileSystem {
                path,
                operation,
                source,
            } => {
                write!(
                    f,
                    "File system error during {operation} on '{}': {source}",
                    path.display()
                )
            }
        }
    }
}

impl std::error::Error for PipelineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ImageLoad { source, .. } | Self::ImageExport { source, .. } => Some(source),
            Self::FileSystem { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl PipelineError {
    /// Short machine-readable name of the error kind
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::InvalidParameters { .. } => "InvalidParameters",
            Self::EmptyInput { .. } => "EmptyInput",
            Self::CancellationRequested { .. } => "CancellationRequested",
            Self::BackgroundExhausted => "BackgroundExhausted",
            Self::ImageLoad { .. } => "ImageLoad",
            Self::ImageExport { .. } => "ImageExport",
            Self::FileSystem { .. } => "FileSystem",
        }
    }
}

/// Convenience type alias for pipeline results
pub type Result<T> = std::result::Result<T, PipelineError>;

impl From<std::io::Error> for PipelineError {
    fn from(err: std::io::Error) -> Self {
        Self::FileSystem {
            path: PathBuf::from("<unknown>"),
            operation: "unknown",
            source: err,
        }
    }
}

/// Create an invalid parameter error
pub fn invalid_parameter(
    parameter: &'static str,
    value: &impl ToString,
    reason: &impl ToString,
) -> PipelineError {
    PipelineError::InvalidParameters {
        parameter,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Create a file system error for a path that is not usable as a target
pub fn target_error(path: impl Into<PathBuf>, reason: &str) -> PipelineError {
    PipelineError::FileSystem {
        path: path.into(),
        operation: "target validation",
        source: std::io::Error::new(std::io::ErrorKind::InvalidInput, reason.to_string()),
    }
}

/// Create an error for a log specification the logger rejected
pub fn logging_error(err: &impl fmt::Display) -> PipelineError {
    PipelineError::InvalidParameters {
        parameter: "log_spec",
        value: std::env::var("RUST_LOG").unwrap_or_default(),
        reason: err.to_string(),
    }
}
