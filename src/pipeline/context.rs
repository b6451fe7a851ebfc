//! Run context shared by the stages of one pipeline run
//!
//! Collects stage-tagged diagnostics, forwards them to an optional progress
//! callback and to the `log` facade, and exposes the cancellation signal.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::io::error::{PipelineError, Result};

/// Pipeline stage that produced a diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Parameter and input validation
    Validation,
    /// K-means color quantization
    Quantize,
    /// Windowed vector-median filter
    Denoise,
    /// Island and spur removal
    Particles,
    /// Connected regions and label points
    Regions,
    /// Outline rendering
    Edges,
}

impl Stage {
    /// Stage tag used as message prefix
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Validation => "0",
            Self::Quantize => "1",
            Self::Denoise => "2",
            Self::Particles => "3",
            Self::Regions => "4",
            Self::Edges => "5",
        }
    }

    /// Position in the run, validation is 0 and edge rendering the last
    pub const fn ordinal(self) -> usize {
        match self {
            Self::Validation => 0,
            Self::Quantize => 1,
            Self::Denoise => 2,
            Self::Particles => 3,
            Self::Regions => 4,
            Self::Edges => 5,
        }
    }

    /// Human-readable stage name
    pub const fn name(self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::Quantize => "color quantization",
            Self::Denoise => "noise reduction",
            Self::Particles => "particle removal",
            Self::Regions => "region labeling",
            Self::Edges => "edge rendering",
        }
    }
}

/// Importance of a diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    /// Stage boundaries and summaries
    Info,
    /// Fine-grained progress such as finished rows
    Detail,
    /// Something was skipped or capped
    Warning,
}

/// One stage-tagged progress message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Stage that emitted the message
    pub stage: Stage,
    /// Importance of the message
    pub level: Level,
    /// Message text without the stage tag
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]: {}", self.stage.tag(), self.message)
    }
}

/// Shared flag a host sets to abandon a run
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    flag: Arc<AtomicBool>,
}

impl CancellationToken {
    /// Create a token that is not cancelled
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    /// Check whether cancellation was requested
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

/// Callback invoked with every diagnostic as it is recorded
pub type ProgressCallback<'a> = Box<dyn FnMut(&Diagnostic) + 'a>;

/// Per-run diagnostics channel and cancellation check
pub struct RunContext<'a> {
    diagnostics: Vec<Diagnostic>,
    progress: Option<ProgressCallback<'a>>,
    cancellation: Option<CancellationToken>,
}

impl Default for RunContext<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> RunContext<'a> {
    /// Context without callback or cancellation
    pub const fn new() -> Self {
        Self {
            diagnostics: Vec::new(),
            progress: None,
            cancellation: None,
        }
    }

    /// Context with optional callback and cancellation token
    pub fn with_hooks(
        progress: Option<ProgressCallback<'a>>,
        cancellation: Option<CancellationToken>,
    ) -> Self {
        Self {
            diagnostics: Vec::new(),
            progress,
            cancellation,
        }
    }

    /// Record a diagnostic at the given level
    pub fn emit(&mut self, stage: Stage, level: Level, message: impl Into<String>) {
        let diagnostic = Diagnostic {
            stage,
            level,
            message: message.into(),
        };

        match level {
            Level::Info => log::info!("{diagnostic}"),
            Level::Detail => log::debug!("{diagnostic}"),
            Level::Warning => log::warn!("{diagnostic}"),
        }

        if let Some(callback) = self.progress.as_mut() {
            callback(&diagnostic);
        }
        self.diagnostics.push(diagnostic);
    }

    /// Record an informational diagnostic
    pub fn info(&mut self, stage: Stage, message: impl Into<String>) {
        self.emit(stage, Level::Info, message);
    }

    /// Record a fine-grained progress diagnostic
    pub fn detail(&mut self, stage: Stage, message: impl Into<String>) {
        self.emit(stage, Level::Detail, message);
    }

    /// Record a warning diagnostic
    pub fn warn(&mut self, stage: Stage, message: impl Into<String>) {
        self.emit(stage, Level::Warning, message);
    }

    /// Check whether cancellation was requested
    pub fn is_cancelled(&self) -> bool {
        self.cancellation
            .as_ref()
            .is_some_and(CancellationToken::is_cancelled)
    }

    /// Fail with `CancellationRequested` if the host asked to stop
    ///
    /// # Errors
    ///
    /// Returns `CancellationRequested` tagged with the stage name
    pub fn checkpoint(&self, stage: Stage) -> Result<()> {
        if self.is_cancelled() {
            Err(PipelineError::CancellationRequested { stage: stage.name() })
        } else {
            Ok(())
        }
    }

    /// Diagnostics recorded so far
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Consume the context and return its diagnostics
    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    /// Clone of the cancellation token, for work handed to other threads
    pub fn cancellation(&self) -> Option<CancellationToken> {
        self.cancellation.clone()
    }
}
