/// Command-line parsing and batch file processing
pub mod cli;
/// Algorithm constants and configuration defaults
pub mod configuration;
/// Error types and result alias
pub mod error;
/// Bitmap digits for stamping label numbers
pub mod glyphs;
/// Image decoding, resizing and PNG export
pub mod image;
/// Plain-text palette and label legend
pub mod legend;
/// Progress bars for multi-file runs
pub mod progress;
