//! CLI entry point for paint-by-number template generation

use clap::Parser;
use flexi_logger::Logger;
use paintnumber::io::cli::{Cli, FileProcessor};

fn main() -> paintnumber::Result<()> {
    let cli = Cli::parse();

    // Progress bars own stdout, so logs go to stderr only
    let _logger = Logger::try_with_env_or_str(cli.log_level())
        .and_then(|logger| logger.log_to_stderr().start())
        .map_err(|e| paintnumber::io::error::logging_error(&e))?;

    let mut processor = FileProcessor::new(cli);
    processor.process()
}
