//! threatlog-compiler entry point
//!
//! Batch run: read the configured log export, compile the analysis report,
//! write the PDF. Progress and diagnostics go to standard output; the
//! process itself always exits cleanly - a failed run is reported, not
//! signalled through the exit status.

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::error;

use threatlog_compiler::{logging, pipeline, ReportConfig};

#[derive(Debug, Parser)]
#[command(
    name = "threatlog-compiler",
    about = "Compile a threat log export into a PDF analysis report"
)]
struct Cli {
    /// Configuration file (YAML or JSON)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Input log export (.csv, .xls or .xlsx); overrides the config value
    #[arg(long)]
    input: Option<PathBuf>,

    /// Output PDF path; overrides the config value
    #[arg(long)]
    output: Option<PathBuf>,
}

fn main() -> ExitCode {
    logging::init_logging();
    let cli = Cli::parse();

    let mut config = match cli.config.as_deref().map(ReportConfig::from_file) {
        Some(Ok(config)) => config,
        Some(Err(err)) => {
            error!("{}", err);
            return ExitCode::SUCCESS;
        }
        None => ReportConfig::default(),
    };
    if let Some(input) = cli.input {
        config.input_path = input;
    }
    if let Some(output) = cli.output {
        config.output_path = output;
    }

    if let Err(err) = pipeline::run(&config) {
        error!("report generation failed: {}", err);
    }

    ExitCode::SUCCESS
}
