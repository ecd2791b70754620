//! Compile pipeline
//!
//! One pass, four stages in order:
//!
//! ```text
//!   input file -> Loader/Normalizer -> Cleaner -> Aggregator -> Renderer -> output PDF
//! ```
//!
//! The table moves through the stages by value; there is no shared state and
//! nothing persists between runs. Rendering happens fully in memory and the
//! output file is written exactly once at the end of a successful run.

use chrono::Utc;
use tracing::info;

use crate::clean::clean;
use crate::config::ReportConfig;
use crate::error::CompileError;
use crate::loader::SourceRegistry;
use crate::normalize::normalize;
use crate::pdf::PdfRenderer;
use crate::report::{build_report, ReportDoc};

/// Load, normalize, clean and build the document model. Everything up to
/// (but not including) rasterization, so this path is testable without
/// fonts.
pub fn compile_report(config: &ReportConfig) -> Result<ReportDoc, CompileError> {
    if !config.input_path.exists() {
        return Err(CompileError::MissingInput(config.input_path.clone()));
    }

    let raw = SourceRegistry::new().load(&config.input_path)?;
    info!(
        "loaded {} rows with {} columns",
        raw.rows.len(),
        raw.headers.len()
    );

    let normalized = normalize(raw);
    let (cleaned, _stats) = clean(normalized);

    Ok(build_report(&cleaned, config, Utc::now()))
}

/// Full run: compile, render to bytes, write the output file once.
pub fn run(config: &ReportConfig) -> Result<(), CompileError> {
    let document = compile_report(config)?;

    info!("rendering {} sections to PDF", document.sections.len());
    let bytes = PdfRenderer::new().render(&document)?;

    std::fs::write(&config.output_path, &bytes)?;
    info!(
        "report written to {} ({} bytes)",
        config.output_path.display(),
        bytes.len()
    );
    Ok(())
}
