/// Error taxonomy for the report compiler
///
/// Missing input aborts the run; everything else that reaches this type is a
/// processing error reported at the binary's top level. Column and cell
/// problems never become errors (they degrade or coerce instead).
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CompileError {
    #[error("input file not found: {0}")]
    MissingInput(PathBuf),

    #[error("no input adapter can read {0}")]
    UnsupportedFormat(PathBuf),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("csv parse error: {0}")]
    Csv(#[from] csv::Error),

    #[error("spreadsheet parse error: {0}")]
    Spreadsheet(#[from] calamine::Error),

    #[error("config error: {0}")]
    Config(String),

    #[error("chart render failed: {0}")]
    Chart(String),

    #[error("document render failed: {0}")]
    Pdf(String),
}
