//! Threat log report compiler
//!
//! Compiles a tabular security-event export (CSV or XLS/XLSX) into a PDF
//! analysis report: per-dimension counts and shares, top-N rankings, bar and
//! pie charts, sample events and a recommendations section.
//!
//! Stages, in order:
//! - [`loader`] + [`normalize`] - read the file, rename source headers to
//!   canonical columns
//! - [`clean`] - coerce timestamps and counts, drop meaningless rows, sort
//! - `threatlog_core::aggregate` - counts, shares, rankings
//! - [`report`] + [`charts`] + [`pdf`] - build the document model and render
//!   it

pub mod charts;
pub mod clean;
pub mod config;
pub mod error;
pub mod loader;
pub mod logging;
pub mod normalize;
pub mod pdf;
pub mod pipeline;
pub mod report;

pub use config::ReportConfig;
pub use error::CompileError;
pub use pipeline::{compile_report, run};
pub use report::{Block, ChartBlock, ChartKind, ReportDoc, Section, TableBlock};
