//! Input adapters - parse tabular log exports into a raw table
//!
//! A small registry of format adapters, keyed on the file extension:
//! - **CSV** - comma-separated exports, text cells
//! - **Spreadsheet** - .xls/.xlsx workbooks, typed cells
//!
//! Adapters produce a [`RawTable`] of untyped [`Cell`]s; column renaming and
//! type coercion happen downstream.

pub mod csv;
pub mod spreadsheet;

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use std::path::Path;

use crate::error::CompileError;

/// One cell of the raw input table.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Number(f64),
    Timestamp(DateTime<Utc>),
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Stringified value, `None` for empty cells. Whole numbers drop the
    /// fractional part so spreadsheet-typed ports render as "443", not
    /// "443.0".
    pub fn to_display(&self) -> Option<String> {
        match self {
            Cell::Empty => None,
            Cell::Text(s) => {
                let trimmed = s.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_string())
            }
            Cell::Number(n) => Some(if n.fract() == 0.0 && n.abs() < 1e15 {
                format!("{}", *n as i64)
            } else {
                n.to_string()
            }),
            Cell::Timestamp(ts) => Some(ts.format("%Y-%m-%d %H:%M:%S").to_string()),
        }
    }

    /// Coerce to a timestamp; `None` when the cell cannot be one.
    pub fn to_timestamp(&self) -> Option<DateTime<Utc>> {
        match self {
            Cell::Timestamp(ts) => Some(*ts),
            Cell::Text(s) => parse_timestamp(s),
            Cell::Number(n) if n.is_finite() => {
                let secs = *n as i64;
                if secs > 1_000_000_000_000 {
                    Utc.timestamp_millis_opt(secs).single()
                } else {
                    Utc.timestamp_opt(secs, 0).single()
                }
            }
            _ => None,
        }
    }

    /// Coerce to an event weight. Unparseable cells count as 1, and parsed
    /// values are floored at 1 (every record carries at least one
    /// occurrence).
    pub fn to_count(&self) -> u64 {
        let parsed = match self {
            Cell::Number(n) => Some(*n),
            Cell::Text(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        };
        match parsed {
            Some(n) if n.is_finite() && n >= 1.0 => n.round() as u64,
            _ => 1,
        }
    }
}

/// Header row plus untyped data rows, straight out of an adapter.
#[derive(Debug, Clone)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

/// Adapter trait for tabular input files.
pub trait TableSource {
    /// Adapter name for logging
    fn name(&self) -> &'static str;

    /// Check if this adapter can handle the given file
    fn can_handle(&self, path: &Path) -> bool;

    /// Parse the file into a raw table
    fn load(&self, path: &Path) -> Result<RawTable, CompileError>;
}

/// Registry of all available input adapters.
pub struct SourceRegistry {
    sources: Vec<Box<dyn TableSource>>,
}

impl Default for SourceRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl SourceRegistry {
    pub fn new() -> Self {
        Self {
            sources: vec![
                Box::new(csv::CsvSource::new()),
                Box::new(spreadsheet::SpreadsheetSource::new()),
            ],
        }
    }

    /// Find the adapter that claims the file.
    pub fn find_source(&self, path: &Path) -> Option<&dyn TableSource> {
        self.sources
            .iter()
            .find(|s| s.can_handle(path))
            .map(|s| s.as_ref())
    }

    /// Parse the file with the first matching adapter.
    pub fn load(&self, path: &Path) -> Result<RawTable, CompileError> {
        let source = self
            .find_source(path)
            .ok_or_else(|| CompileError::UnsupportedFormat(path.to_path_buf()))?;
        tracing::info!("reading {} with the {} adapter", path.display(), source.name());
        source.load(path)
    }
}

/// File extension, lowercased.
pub(crate) fn extension(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase()
}

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
];

/// Parse a timestamp string with multiple format attempts: RFC 3339 first,
/// then the common naive layouts, then unix seconds/milliseconds, then a
/// bare date.
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }

    if let Ok(ts) = s.parse::<i64>() {
        return if ts > 1_000_000_000_000 {
            Utc.timestamp_millis_opt(ts).single()
        } else {
            Utc.timestamp_opt(ts, 0).single()
        };
    }

    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0)?));
    }

    None
}
