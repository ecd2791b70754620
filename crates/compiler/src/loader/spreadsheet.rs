//! Spreadsheet adapter (.xls / .xlsx workbooks)
//!
//! Reads the first worksheet. Spreadsheet cells arrive typed, so dates and
//! numbers survive without a round-trip through strings.

use calamine::{open_workbook_auto, Data, Reader};
use chrono::{TimeZone, Utc};
use std::path::Path;

use crate::error::CompileError;
use crate::loader::{extension, parse_timestamp, Cell, RawTable, TableSource};

pub struct SpreadsheetSource;

impl SpreadsheetSource {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SpreadsheetSource {
    fn default() -> Self {
        Self::new()
    }
}

impl TableSource for SpreadsheetSource {
    fn name(&self) -> &'static str {
        "spreadsheet"
    }

    fn can_handle(&self, path: &Path) -> bool {
        matches!(extension(path).as_str(), "xls" | "xlsx" | "xlsm" | "xlsb" | "ods")
    }

    fn load(&self, path: &Path) -> Result<RawTable, CompileError> {
        let mut workbook = open_workbook_auto(path)?;
        let sheet = workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or(calamine::Error::Msg("workbook has no worksheets"))?;
        let range = workbook.worksheet_range(&sheet)?;

        let mut rows_iter = range.rows();
        let headers: Vec<String> = rows_iter
            .next()
            .map(|row| row.iter().map(header_text).collect())
            .unwrap_or_default();

        let rows: Vec<Vec<Cell>> = rows_iter
            .map(|row| row.iter().map(convert_cell).collect())
            .collect();

        Ok(RawTable { headers, rows })
    }
}

fn header_text(data: &Data) -> String {
    match data {
        Data::String(s) => s.trim().to_string(),
        other => other.to_string().trim().to_string(),
    }
}

fn convert_cell(data: &Data) -> Cell {
    match data {
        Data::Empty | Data::Error(_) => Cell::Empty,
        Data::String(s) => {
            if s.trim().is_empty() {
                Cell::Empty
            } else {
                Cell::Text(s.clone())
            }
        }
        Data::Float(f) => Cell::Number(*f),
        Data::Int(i) => Cell::Number(*i as f64),
        Data::Bool(b) => Cell::Text(b.to_string()),
        Data::DateTime(dt) => dt
            .as_datetime()
            .map(|naive| Cell::Timestamp(Utc.from_utc_datetime(&naive)))
            .unwrap_or(Cell::Empty),
        Data::DateTimeIso(s) => parse_timestamp(s)
            .map(Cell::Timestamp)
            .unwrap_or_else(|| Cell::Text(s.clone())),
        Data::DurationIso(s) => Cell::Text(s.clone()),
    }
}
