//! CSV adapter

use std::path::Path;

use crate::error::CompileError;
use crate::loader::{extension, Cell, RawTable, TableSource};

pub struct CsvSource;

impl CsvSource {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CsvSource {
    fn default() -> Self {
        Self::new()
    }
}

impl TableSource for CsvSource {
    fn name(&self) -> &'static str {
        "csv"
    }

    fn can_handle(&self, path: &Path) -> bool {
        extension(path) == "csv"
    }

    fn load(&self, path: &Path) -> Result<RawTable, CompileError> {
        let mut reader = ::csv::ReaderBuilder::new()
            .flexible(true)
            .from_path(path)?;

        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        let mut rows = Vec::new();
        for result in reader.records() {
            let record = result?;
            let cells: Vec<Cell> = record
                .iter()
                .map(|value| {
                    if value.trim().is_empty() {
                        Cell::Empty
                    } else {
                        Cell::Text(value.to_string())
                    }
                })
                .collect();
            rows.push(cells);
        }

        Ok(RawTable { headers, rows })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_simple_csv() {
        let mut file = tempfile::NamedTempFile::with_suffix(".csv").unwrap();
        writeln!(file, "时间,威胁类型,次数").unwrap();
        writeln!(file, "2024-05-01 10:00:00,scan,3").unwrap();
        writeln!(file, "2024-05-01 11:00:00,virus,").unwrap();
        file.flush().unwrap();

        let table = CsvSource::new().load(file.path()).unwrap();
        assert_eq!(table.headers, vec!["时间", "威胁类型", "次数"]);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0][1], Cell::Text("scan".to_string()));
        assert_eq!(table.rows[1][2], Cell::Empty);
    }

    #[test]
    fn test_load_ragged_rows() {
        let mut file = tempfile::NamedTempFile::with_suffix(".csv").unwrap();
        writeln!(file, "时间,威胁类型,次数").unwrap();
        writeln!(file, "2024-05-01 10:00:00,scan").unwrap();
        file.flush().unwrap();

        let table = CsvSource::new().load(file.path()).unwrap();
        assert_eq!(table.rows[0].len(), 2);
    }
}
