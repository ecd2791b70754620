//! Column normalization
//!
//! Binds raw table headers to canonical columns through the ordered alias
//! table; the first alias present in the header row wins per column. Missing
//! required columns are a warning, never an abort - the affected report
//! sections degrade to placeholders downstream.

use std::collections::{BTreeMap, BTreeSet};
use tracing::warn;

use threatlog_core::{source_aliases, Column};

use crate::loader::{Cell, RawTable};

/// A row after renaming: cells keyed by canonical column. Only bound,
/// non-empty cells are kept.
#[derive(Debug, Clone, Default)]
pub struct NormalizedRow {
    cells: BTreeMap<Column, Cell>,
}

impl NormalizedRow {
    pub fn insert(&mut self, column: Column, cell: Cell) {
        self.cells.insert(column, cell);
    }

    pub fn cell(&self, column: Column) -> Option<&Cell> {
        self.cells.get(&column)
    }

    /// Trimmed, stringified value of a cell.
    pub fn text(&self, column: Column) -> Option<String> {
        self.cell(column).and_then(Cell::to_display)
    }
}

/// The renamed table: bound canonical columns plus the rows.
#[derive(Debug, Clone)]
pub struct NormalizedTable {
    pub columns: BTreeSet<Column>,
    pub rows: Vec<NormalizedRow>,
}

/// Apply the rename map and report missing required columns.
pub fn normalize(raw: RawTable) -> NormalizedTable {
    let mut bindings: BTreeMap<Column, usize> = BTreeMap::new();
    for (alias, column) in source_aliases() {
        if bindings.contains_key(column) {
            continue;
        }
        if let Some(index) = raw.headers.iter().position(|h| h.trim() == *alias) {
            bindings.insert(*column, index);
        }
    }

    let columns: BTreeSet<Column> = bindings.keys().copied().collect();

    let missing: Vec<&str> = Column::REQUIRED
        .iter()
        .filter(|c| !columns.contains(c))
        .map(|c| c.canonical_name())
        .collect();
    if !missing.is_empty() {
        warn!(
            "input is missing expected columns: {}; the affected sections will be degraded",
            missing.join(", ")
        );
    }

    let rows = raw
        .rows
        .into_iter()
        .map(|cells| {
            let mut row = NormalizedRow::default();
            for (&column, &index) in &bindings {
                if let Some(cell) = cells.get(index) {
                    if !cell.is_empty() {
                        row.insert(column, cell.clone());
                    }
                }
            }
            row
        })
        .collect();

    NormalizedTable { columns, rows }
}
