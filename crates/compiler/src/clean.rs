//! Data cleaning
//!
//! Turns the renamed table into typed event records:
//! - the time cell is coerced to a timestamp; rows that fail to parse are
//!   dropped
//! - a missing count column backfills every weight with 1; present cells are
//!   coerced with unparseable values defaulting to 1
//! - rows with a null, empty or placeholder threat type are dropped
//! - surviving rows are sorted ascending by time

use tracing::info;

use threatlog_core::{CleanedTable, Column, EventRecord};

use crate::loader::Cell;
use crate::normalize::{NormalizedRow, NormalizedTable};

/// Row accounting for the progress log.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CleanStats {
    pub rows_in: usize,
    pub dropped_time: usize,
    pub dropped_threat_type: usize,
    pub rows_out: usize,
}

/// Placeholder threat-type values that carry no analytical meaning.
fn is_placeholder(threat_type: &str) -> bool {
    threat_type == "未知" || threat_type.eq_ignore_ascii_case("unknown")
}

pub fn clean(table: NormalizedTable) -> (CleanedTable, CleanStats) {
    let mut stats = CleanStats {
        rows_in: table.rows.len(),
        ..CleanStats::default()
    };

    let mut records: Vec<EventRecord> = Vec::with_capacity(table.rows.len());
    for row in &table.rows {
        let Some(time) = row.cell(Column::Time).and_then(Cell::to_timestamp) else {
            stats.dropped_time += 1;
            continue;
        };

        let threat_type = match row.text(Column::ThreatType) {
            Some(t) if !is_placeholder(&t) => t,
            _ => {
                stats.dropped_threat_type += 1;
                continue;
            }
        };

        let count = match row.cell(Column::Count) {
            Some(cell) => cell.to_count(),
            None => 1,
        };

        records.push(EventRecord {
            time: Some(time),
            threat_type: Some(threat_type),
            severity: row.text(Column::Severity),
            threat_name: row.text(Column::ThreatName),
            count,
            source_zone: row.text(Column::SourceZone),
            dest_zone: row.text(Column::DestZone),
            attacker: row.text(Column::Attacker),
            target: row.text(Column::Target),
            source_port: row.text(Column::SourcePort),
            source_region: row.text(Column::SourceRegion),
            dest_port: row.text(Column::DestPort),
            dest_region: row.text(Column::DestRegion),
            application: row.text(Column::Application),
            protocol: row.text(Column::Protocol),
            action: row.text(Column::Action),
        });
    }

    records.sort_by_key(|r| r.time);
    stats.rows_out = records.len();

    info!(
        "cleaned {} rows: kept {}, dropped {} without a parseable time, {} without a threat type",
        stats.rows_in, stats.rows_out, stats.dropped_time, stats.dropped_threat_type
    );

    (CleanedTable::new(table.columns, records), stats)
}
