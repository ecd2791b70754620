use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::Column;

/// One normalized log entry.
///
/// Every field that can be absent from an export is an explicit `Option`;
/// there are no sentinel values. `count` is the weight the entry carries in
/// aggregates and is always at least 1.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EventRecord {
    pub time: Option<DateTime<Utc>>,
    pub threat_type: Option<String>,
    pub severity: Option<String>,
    pub threat_name: Option<String>,
    pub count: u64,

    pub source_zone: Option<String>,
    pub dest_zone: Option<String>,
    pub attacker: Option<String>,
    pub target: Option<String>,
    pub source_port: Option<String>,
    pub source_region: Option<String>,
    pub dest_port: Option<String>,
    pub dest_region: Option<String>,
    pub application: Option<String>,
    pub protocol: Option<String>,
    pub action: Option<String>,
}

impl Default for EventRecord {
    fn default() -> Self {
        Self {
            time: None,
            threat_type: None,
            severity: None,
            threat_name: None,
            count: 1,
            source_zone: None,
            dest_zone: None,
            attacker: None,
            target: None,
            source_port: None,
            source_region: None,
            dest_port: None,
            dest_region: None,
            application: None,
            protocol: None,
            action: None,
        }
    }
}

impl EventRecord {
    /// The record's value for a string-valued canonical column.
    ///
    /// `Time` and `Count` are not string-valued and return `None`; use
    /// [`EventRecord::display_field`] when rendering those.
    pub fn field(&self, column: Column) -> Option<&str> {
        match column {
            Column::ThreatType => self.threat_type.as_deref(),
            Column::Severity => self.severity.as_deref(),
            Column::ThreatName => self.threat_name.as_deref(),
            Column::SourceZone => self.source_zone.as_deref(),
            Column::DestZone => self.dest_zone.as_deref(),
            Column::Attacker => self.attacker.as_deref(),
            Column::Target => self.target.as_deref(),
            Column::SourcePort => self.source_port.as_deref(),
            Column::SourceRegion => self.source_region.as_deref(),
            Column::DestPort => self.dest_port.as_deref(),
            Column::DestRegion => self.dest_region.as_deref(),
            Column::Application => self.application.as_deref(),
            Column::Protocol => self.protocol.as_deref(),
            Column::Action => self.action.as_deref(),
            Column::Time | Column::Count => None,
        }
    }

    /// Stringified value for any canonical column, for sample-event listings.
    pub fn display_field(&self, column: Column) -> Option<String> {
        match column {
            Column::Time => self
                .time
                .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string()),
            Column::Count => Some(self.count.to_string()),
            other => self.field(other).map(str::to_string),
        }
    }
}

/// The cleaned event table handed to the aggregator.
///
/// Invariant: every record has a parsed `time` and a non-empty,
/// non-placeholder `threat_type`. Rows are sorted ascending by time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CleanedTable {
    columns: BTreeSet<Column>,
    records: Vec<EventRecord>,
}

impl CleanedTable {
    pub fn new(columns: BTreeSet<Column>, records: Vec<EventRecord>) -> Self {
        debug_assert!(records.iter().all(|r| r.time.is_some()));
        debug_assert!(records
            .iter()
            .all(|r| r.threat_type.as_deref().is_some_and(|t| !t.trim().is_empty())));
        Self { columns, records }
    }

    pub fn records(&self) -> &[EventRecord] {
        &self.records
    }

    /// Whether the canonical column was bound during normalization.
    pub fn has_column(&self, column: Column) -> bool {
        self.columns.contains(&column)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
