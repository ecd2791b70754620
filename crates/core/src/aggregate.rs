//! Per-dimension aggregation over the cleaned event table
//!
//! Everything here is pure and deterministic given the table: value counts
//! with percentage shares, top-N truncation, the notable-event ranking and
//! the time coverage of the table. This is the only stage with real logic,
//! so it carries the unit-test weight.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::{CleanedTable, Column, EventRecord, SeverityClass};

/// One entry of a dimension aggregate: a distinct value, its weighted
/// occurrence count and its share of the dimension total.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AggregateRow {
    pub value: String,
    pub count: u64,
    /// Percentage of the dimension total, rounded to two decimals.
    pub percent: f64,
}

/// Weighted value counts for one column, ordered descending by count.
///
/// Rows without a value for the column do not contribute; ties keep the
/// first-encountered order (the sort is stable). Percentages are computed
/// over the contributing rows only, so they sum to 100 within rounding
/// tolerance.
pub fn value_counts(table: &CleanedTable, column: Column) -> Vec<AggregateRow> {
    let mut order: Vec<String> = Vec::new();
    let mut counts: HashMap<String, u64> = HashMap::new();

    for record in table.records() {
        let Some(value) = record.field(column) else {
            continue;
        };
        match counts.get_mut(value) {
            Some(count) => *count += record.count,
            None => {
                order.push(value.to_string());
                counts.insert(value.to_string(), record.count);
            }
        }
    }

    let total: u64 = counts.values().sum();
    if total == 0 {
        return Vec::new();
    }

    let mut rows: Vec<AggregateRow> = order
        .into_iter()
        .map(|value| {
            let count = counts[&value];
            AggregateRow {
                value,
                count,
                percent: round2(count as f64 * 100.0 / total as f64),
            }
        })
        .collect();
    rows.sort_by(|a, b| b.count.cmp(&a.count));
    rows
}

/// The first `n` entries of an aggregate.
pub fn top_n(mut rows: Vec<AggregateRow>, n: usize) -> Vec<AggregateRow> {
    rows.truncate(n);
    rows
}

/// The example events for the notable-events section.
///
/// Rows are ranked by severity class (high, medium, low, then everything
/// unrecognized), ties broken by ascending time; the first `limit` rows are
/// returned. Each row is ranked on its own label, so the ordering holds even
/// when only some severity levels occur in the table.
pub fn notable_events(table: &CleanedTable, limit: usize) -> Vec<&EventRecord> {
    let mut refs: Vec<&EventRecord> = table.records().iter().collect();
    refs.sort_by_key(|r| (SeverityClass::from_optional(r.severity.as_deref()), r.time));
    refs.truncate(limit);
    refs
}

/// Earliest and latest event time, `None` for an empty table.
pub fn coverage(table: &CleanedTable) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
    let times = table.records().iter().filter_map(|r| r.time);
    let min = times.clone().min()?;
    let max = times.max()?;
    Some((min, max))
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}
