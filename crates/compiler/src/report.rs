//! Report document model and builder
//!
//! The builder turns the cleaned table into an explicit document model:
//! an ordered list of sections, each owning paragraphs, at most one table
//! and at most one chart spec. Building is pure given the table, the
//! configuration and the generation timestamp, so the same input always
//! yields the same document. The PDF backend consumes the model without
//! looking back at the table.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use threatlog_core::{
    coverage, notable_events, top_n, value_counts, AggregateRow, CleanedTable, Column,
};

use crate::config::ReportConfig;

pub const REPORT_TITLE: &str = "Security Threat Log Analysis Report";

/// Display width of embedded charts, in inches.
pub const BAR_DISPLAY_WIDTH_IN: f64 = 6.0;
pub const PIE_DISPLAY_WIDTH_IN: f64 = 4.0;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    Bar,
    Pie,
}

/// Data-only chart description; the PDF backend renders it to a PNG.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChartBlock {
    pub kind: ChartKind,
    pub title: String,
    pub entries: Vec<AggregateRow>,
    pub display_width_in: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TableBlock {
    pub caption: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Block {
    Paragraph(String),
    Subheading(String),
    Table(TableBlock),
    Chart(ChartBlock),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Section {
    pub heading: String,
    pub blocks: Vec<Block>,
}

/// The assembled report: title, metadata block, ordered sections.
/// Built once, rendered once, never mutated after rendering.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReportDoc {
    pub title: String,
    pub meta: Vec<String>,
    pub sections: Vec<Section>,
}

/// Assemble the full document from the cleaned table.
pub fn build_report(
    table: &CleanedTable,
    config: &ReportConfig,
    generated_at: DateTime<Utc>,
) -> ReportDoc {
    let period = match coverage(table) {
        Some((start, end)) => format!("{} to {}", format_ts(start), format_ts(end)),
        None => "N/A".to_string(),
    };

    let meta = vec![
        format!("Reporting period: {}", period),
        format!("Generated: {}", generated_at.format("%Y-%m-%d %H:%M:%S UTC")),
        format!("Total records: {}", table.len()),
    ];

    let sections = vec![
        overview_section(table, &period),
        threat_type_section(table, config),
        severity_section(table),
        attack_source_section(table, config),
        target_section(table, config),
        application_protocol_section(table, config),
        action_section(table),
        threat_name_section(table, config),
        notable_events_section(table, config),
        recommendations_section(),
    ];

    ReportDoc {
        title: REPORT_TITLE.to_string(),
        meta,
        sections,
    }
}

fn format_ts(ts: DateTime<Utc>) -> String {
    ts.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Placeholder paragraph for a dimension whose column never resolved.
fn placeholder(caption: &str, column: Column) -> Block {
    Block::Paragraph(format!(
        "{}: (could not be resolved; the '{}' column is missing or empty)",
        caption,
        column.canonical_name()
    ))
}

/// Aggregate rows stringified for a grid table: value, count, share.
fn aggregate_table(caption: &str, value_label: &str, rows: &[AggregateRow]) -> Block {
    if rows.is_empty() {
        return Block::Paragraph(format!("{}: (no data)", caption));
    }
    Block::Table(TableBlock {
        caption: caption.to_string(),
        columns: vec![
            value_label.to_string(),
            "Count".to_string(),
            "Share".to_string(),
        ],
        rows: rows
            .iter()
            .map(|r| {
                vec![
                    r.value.clone(),
                    r.count.to_string(),
                    format!("{:.2}%", r.percent),
                ]
            })
            .collect(),
    })
}

fn bar_chart(title: &str, entries: Vec<AggregateRow>) -> Block {
    Block::Chart(ChartBlock {
        kind: ChartKind::Bar,
        title: title.to_string(),
        entries,
        display_width_in: BAR_DISPLAY_WIDTH_IN,
    })
}

fn pie_chart(title: &str, entries: Vec<AggregateRow>) -> Block {
    Block::Chart(ChartBlock {
        kind: ChartKind::Pie,
        title: title.to_string(),
        entries,
        display_width_in: PIE_DISPLAY_WIDTH_IN,
    })
}

/// Column present with at least one contributing row?
fn dimension_rows(table: &CleanedTable, column: Column) -> Option<Vec<AggregateRow>> {
    if !table.has_column(column) {
        return None;
    }
    let rows = value_counts(table, column);
    (!rows.is_empty()).then_some(rows)
}

fn overview_section(table: &CleanedTable, period: &str) -> Section {
    Section {
        heading: "2. Log Overview".to_string(),
        blocks: vec![
            Block::Paragraph(format!("This analysis covers log entries from {}.", period)),
            Block::Paragraph(format!(
                "{} valid security threat log records were processed.",
                table.len()
            )),
        ],
    }
}

fn threat_type_section(table: &CleanedTable, config: &ReportConfig) -> Section {
    let mut blocks = Vec::new();
    match dimension_rows(table, Column::ThreatType) {
        Some(rows) => {
            blocks.push(Block::Subheading("3.1 Threat type distribution".to_string()));
            blocks.push(bar_chart(
                &format!("Threat Type Distribution (Top {})", config.top_n),
                top_n(rows.clone(), config.top_n),
            ));
            blocks.push(aggregate_table(
                &format!("3.2 Common threat types (Top {})", config.top_n),
                Column::ThreatType.label(),
                &top_n(rows, config.top_n),
            ));
        }
        None => blocks.push(placeholder("3.1 Threat type distribution", Column::ThreatType)),
    }
    Section {
        heading: "3. Threat Type Analysis".to_string(),
        blocks,
    }
}

fn severity_section(table: &CleanedTable) -> Section {
    let mut blocks = Vec::new();
    match dimension_rows(table, Column::Severity) {
        Some(rows) => {
            blocks.push(pie_chart("Threat Severity Distribution", rows.clone()));
            blocks.push(aggregate_table(
                "4.1 Severity details",
                Column::Severity.label(),
                &rows,
            ));
        }
        None => blocks.push(placeholder("4.1 Severity distribution", Column::Severity)),
    }
    Section {
        heading: "4. Severity Analysis".to_string(),
        blocks,
    }
}

fn attack_source_section(table: &CleanedTable, config: &ReportConfig) -> Section {
    let mut blocks = Vec::new();
    match dimension_rows(table, Column::SourceRegion) {
        Some(rows) => {
            blocks.push(Block::Subheading("5.1 Source region distribution".to_string()));
            blocks.push(bar_chart(
                &format!("Source Region Distribution (Top {})", config.top_n),
                top_n(rows, config.top_n),
            ));
        }
        None => blocks.push(placeholder("5.1 Source region distribution", Column::SourceRegion)),
    }
    match dimension_rows(table, Column::Attacker) {
        Some(rows) => blocks.push(aggregate_table(
            &format!("5.2 Active attacker IPs (Top {})", config.top_n),
            "Attacker IP",
            &top_n(rows, config.top_n),
        )),
        None => blocks.push(placeholder("5.2 Active attacker IPs", Column::Attacker)),
    }
    Section {
        heading: "5. Attack Source Analysis".to_string(),
        blocks,
    }
}

fn target_section(table: &CleanedTable, config: &ReportConfig) -> Section {
    let mut blocks = Vec::new();
    match dimension_rows(table, Column::Target) {
        Some(rows) => blocks.push(aggregate_table(
            &format!("6.1 Top targets by attack count (Top {})", config.top_n),
            Column::Target.label(),
            &top_n(rows, config.top_n),
        )),
        None => blocks.push(placeholder("6.1 Top targets", Column::Target)),
    }
    Section {
        heading: "6. Attack Target Analysis".to_string(),
        blocks,
    }
}

fn application_protocol_section(table: &CleanedTable, config: &ReportConfig) -> Section {
    let mut blocks = Vec::new();
    match dimension_rows(table, Column::Application) {
        Some(rows) => blocks.push(aggregate_table(
            &format!("7.1 Common applications (Top {})", config.top_n),
            Column::Application.label(),
            &top_n(rows, config.top_n),
        )),
        None => blocks.push(placeholder("7.1 Common applications", Column::Application)),
    }
    match dimension_rows(table, Column::Protocol) {
        Some(rows) => blocks.push(aggregate_table(
            &format!("7.2 Common protocols (Top {})", config.top_n),
            Column::Protocol.label(),
            &top_n(rows, config.top_n),
        )),
        None => blocks.push(placeholder("7.2 Common protocols", Column::Protocol)),
    }
    Section {
        heading: "7. Application & Protocol Analysis".to_string(),
        blocks,
    }
}

fn action_section(table: &CleanedTable) -> Section {
    let mut blocks = Vec::new();
    match dimension_rows(table, Column::Action) {
        Some(rows) => {
            blocks.push(pie_chart("Security Action Distribution", rows.clone()));
            blocks.push(aggregate_table(
                "8.1 Action details",
                Column::Action.label(),
                &rows,
            ));
        }
        None => blocks.push(placeholder("8.1 Action distribution", Column::Action)),
    }
    Section {
        heading: "8. Action Analysis".to_string(),
        blocks,
    }
}

fn threat_name_section(table: &CleanedTable, config: &ReportConfig) -> Section {
    let mut blocks = Vec::new();
    match dimension_rows(table, Column::ThreatName) {
        Some(rows) => blocks.push(aggregate_table(
            &format!("9.1 Most common threat names (Top {})", config.top_n),
            Column::ThreatName.label(),
            &top_n(rows, config.top_n),
        )),
        None => blocks.push(placeholder("9.1 Most common threat names", Column::ThreatName)),
    }
    Section {
        heading: "9. Threat Name Analysis".to_string(),
        blocks,
    }
}

fn notable_events_section(table: &CleanedTable, config: &ReportConfig) -> Section {
    let samples = notable_events(table, config.sample_events);
    let mut blocks = Vec::new();

    if samples.is_empty() {
        blocks.push(Block::Paragraph("(no sample events to show)".to_string()));
    }

    for (index, event) in samples.iter().enumerate() {
        blocks.push(Block::Subheading(format!("10.{} Sample Event", index + 1)));
        blocks.push(Block::Paragraph(format!(
            "- Time: {}",
            event.display_field(Column::Time).unwrap_or_else(|| "N/A".to_string())
        )));
        for &column in Column::SAMPLE_FIELDS {
            if let Some(value) = event.display_field(column) {
                blocks.push(Block::Paragraph(format!("- {}: {}", column.label(), value)));
            }
        }
    }

    Section {
        heading: "10. Notable Event Examples".to_string(),
        blocks,
    }
}

/// Static template content; not derived from the data.
fn recommendations_section() -> Section {
    let blocks = vec![
        Block::Subheading("11.1 Overall security posture".to_string()),
        Block::Paragraph(
            "During this period, [e.g. frequent scanning activity from specific regions was \
             observed, alongside high-severity virus/trojan attacks]. The overall risk \
             concentrates on [e.g. attacks against exposed servers and latent threats inside \
             the internal network]."
                .to_string(),
        ),
        Block::Subheading("11.2 Key risks identified".to_string()),
        Block::Paragraph(
            "- [Risk 1: e.g. large-scale external probing, possibly staging later attacks]"
                .to_string(),
        ),
        Block::Paragraph(
            "- [Risk 2: e.g. high-severity threats (such as xxx) endangering key assets]"
                .to_string(),
        ),
        Block::Paragraph(
            "- [Risk 3: e.g. phishing exposure for internal users]".to_string(),
        ),
        Block::Subheading("11.3 Recommendations".to_string()),
        Block::Paragraph(
            "- Tighten firewall policy: restrict non-essential access to high-risk ports \
             ([e.g. 3389, 22]), especially from untrusted zones."
                .to_string(),
        ),
        Block::Paragraph(
            "- Security awareness training: cover phishing, malware prevention and safe \
             browsing for all staff."
                .to_string(),
        ),
        Block::Paragraph(
            "- Endpoint protection: keep anti-virus/EDR agents installed and up to date on \
             every terminal device."
                .to_string(),
        ),
        Block::Paragraph(
            "- Log audit policy: review the audit settings of security devices so that key \
             events are fully recorded."
                .to_string(),
        ),
        Block::Paragraph("Thank you for reviewing.".to_string()),
    ];
    Section {
        heading: "11. Conclusions & Recommendations".to_string(),
        blocks,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::collections::BTreeSet;
    use threatlog_core::EventRecord;

    fn generated_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap()
    }

    fn record(minute: u32, threat_type: &str) -> EventRecord {
        EventRecord {
            time: Some(Utc.with_ymd_and_hms(2024, 5, 1, 9, minute, 0).unwrap()),
            threat_type: Some(threat_type.to_string()),
            ..EventRecord::default()
        }
    }

    fn table_with(columns: &[Column], records: Vec<EventRecord>) -> CleanedTable {
        CleanedTable::new(columns.iter().copied().collect::<BTreeSet<_>>(), records)
    }

    fn section<'a>(doc: &'a ReportDoc, heading_prefix: &str) -> &'a Section {
        doc.sections
            .iter()
            .find(|s| s.heading.starts_with(heading_prefix))
            .unwrap_or_else(|| panic!("no section starting with {}", heading_prefix))
    }

    fn has_placeholder(section: &Section) -> bool {
        section.blocks.iter().any(|b| {
            matches!(b, Block::Paragraph(text) if text.contains("could not be resolved"))
        })
    }

    #[test]
    fn test_all_sections_present_in_order() {
        let table = table_with(&[Column::Time, Column::ThreatType], vec![record(0, "scan")]);
        let doc = build_report(&table, &ReportConfig::default(), generated_at());
        let headings: Vec<&str> = doc.sections.iter().map(|s| s.heading.as_str()).collect();
        assert_eq!(
            headings,
            vec![
                "2. Log Overview",
                "3. Threat Type Analysis",
                "4. Severity Analysis",
                "5. Attack Source Analysis",
                "6. Attack Target Analysis",
                "7. Application & Protocol Analysis",
                "8. Action Analysis",
                "9. Threat Name Analysis",
                "10. Notable Event Examples",
                "11. Conclusions & Recommendations",
            ]
        );
    }

    #[test]
    fn test_metadata_block() {
        let table = table_with(
            &[Column::Time, Column::ThreatType],
            vec![record(0, "scan"), record(30, "virus")],
        );
        let doc = build_report(&table, &ReportConfig::default(), generated_at());
        assert_eq!(doc.title, REPORT_TITLE);
        assert_eq!(
            doc.meta[0],
            "Reporting period: 2024-05-01 09:00:00 to 2024-05-01 09:30:00"
        );
        assert_eq!(doc.meta[1], "Generated: 2024-06-01 00:00:00 UTC");
        assert_eq!(doc.meta[2], "Total records: 2");
    }

    #[test]
    fn test_empty_table_renders_placeholders_everywhere() {
        let table = table_with(&[], Vec::new());
        let doc = build_report(&table, &ReportConfig::default(), generated_at());
        assert_eq!(doc.meta[0], "Reporting period: N/A");
        for prefix in ["3.", "4.", "5.", "6.", "7.", "8.", "9."] {
            assert!(
                has_placeholder(section(&doc, prefix)),
                "section {} should be a placeholder",
                prefix
            );
        }
        let notable = section(&doc, "10.");
        assert!(notable
            .blocks
            .contains(&Block::Paragraph("(no sample events to show)".to_string())));
    }

    #[test]
    fn test_missing_severity_only_degrades_severity_section() {
        let mut rec = record(0, "scan");
        rec.action = Some("block".to_string());
        let table = table_with(
            &[Column::Time, Column::ThreatType, Column::Action],
            vec![rec],
        );
        let doc = build_report(&table, &ReportConfig::default(), generated_at());
        assert!(has_placeholder(section(&doc, "4.")));
        assert!(!has_placeholder(section(&doc, "3.")));
        assert!(!has_placeholder(section(&doc, "8.")));
    }

    #[test]
    fn test_threat_type_section_has_chart_and_table() {
        let table = table_with(
            &[Column::Time, Column::ThreatType],
            vec![record(0, "scan"), record(1, "virus"), record(2, "scan")],
        );
        let doc = build_report(&table, &ReportConfig::default(), generated_at());
        let s = section(&doc, "3.");
        let chart = s
            .blocks
            .iter()
            .find_map(|b| match b {
                Block::Chart(c) => Some(c),
                _ => None,
            })
            .expect("threat type chart");
        assert_eq!(chart.kind, ChartKind::Bar);
        assert_eq!(chart.entries[0].value, "scan");

        let table_block = s
            .blocks
            .iter()
            .find_map(|b| match b {
                Block::Table(t) => Some(t),
                _ => None,
            })
            .expect("threat type table");
        assert_eq!(table_block.columns, vec!["Threat Type", "Count", "Share"]);
        assert_eq!(table_block.rows[0], vec!["scan", "2", "66.67%"]);
    }

    #[test]
    fn test_pie_sections_use_pie_charts() {
        let mut rec = record(0, "scan");
        rec.severity = Some("高".to_string());
        rec.action = Some("block".to_string());
        let table = table_with(
            &[
                Column::Time,
                Column::ThreatType,
                Column::Severity,
                Column::Action,
            ],
            vec![rec],
        );
        let doc = build_report(&table, &ReportConfig::default(), generated_at());
        for prefix in ["4.", "8."] {
            let chart = section(&doc, prefix)
                .blocks
                .iter()
                .find_map(|b| match b {
                    Block::Chart(c) => Some(c),
                    _ => None,
                })
                .unwrap_or_else(|| panic!("no chart in section {}", prefix));
            assert_eq!(chart.kind, ChartKind::Pie);
            assert_eq!(chart.display_width_in, PIE_DISPLAY_WIDTH_IN);
        }
    }

    #[test]
    fn test_top_n_respected() {
        let records = (0..15)
            .map(|i| record(i, &format!("type-{}", i)))
            .collect();
        let table = table_with(&[Column::Time, Column::ThreatType], records);
        let doc = build_report(&table, &ReportConfig::default(), generated_at());
        let s = section(&doc, "3.");
        for block in &s.blocks {
            match block {
                Block::Chart(c) => assert_eq!(c.entries.len(), 10),
                Block::Table(t) => assert_eq!(t.rows.len(), 10),
                _ => {}
            }
        }
    }

    #[test]
    fn test_notable_events_list_present_fields_only() {
        let mut rec = record(0, "scan");
        rec.severity = Some("高".to_string());
        rec.attacker = Some("1.2.3.4".to_string());
        let table = table_with(
            &[Column::Time, Column::ThreatType, Column::Severity],
            vec![rec],
        );
        let doc = build_report(&table, &ReportConfig::default(), generated_at());
        let s = section(&doc, "10.");
        assert!(s
            .blocks
            .contains(&Block::Subheading("10.1 Sample Event".to_string())));
        assert!(s
            .blocks
            .contains(&Block::Paragraph("- Attacker: 1.2.3.4".to_string())));
        // absent fields are skipped entirely
        assert!(!s
            .blocks
            .iter()
            .any(|b| matches!(b, Block::Paragraph(p) if p.starts_with("- Protocol:"))));
    }

    #[test]
    fn test_build_is_deterministic() {
        let mut rec = record(0, "scan");
        rec.severity = Some("高".to_string());
        let table = table_with(
            &[Column::Time, Column::ThreatType, Column::Severity],
            vec![rec, record(1, "virus"), record(2, "scan")],
        );
        let config = ReportConfig::default();
        let doc1 = build_report(&table, &config, generated_at());
        let doc2 = build_report(&table, &config, generated_at());
        assert_eq!(doc1, doc2);
    }
}
