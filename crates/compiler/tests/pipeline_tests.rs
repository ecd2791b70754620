//! End-to-end pipeline tests (no PDF rasterization)
//!
//! These run the whole compile path - CSV fixture -> loader -> normalizer ->
//! cleaner -> aggregator -> document model - and inspect the model. The
//! font-dependent render step has its own ignored smoke tests.

use std::io::Write;
use std::path::PathBuf;

use threatlog_compiler::{compile_report, Block, ChartKind, CompileError, ReportConfig};

// ============================================================================
// Fixtures
// ============================================================================

const FULL_EXPORT: &str = "\
时间,威胁类型,严重性,威胁名称,源地区,攻击者,攻击目标,应用,协议,动作,次数
2024-05-01 10:00:00,scan,低,NMAP Probe,US,198.51.100.7,10.0.0.5,web,TCP,alert,3
2024-05-01 09:00:00,virus,高,Trojan.Generic,CN,203.0.113.9,10.0.0.8,smb,TCP,block,1
2024-05-01 11:30:00,scan,低,NMAP Probe,US,198.51.100.7,10.0.0.5,web,TCP,alert,2
2024-05-01 08:15:00,worm,中,Conficker,RU,192.0.2.44,10.0.0.7,netbios,UDP,block,1
bad-timestamp,scan,低,NMAP Probe,US,198.51.100.7,10.0.0.5,web,TCP,alert,1
2024-05-01 12:00:00,未知,低,Noise,US,198.51.100.7,10.0.0.5,web,TCP,alert,1
2024-05-01 12:30:00,,低,Noise,US,198.51.100.7,10.0.0.5,web,TCP,alert,1
";

fn write_fixture(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::with_suffix(".csv").unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

fn config_for(file: &tempfile::NamedTempFile) -> ReportConfig {
    ReportConfig {
        input_path: file.path().to_path_buf(),
        ..ReportConfig::default()
    }
}

fn find_table<'a>(
    doc: &'a threatlog_compiler::ReportDoc,
    heading_prefix: &str,
) -> Option<&'a threatlog_compiler::TableBlock> {
    doc.sections
        .iter()
        .find(|s| s.heading.starts_with(heading_prefix))?
        .blocks
        .iter()
        .find_map(|b| match b {
            Block::Table(t) => Some(t),
            _ => None,
        })
}

// ============================================================================
// Pipeline behavior
// ============================================================================

#[test]
fn test_full_export_compiles() {
    let file = write_fixture(FULL_EXPORT);
    let doc = compile_report(&config_for(&file)).unwrap();

    assert_eq!(doc.title, "Security Threat Log Analysis Report");
    assert_eq!(doc.sections.len(), 10);
    // 4 valid rows survive: bad timestamp, 未知 and empty threat type drop
    assert!(doc.meta.contains(&"Total records: 4".to_string()));
    assert!(doc
        .meta
        .contains(&"Reporting period: 2024-05-01 08:15:00 to 2024-05-01 11:30:00".to_string()));
}

#[test]
fn test_counts_are_weighted_by_count_column() {
    let file = write_fixture(FULL_EXPORT);
    let doc = compile_report(&config_for(&file)).unwrap();

    let table = find_table(&doc, "3.").expect("threat type table");
    // scan: 3 + 2 = 5 of 7 total weight
    assert_eq!(table.rows[0], vec!["scan", "5", "71.43%"]);
}

#[test]
fn test_missing_count_column_weights_every_record_once() {
    let file = write_fixture(
        "时间,威胁类型\n\
         2024-05-01 10:00:00,scan\n\
         2024-05-01 11:00:00,scan\n\
         2024-05-01 12:00:00,virus\n",
    );
    let doc = compile_report(&config_for(&file)).unwrap();

    let table = find_table(&doc, "3.").expect("threat type table");
    assert_eq!(table.rows[0], vec!["scan", "2", "66.67%"]);
    assert_eq!(table.rows[1], vec!["virus", "1", "33.33%"]);
}

#[test]
fn test_missing_severity_column_degrades_only_that_section() {
    let file = write_fixture(
        "时间,威胁类型,动作\n\
         2024-05-01 10:00:00,scan,block\n",
    );
    let doc = compile_report(&config_for(&file)).unwrap();

    let severity = doc
        .sections
        .iter()
        .find(|s| s.heading.starts_with("4."))
        .unwrap();
    assert!(severity.blocks.iter().any(
        |b| matches!(b, Block::Paragraph(p) if p.contains("could not be resolved") && p.contains("severity"))
    ));

    // action section is unaffected
    let action = doc
        .sections
        .iter()
        .find(|s| s.heading.starts_with("8."))
        .unwrap();
    assert!(action
        .blocks
        .iter()
        .any(|b| matches!(b, Block::Chart(c) if c.kind == ChartKind::Pie)));
}

#[test]
fn test_everything_cleaned_away_still_builds_a_document() {
    let file = write_fixture(
        "时间,威胁类型\n\
         not-a-time,scan\n\
         2024-05-01 10:00:00,未知\n",
    );
    let doc = compile_report(&config_for(&file)).unwrap();

    assert_eq!(doc.sections.len(), 10);
    assert!(doc.meta.contains(&"Total records: 0".to_string()));
    assert!(doc.meta.contains(&"Reporting period: N/A".to_string()));
    let notable = doc
        .sections
        .iter()
        .find(|s| s.heading.starts_with("10."))
        .unwrap();
    assert!(notable
        .blocks
        .contains(&Block::Paragraph("(no sample events to show)".to_string())));
}

#[test]
fn test_notable_events_ranked_by_severity_then_time() {
    let file = write_fixture(FULL_EXPORT);
    let doc = compile_report(&config_for(&file)).unwrap();

    let notable = doc
        .sections
        .iter()
        .find(|s| s.heading.starts_with("10."))
        .unwrap();
    let severities: Vec<&str> = notable
        .blocks
        .iter()
        .filter_map(|b| match b {
            Block::Paragraph(p) => p.strip_prefix("- Severity: "),
            _ => None,
        })
        .collect();
    // 高 first, then 中, then the two 低 rows in time order
    assert_eq!(severities, vec!["高", "中", "低", "低"]);
}

#[test]
fn test_missing_input_file_aborts() {
    let config = ReportConfig {
        input_path: PathBuf::from("does-not-exist.csv"),
        ..ReportConfig::default()
    };
    match compile_report(&config) {
        Err(CompileError::MissingInput(path)) => {
            assert_eq!(path, PathBuf::from("does-not-exist.csv"))
        }
        other => panic!("expected MissingInput, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_unsupported_extension_is_an_error() {
    let mut file = tempfile::NamedTempFile::with_suffix(".parquet").unwrap();
    file.write_all(b"whatever").unwrap();
    let config = ReportConfig {
        input_path: file.path().to_path_buf(),
        ..ReportConfig::default()
    };
    assert!(matches!(
        compile_report(&config),
        Err(CompileError::UnsupportedFormat(_))
    ));
}

#[test]
fn test_english_headers_work_too() {
    let file = write_fixture(
        "Time,Threat Type,Severity\n\
         2024-05-01 10:00:00,scan,high\n",
    );
    let doc = compile_report(&config_for(&file)).unwrap();
    assert!(doc.meta.contains(&"Total records: 1".to_string()));
    let table = find_table(&doc, "4.").expect("severity table");
    assert_eq!(table.rows[0][0], "high");
}

#[test]
fn test_compile_twice_yields_identical_aggregates() {
    let file = write_fixture(FULL_EXPORT);
    let config = config_for(&file);
    let doc1 = compile_report(&config).unwrap();
    let doc2 = compile_report(&config).unwrap();
    // the generation timestamp differs; the sections must not
    assert_eq!(doc1.sections, doc2.sections);
}
