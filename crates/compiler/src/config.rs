//! Report configuration
//!
//! YAML/JSON configuration for one compile run. Every field has a default,
//! so an empty file (or no file at all) reproduces the stock setup: read
//! `security_log.xls`, write `security_analysis_report.pdf`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::CompileError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Input log export (.csv, .xls or .xlsx)
    #[serde(default = "default_input_path")]
    pub input_path: PathBuf,

    /// Output PDF path
    #[serde(default = "default_output_path")]
    pub output_path: PathBuf,

    /// Entries kept in ranked charts and tables
    #[serde(default = "default_top_n")]
    pub top_n: usize,

    /// Events shown in the notable-events section
    #[serde(default = "default_sample_events")]
    pub sample_events: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            input_path: default_input_path(),
            output_path: default_output_path(),
            top_n: default_top_n(),
            sample_events: default_sample_events(),
        }
    }
}

impl ReportConfig {
    /// Load from a YAML or JSON file, keyed on the extension.
    pub fn from_file(path: &Path) -> Result<Self, CompileError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        match ext.as_str() {
            "json" => Self::from_json_file(path),
            _ => Self::from_yaml_file(path),
        }
    }

    pub fn from_yaml_file(path: &Path) -> Result<Self, CompileError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| CompileError::Config(format!("failed to read {}: {}", path.display(), e)))?;
        serde_yaml::from_str(&content)
            .map_err(|e| CompileError::Config(format!("failed to parse {}: {}", path.display(), e)))
    }

    pub fn from_json_file(path: &Path) -> Result<Self, CompileError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| CompileError::Config(format!("failed to read {}: {}", path.display(), e)))?;
        serde_json::from_str(&content)
            .map_err(|e| CompileError::Config(format!("failed to parse {}: {}", path.display(), e)))
    }
}

fn default_input_path() -> PathBuf {
    PathBuf::from("security_log.xls")
}

fn default_output_path() -> PathBuf {
    PathBuf::from("security_analysis_report.pdf")
}

fn default_top_n() -> usize {
    10
}

fn default_sample_events() -> usize {
    5
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ReportConfig::default();
        assert_eq!(config.input_path, PathBuf::from("security_log.xls"));
        assert_eq!(config.top_n, 10);
        assert_eq!(config.sample_events, 5);
    }

    #[test]
    fn test_yaml_parse_with_partial_fields() {
        let yaml = r#"
input_path: exports/fw_threats.csv
top_n: 15
"#;
        let config: ReportConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.input_path, PathBuf::from("exports/fw_threats.csv"));
        assert_eq!(config.top_n, 15);
        // untouched fields keep their defaults
        assert_eq!(config.output_path, PathBuf::from("security_analysis_report.pdf"));
        assert_eq!(config.sample_events, 5);
    }

    #[test]
    fn test_json_parse() {
        let json = r#"{"output_path": "out/report.pdf"}"#;
        let config: ReportConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.output_path, PathBuf::from("out/report.pdf"));
    }
}
