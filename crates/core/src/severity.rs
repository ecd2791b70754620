use serde::{Deserialize, Serialize};

/// Ordinal severity class used to rank notable events.
///
/// The variant order is the sort order: high-severity rows come first,
/// labels outside the three known levels sort after all of them.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum SeverityClass {
    High,
    Medium,
    Low,
    Unranked,
}

impl SeverityClass {
    /// Project a raw severity label onto the ordinal scale.
    ///
    /// Recognizes the Chinese firewall-export labels and their English
    /// equivalents (ASCII labels case-insensitively); everything else is
    /// `Unranked`.
    pub fn from_label(label: &str) -> Self {
        match label.trim() {
            "高" => SeverityClass::High,
            "中" => SeverityClass::Medium,
            "低" => SeverityClass::Low,
            other if other.eq_ignore_ascii_case("high") => SeverityClass::High,
            other if other.eq_ignore_ascii_case("medium") => SeverityClass::Medium,
            other if other.eq_ignore_ascii_case("low") => SeverityClass::Low,
            _ => SeverityClass::Unranked,
        }
    }

    /// Rank for an optional label; a missing severity sorts last.
    pub fn from_optional(label: Option<&str>) -> Self {
        label.map_or(SeverityClass::Unranked, Self::from_label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chinese_labels_rank_in_order() {
        assert!(SeverityClass::from_label("高") < SeverityClass::from_label("中"));
        assert!(SeverityClass::from_label("中") < SeverityClass::from_label("低"));
    }

    #[test]
    fn test_english_labels_case_insensitive() {
        assert_eq!(SeverityClass::from_label("HIGH"), SeverityClass::High);
        assert_eq!(SeverityClass::from_label("Medium"), SeverityClass::Medium);
        assert_eq!(SeverityClass::from_label(" low "), SeverityClass::Low);
    }

    #[test]
    fn test_unrecognized_sorts_after_all_levels() {
        let odd = SeverityClass::from_label("informational");
        assert_eq!(odd, SeverityClass::Unranked);
        assert!(SeverityClass::Low < odd);
    }

    #[test]
    fn test_missing_label_is_unranked() {
        assert_eq!(SeverityClass::from_optional(None), SeverityClass::Unranked);
    }
}
