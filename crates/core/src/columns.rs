//! Canonical column names and the source-header alias table
//!
//! Log exports arrive with vendor headers (the firewall consoles this tool
//! was written for export Chinese column names; re-exports from other tools
//! use English ones). Everything downstream works on the canonical names
//! defined here.

use serde::{Deserialize, Serialize};

/// A canonical column of the normalized event table.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Column {
    Time,
    ThreatType,
    Severity,
    ThreatName,
    Count,
    SourceZone,
    DestZone,
    Attacker,
    Target,
    SourcePort,
    SourceRegion,
    DestPort,
    DestRegion,
    Application,
    Protocol,
    Action,
}

impl Column {
    /// Stable snake_case name, used in diagnostics and placeholder text.
    pub fn canonical_name(&self) -> &'static str {
        match self {
            Column::Time => "time",
            Column::ThreatType => "threat_type",
            Column::Severity => "severity",
            Column::ThreatName => "threat_name",
            Column::Count => "count",
            Column::SourceZone => "source_zone",
            Column::DestZone => "dest_zone",
            Column::Attacker => "attacker",
            Column::Target => "target",
            Column::SourcePort => "source_port",
            Column::SourceRegion => "source_region",
            Column::DestPort => "dest_port",
            Column::DestRegion => "dest_region",
            Column::Application => "application",
            Column::Protocol => "protocol",
            Column::Action => "action",
        }
    }

    /// Human-readable label for report tables and sample-event listings.
    pub fn label(&self) -> &'static str {
        match self {
            Column::Time => "Time",
            Column::ThreatType => "Threat Type",
            Column::Severity => "Severity",
            Column::ThreatName => "Threat Name",
            Column::Count => "Count",
            Column::SourceZone => "Source Zone",
            Column::DestZone => "Destination Zone",
            Column::Attacker => "Attacker",
            Column::Target => "Target",
            Column::SourcePort => "Source Port",
            Column::SourceRegion => "Source Region",
            Column::DestPort => "Destination Port",
            Column::DestRegion => "Destination Region",
            Column::Application => "Application",
            Column::Protocol => "Protocol",
            Column::Action => "Action",
        }
    }

    /// Columns the report cannot fully work without. A missing member is a
    /// warning, not an abort; the affected sections degrade to placeholders.
    pub const REQUIRED: &'static [Column] = &[
        Column::Time,
        Column::ThreatType,
        Column::Severity,
        Column::ThreatName,
        Column::SourceRegion,
        Column::Target,
        Column::Action,
    ];

    /// Field order for the sample-event listings (time is rendered first,
    /// separately).
    pub const SAMPLE_FIELDS: &'static [Column] = &[
        Column::ThreatType,
        Column::Severity,
        Column::ThreatName,
        Column::Count,
        Column::SourceZone,
        Column::DestZone,
        Column::Attacker,
        Column::Target,
        Column::SourcePort,
        Column::SourceRegion,
        Column::DestPort,
        Column::DestRegion,
        Column::Application,
        Column::Protocol,
        Column::Action,
    ];
}

/// Ordered alias table mapping known source headers to canonical columns.
///
/// The first alias found in the header row wins for its column; any later
/// aliases of the same column are ignored, and unmapped source columns pass
/// through to nothing (the typed record has no slot for them).
pub fn source_aliases() -> &'static [(&'static str, Column)] {
    &[
        ("日期/时间", Column::Time),
        ("时间", Column::Time),
        ("Date/Time", Column::Time),
        ("Time", Column::Time),
        ("time", Column::Time),
        ("威胁类型", Column::ThreatType),
        ("Threat Type", Column::ThreatType),
        ("threat_type", Column::ThreatType),
        ("严重性", Column::Severity),
        ("Severity", Column::Severity),
        ("severity", Column::Severity),
        ("威胁名称", Column::ThreatName),
        ("Threat Name", Column::ThreatName),
        ("threat_name", Column::ThreatName),
        ("次数", Column::Count),
        ("Count", Column::Count),
        ("count", Column::Count),
        ("源安全区域", Column::SourceZone),
        ("Source Zone", Column::SourceZone),
        ("source_zone", Column::SourceZone),
        ("目的安全区域", Column::DestZone),
        ("Destination Zone", Column::DestZone),
        ("dest_zone", Column::DestZone),
        ("攻击者", Column::Attacker),
        ("Attacker", Column::Attacker),
        ("attacker", Column::Attacker),
        ("攻击目标", Column::Target),
        ("Target", Column::Target),
        ("target", Column::Target),
        ("源端口", Column::SourcePort),
        ("Source Port", Column::SourcePort),
        ("source_port", Column::SourcePort),
        ("源地区", Column::SourceRegion),
        ("Source Region", Column::SourceRegion),
        ("source_region", Column::SourceRegion),
        ("目的端口", Column::DestPort),
        ("Destination Port", Column::DestPort),
        ("dest_port", Column::DestPort),
        ("目的地区", Column::DestRegion),
        ("Destination Region", Column::DestRegion),
        ("dest_region", Column::DestRegion),
        ("应用", Column::Application),
        ("Application", Column::Application),
        ("application", Column::Application),
        ("协议", Column::Protocol),
        ("Protocol", Column::Protocol),
        ("protocol", Column::Protocol),
        ("动作", Column::Action),
        ("Action", Column::Action),
        ("action", Column::Action),
    ]
}
