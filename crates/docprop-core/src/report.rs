//! Impact report schema (stable v1)
//!
//! This schema is STABLE and VERSIONED.
//! Breaking changes require a new version.

use serde::{Deserialize, Serialize};

/// Report schema version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportVersion {
    /// Major version (breaking changes)
    pub major: u32,

    /// Minor version (backward-compatible additions)
    pub minor: u32,
}

impl ReportVersion {
    /// Current report schema version
    pub const CURRENT: ReportVersion = ReportVersion { major: 1, minor: 0 };
}

impl std::fmt::Display for ReportVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// Column documentation counts
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSummary {
    /// Every column seen during traversal
    pub total_columns: usize,

    /// Columns with a description
    pub documented: usize,

    /// Columns without a description
    pub undocumented: usize,

    /// Undocumented columns that have documented ancestors
    pub can_receive_propagation: usize,

    /// Undocumented lineage roots whose documentation would flow downstream
    pub could_propagate_if_documented: usize,
}

/// An undocumented lineage root and the undocumented columns below it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BestColumn {
    /// Owning node of the root column
    pub node_id: String,

    /// Root column name
    pub column: String,

    /// Undocumented descendants, formatted as `[type] node.column`
    pub undocumented_descendants: Vec<String>,
}

/// One description written into the manifest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropagationRecord {
    /// Node that received the description
    pub node_id: String,

    /// Column that received the description
    pub column: String,

    /// Nodes the description was borrowed from
    pub sources: Vec<String>,

    /// Whether a new column entry had to be created
    pub inserted: bool,
}

/// Impact report (impact-report.json v1)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImpactReport {
    /// Schema version
    pub version: ReportVersion,

    /// Timestamp (ISO 8601)
    pub timestamp: String,

    /// Summary statistics
    pub summary: ReportSummary,

    /// Ranked columns that would benefit the most from documentation
    pub best_columns: Vec<BestColumn>,

    /// Descriptions written during this run
    #[serde(default)]
    pub propagated: Vec<PropagationRecord>,
}

impl ImpactReport {
    /// Create a report stamped with the current time
    pub fn new(summary: ReportSummary, best_columns: Vec<BestColumn>) -> Self {
        Self {
            version: ReportVersion::CURRENT,
            timestamp: chrono::Utc::now().to_rfc3339(),
            summary,
            best_columns,
            propagated: Vec::new(),
        }
    }

    /// Attach the propagations performed during the run
    pub fn with_propagated(mut self, propagated: Vec<PropagationRecord>) -> Self {
        self.propagated = propagated;
        self
    }

    /// Serialize to JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Save to file
    pub fn save_to_file(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let json = self.to_json()
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
        std::fs::write(path, json)
    }
}
