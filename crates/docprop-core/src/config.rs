//! Configuration schema (docprop.toml)

use serde::{Deserialize, Serialize};

/// Structural and audit columns that never receive propagated documentation
pub const DEFAULT_IGNORED_COLUMNS: &[&str] =
    &["id", "created_at", "updated_at", "_row_updated_at", "deleted_at"];

/// Tag attached to column entries created by propagation
pub const DEFAULT_INHERITED_TAG: &str = "inherited-documentation";

/// Number of columns listed in the "best columns to document" ranking
pub const DEFAULT_TOP_N: usize = 25;

/// Propagation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropagationConfig {
    /// Column names (or `*` patterns) that are never propagated to
    #[serde(default = "default_ignored_columns")]
    pub ignored_columns: Vec<String>,

    /// Tag marking column entries inserted by propagation
    #[serde(default = "default_inherited_tag")]
    pub inherited_tag: String,
}

fn default_ignored_columns() -> Vec<String> {
    DEFAULT_IGNORED_COLUMNS.iter().map(|c| c.to_string()).collect()
}

fn default_inherited_tag() -> String {
    DEFAULT_INHERITED_TAG.to_string()
}

impl Default for PropagationConfig {
    fn default() -> Self {
        Self {
            ignored_columns: default_ignored_columns(),
            inherited_tag: default_inherited_tag(),
        }
    }
}

impl PropagationConfig {
    /// Check if a column name is on the ignore-list
    pub fn is_ignored(&self, column_name: &str) -> bool {
        let column_name = column_name.to_lowercase();

        self.ignored_columns.iter().any(|pattern| {
            let pattern = pattern.to_lowercase();
            if pattern.contains('*') {
                glob_match(&pattern, &column_name)
            } else {
                pattern == column_name
            }
        })
    }
}

/// Impact report settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportConfig {
    /// How many ranked columns to report
    #[serde(default = "default_top_n")]
    pub top_n: usize,
}

fn default_top_n() -> usize {
    DEFAULT_TOP_N
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self { top_n: DEFAULT_TOP_N }
    }
}

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Propagation rules
    #[serde(default)]
    pub propagation: PropagationConfig,

    /// Impact report rules
    #[serde(default)]
    pub report: ReportConfig,
}

impl Config {
    /// Load config from TOML file
    pub fn from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::IoError(path.display().to_string(), e.to_string()))?;

        Self::from_toml(&contents)
    }

    /// Load config from TOML string
    pub fn from_toml(toml: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml)
            .map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Save config to TOML file
    pub fn save_to_file(&self, path: &std::path::Path) -> Result<(), ConfigError> {
        let toml = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::SerializeError(e.to_string()))?;

        std::fs::write(path, toml)
            .map_err(|e| ConfigError::IoError(path.display().to_string(), e.to_string()))?;

        Ok(())
    }
}

/// Simple glob matching (single `*` wildcard)
fn glob_match(pattern: &str, text: &str) -> bool {
    if pattern == "*" {
        return true;
    }

    if let Some(star_pos) = pattern.find('*') {
        let prefix = &pattern[..star_pos];
        let suffix = &pattern[star_pos + 1..];

        text.len() >= prefix.len() + suffix.len()
            && text.starts_with(prefix)
            && text.ends_with(suffix)
    } else {
        pattern == text
    }
}

/// Config error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {0}: {1}")]
    IoError(String, String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Serialize error: {0}")]
    SerializeError(String),
}
