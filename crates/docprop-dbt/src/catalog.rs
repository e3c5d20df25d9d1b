//! dbt catalog.json parsing
//!
//! The catalog describes the columns that actually exist in the warehouse
//! after a build. Column maps are keyed by the name the warehouse reports,
//! which is upper case on Snowflake.

use crate::manifest::find_column;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// dbt catalog.json structure (subset of fields we care about)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    /// Materialized models, seeds and snapshots
    pub nodes: IndexMap<String, CatalogNode>,

    /// Materialized sources
    pub sources: IndexMap<String, CatalogNode>,
}

impl Catalog {
    /// Load catalog from file
    pub fn from_file(path: &Path) -> Result<Self, CatalogError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| CatalogError::IoError(path.display().to_string(), e.to_string()))?;

        Self::from_str(&contents)
    }

    /// Parse catalog from JSON string
    pub fn from_str(json: &str) -> Result<Self, CatalogError> {
        serde_json::from_str(json)
            .map_err(|e| CatalogError::ParseError(e.to_string()))
    }

    /// Look up a node or a source by unique_id
    pub fn get(&self, unique_id: &str) -> Option<&CatalogNode> {
        self.nodes.get(unique_id).or_else(|| self.sources.get(unique_id))
    }

    /// Every catalog entry, nodes first, then sources
    pub fn all_nodes(&self) -> impl Iterator<Item = (&String, &CatalogNode)> {
        self.nodes.iter().chain(self.sources.iter())
    }

    /// Find a column of a node or source by name
    ///
    /// Tries the upper-cased name first, then any casing.
    pub fn find_column(&self, unique_id: &str, column_name: &str) -> Option<&CatalogColumn> {
        let node = self.get(unique_id)?;
        find_column(&node.columns, &column_name.to_uppercase())
    }
}

/// A materialized relation in the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogNode {
    /// Unique identifier, when the catalog carries it
    #[serde(default)]
    pub unique_id: Option<String>,

    /// Columns as reported by the warehouse
    pub columns: IndexMap<String, CatalogColumn>,
}

/// A materialized column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogColumn {
    /// Column name as reported by the warehouse
    pub name: String,

    /// Warehouse data type
    #[serde(rename = "type", default)]
    pub data_type: Option<String>,

    /// Ordinal position
    #[serde(default)]
    pub index: Option<u32>,

    /// Warehouse column comment
    #[serde(default)]
    pub comment: Option<String>,
}

/// Catalog parsing errors
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Failed to read catalog file {0}: {1}")]
    IoError(String, String),

    #[error("Failed to parse catalog JSON: {0}")]
    ParseError(String),
}
