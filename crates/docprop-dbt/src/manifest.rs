//! dbt manifest.json parsing
//!
//! Only the fields documentation propagation needs are typed. Everything
//! else is carried through `extra` so the manifest can be written back
//! without losing information.

use docprop_core::eq_column_name;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::Path;

/// dbt manifest.json structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    /// Metadata about the manifest
    #[serde(default)]
    pub metadata: ManifestMetadata,

    /// Model, seed, snapshot and test nodes
    pub nodes: IndexMap<String, ManifestNode>,

    /// Source definitions
    pub sources: IndexMap<String, ManifestSource>,

    /// Remaining top-level keys (macros, docs, exposures, parent_map, ...)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Manifest {
    /// Load manifest from file
    pub fn from_file(path: &Path) -> Result<Self, ManifestError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ManifestError::IoError(path.display().to_string(), e.to_string()))?;

        Self::from_str(&contents)
    }

    /// Parse manifest from JSON string
    pub fn from_str(json: &str) -> Result<Self, ManifestError> {
        serde_json::from_str(json)
            .map_err(|e| ManifestError::ParseError(e.to_string()))
    }

    /// Serialize to JSON indented with four spaces
    pub fn to_json(&self) -> Result<String, ManifestError> {
        let mut buffer = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);

        self.serialize(&mut serializer)
            .map_err(|e| ManifestError::SerializeError(e.to_string()))?;

        String::from_utf8(buffer).map_err(|e| ManifestError::SerializeError(e.to_string()))
    }

    /// Write the manifest to `path`, creating parent folders if needed
    pub fn save_to_file(&self, path: &Path) -> Result<(), ManifestError> {
        let json = self.to_json()?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .map_err(|e| ManifestError::IoError(parent.display().to_string(), e.to_string()))?;
        }

        tracing::info!(path = %path.display(), "writing manifest");

        std::fs::write(path, json)
            .map_err(|e| ManifestError::IoError(path.display().to_string(), e.to_string()))
    }

    /// Look up a node or a source by unique_id
    pub fn lookup(&self, unique_id: &str) -> Option<NodeRef<'_>> {
        self.nodes
            .get(unique_id)
            .map(NodeRef::Node)
            .or_else(|| self.sources.get(unique_id).map(NodeRef::Source))
    }

    /// Mutable column map of a node or a source
    pub fn columns_mut(&mut self, unique_id: &str) -> Option<&mut IndexMap<String, ColumnDefinition>> {
        if let Some(node) = self.nodes.get_mut(unique_id) {
            return Some(&mut node.columns);
        }

        self.sources.get_mut(unique_id).map(|source| &mut source.columns)
    }

    /// Find a column of a node or source by name
    ///
    /// Manifest columns are keyed in lower case; other casings are matched
    /// case-insensitively as a fallback.
    pub fn find_column(&self, unique_id: &str, column_name: &str) -> Option<&ColumnDefinition> {
        let node = self.lookup(unique_id)?;
        find_column(node.columns(), &column_name.to_lowercase())
    }
}

/// Look up `key` in a column map, falling back to a case-insensitive match
pub(crate) fn find_column<'a, V>(columns: &'a IndexMap<String, V>, key: &str) -> Option<&'a V> {
    columns.get(key).or_else(|| {
        columns
            .iter()
            .find(|(name, _)| eq_column_name(name, key))
            .map(|(_, column)| column)
    })
}

/// Borrowed view over either a node or a source
///
/// Nodes and sources live in separate maps but share one id namespace.
#[derive(Debug, Clone, Copy)]
pub enum NodeRef<'a> {
    Node(&'a ManifestNode),
    Source(&'a ManifestSource),
}

impl<'a> NodeRef<'a> {
    pub fn unique_id(&self) -> &'a str {
        match self {
            Self::Node(node) => &node.unique_id,
            Self::Source(source) => &source.unique_id,
        }
    }

    pub fn columns(&self) -> &'a IndexMap<String, ColumnDefinition> {
        match self {
            Self::Node(node) => &node.columns,
            Self::Source(source) => &source.columns,
        }
    }
}

/// Manifest metadata
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ManifestMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dbt_schema_version: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dbt_version: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated_at: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A node in the manifest (model, seed, snapshot, test, ...)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestNode {
    /// Unique identifier (e.g., "model.my_project.users")
    pub unique_id: String,

    /// Column definitions, keyed by lower-cased name; dbt always emits the key
    pub columns: IndexMap<String, ColumnDefinition>,

    /// Dependencies
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub depends_on: Option<DependsOn>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ManifestNode {
    /// Ordered list of upstream node ids
    pub fn upstream_ids(&self) -> &[String] {
        self.depends_on
            .as_ref()
            .map(|deps| deps.nodes.as_slice())
            .unwrap_or_default()
    }
}

/// A source in the manifest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestSource {
    /// Unique identifier (e.g., "source.my_project.raw.users")
    pub unique_id: String,

    /// Column definitions, keyed by lower-cased name; dbt always emits the key
    pub columns: IndexMap<String, ColumnDefinition>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Column definition from manifest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnDefinition {
    /// Column name
    pub name: String,

    /// Author-written (or propagated) description
    #[serde(default)]
    pub description: String,

    /// Column meta block
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<ColumnMeta>,

    /// Column tags
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ColumnDefinition {
    /// A bare column entry with a name and a description
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            meta: None,
            tags: None,
            extra: Map::new(),
        }
    }

    /// Set tags
    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = Some(tags);
        self
    }

    /// Name of the ancestor column this column was renamed from, if declared
    pub fn original_name(&self) -> Option<&str> {
        self.meta
            .as_ref()
            .and_then(|meta| meta.original_name.as_deref())
            .filter(|name| !name.is_empty())
    }
}

/// Column `meta` block
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ColumnMeta {
    /// Alias support: the name of this column in upstream nodes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_name: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Dependencies structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DependsOn {
    /// List of node unique_ids this node depends on
    #[serde(default)]
    pub nodes: Vec<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Manifest parsing errors
#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    #[error("Failed to read manifest file {0}: {1}")]
    IoError(String, String),

    #[error("Failed to parse manifest JSON: {0}")]
    ParseError(String),

    #[error("Failed to serialize manifest: {0}")]
    SerializeError(String),
}
