//! Column identity
//!
//! A column is identified by the node that owns it and its lower-cased name.
//! Everything else about a column (description, lineage) hangs off this key.

/// Stable identity of a column: `(node_id, column_name)`
///
/// The name is lower-cased at construction so that manifest columns
/// (usually lower-case) and catalog columns (usually upper-case) collapse
/// onto the same identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ColumnIdentity {
    node_id: String,
    name: String,
}

impl ColumnIdentity {
    /// Create an identity, normalizing the column name to lower case
    pub fn new(node_id: impl Into<String>, name: impl AsRef<str>) -> Self {
        Self {
            node_id: node_id.into(),
            name: name.as_ref().to_lowercase(),
        }
    }

    /// Unique id of the owning node (e.g. "model.my_project.users")
    pub fn node_id(&self) -> &str {
        &self.node_id
    }

    /// Lower-cased column name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Resource type of the owning node ("model", "source", ...)
    pub fn node_type(&self) -> &str {
        node_type(&self.node_id)
    }

    /// Node id without its resource type and package segments
    ///
    /// `model.my_project.staging.stg_users` becomes `staging.stg_users`.
    pub fn friendly_node_name(&self) -> String {
        self.node_id
            .split('.')
            .skip(2)
            .collect::<Vec<_>>()
            .join(".")
    }
}

impl std::fmt::Display for ColumnIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}.{}", self.node_type(), self.friendly_node_name(), self.name)
    }
}

/// Whether two column names refer to the same column
///
/// Uses the same lower-casing as [`ColumnIdentity::new`], so names that
/// collapse onto one identity also compare equal here.
pub fn eq_column_name(a: &str, b: &str) -> bool {
    a == b || a.to_lowercase() == b.to_lowercase()
}

/// Leading segment of a node id, before the first `.`
pub fn node_type(node_id: &str) -> &str {
    node_id.split('.').next().unwrap_or(node_id)
}
