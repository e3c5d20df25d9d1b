//! Column registry
//!
//! The registry is an arena: columns live in a `Vec` and reference each
//! other through [`ColumnIndex`]. Lineage edges are stored on both ends and
//! only the registry can add them, so `upstream`/`downstream` always mirror
//! each other.

use crate::error::PropagateError;
use docprop_core::ColumnIdentity;
use docprop_dbt::{CatalogColumn, ColumnDefinition};
use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};

/// Position of a column inside its registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ColumnIndex(usize);

/// Which artifact a column was built from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnOrigin {
    Manifest,
    Catalog,
}

/// A column of a model or source
///
/// Equality and hashing only consider the identity, never the description
/// or lineage.
#[derive(Debug, Clone)]
pub struct Column {
    identity: ColumnIdentity,
    origin: ColumnOrigin,
    original_name: Option<String>,
    description: Option<String>,
    upstream: BTreeSet<ColumnIndex>,
    downstream: BTreeSet<ColumnIndex>,
}

impl Column {
    /// Build from a manifest column; seeds description and alias
    pub fn from_manifest(column: &ColumnDefinition, node_id: &str) -> Self {
        Self {
            identity: ColumnIdentity::new(node_id, &column.name),
            origin: ColumnOrigin::Manifest,
            original_name: column.original_name().map(str::to_lowercase),
            description: Some(column.description.clone()).filter(|d| !d.is_empty()),
            upstream: BTreeSet::new(),
            downstream: BTreeSet::new(),
        }
    }

    /// Build from a catalog column; the catalog carries no documentation
    pub fn from_catalog(column: &CatalogColumn, node_id: &str) -> Self {
        Self {
            identity: ColumnIdentity::new(node_id, &column.name),
            origin: ColumnOrigin::Catalog,
            original_name: None,
            description: None,
            upstream: BTreeSet::new(),
            downstream: BTreeSet::new(),
        }
    }

    /// Build from whichever record is available, preferring the manifest
    pub fn build(
        manifest: Option<&ColumnDefinition>,
        catalog: Option<&CatalogColumn>,
        node_id: &str,
    ) -> Result<Self, PropagateError> {
        match (manifest, catalog) {
            (Some(column), _) => Ok(Self::from_manifest(column, node_id)),
            (None, Some(column)) => Ok(Self::from_catalog(column, node_id)),
            (None, None) => Err(PropagateError::InvalidColumn(format!(
                "no manifest or catalog record supplied for a column of {}",
                node_id
            ))),
        }
    }

    pub fn identity(&self) -> &ColumnIdentity {
        &self.identity
    }

    pub fn node_id(&self) -> &str {
        self.identity.node_id()
    }

    pub fn name(&self) -> &str {
        self.identity.name()
    }

    pub fn origin(&self) -> ColumnOrigin {
        self.origin
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn has_description(&self) -> bool {
        self.description.is_some()
    }

    /// Alias declared through `meta.original_name`
    pub fn original_name(&self) -> Option<&str> {
        self.original_name.as_deref()
    }

    /// Name to look for in upstream nodes
    pub fn search_name(&self) -> &str {
        self.original_name().unwrap_or_else(|| self.name())
    }

    pub fn upstream_matches(&self) -> impl Iterator<Item = ColumnIndex> + '_ {
        self.upstream.iter().copied()
    }

    pub fn downstream_matches(&self) -> impl Iterator<Item = ColumnIndex> + '_ {
        self.downstream.iter().copied()
    }

    pub fn has_upstream(&self) -> bool {
        !self.upstream.is_empty()
    }
}

impl PartialEq for Column {
    fn eq(&self, other: &Self) -> bool {
        self.identity == other.identity
    }
}

impl Eq for Column {}

impl std::hash::Hash for Column {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.identity.hash(state);
    }
}

impl std::fmt::Display for Column {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(&self.identity, f)
    }
}

/// Deduplicating store of every column seen during one run
#[derive(Debug, Default)]
pub struct ColumnRegistry {
    columns: Vec<Column>,
    by_identity: HashMap<ColumnIdentity, ColumnIndex>,
}

impl ColumnRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the column with this identity, creating it if needed
    ///
    /// The first record seen for an identity wins; later records are
    /// discarded without merging.
    pub fn add_or_retrieve(
        &mut self,
        manifest: Option<&ColumnDefinition>,
        catalog: Option<&CatalogColumn>,
        node_id: &str,
    ) -> Result<ColumnIndex, PropagateError> {
        let column = Column::build(manifest, catalog, node_id)?;
        Ok(self.insert(column))
    }

    /// Insert a column unless one with the same identity already exists
    pub fn insert(&mut self, column: Column) -> ColumnIndex {
        if let Some(&index) = self.by_identity.get(&column.identity) {
            return index;
        }

        let index = ColumnIndex(self.columns.len());
        self.by_identity.insert(column.identity.clone(), index);
        self.columns.push(column);
        index
    }

    /// Record that `downstream` inherits from `upstream`
    pub fn link(&mut self, downstream: ColumnIndex, upstream: ColumnIndex) {
        self.columns[downstream.0].upstream.insert(upstream);
        self.columns[upstream.0].downstream.insert(downstream);
    }

    pub fn get(&self, index: ColumnIndex) -> Option<&Column> {
        self.columns.get(index.0)
    }

    pub fn lookup(&self, identity: &ColumnIdentity) -> Option<ColumnIndex> {
        self.by_identity.get(identity).copied()
    }

    /// Columns in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (ColumnIndex, &Column)> {
        self.columns
            .iter()
            .enumerate()
            .map(|(i, column)| (ColumnIndex(i), column))
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Every column reachable by repeatedly following downstream edges
    ///
    /// Breadth-first, deduplicated, never includes `index` itself.
    pub fn downstream_recursive(&self, index: ColumnIndex) -> Vec<ColumnIndex> {
        let mut visited = HashSet::from([index]);
        let mut queue: VecDeque<ColumnIndex> = self[index].downstream_matches().collect();
        let mut result = Vec::new();

        while let Some(current) = queue.pop_front() {
            if !visited.insert(current) {
                continue;
            }

            result.push(current);

            for child in self[current].downstream_matches() {
                if !visited.contains(&child) {
                    queue.push_back(child);
                }
            }
        }

        result
    }
}

impl std::ops::Index<ColumnIndex> for ColumnRegistry {
    type Output = Column;

    fn index(&self, index: ColumnIndex) -> &Column {
        &self.columns[index.0]
    }
}
