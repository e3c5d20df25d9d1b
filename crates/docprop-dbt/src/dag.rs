//! Node-level dependency graph
//!
//! Built once from `depends_on.nodes` so column traversal can ask for the
//! parents of a node without going back to the raw manifest records.

use crate::manifest::Manifest;
use std::collections::HashMap;

/// Node identifier (unique_id from manifest)
pub type NodeId = String;

/// Dependency graph over models and sources
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    /// Forward edges: node -> ordered list of nodes it depends on (parents)
    parents: HashMap<NodeId, Vec<NodeId>>,
}

impl DependencyGraph {
    /// Build a dependency graph from a manifest
    ///
    /// Sources never have parents, so only nodes contribute edges.
    pub fn from_manifest(manifest: &Manifest) -> Self {
        let parents = manifest
            .nodes
            .iter()
            .filter(|(_, node)| !node.upstream_ids().is_empty())
            .map(|(node_id, node)| (node_id.clone(), node.upstream_ids().to_vec()))
            .collect();

        Self { parents }
    }

    /// Immediate parents (dependencies) of a node, in declaration order
    pub fn parents(&self, node_id: &str) -> &[NodeId] {
        self.parents
            .get(node_id)
            .map(|deps| deps.as_slice())
            .unwrap_or_default()
    }
}
