//! Lineage traversal
//!
//! Walks every catalog node/column pair, resolves its registry entry and
//! links it to same-named columns in the node's direct parents. Each call
//! only looks one level up; the full lineage emerges because every node of
//! the project is visited.

use crate::error::PropagateError;
use crate::registry::{ColumnIndex, ColumnRegistry};
use crate::reporter::Reporter;
use docprop_dbt::{Catalog, DependencyGraph, Manifest};

/// Populate `registry` with every column of the project and its lineage edges
pub fn traverse_project(
    manifest: &Manifest,
    catalog: &Catalog,
    registry: &mut ColumnRegistry,
    reporter: &mut dyn Reporter,
) -> Result<(), PropagateError> {
    let graph = DependencyGraph::from_manifest(manifest);

    for (node_id, catalog_node) in catalog.all_nodes() {
        let manifest_node = manifest.lookup(node_id).ok_or_else(|| {
            PropagateError::MalformedArtifact(format!(
                "catalog node {} has no counterpart in the manifest",
                node_id
            ))
        })?;
        let owner = manifest_node.unique_id();

        for (column_key, catalog_column) in &catalog_node.columns {
            let manifest_column = manifest.find_column(owner, column_key);
            let column = registry.add_or_retrieve(manifest_column, Some(catalog_column), owner)?;

            traverse_upstream(column, &graph, manifest, catalog, registry, reporter)?;
        }
    }

    tracing::debug!(columns = registry.len(), "traversal finished");

    Ok(())
}

/// Link `column` to matching columns in the direct parents of its node
pub fn traverse_upstream(
    column: ColumnIndex,
    graph: &DependencyGraph,
    manifest: &Manifest,
    catalog: &Catalog,
    registry: &mut ColumnRegistry,
    reporter: &mut dyn Reporter,
) -> Result<(), PropagateError> {
    let parents = graph.parents(registry[column].node_id());
    if parents.is_empty() {
        return Ok(());
    }

    // Renamed columns are looked up under the name they had upstream
    let search_name = registry[column].search_name().to_string();

    for upstream_id in parents {
        // Ephemeral models have no catalog entry, so both sides are optional
        let manifest_column = manifest.find_column(upstream_id, &search_name);
        let catalog_column = catalog.find_column(upstream_id, &search_name);

        if manifest_column.is_none() && catalog_column.is_none() {
            tracing::trace!(upstream = %upstream_id, column = %search_name, "no upstream match");
            continue;
        }

        let upstream = registry.add_or_retrieve(manifest_column, catalog_column, upstream_id)?;
        registry.link(column, upstream);

        reporter.matched(registry[column].identity(), registry[upstream].identity());
    }

    Ok(())
}
