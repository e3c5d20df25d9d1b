//! Documentation propagation
//!
//! Undocumented columns borrow the description of their nearest documented
//! ancestor along every upstream path.

use crate::error::PropagateError;
use crate::formatter::format_upstream_descriptions;
use crate::registry::{ColumnIndex, ColumnRegistry};
use crate::reporter::Reporter;
use docprop_core::{eq_column_name, ColumnIdentity, PropagationConfig, PropagationRecord};
use docprop_dbt::{ColumnDefinition, Manifest};
use std::collections::{BTreeMap, HashSet};

/// Contributing node id -> description
pub type UpstreamDescriptions = BTreeMap<String, String>;

/// Descriptions inherited by `column`, keyed by the node that documented them
///
/// Documented upstream columns contribute their own description; undocumented
/// ones are looked through recursively. Cycles in the lineage are tolerated.
pub fn descriptions_from_upstream(registry: &ColumnRegistry, column: ColumnIndex) -> UpstreamDescriptions {
    let mut visited = HashSet::from([column]);
    let mut descriptions = UpstreamDescriptions::new();

    collect_upstream_descriptions(registry, column, &mut visited, &mut descriptions);

    descriptions
}

fn collect_upstream_descriptions(
    registry: &ColumnRegistry,
    column: ColumnIndex,
    visited: &mut HashSet<ColumnIndex>,
    descriptions: &mut UpstreamDescriptions,
) {
    for upstream in registry[column].upstream_matches() {
        let upstream_column = &registry[upstream];

        match upstream_column.description() {
            Some(description) => {
                descriptions.insert(upstream_column.node_id().to_string(), description.to_string());
            }
            None => {
                if visited.insert(upstream) {
                    collect_upstream_descriptions(registry, upstream, visited, descriptions);
                }
            }
        }
    }
}

/// A description to be written into the manifest
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Propagation {
    pub identity: ColumnIdentity,

    /// Nodes the description comes from, sorted
    pub sources: Vec<String>,

    /// Formatted description, provenance included
    pub description: String,
}

/// Decide which columns get a synthesized description and compute it
///
/// A column qualifies when it has no description, has at least one
/// documented ancestor and is not on the ignore-list.
pub fn resolve_propagations(
    registry: &ColumnRegistry,
    config: &PropagationConfig,
    reporter: &mut dyn Reporter,
) -> Vec<Propagation> {
    let mut propagations = Vec::new();

    for (index, column) in registry.iter() {
        if column.has_description() {
            continue;
        }

        let descriptions = descriptions_from_upstream(registry, index);
        if descriptions.is_empty() {
            continue;
        }

        if config.is_ignored(column.name()) {
            reporter.ignored(column.identity());
            continue;
        }

        let sources: Vec<String> = descriptions.keys().cloned().collect();
        reporter.propagated(column.identity(), &sources);

        propagations.push(Propagation {
            identity: column.identity().clone(),
            sources,
            description: format_upstream_descriptions(&descriptions),
        });
    }

    propagations
}

/// Write propagated descriptions into the manifest
///
/// Existing column entries only get their description replaced; missing
/// ones are created and tagged with `config.inherited_tag`.
pub fn apply_propagations(
    manifest: &mut Manifest,
    propagations: &[Propagation],
    config: &PropagationConfig,
) -> Result<Vec<PropagationRecord>, PropagateError> {
    let mut records = Vec::with_capacity(propagations.len());

    for propagation in propagations {
        let node_id = propagation.identity.node_id();
        let name = propagation.identity.name();

        let columns = manifest.columns_mut(node_id).ok_or_else(|| {
            PropagateError::MalformedArtifact(format!(
                "node {} is missing from the manifest",
                node_id
            ))
        })?;

        let existing = columns
            .iter_mut()
            .find(|(key, _)| eq_column_name(key, name))
            .map(|(_, column)| column);

        let inserted = match existing {
            Some(column) => {
                column.description = propagation.description.clone();
                false
            }
            None => {
                columns.insert(
                    name.to_string(),
                    ColumnDefinition::new(name, propagation.description.clone())
                        .with_tags(vec![config.inherited_tag.clone()]),
                );
                true
            }
        };

        records.push(PropagationRecord {
            node_id: node_id.to_string(),
            column: name.to_string(),
            sources: propagation.sources.clone(),
            inserted,
        });
    }

    Ok(records)
}
