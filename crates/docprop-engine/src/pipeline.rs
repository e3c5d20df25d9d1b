//! End-to-end propagation run

use crate::error::PropagateError;
use crate::propagation::{apply_propagations, resolve_propagations, Propagation};
use crate::registry::ColumnRegistry;
use crate::reporter::Reporter;
use crate::stats::ImpactStats;
use crate::traversal::traverse_project;
use docprop_core::{Config, ImpactReport, PropagationRecord};
use docprop_dbt::{Catalog, Manifest};

/// Everything learned about a project in one run
#[derive(Debug)]
pub struct Analysis {
    pub registry: ColumnRegistry,
    pub propagations: Vec<Propagation>,
    pub stats: ImpactStats,
}

impl Analysis {
    /// Print the textual impact report through `reporter`
    pub fn report(&self, top_n: usize, reporter: &mut dyn Reporter) {
        self.stats.report(&self.registry, top_n, reporter);
    }

    pub fn to_report(&self, top_n: usize, propagated: Vec<PropagationRecord>) -> ImpactReport {
        self.stats.to_report(&self.registry, top_n, propagated)
    }
}

/// Traverse the project and compute propagations without touching the manifest
pub fn analyze_project(
    manifest: &Manifest,
    catalog: &Catalog,
    config: &Config,
    reporter: &mut dyn Reporter,
) -> Result<Analysis, PropagateError> {
    let mut registry = ColumnRegistry::new();
    traverse_project(manifest, catalog, &mut registry, reporter)?;

    let propagations = resolve_propagations(&registry, &config.propagation, reporter);
    let stats = ImpactStats::calculate(&registry);

    tracing::debug!(
        columns = registry.len(),
        propagations = propagations.len(),
        "analysis finished"
    );

    Ok(Analysis {
        registry,
        propagations,
        stats,
    })
}

/// Analyze the project and write the propagated descriptions into `manifest`
pub fn propagate_project(
    manifest: &mut Manifest,
    catalog: &Catalog,
    config: &Config,
    reporter: &mut dyn Reporter,
) -> Result<(Analysis, Vec<PropagationRecord>), PropagateError> {
    let analysis = analyze_project(manifest, catalog, config, reporter)?;
    let records = apply_propagations(manifest, &analysis.propagations, &config.propagation)?;

    Ok((analysis, records))
}
