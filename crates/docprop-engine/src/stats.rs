//! Documentation statistics and impact ranking

use crate::propagation::descriptions_from_upstream;
use crate::registry::{ColumnIndex, ColumnRegistry};
use crate::reporter::Reporter;
use docprop_core::{BestColumn, ImpactReport, PropagationRecord, ReportSummary};

/// An undocumented lineage root and the undocumented columns it would feed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PotentialPropagation {
    pub parent: ColumnIndex,
    pub children: Vec<ColumnIndex>,
}

/// Aggregate statistics over a populated registry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImpactStats {
    pub total: usize,
    pub documented: usize,
    pub undocumented: usize,

    /// Undocumented columns with documented ancestors, ignore-list not applied
    pub can_receive_propagation: usize,

    /// Ranked, largest impact first
    pub best_columns: Vec<PotentialPropagation>,
}

impl ImpactStats {
    pub fn calculate(registry: &ColumnRegistry) -> Self {
        let documented = registry.iter().filter(|(_, c)| c.has_description()).count();

        let can_receive_propagation = registry
            .iter()
            .filter(|(index, column)| {
                !column.has_description() && !descriptions_from_upstream(registry, *index).is_empty()
            })
            .count();

        Self {
            total: registry.len(),
            documented,
            undocumented: registry.len() - documented,
            can_receive_propagation,
            best_columns: best_columns_to_be_documented(registry),
        }
    }

    /// Text lines of the impact report, listing at most `top_n` columns
    pub fn render(&self, registry: &ColumnRegistry, top_n: usize) -> Vec<String> {
        let mut lines = vec![
            format!("Total columns: {}", self.total),
            format!("With docs: {} ({:.1}%)", self.documented, percentage(self.documented, self.total)),
            format!("Without docs: {} ({:.1}%)", self.undocumented, percentage(self.undocumented, self.total)),
            format!("Columns with documentation propagated: {}", self.can_receive_propagation),
            format!("Can propagate documentation if documented: {}", self.best_columns.len()),
        ];

        if !self.best_columns.is_empty() {
            lines.push(format!("=> Top {}:", top_n));

            for potential in self.best_columns.iter().take(top_n) {
                let children: Vec<String> = potential
                    .children
                    .iter()
                    .map(|child| registry[*child].to_string())
                    .collect();

                lines.push(format!(
                    "{} ({}) => [{}]",
                    registry[potential.parent],
                    potential.children.len(),
                    children.join(", ")
                ));
            }
        }

        lines
    }

    /// Send the rendered report to `reporter`
    pub fn report(&self, registry: &ColumnRegistry, top_n: usize, reporter: &mut dyn Reporter) {
        for line in self.render(registry, top_n) {
            reporter.report_line(&line);
        }
    }

    /// Versioned, serializable form of these statistics
    pub fn to_report(
        &self,
        registry: &ColumnRegistry,
        top_n: usize,
        propagated: Vec<PropagationRecord>,
    ) -> ImpactReport {
        let summary = ReportSummary {
            total_columns: self.total,
            documented: self.documented,
            undocumented: self.undocumented,
            can_receive_propagation: self.can_receive_propagation,
            could_propagate_if_documented: self.best_columns.len(),
        };

        let best_columns = self
            .best_columns
            .iter()
            .take(top_n)
            .map(|potential| {
                let parent = &registry[potential.parent];
                BestColumn {
                    node_id: parent.node_id().to_string(),
                    column: parent.name().to_string(),
                    undocumented_descendants: potential
                        .children
                        .iter()
                        .map(|child| registry[*child].to_string())
                        .collect(),
                }
            })
            .collect();

        ImpactReport::new(summary, best_columns).with_propagated(propagated)
    }
}

fn percentage(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 * 100.0 / total as f64
    }
}

/// Undocumented columns whose documentation would reach the most columns
///
/// Only lineage roots are considered so the same chain is not counted once
/// per level. Roots with no undocumented descendants are left out. Sorted by
/// descendant count, ties in registry order.
pub fn best_columns_to_be_documented(registry: &ColumnRegistry) -> Vec<PotentialPropagation> {
    let mut best: Vec<PotentialPropagation> = registry
        .iter()
        .filter(|(_, column)| !column.has_upstream() && !column.has_description())
        .filter_map(|(index, _)| {
            let children: Vec<ColumnIndex> = registry
                .downstream_recursive(index)
                .into_iter()
                .filter(|child| !registry[*child].has_description())
                .collect();

            if children.is_empty() {
                None
            } else {
                Some(PotentialPropagation { parent: index, children })
            }
        })
        .collect();

    best.sort_by_key(|potential| std::cmp::Reverse(potential.children.len()));
    best
}
