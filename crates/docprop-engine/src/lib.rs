//! docprop engine - column lineage and documentation propagation
//!
//! This crate implements the propagation run:
//! - Column registry and lineage traversal
//! - Upstream description resolution and formatting
//! - Impact statistics

pub mod error;
pub mod formatter;
pub mod pipeline;
pub mod propagation;
pub mod registry;
pub mod reporter;
pub mod stats;
pub mod traversal;

pub use error::PropagateError;
pub use formatter::{format_node_link_in_markdown, format_upstream_descriptions, format_upstream_descriptions_with};
pub use pipeline::{analyze_project, propagate_project, Analysis};
pub use propagation::{apply_propagations, descriptions_from_upstream, resolve_propagations, Propagation, UpstreamDescriptions};
pub use registry::{Column, ColumnIndex, ColumnOrigin, ColumnRegistry};
pub use reporter::{RecordingReporter, ReportEvent, Reporter, TracingReporter};
pub use stats::{best_columns_to_be_documented, ImpactStats, PotentialPropagation};
pub use traversal::{traverse_project, traverse_upstream};
