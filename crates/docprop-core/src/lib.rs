//! docprop core
//!
//! Domain types shared by every docprop crate: column identities,
//! run configuration and the versioned impact report.

pub mod column;
pub mod config;
pub mod report;

pub use column::{ColumnIdentity, eq_column_name, node_type};
pub use config::{Config, ConfigError, PropagationConfig, ReportConfig};
pub use report::{BestColumn, ImpactReport, PropagationRecord, ReportSummary, ReportVersion};
