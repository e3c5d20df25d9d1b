//! dbt artifact parsing
//!
//! This crate handles:
//! - Parsing manifest.json and writing it back unchanged apart from edits
//! - Parsing catalog.json (materialized columns)
//! - Node-level dependency lookup (`depends_on.nodes`)

pub mod manifest;
pub mod catalog;
pub mod dag;

pub use manifest::{Manifest, ManifestError, ManifestNode, ManifestSource, ManifestMetadata, ColumnDefinition, ColumnMeta, DependsOn, NodeRef};
pub use catalog::{Catalog, CatalogColumn, CatalogError, CatalogNode};
pub use dag::{DependencyGraph, NodeId};
