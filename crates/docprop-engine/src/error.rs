//! Engine error types

/// Fatal propagation errors
///
/// Unresolvable upstream references are not errors: a missing
/// upstream node or column simply produces no lineage edge.
#[derive(Debug, thiserror::Error)]
pub enum PropagateError {
    /// The manifest and catalog disagree about which nodes exist
    #[error("Malformed artifact: {0}")]
    MalformedArtifact(String),

    /// A column was requested without a manifest or catalog record
    #[error("Invalid column: {0}")]
    InvalidColumn(String),
}
