//! Error types for composition lifecycle

use thiserror::Error;

/// Composition lifecycle errors.
///
/// Structural-edit index faults are deliberately not represented here:
/// indices are produced internally by the reconciliation engine, so an
/// out-of-range access is a programming error and panics instead of
/// surfacing as a recoverable variant.
#[derive(Debug, Error)]
pub enum CompositionError {
    /// The anchoring node is not inside the host tree
    #[error("node must be inside the tree to create a composition")]
    NodeOutsideTree,
}

/// Result type for composition operations
pub type Result<T> = std::result::Result<T, CompositionError>;
