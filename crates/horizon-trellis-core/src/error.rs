//! Error types for the core tree primitives.

use thiserror::Error;

/// Errors produced by structural tree operations.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeError {
    /// The handle does not refer to a live node.
    #[error("invalid node handle")]
    InvalidNode,
    /// A node cannot be inserted into itself.
    #[error("cannot insert a node into itself")]
    SelfInsertion,
    /// The child is already attached to a parent.
    #[error("node already has a parent")]
    AlreadyParented,
    /// The child is an ancestor of the intended parent.
    #[error("insertion would create circular parentage")]
    CircularParentage,
    /// The node is not a direct child of the given parent.
    #[error("node is not a child of the given parent")]
    NotAChild,
}

/// A specialized Result type for tree operations.
pub type TreeResult<T> = std::result::Result<T, TreeError>;
