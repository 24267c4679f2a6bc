//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent malformed requests against the tree.
///
/// Misses, duplicates and empty trees are not errors: they are reported as
/// step events by the operation that ran into them.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("unknown traversal order: {0} (expected inorder, preorder or postorder)")]
    InvalidOrder(String),
}
