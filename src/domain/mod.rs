//! Domain layer: the step-emitting binary search tree
//!
//! This layer is independent of external concerns (no I/O, no pacing, no rendering).

pub mod error;
pub mod node;
pub mod ops;
pub mod step;
pub mod tree;

pub use error::DomainError;
pub use node::{Key, Node, NodeId, NodeRef};
pub use ops::{
    DeleteSteps, InsertSteps, Operation, SearchSteps, StepSource, TraversalOrder, TraversalSteps,
};
pub use step::{StepCategory, StepEvent, StepKind};
pub use tree::Bst;
