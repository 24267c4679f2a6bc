//! Operation producers.
//!
//! Every operation is a resumable state machine implementing [`Iterator`].
//! A mutation happens inside the same `next()` call that returns the event
//! announcing it, so the tree is always consistent with the events seen so far.

mod delete;
mod insert;
mod search;
mod traverse;

use std::fmt;
use std::str::FromStr;

pub use delete::DeleteSteps;
pub use insert::InsertSteps;
pub use search::SearchSteps;
pub use traverse::TraversalSteps;

use crate::domain::error::DomainError;
use crate::domain::step::StepEvent;
use crate::domain::tree::Bst;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TraversalOrder {
    /// left, node, right
    Inorder,
    /// node, left, right
    Preorder,
    /// left, right, node
    Postorder,
}

impl TraversalOrder {
    pub fn label(&self) -> &'static str {
        match self {
            TraversalOrder::Inorder => "Inorder",
            TraversalOrder::Preorder => "Preorder",
            TraversalOrder::Postorder => "Postorder",
        }
    }
}

impl fmt::Display for TraversalOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label().to_lowercase())
    }
}

impl FromStr for TraversalOrder {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "inorder" | "in" => Ok(TraversalOrder::Inorder),
            "preorder" | "pre" => Ok(TraversalOrder::Preorder),
            "postorder" | "post" => Ok(TraversalOrder::Postorder),
            other => Err(DomainError::InvalidOrder(other.to_string())),
        }
    }
}

/// The request a producer was built for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation<V> {
    Insert(V),
    Search(V),
    Delete(V),
    Traverse(TraversalOrder),
}

impl<V: fmt::Display> fmt::Display for Operation<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Insert(v) => write!(f, "Inserting {v}"),
            Operation::Search(v) => write!(f, "Searching for {v}"),
            Operation::Delete(v) => write!(f, "Deleting {v}"),
            Operation::Traverse(order) => write!(f, "{} Traversal", order.label()),
        }
    }
}

/// A step producer the sequencer can drive.
///
/// Besides yielding events, a source lends out the tree it works on so that
/// consumers can look at the state right after each event.
pub trait StepSource<V>: Iterator<Item = StepEvent<V>> {
    fn operation(&self) -> Operation<V>;

    fn tree(&self) -> &Bst<V>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_parses_case_insensitively() {
        assert_eq!("InOrder".parse::<TraversalOrder>(), Ok(TraversalOrder::Inorder));
        assert_eq!("pre".parse::<TraversalOrder>(), Ok(TraversalOrder::Preorder));
        assert_eq!(" postorder ".parse::<TraversalOrder>(), Ok(TraversalOrder::Postorder));
        assert!(matches!(
            "level".parse::<TraversalOrder>(),
            Err(DomainError::InvalidOrder(_))
        ));
    }

    #[test]
    fn operation_titles() {
        assert_eq!(Operation::Insert(5).to_string(), "Inserting 5");
        assert_eq!(Operation::Search(5).to_string(), "Searching for 5");
        assert_eq!(Operation::Delete(5).to_string(), "Deleting 5");
        assert_eq!(
            Operation::<i32>::Traverse(TraversalOrder::Postorder).to_string(),
            "Postorder Traversal"
        );
    }
}
