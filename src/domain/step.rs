//! Step events: the closed vocabulary every tree operation speaks.

use std::fmt;

use crate::domain::node::NodeRef;

/// Kind of a step event.
///
/// The wire names returned by [`StepKind::as_str`] are what logs and
/// front-ends key on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepKind {
    /// Value became the root of an empty tree
    InsertRoot,
    /// Insert or delete descent compared against a node
    Visit,
    /// Inserted value already present
    FoundDuplicate,
    /// New node attached as a left child
    InsertLeft,
    /// New node attached as a right child
    InsertRight,
    /// Search descent looked at a node
    VisitSearch,
    /// Search located the value
    Found,
    /// Search moved to a child
    Move,
    /// Search or delete ran off the tree
    NotFound,
    /// Search or delete on an empty tree
    Empty,
    /// Traversal reached a node
    TraverseVisit,
    /// Delete located the value
    FoundDelete,
    /// Delete finished relinking
    DeleteDone,
    /// Delete target has two children
    ComplexDelete,
    /// In-order successor located
    HighlightSuccessor,
}

/// Coarse grouping of step kinds for consumers that react per group
/// (audio cues, log levels) rather than per kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepCategory {
    Visit,
    Change,
    Found,
    Miss,
    Notice,
}

impl StepKind {
    pub const ALL: [StepKind; 15] = [
        StepKind::InsertRoot,
        StepKind::Visit,
        StepKind::FoundDuplicate,
        StepKind::InsertLeft,
        StepKind::InsertRight,
        StepKind::VisitSearch,
        StepKind::Found,
        StepKind::Move,
        StepKind::NotFound,
        StepKind::Empty,
        StepKind::TraverseVisit,
        StepKind::FoundDelete,
        StepKind::DeleteDone,
        StepKind::ComplexDelete,
        StepKind::HighlightSuccessor,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StepKind::InsertRoot => "INSERT_ROOT",
            StepKind::Visit => "VISIT",
            StepKind::FoundDuplicate => "FOUND_DUPLICATE",
            StepKind::InsertLeft => "INSERT_LEFT",
            StepKind::InsertRight => "INSERT_RIGHT",
            StepKind::VisitSearch => "VISIT_SEARCH",
            StepKind::Found => "FOUND",
            StepKind::Move => "MOVE",
            StepKind::NotFound => "NOT_FOUND",
            StepKind::Empty => "EMPTY",
            StepKind::TraverseVisit => "TRAVERSE_VISIT",
            StepKind::FoundDelete => "FOUND_DELETE",
            StepKind::DeleteDone => "DELETE_DONE",
            StepKind::ComplexDelete => "COMPLEX_DELETE",
            StepKind::HighlightSuccessor => "HIGHLIGHT_SUCCESSOR",
        }
    }

    pub fn category(&self) -> StepCategory {
        match self {
            StepKind::Visit | StepKind::VisitSearch | StepKind::TraverseVisit => StepCategory::Visit,
            StepKind::InsertRoot
            | StepKind::InsertLeft
            | StepKind::InsertRight
            | StepKind::FoundDelete
            | StepKind::DeleteDone
            | StepKind::ComplexDelete => StepCategory::Change,
            StepKind::Found => StepCategory::Found,
            StepKind::NotFound | StepKind::FoundDuplicate => StepCategory::Miss,
            StepKind::Move | StepKind::Empty | StepKind::HighlightSuccessor => StepCategory::Notice,
        }
    }

    pub fn is_insert(&self) -> bool {
        matches!(
            self,
            StepKind::InsertRoot | StepKind::InsertLeft | StepKind::InsertRight
        )
    }
}

impl fmt::Display for StepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One discrete, observable unit of progress of a tree operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepEvent<V> {
    pub kind: StepKind,
    /// Node the event concerns; for a swap delete, the removed successor
    pub node: Option<NodeRef<V>>,
    pub parent: Option<NodeRef<V>>,
    pub message: String,
    pub is_swap: bool,
    /// New value of `original_node` after a swap delete
    pub updated_value: Option<V>,
    /// Node whose value was overwritten by a swap delete
    pub original_node: Option<NodeRef<V>>,
}

impl<V> StepEvent<V> {
    pub fn new(kind: StepKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            node: None,
            parent: None,
            message: message.into(),
            is_swap: false,
            updated_value: None,
            original_node: None,
        }
    }

    pub fn with_node(mut self, node: NodeRef<V>) -> Self {
        self.node = Some(node);
        self
    }

    pub fn with_parent(mut self, parent: NodeRef<V>) -> Self {
        self.parent = Some(parent);
        self
    }

    pub fn with_swap(mut self, original: NodeRef<V>, updated_value: V) -> Self {
        self.is_swap = true;
        self.original_node = Some(original);
        self.updated_value = Some(updated_value);
        self
    }
}

impl<V> fmt::Display for StepEvent<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_kind_has_a_distinct_wire_name() {
        let mut names: Vec<_> = StepKind::ALL.iter().map(StepKind::as_str).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), StepKind::ALL.len());
    }

    #[test]
    fn insert_kinds_share_a_category() {
        for kind in [StepKind::InsertRoot, StepKind::InsertLeft, StepKind::InsertRight] {
            assert_eq!(kind.category(), StepCategory::Change);
            assert!(kind.is_insert());
        }
    }

    #[test]
    fn misses_are_grouped_together() {
        assert_eq!(StepKind::NotFound.category(), StepCategory::Miss);
        assert_eq!(StepKind::FoundDuplicate.category(), StepCategory::Miss);
        assert_eq!(StepKind::Found.category(), StepCategory::Found);
    }

    #[test]
    fn display_uses_wire_name() {
        let event: StepEvent<i32> = StepEvent::new(StepKind::Empty, "Tree is empty");
        assert_eq!(event.to_string(), "EMPTY: Tree is empty");
    }
}
