//! Tree nodes and the handles step events use to refer to them.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use generational_arena::Index;

/// Values storable in the tree: totally ordered, cheap enough to clone into
/// step events, and printable for step messages.
pub trait Key: Ord + Clone + fmt::Display + fmt::Debug {}

impl<T: Ord + Clone + fmt::Display + fmt::Debug> Key for T {}

static NEXT_NODE_ID: AtomicU64 = AtomicU64::new(1);

/// Stable identity of a node, assigned at creation and never reused within the process.
///
/// The identity survives value changes, so a renderer can keep tracking a node
/// whose label was overwritten by a two-children delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u64);

impl NodeId {
    pub(crate) fn next() -> Self {
        NodeId(NEXT_NODE_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

/// Tree node stored in the arena.
#[derive(Debug)]
pub struct Node<V> {
    pub(crate) id: NodeId,
    pub(crate) value: V,
    /// Index of the left child in the arena
    pub(crate) left: Option<Index>,
    /// Index of the right child in the arena
    pub(crate) right: Option<Index>,
}

impl<V> Node<V> {
    pub(crate) fn new(value: V) -> Self {
        Self {
            id: NodeId::next(),
            value,
            left: None,
            right: None,
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn value(&self) -> &V {
        &self.value
    }
}

impl<V: Clone> Node<V> {
    /// Handle describing this node as it is right now.
    pub fn to_ref(&self) -> NodeRef<V> {
        NodeRef {
            id: self.id,
            value: self.value.clone(),
        }
    }
}

/// Non-owning handle to a node, as carried by step events.
///
/// Holds the node id and the value the node had when the event was produced.
/// It does not keep the node alive: the node may already be gone by the time
/// a later event is observed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeRef<V> {
    pub id: NodeId,
    pub value: V,
}

impl<V: fmt::Display> fmt::Display for NodeRef<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.value, self.id)
    }
}
