use generational_arena::{Arena, Index};
use tracing::{debug, instrument};

use crate::domain::node::{Key, Node, NodeId, NodeRef};
use crate::domain::ops::{DeleteSteps, InsertSteps, SearchSteps, TraversalOrder, TraversalSteps};

/// Arena-backed binary search tree whose operations run as step sequences.
///
/// The tree is the sole owner of its nodes. Operations are requested through
/// [`Bst::insert`], [`Bst::search`], [`Bst::delete`] and [`Bst::traverse`],
/// each returning a lazy producer; nothing changes until the producer is pulled.
#[derive(Debug)]
pub struct Bst<V> {
    /// Arena storage for all tree nodes
    arena: Arena<Node<V>>,
    /// Index of the root node, None for empty trees
    root: Option<Index>,
}

impl<V> Default for Bst<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> Bst<V> {
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
            root: None,
        }
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Drop the whole tree at once. Not staged.
    #[instrument(level = "debug", skip(self))]
    pub fn clear(&mut self) {
        debug!(nodes = self.arena.len(), "clearing tree");
        self.arena.clear();
        self.root = None;
    }

    pub fn root(&self) -> Option<&Node<V>> {
        self.root.and_then(|idx| self.arena.get(idx))
    }

    pub fn left(&self, node: &Node<V>) -> Option<&Node<V>> {
        node.left.and_then(|idx| self.arena.get(idx))
    }

    pub fn right(&self, node: &Node<V>) -> Option<&Node<V>> {
        node.right.and_then(|idx| self.arena.get(idx))
    }

    /// Look up a live node by id.
    pub fn node(&self, id: NodeId) -> Option<&Node<V>> {
        self.arena.iter().map(|(_, node)| node).find(|node| node.id == id)
    }

    /// Number of nodes on the longest root-to-leaf path.
    pub fn height(&self) -> usize {
        let mut max_depth = 0;
        let mut stack: Vec<(Index, usize)> = self.root.map(|r| (r, 1)).into_iter().collect();
        while let Some((idx, depth)) = stack.pop() {
            if let Some(node) = self.arena.get(idx) {
                max_depth = max_depth.max(depth);
                stack.extend(node.left.map(|l| (l, depth + 1)));
                stack.extend(node.right.map(|r| (r, depth + 1)));
            }
        }
        max_depth
    }

    pub(crate) fn root_index(&self) -> Option<Index> {
        self.root
    }

    pub(crate) fn get(&self, idx: Index) -> Option<&Node<V>> {
        self.arena.get(idx)
    }

    pub(crate) fn get_mut(&mut self, idx: Index) -> Option<&mut Node<V>> {
        self.arena.get_mut(idx)
    }

    /// Allocate a detached node.
    pub(crate) fn alloc(&mut self, value: V) -> Index {
        self.arena.insert(Node::new(value))
    }

    pub(crate) fn remove(&mut self, idx: Index) -> Option<Node<V>> {
        self.arena.remove(idx)
    }

    pub(crate) fn set_root(&mut self, idx: Option<Index>) {
        self.root = idx;
    }

    /// Point whichever link of `parent` held `old` at `new` instead.
    /// A missing parent means `old` is the root.
    pub(crate) fn replace_child(&mut self, parent: Option<Index>, old: Index, new: Option<Index>) {
        match parent.and_then(|p| self.arena.get_mut(p)) {
            None => self.root = new,
            Some(parent) if parent.left == Some(old) => parent.left = new,
            Some(parent) => parent.right = new,
        }
    }
}

impl<V: Key> Bst<V> {
    pub(crate) fn node_ref(&self, idx: Index) -> Option<NodeRef<V>> {
        self.arena.get(idx).map(Node::to_ref)
    }

    /// Insert `value`, one step at a time.
    #[instrument(level = "debug", skip(self))]
    pub fn insert(&mut self, value: V) -> InsertSteps<'_, V> {
        InsertSteps::new(self, value)
    }

    /// Look for `value`, one step at a time.
    #[instrument(level = "debug", skip(self))]
    pub fn search(&self, value: V) -> SearchSteps<'_, V> {
        SearchSteps::new(self, value)
    }

    /// Remove `value`, one step at a time.
    #[instrument(level = "debug", skip(self))]
    pub fn delete(&mut self, value: V) -> DeleteSteps<'_, V> {
        DeleteSteps::new(self, value)
    }

    #[instrument(level = "debug", skip(self))]
    pub fn traverse(&self, order: TraversalOrder) -> TraversalSteps<'_, V> {
        TraversalSteps::new(self, order)
    }

    /// Run an insert to completion without observing its steps.
    pub fn quick_insert(&mut self, value: V) -> bool {
        let len = self.len();
        self.insert(value).for_each(drop);
        self.len() > len
    }

    pub fn contains(&self, value: &V) -> bool {
        let mut current = self.root();
        while let Some(node) = current {
            current = match value.cmp(&node.value) {
                std::cmp::Ordering::Equal => return true,
                std::cmp::Ordering::Less => self.left(node),
                std::cmp::Ordering::Greater => self.right(node),
            };
        }
        false
    }

    pub fn values(&self, order: TraversalOrder) -> Vec<V> {
        self.traverse(order)
            .filter_map(|step| step.node.map(|n| n.value))
            .collect()
    }

    pub fn inorder_values(&self) -> Vec<V> {
        self.values(TraversalOrder::Inorder)
    }

    /// Verify the ordering invariant: every left-subtree value is smaller and
    /// every right-subtree value is greater than the node's value.
    pub fn check_invariant(&self) -> bool {
        let mut stack: Vec<(Index, Option<&V>, Option<&V>)> =
            self.root.map(|r| (r, None, None)).into_iter().collect();
        let mut seen = 0;
        while let Some((idx, low, high)) = stack.pop() {
            let Some(node) = self.arena.get(idx) else {
                return false;
            };
            seen += 1;
            if low.is_some_and(|low| node.value <= *low) || high.is_some_and(|high| node.value >= *high) {
                return false;
            }
            if let Some(left) = node.left {
                stack.push((left, low, Some(&node.value)));
            }
            if let Some(right) = node.right {
                stack.push((right, Some(&node.value), high));
            }
        }
        // every arena slot must be reachable from the root
        seen == self.arena.len()
    }
}

impl<V: Key> FromIterator<V> for Bst<V> {
    fn from_iter<I: IntoIterator<Item = V>>(iter: I) -> Self {
        let mut tree = Bst::new();
        for value in iter {
            tree.quick_insert(value);
        }
        tree
    }
}
