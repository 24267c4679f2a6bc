use std::cmp::Ordering;
use std::iter::FusedIterator;

use generational_arena::Index;
use tracing::{debug, trace};

use crate::domain::node::Key;
use crate::domain::ops::{Operation, StepSource};
use crate::domain::step::{StepEvent, StepKind};
use crate::domain::tree::Bst;

#[derive(Debug, Clone, Copy)]
enum State {
    Start,
    /// Descent position; `node` is None once the descent fell off the tree
    Visit {
        node: Option<Index>,
        parent: Option<Index>,
    },
    Compare {
        node: Index,
        parent: Option<Index>,
    },
    /// Target located and announced; unlink it
    Remove {
        node: Index,
        parent: Option<Index>,
    },
    FindSuccessor {
        node: Index,
    },
    /// Successor announced; copy its value up and splice it out
    Swap {
        node: Index,
        successor: Index,
        successor_parent: Index,
    },
    Done,
}

/// Step producer for [`Bst::delete`].
///
/// `VISIT` per node on the way down, then `FOUND_DELETE` and a single
/// `DELETE_DONE`. A target with two children takes its in-order successor's
/// value instead of moving: `COMPLEX_DELETE`, `HIGHLIGHT_SUCCESSOR`, then a
/// `DELETE_DONE` flagged `is_swap` naming both the relabelled node and the
/// removed successor. Between the value copy and the successor splice the
/// ordering invariant is briefly broken; both happen inside the same step.
#[derive(Debug)]
pub struct DeleteSteps<'a, V> {
    tree: &'a mut Bst<V>,
    value: V,
    state: State,
}

impl<'a, V: Key> DeleteSteps<'a, V> {
    pub(crate) fn new(tree: &'a mut Bst<V>, value: V) -> Self {
        Self {
            tree,
            value,
            state: State::Start,
        }
    }

    /// Unlink a node with at most one child, promoting that child.
    fn remove(&mut self, node: Index, parent: Option<Index>) -> Option<StepEvent<V>> {
        let target = self.tree.get(node)?;
        let (child, message) = match (target.left, target.right) {
            (None, None) => (None, format!("Removed leaf node {}", self.value)),
            (None, Some(right)) => (
                Some(right),
                format!("Replaced {} with right child", self.value),
            ),
            (Some(left), None) => (
                Some(left),
                format!("Replaced {} with left child", self.value),
            ),
            (Some(_), Some(_)) => {
                self.state = State::FindSuccessor { node };
                return Some(StepEvent::new(
                    StepKind::ComplexDelete,
                    "Node has two children. Finding successor...",
                ));
            }
        };
        let parent_ref = parent.and_then(|p| self.tree.node_ref(p));
        self.tree.replace_child(parent, node, child);
        let removed = self.tree.remove(node)?;
        debug!(value = ?self.value, id = %removed.id(), "node removed");

        let mut event = StepEvent::new(StepKind::DeleteDone, message).with_node(removed.to_ref());
        if let Some(parent_ref) = parent_ref {
            event = event.with_parent(parent_ref);
        }
        Some(event)
    }

    /// Walk the right subtree's left spine down to the in-order successor.
    fn find_successor(&mut self, node: Index) -> Option<StepEvent<V>> {
        let mut successor_parent = node;
        let mut successor = self.tree.get(node)?.right?;
        while let Some(left) = self.tree.get(successor)?.left {
            successor_parent = successor;
            successor = left;
        }
        let successor_ref = self.tree.node_ref(successor)?;
        trace!(successor = ?successor_ref.value, "successor located");
        self.state = State::Swap {
            node,
            successor,
            successor_parent,
        };
        let message = format!("Successor is {}", successor_ref.value);
        Some(StepEvent::new(StepKind::HighlightSuccessor, message).with_node(successor_ref))
    }

    /// Overwrite the target's value with the successor's, then splice the
    /// successor out. The successor never has a left child.
    fn swap(&mut self, node: Index, successor: Index, successor_parent: Index) -> Option<StepEvent<V>> {
        let (new_value, successor_right) = {
            let s = self.tree.get(successor)?;
            (s.value.clone(), s.right)
        };
        self.tree.get_mut(node)?.value = new_value.clone();

        let parent = self.tree.get_mut(successor_parent)?;
        if successor_parent == node {
            parent.right = successor_right;
        } else {
            parent.left = successor_right;
        }
        let removed = self.tree.remove(successor)?;
        let original = self.tree.node_ref(node)?;
        debug!(deleted = ?self.value, replacement = ?new_value, "value swapped, successor removed");

        Some(
            StepEvent::new(StepKind::DeleteDone, "Replaced value and removed successor")
                .with_node(removed.to_ref())
                .with_swap(original, new_value),
        )
    }
}

impl<V: Key> Iterator for DeleteSteps<'_, V> {
    type Item = StepEvent<V>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match std::mem::replace(&mut self.state, State::Done) {
                State::Done => return None,
                State::Start => match self.tree.root_index() {
                    Some(root) => {
                        self.state = State::Visit {
                            node: Some(root),
                            parent: None,
                        }
                    }
                    None => return Some(StepEvent::new(StepKind::Empty, "Tree is empty")),
                },
                State::Visit { node: None, .. } => {
                    return Some(StepEvent::new(
                        StepKind::NotFound,
                        format!("{} not found", self.value),
                    ));
                }
                State::Visit {
                    node: Some(node),
                    parent,
                } => {
                    let node_ref = self.tree.node_ref(node)?;
                    self.state = State::Compare { node, parent };
                    let message = format!("Visiting {}", node_ref.value);
                    return Some(StepEvent::new(StepKind::Visit, message).with_node(node_ref));
                }
                State::Compare { node, parent } => {
                    let current = self.tree.get(node)?;
                    match self.value.cmp(&current.value) {
                        Ordering::Less => {
                            self.state = State::Visit {
                                node: current.left,
                                parent: Some(node),
                            }
                        }
                        Ordering::Greater => {
                            self.state = State::Visit {
                                node: current.right,
                                parent: Some(node),
                            }
                        }
                        Ordering::Equal => {
                            let node_ref = current.to_ref();
                            self.state = State::Remove { node, parent };
                            return Some(
                                StepEvent::new(
                                    StepKind::FoundDelete,
                                    format!("Found {}, deleting...", self.value),
                                )
                                .with_node(node_ref),
                            );
                        }
                    }
                }
                State::Remove { node, parent } => return self.remove(node, parent),
                State::FindSuccessor { node } => return self.find_successor(node),
                State::Swap {
                    node,
                    successor,
                    successor_parent,
                } => return self.swap(node, successor, successor_parent),
            }
        }
    }
}

impl<V: Key> FusedIterator for DeleteSteps<'_, V> {}

impl<V: Key> StepSource<V> for DeleteSteps<'_, V> {
    fn operation(&self) -> Operation<V> {
        Operation::Delete(self.value.clone())
    }

    fn tree(&self) -> &Bst<V> {
        self.tree
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::node::NodeId;

    fn sample() -> Bst<i32> {
        [50, 30, 70, 20, 40, 60, 80].into_iter().collect()
    }

    fn kinds(events: &[StepEvent<i32>]) -> Vec<StepKind> {
        events.iter().map(|s| s.kind).collect()
    }

    #[test]
    fn empty_tree_reports_empty() {
        let mut tree: Bst<i32> = Bst::new();
        let events: Vec<_> = tree.delete(3).collect();
        assert_eq!(kinds(&events), vec![StepKind::Empty]);
    }

    #[test]
    fn miss_reports_not_found_without_mutation() {
        let mut tree = sample();
        let events: Vec<_> = tree.delete(65).collect();
        assert_eq!(
            kinds(&events),
            vec![StepKind::Visit, StepKind::Visit, StepKind::Visit, StepKind::NotFound]
        );
        assert_eq!(events[3].message, "65 not found");
        assert_eq!(tree.len(), 7);
    }

    #[test]
    fn leaf_is_detached() {
        let mut tree = sample();
        let events: Vec<_> = tree.delete(20).collect();
        assert_eq!(
            kinds(&events),
            vec![
                StepKind::Visit,
                StepKind::Visit,
                StepKind::Visit,
                StepKind::FoundDelete,
                StepKind::DeleteDone,
            ]
        );
        let done = &events[4];
        assert!(!done.is_swap);
        assert_eq!(done.node.as_ref().map(|n| n.value), Some(20));
        assert_eq!(done.parent.as_ref().map(|n| n.value), Some(30));
        assert_eq!(done.message, "Removed leaf node 20");
        assert_eq!(tree.inorder_values(), vec![30, 40, 50, 60, 70, 80]);
        assert!(tree.check_invariant());
    }

    #[test]
    fn single_child_is_spliced_up() {
        let mut tree: Bst<i32> = [50, 30, 20].into_iter().collect();
        let events: Vec<_> = tree.delete(30).collect();
        assert_eq!(
            events.last().map(|s| s.message.as_str()),
            Some("Replaced 30 with left child")
        );
        assert_eq!(tree.values(crate::domain::ops::TraversalOrder::Preorder), vec![50, 20]);
        assert!(tree.check_invariant());
    }

    #[test]
    fn root_with_one_child_is_replaced() {
        let mut tree: Bst<i32> = [10, 20, 30].into_iter().collect();
        let events: Vec<_> = tree.delete(10).collect();
        assert_eq!(
            events.last().map(|s| s.message.as_str()),
            Some("Replaced 10 with right child")
        );
        assert!(events.last().and_then(|s| s.parent.as_ref()).is_none());
        assert_eq!(tree.root().map(|n| *n.value()), Some(20));
        assert_eq!(tree.len(), 2);
    }

    #[test]
    fn deleting_only_node_empties_tree() {
        let mut tree: Bst<i32> = [7].into_iter().collect();
        let events: Vec<_> = tree.delete(7).collect();
        assert_eq!(
            kinds(&events),
            vec![StepKind::Visit, StepKind::FoundDelete, StepKind::DeleteDone]
        );
        assert!(tree.is_empty());
    }

    #[test]
    fn two_children_swaps_value_and_removes_successor() {
        let mut tree = sample();
        let root_id: Option<NodeId> = tree.root().map(|n| n.id());
        let successor_id = tree
            .root()
            .and_then(|r| tree.right(r))
            .and_then(|r| tree.left(r))
            .map(|n| n.id());

        let events: Vec<_> = tree.delete(50).collect();
        assert_eq!(
            kinds(&events),
            vec![
                StepKind::Visit,
                StepKind::FoundDelete,
                StepKind::ComplexDelete,
                StepKind::HighlightSuccessor,
                StepKind::DeleteDone,
            ]
        );
        assert_eq!(events[3].node.as_ref().map(|n| n.value), Some(60));

        let done = &events[4];
        assert!(done.is_swap);
        assert_eq!(done.updated_value, Some(60));
        assert_eq!(done.node.as_ref().map(|n| n.id), successor_id);
        assert_eq!(done.original_node.as_ref().map(|n| n.id), root_id);
        assert_eq!(done.original_node.as_ref().map(|n| n.value), Some(60));

        // the root keeps its identity, only its label changed
        assert_eq!(tree.root().map(|n| n.id()), root_id);
        assert_eq!(tree.root().map(|n| *n.value()), Some(60));
        assert_eq!(tree.inorder_values(), vec![20, 30, 40, 60, 70, 80]);
        assert!(tree.check_invariant());
    }

    #[test]
    fn successor_that_is_direct_right_child() {
        // 30 has children 20 and 40; 40 has only a right child 45
        let mut tree: Bst<i32> = [50, 30, 20, 40, 45].into_iter().collect();
        let events: Vec<_> = tree.delete(30).collect();
        assert_eq!(events[4].kind, StepKind::HighlightSuccessor);
        assert_eq!(events[4].node.as_ref().map(|n| n.value), Some(40));
        assert_eq!(tree.inorder_values(), vec![20, 40, 45, 50]);
        assert!(tree.check_invariant());
    }

    #[test]
    fn successor_with_right_child_is_relinked() {
        let mut tree: Bst<i32> = [50, 30, 80, 60, 90, 65].into_iter().collect();
        let _: Vec<_> = tree.delete(50).collect();
        assert_eq!(tree.root().map(|n| *n.value()), Some(60));
        assert_eq!(tree.inorder_values(), vec![30, 60, 65, 80, 90]);
        assert!(tree.check_invariant());
    }

    #[test]
    fn value_swap_happens_in_the_final_step() {
        let mut tree = sample();
        let mut steps = tree.delete(30);
        for _ in 0..5 {
            steps.next();
        }
        // HIGHLIGHT_SUCCESSOR seen, nothing changed yet
        assert!(steps.tree().contains(&30));
        assert_eq!(steps.tree().len(), 7);
        let done = steps.next();
        assert_eq!(done.map(|s| s.kind), Some(StepKind::DeleteDone));
        assert!(!steps.tree().contains(&30));
        assert_eq!(steps.tree().len(), 6);
        assert!(steps.next().is_none());
    }
}
