use std::iter::FusedIterator;

use generational_arena::Index;

use crate::domain::node::Key;
use crate::domain::ops::{Operation, StepSource, TraversalOrder};
use crate::domain::step::{StepEvent, StepKind};
use crate::domain::tree::Bst;

/// Step producer for [`Bst::traverse`]: one `TRAVERSE_VISIT` per node.
///
/// Works off an explicit stack of `(node, expanded)` frames. An unexpanded
/// frame is replaced by its children and itself (marked expanded) in the
/// reverse of the visiting order; an expanded frame is emitted.
#[derive(Debug)]
pub struct TraversalSteps<'a, V> {
    tree: &'a Bst<V>,
    order: TraversalOrder,
    stack: Vec<(Index, bool)>,
}

impl<'a, V: Key> TraversalSteps<'a, V> {
    pub(crate) fn new(tree: &'a Bst<V>, order: TraversalOrder) -> Self {
        let stack = tree.root_index().map(|root| (root, false)).into_iter().collect();
        Self { tree, order, stack }
    }
}

impl<V: Key> Iterator for TraversalSteps<'_, V> {
    type Item = StepEvent<V>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((idx, expanded)) = self.stack.pop() {
            let Some(node) = self.tree.get(idx) else {
                continue;
            };
            if expanded {
                let message = format!("Visiting {}", node.value);
                return Some(StepEvent::new(StepKind::TraverseVisit, message).with_node(node.to_ref()));
            }
            let left = node.left.map(|l| (l, false));
            let right = node.right.map(|r| (r, false));
            let this = Some((idx, true));
            let frames = match self.order {
                TraversalOrder::Preorder => [right, left, this],
                TraversalOrder::Inorder => [right, this, left],
                TraversalOrder::Postorder => [this, right, left],
            };
            self.stack.extend(frames.into_iter().flatten());
        }
        None
    }
}

impl<V: Key> FusedIterator for TraversalSteps<'_, V> {}

impl<V: Key> StepSource<V> for TraversalSteps<'_, V> {
    fn operation(&self) -> Operation<V> {
        Operation::Traverse(self.order)
    }

    fn tree(&self) -> &Bst<V> {
        self.tree
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn sample() -> Bst<i32> {
        [50, 30, 70, 20, 40, 60, 80].into_iter().collect()
    }

    #[rstest]
    #[case(TraversalOrder::Inorder, vec![20, 30, 40, 50, 60, 70, 80])]
    #[case(TraversalOrder::Preorder, vec![50, 30, 20, 40, 70, 60, 80])]
    #[case(TraversalOrder::Postorder, vec![20, 40, 30, 60, 80, 70, 50])]
    fn classic_orders(#[case] order: TraversalOrder, #[case] expected: Vec<i32>) {
        let tree = sample();
        let events: Vec<_> = tree.traverse(order).collect();
        assert!(events.iter().all(|e| e.kind == StepKind::TraverseVisit));
        let values: Vec<_> = events.into_iter().filter_map(|e| e.node.map(|n| n.value)).collect();
        assert_eq!(values, expected);
    }

    #[rstest]
    #[case(TraversalOrder::Inorder)]
    #[case(TraversalOrder::Preorder)]
    #[case(TraversalOrder::Postorder)]
    fn empty_tree_yields_nothing(#[case] order: TraversalOrder) {
        let tree: Bst<i32> = Bst::new();
        let mut steps = tree.traverse(order);
        assert!(steps.next().is_none());
        assert!(steps.next().is_none());
    }

    #[test]
    fn skewed_tree_orders() {
        let tree: Bst<i32> = [3, 2, 1].into_iter().collect();
        assert_eq!(tree.values(TraversalOrder::Preorder), vec![3, 2, 1]);
        assert_eq!(tree.values(TraversalOrder::Postorder), vec![1, 2, 3]);
        assert_eq!(tree.values(TraversalOrder::Inorder), vec![1, 2, 3]);
    }
}
