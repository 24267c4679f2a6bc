use std::cmp::Ordering;
use std::iter::FusedIterator;

use generational_arena::Index;

use crate::domain::node::Key;
use crate::domain::ops::{Operation, StepSource};
use crate::domain::step::{StepEvent, StepKind};
use crate::domain::tree::Bst;

#[derive(Debug, Clone, Copy)]
enum State {
    Start,
    /// Look at this node, or report the miss when the descent fell off the tree
    Visit(Option<Index>),
    Compare(Index),
    Done,
}

/// Step producer for [`Bst::search`].
///
/// Read-only. The boolean result is available from [`SearchSteps::outcome`]
/// once a terminal event (`FOUND`, `NOT_FOUND` or `EMPTY`) has been produced.
#[derive(Debug)]
pub struct SearchSteps<'a, V> {
    tree: &'a Bst<V>,
    value: V,
    state: State,
    outcome: Option<bool>,
}

impl<'a, V: Key> SearchSteps<'a, V> {
    pub(crate) fn new(tree: &'a Bst<V>, value: V) -> Self {
        Self {
            tree,
            value,
            state: State::Start,
            outcome: None,
        }
    }

    /// `Some(found)` after the sequence has ended, `None` while it is still running.
    pub fn outcome(&self) -> Option<bool> {
        self.outcome
    }
}

impl<V: Key> Iterator for SearchSteps<'_, V> {
    type Item = StepEvent<V>;

    fn next(&mut self) -> Option<Self::Item> {
        match std::mem::replace(&mut self.state, State::Done) {
            State::Done => None,
            State::Start => match self.tree.root_index() {
                Some(root) => {
                    self.state = State::Visit(Some(root));
                    self.next()
                }
                None => {
                    self.outcome = Some(false);
                    Some(StepEvent::new(StepKind::Empty, "Tree is empty"))
                }
            },
            State::Visit(None) => {
                self.outcome = Some(false);
                Some(StepEvent::new(
                    StepKind::NotFound,
                    format!("{} not found in tree", self.value),
                ))
            }
            State::Visit(Some(idx)) => {
                let node = self.tree.node_ref(idx)?;
                self.state = State::Compare(idx);
                let message = format!("Checking {}", node.value);
                Some(StepEvent::new(StepKind::VisitSearch, message).with_node(node))
            }
            State::Compare(idx) => {
                let current = self.tree.get(idx)?;
                let (next, symbol, direction) = match self.value.cmp(&current.value) {
                    Ordering::Equal => {
                        self.outcome = Some(true);
                        return Some(
                            StepEvent::new(StepKind::Found, format!("Found {}!", self.value))
                                .with_node(current.to_ref()),
                        );
                    }
                    Ordering::Less => (current.left, '<', "left"),
                    Ordering::Greater => (current.right, '>', "right"),
                };
                self.state = State::Visit(next);
                Some(StepEvent::new(
                    StepKind::Move,
                    format!("{} {} {}, go {}", self.value, symbol, current.value, direction),
                ))
            }
        }
    }
}

impl<V: Key> FusedIterator for SearchSteps<'_, V> {}

impl<V: Key> StepSource<V> for SearchSteps<'_, V> {
    fn operation(&self) -> Operation<V> {
        Operation::Search(self.value.clone())
    }

    fn tree(&self) -> &Bst<V> {
        self.tree
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Bst<i32> {
        [50, 30, 70, 20, 40, 60, 80].into_iter().collect()
    }

    #[test]
    fn empty_tree_reports_empty_and_false() {
        let tree: Bst<i32> = Bst::new();
        let mut steps = tree.search(1);
        assert_eq!(steps.outcome(), None);
        let kinds: Vec<_> = steps.by_ref().map(|s| s.kind).collect();
        assert_eq!(kinds, vec![StepKind::Empty]);
        assert_eq!(steps.outcome(), Some(false));
    }

    #[test]
    fn hit_visits_and_moves() {
        let tree = sample();
        let mut steps = tree.search(60);
        let events: Vec<_> = steps.by_ref().collect();
        let kinds: Vec<_> = events.iter().map(|s| s.kind).collect();
        assert_eq!(
            kinds,
            vec![
                StepKind::VisitSearch,
                StepKind::Move,
                StepKind::VisitSearch,
                StepKind::Move,
                StepKind::VisitSearch,
                StepKind::Found,
            ]
        );
        assert_eq!(events[1].message, "60 > 50, go right");
        assert_eq!(events[3].message, "60 < 70, go left");
        assert_eq!(events[5].node.as_ref().map(|n| n.value), Some(60));
        assert_eq!(steps.outcome(), Some(true));
    }

    #[test]
    fn miss_ends_with_not_found() {
        let tree = sample();
        let mut steps = tree.search(45);
        let events: Vec<_> = steps.by_ref().collect();
        let last = events.last().map(|s| (s.kind, s.message.clone()));
        assert_eq!(
            last,
            Some((StepKind::NotFound, "45 not found in tree".to_string()))
        );
        assert_eq!(
            events.iter().filter(|s| s.kind == StepKind::VisitSearch).count(),
            3
        );
        assert_eq!(steps.outcome(), Some(false));
        assert!(steps.next().is_none());
    }
}
