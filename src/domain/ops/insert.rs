use std::cmp::Ordering;
use std::iter::FusedIterator;

use generational_arena::Index;
use tracing::trace;

use crate::domain::node::Key;
use crate::domain::ops::{Operation, StepSource};
use crate::domain::step::{StepEvent, StepKind};
use crate::domain::tree::Bst;

#[derive(Debug, Clone, Copy)]
enum State {
    Start,
    /// Announce the comparison against this node
    Visit(Index),
    /// Act on the comparison announced by the previous `Visit`
    Compare(Index),
    Done,
}

/// Step producer for [`Bst::insert`].
///
/// `INSERT_ROOT` on an empty tree; otherwise a `VISIT` per node on the way
/// down, ending in `INSERT_LEFT`, `INSERT_RIGHT` or `FOUND_DUPLICATE`.
#[derive(Debug)]
pub struct InsertSteps<'a, V> {
    tree: &'a mut Bst<V>,
    value: V,
    state: State,
}

impl<'a, V: Key> InsertSteps<'a, V> {
    pub(crate) fn new(tree: &'a mut Bst<V>, value: V) -> Self {
        Self {
            tree,
            value,
            state: State::Start,
        }
    }

    /// Attach a new node under `parent` on the given side.
    fn attach(&mut self, parent: Index, side: Ordering) -> Option<StepEvent<V>> {
        let child = self.tree.alloc(self.value.clone());
        let parent_node = self.tree.get_mut(parent)?;
        let (kind, direction) = if side == Ordering::Less {
            parent_node.left = Some(child);
            (StepKind::InsertLeft, ('<', "left"))
        } else {
            parent_node.right = Some(child);
            (StepKind::InsertRight, ('>', "right"))
        };
        let parent_ref = parent_node.to_ref();
        let message = format!(
            "{} {} {}, inserting {}",
            self.value, direction.0, parent_ref.value, direction.1
        );
        let node_ref = self.tree.node_ref(child)?;
        Some(
            StepEvent::new(kind, message)
                .with_node(node_ref)
                .with_parent(parent_ref),
        )
    }
}

impl<V: Key> Iterator for InsertSteps<'_, V> {
    type Item = StepEvent<V>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match std::mem::replace(&mut self.state, State::Done) {
                State::Done => return None,
                State::Start => match self.tree.root_index() {
                    Some(root) => self.state = State::Visit(root),
                    None => {
                        let root = self.tree.alloc(self.value.clone());
                        self.tree.set_root(Some(root));
                        trace!(value = ?self.value, "inserted root");
                        let node = self.tree.node_ref(root)?;
                        return Some(
                            StepEvent::new(
                                StepKind::InsertRoot,
                                format!("Inserting root: {}", self.value),
                            )
                            .with_node(node),
                        );
                    }
                },
                State::Visit(idx) => {
                    let node = self.tree.node_ref(idx)?;
                    self.state = State::Compare(idx);
                    let message = format!("Comparing {} with {}", self.value, node.value);
                    return Some(StepEvent::new(StepKind::Visit, message).with_node(node));
                }
                State::Compare(idx) => {
                    let current = self.tree.get(idx)?;
                    match self.value.cmp(&current.value) {
                        Ordering::Equal => {
                            let node = current.to_ref();
                            return Some(
                                StepEvent::new(
                                    StepKind::FoundDuplicate,
                                    format!("{} already exists", self.value),
                                )
                                .with_node(node),
                            );
                        }
                        Ordering::Less => match current.left {
                            Some(left) => self.state = State::Visit(left),
                            None => return self.attach(idx, Ordering::Less),
                        },
                        Ordering::Greater => match current.right {
                            Some(right) => self.state = State::Visit(right),
                            None => return self.attach(idx, Ordering::Greater),
                        },
                    }
                }
            }
        }
    }
}

impl<V: Key> FusedIterator for InsertSteps<'_, V> {}

impl<V: Key> StepSource<V> for InsertSteps<'_, V> {
    fn operation(&self) -> Operation<V> {
        Operation::Insert(self.value.clone())
    }

    fn tree(&self) -> &Bst<V> {
        self.tree
    }
}
