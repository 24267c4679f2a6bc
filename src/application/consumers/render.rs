//! Text renderer: draws the tree after every step with the nodes the step
//! touched marked.

use std::collections::{HashMap, HashSet};
use std::io::Write;

use termtree::Tree;

use crate::application::{ConsumerError, IoResultExt, RunOutcome, StepConsumer};
use crate::domain::{Bst, Key, Node, NodeId, Operation, StepCategory, StepEvent, StepKind};

/// Transient marker on a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Highlight {
    /// Compared against during a descent
    Visit,
    /// Located by a search or delete
    Found,
    /// Current traversal position
    Cursor,
}

impl Highlight {
    fn for_kind(kind: StepKind) -> Option<Self> {
        match kind {
            StepKind::Visit | StepKind::VisitSearch => Some(Highlight::Visit),
            StepKind::Found | StepKind::FoundDelete | StepKind::HighlightSuccessor => {
                Some(Highlight::Found)
            }
            StepKind::TraverseVisit => Some(Highlight::Cursor),
            _ => None,
        }
    }

    fn marker(&self) -> &'static str {
        match self {
            Highlight::Visit => " <visit>",
            Highlight::Found => " <found>",
            Highlight::Cursor => " <here>",
        }
    }
}

/// Renders the tree as an indented text tree.
///
/// Nodes are tracked by [`NodeId`], so a node relabelled by a swap delete
/// keeps its place and markers. Children are tagged `L`/`R`; when only one
/// child exists the other side is drawn as `·`.
#[derive(Default)]
pub struct TreeRenderer {
    highlights: HashMap<NodeId, Highlight>,
    visited: HashSet<NodeId>,
    frame: String,
    out: Option<Box<dyn Write>>,
}

impl TreeRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Also write every frame to `out`.
    pub fn with_output(mut self, out: Box<dyn Write>) -> Self {
        self.out = Some(out);
        self
    }

    /// Most recently drawn frame.
    pub fn frame(&self) -> &str {
        &self.frame
    }

    pub fn highlight_of(&self, id: NodeId) -> Option<Highlight> {
        self.highlights.get(&id).copied()
    }

    pub fn is_visited(&self, id: NodeId) -> bool {
        self.visited.contains(&id)
    }

    pub fn clear_highlights(&mut self) {
        self.highlights.clear();
        self.visited.clear();
    }

    /// Replace (or drop) the marker on one node. Other nodes keep theirs,
    /// except that only one node can hold the cursor.
    fn highlight(&mut self, id: NodeId, highlight: Option<Highlight>) {
        if highlight == Some(Highlight::Cursor) {
            self.highlights.retain(|_, h| *h != Highlight::Cursor);
        }
        match highlight {
            Some(h) => self.highlights.insert(id, h),
            None => self.highlights.remove(&id),
        };
    }

    /// Redraw outside of a sequence, e.g. after a quick insert or a clear.
    pub fn show<V: Key>(&mut self, tree: &Bst<V>) -> Result<(), ConsumerError> {
        self.draw("== tree", tree)
    }

    pub fn render<V: Key>(&self, tree: &Bst<V>) -> String {
        match tree.root() {
            None => "(empty)".to_string(),
            Some(root) => self.subtree(tree, root, "").to_string(),
        }
    }

    fn subtree<V: Key>(&self, tree: &Bst<V>, node: &Node<V>, side: &str) -> Tree<String> {
        let mut out = Tree::new(self.label(node, side));
        let (left, right) = (tree.left(node), tree.right(node));
        if left.is_some() || right.is_some() {
            for (child, side) in [(left, "L "), (right, "R ")] {
                out.push(match child {
                    Some(child) => self.subtree(tree, child, side),
                    None => Tree::new(format!("{side}·")),
                });
            }
        }
        out
    }

    fn label<V: Key>(&self, node: &Node<V>, side: &str) -> String {
        let marker = self.highlight_of(node.id()).map(|h| h.marker()).unwrap_or("");
        let visited = if self.is_visited(node.id()) { " ✓" } else { "" };
        format!("{side}{}{marker}{visited}", node.value())
    }

    fn draw<V: Key>(&mut self, heading: &str, tree: &Bst<V>) -> Result<(), ConsumerError> {
        self.frame = self.render(tree);
        if let Some(out) = self.out.as_mut() {
            writeln!(out, "{heading}\n{}\n", self.frame).consumer_context("write frame")?;
            out.flush().consumer_context("flush frame")?;
        }
        Ok(())
    }
}

impl<V: Key> StepConsumer<V> for TreeRenderer {
    fn name(&self) -> &'static str {
        "renderer"
    }

    fn on_start(&mut self, operation: &Operation<V>, tree: &Bst<V>) -> Result<(), ConsumerError> {
        self.clear_highlights();
        self.draw(&format!("== {operation}"), tree)
    }

    fn on_step(&mut self, step: &StepEvent<V>, tree: &Bst<V>) -> Result<(), ConsumerError> {
        // a change redraws the tree from scratch, dropping all markers
        if step.kind.category() == StepCategory::Change {
            self.clear_highlights();
        }
        if let Some(node) = &step.node {
            self.highlight(node.id, Highlight::for_kind(step.kind));
            if step.kind == StepKind::TraverseVisit {
                self.visited.insert(node.id);
            }
        }
        if let Some(original) = &step.original_node {
            self.highlight(original.id, Some(Highlight::Found));
        }
        self.draw(&format!("-- {step}"), tree)
    }

    fn on_complete(&mut self, _outcome: &RunOutcome, tree: &Bst<V>) {
        self.clear_highlights();
        // the run is over; a failing writer has nothing left to abort
        let _ = self.draw("== done", tree);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TraversalOrder;

    fn sample() -> Bst<i32> {
        [50, 30, 70, 20].into_iter().collect()
    }

    #[test]
    fn empty_tree_renders_placeholder() {
        let renderer = TreeRenderer::new();
        assert_eq!(renderer.render(&Bst::<i32>::new()), "(empty)");
    }

    #[test]
    fn renders_sides_and_missing_child() {
        let renderer = TreeRenderer::new();
        let frame = renderer.render(&sample());
        assert!(frame.starts_with("50"));
        assert!(frame.contains("L 30"));
        assert!(frame.contains("R 70"));
        assert!(frame.contains("L 20"));
        assert!(frame.contains("R ·"));
    }

    #[test]
    fn visit_markers_accumulate_along_the_path() {
        let tree = sample();
        let mut renderer = TreeRenderer::new();
        let steps: Vec<_> = tree.search(20).collect();
        for step in &steps {
            renderer.on_step(step, &tree).unwrap();
        }
        let frame = renderer.frame();
        assert!(frame.starts_with("50 <visit>"));
        assert!(frame.contains("L 30 <visit>"));
        assert!(frame.contains("L 20 <found>"));
    }

    #[test]
    fn traversal_marks_cursor_and_visited() {
        let tree = sample();
        let mut renderer = TreeRenderer::new();
        let steps: Vec<_> = tree.traverse(TraversalOrder::Preorder).take(2).collect();
        for step in &steps {
            renderer.on_step(step, &tree).unwrap();
        }
        assert!(renderer.frame().starts_with("50 ✓"));
        assert!(renderer.frame().contains("L 30 <here> ✓"));
        renderer.on_complete(&RunOutcome::Completed { steps: 2 }, &tree);
        assert!(!renderer.frame().contains('✓'));
    }

    #[test]
    fn structural_change_clears_markers() {
        let mut tree = sample();
        let mut renderer = TreeRenderer::new();
        let steps: Vec<_> = tree.insert(25).collect();
        for step in &steps {
            renderer.on_step(step, &tree).unwrap();
        }
        assert!(!renderer.frame().contains("<visit>"));
        assert!(renderer.frame().contains("R 25"));
    }
}
