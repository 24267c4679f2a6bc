//! Tests for the step-emitting binary search tree.
//!
//! Covers the ordering invariant across arbitrary insert/delete mixes, the
//! exact event vocabulary of each operation, and the guarantee that the tree
//! already reflects an event when that event is observed.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rstest::{fixture, rstest};

use bstviz::domain::{Bst, StepKind, StepSource, TraversalOrder};

#[fixture]
fn sample() -> Bst<i32> {
    [50, 30, 70, 20, 40, 60, 80].into_iter().collect()
}

fn kinds<I: Iterator<Item = bstviz::domain::StepEvent<i32>>>(steps: I) -> Vec<StepKind> {
    steps.map(|s| s.kind).collect()
}

// ============================================================
// Ordering invariant
// ============================================================

#[test]
fn given_random_inserts_and_deletes_when_each_completes_then_invariant_holds() {
    // Arrange
    let mut rng = StdRng::seed_from_u64(0xb57);
    let mut tree: Bst<i32> = Bst::new();
    let mut shadow = std::collections::BTreeSet::new();

    // Act / Assert
    for _ in 0..500 {
        let value = rng.gen_range(0..60);
        if rng.gen_bool(0.6) {
            tree.insert(value).for_each(drop);
            shadow.insert(value);
        } else {
            tree.delete(value).for_each(drop);
            shadow.remove(&value);
        }
        assert!(tree.check_invariant(), "invariant broken after touching {value}");
        assert_eq!(tree.len(), shadow.len());
    }
    assert_eq!(tree.inorder_values(), shadow.into_iter().collect::<Vec<_>>());
}

// ============================================================
// Insert
// ============================================================

#[rstest]
fn given_present_value_when_insert_then_single_duplicate_after_visits(mut sample: Bst<i32>) {
    // Act
    let steps = kinds(sample.insert(40));

    // Assert
    assert_eq!(
        steps,
        vec![StepKind::Visit, StepKind::Visit, StepKind::Visit, StepKind::FoundDuplicate]
    );
    assert_eq!(sample.len(), 7);
    assert_eq!(sample.inorder_values(), vec![20, 30, 40, 50, 60, 70, 80]);
}

#[test]
fn given_empty_tree_when_insert_then_root_exists_as_event_is_observed() {
    // Arrange
    let mut tree: Bst<i32> = Bst::new();
    let mut steps = tree.insert(42);

    // Act
    let first = steps.next().expect("one event");

    // Assert
    assert_eq!(first.kind, StepKind::InsertRoot);
    assert_eq!(steps.tree().root().map(|n| *n.value()), Some(42));
    assert_eq!(first.node.as_ref().map(|n| n.value), Some(42));
    assert!(steps.next().is_none());
    assert!(steps.next().is_none(), "producer stays exhausted");
}

#[rstest]
fn given_new_value_when_insert_then_node_attached_exactly_at_final_event(mut sample: Bst<i32>) {
    // Arrange
    let mut steps = sample.insert(65);
    let mut attached_at = None;

    // Act
    let mut index = 0;
    while let Some(step) = steps.next() {
        if steps.tree().contains(&65) && attached_at.is_none() {
            attached_at = Some((index, step.kind));
        }
        index += 1;
    }

    // Assert
    assert_eq!(attached_at, Some((3, StepKind::InsertRight)));
}

// ============================================================
// Search
// ============================================================

#[test]
fn given_empty_tree_when_search_then_single_empty_event_and_false() {
    let tree: Bst<i32> = Bst::new();
    let mut steps = tree.search(5);

    assert_eq!(kinds(steps.by_ref()), vec![StepKind::Empty]);
    assert_eq!(steps.outcome(), Some(false));
}

#[rstest]
fn given_present_value_when_search_then_visits_moves_and_found(sample: Bst<i32>) {
    let mut steps = sample.search(60);
    let events: Vec<_> = steps.by_ref().collect();

    assert_eq!(
        events.iter().map(|e| e.kind).collect::<Vec<_>>(),
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
    assert_eq!(steps.outcome(), Some(true));
}

// ============================================================
// Delete
// ============================================================

#[rstest]
#[case(20)]
#[case(30)]
#[case(50)]
#[case(80)]
fn given_present_value_when_delete_then_search_reports_not_found(
    mut sample: Bst<i32>,
    #[case] value: i32,
) {
    // Act
    let done = sample
        .delete(value)
        .filter(|s| s.kind == StepKind::DeleteDone)
        .count();

    // Assert
    assert_eq!(done, 1);
    assert_eq!(sample.len(), 6);
    assert!(sample.check_invariant());
    let last = sample.search(value).last().map(|s| s.kind);
    assert_eq!(last, Some(StepKind::NotFound));
}

#[rstest]
fn given_two_children_when_delete_then_inorder_loses_only_that_value(mut sample: Bst<i32>) {
    // Act
    let events: Vec<_> = sample.delete(50).collect();

    // Assert
    let done = events.last().expect("events");
    assert_eq!(done.kind, StepKind::DeleteDone);
    assert!(done.is_swap);
    assert_eq!(done.updated_value, Some(60));
    assert_eq!(done.node.as_ref().map(|n| n.value), Some(60));
    assert_eq!(sample.inorder_values(), vec![20, 30, 40, 60, 70, 80]);
    assert_eq!(sample.root().map(|n| *n.value()), Some(60));
}

#[rstest]
fn given_two_children_when_delete_then_root_keeps_identity(mut sample: Bst<i32>) {
    let root_id = sample.root().map(|n| n.id());

    let events: Vec<_> = sample.delete(50).collect();

    let swap = events.last().and_then(|e| e.original_node.clone());
    assert_eq!(swap.map(|n| n.id), root_id);
    assert_eq!(sample.root().map(|n| n.id()), root_id);
}

#[rstest]
fn given_absent_value_when_delete_then_tree_unchanged(mut sample: Bst<i32>) {
    let steps = kinds(sample.delete(65));

    assert_eq!(steps.last(), Some(&StepKind::NotFound));
    assert_eq!(sample.len(), 7);
}

#[test]
fn given_empty_tree_when_delete_then_single_empty_event() {
    let mut tree: Bst<i32> = Bst::new();
    assert_eq!(kinds(tree.delete(1)), vec![StepKind::Empty]);
}

// ============================================================
// Traversal
// ============================================================

#[rstest]
#[case(TraversalOrder::Inorder, vec![20, 30, 40, 50, 60, 70, 80])]
#[case(TraversalOrder::Preorder, vec![50, 30, 20, 40, 70, 60, 80])]
#[case(TraversalOrder::Postorder, vec![20, 40, 30, 60, 80, 70, 50])]
fn given_sample_tree_when_traverse_then_visits_in_order(
    sample: Bst<i32>,
    #[case] order: TraversalOrder,
    #[case] expected: Vec<i32>,
) {
    let steps: Vec<_> = sample.traverse(order).collect();

    assert!(steps.iter().all(|s| s.kind == StepKind::TraverseVisit));
    let values: Vec<_> = steps.into_iter().filter_map(|s| s.node.map(|n| n.value)).collect();
    assert_eq!(values, expected);
}

#[test]
fn given_empty_tree_when_traverse_then_no_events() {
    let tree: Bst<i32> = Bst::new();
    assert_eq!(tree.traverse(TraversalOrder::Inorder).count(), 0);
}

#[test]
fn given_order_names_when_parsed_then_accepts_short_and_mixed_case() {
    assert_eq!("PreOrder".parse::<TraversalOrder>().ok(), Some(TraversalOrder::Preorder));
    assert_eq!(" post ".parse::<TraversalOrder>().ok(), Some(TraversalOrder::Postorder));
    assert!("levelorder".parse::<TraversalOrder>().is_err());
}
