//! Integration tests for the node mutation protocol.

use rstest::{fixture, rstest};

use rstree::util::testing;
use rstree::{Node, SortedChildren, TreeError, TreeNode};

#[fixture]
fn root() -> Node<&'static str> {
    testing::init_test_setup();
    Node::new("root")
}

/// Asserts parent and child links agree for every node in `nodes`.
fn assert_consistent(nodes: &[Node<&'static str>]) {
    for node in nodes {
        for child in node.mutable_children() {
            assert_eq!(
                child.parent().as_ref(),
                Some(node),
                "child {:?} of {:?} points elsewhere",
                child,
                node
            );
        }
        if let Some(parent) = node.parent() {
            let listed = parent
                .mutable_children()
                .iter()
                .filter(|c| Node::ptr_eq(c, node))
                .count();
            assert_eq!(listed, 1, "{:?} listed {} times by its parent", node, listed);
        }
        for other in nodes {
            if !Node::ptr_eq(other, node) && node.parent().as_ref() != Some(other) {
                assert!(!other.contains(node), "{:?} also listed by {:?}", node, other);
            }
        }
    }
}

fn payloads(node: &Node<&'static str>) -> Vec<&'static str> {
    node.mutable_children().iter().map(|c| *c.data()).collect()
}

// ============================================================
// add
// ============================================================

#[rstest]
fn given_child_added_twice_when_listing_then_appears_once(root: Node<&'static str>) {
    let child = Node::new("c");

    root.add(&child).unwrap();
    root.add(&child).unwrap();

    assert_eq!(root.mutable_children(), vec![child.clone()]);
    assert_eq!(child.parent(), Some(root.clone()));
}

#[rstest]
fn given_chained_adds_when_listing_then_both_are_direct_children(root: Node<&'static str>) {
    let x = Node::new("x");
    let y = Node::new("y");

    root.add(&x).unwrap().add(&y).unwrap();

    assert_eq!(root.mutable_children(), vec![x.clone(), y.clone()]);
    assert!(x.is_leaf());
    assert_eq!(y.parent(), Some(root.clone()));
}

#[rstest]
fn given_children_added_in_order_when_iterating_then_keeps_insertion_order(
    root: Node<&'static str>,
) {
    let c3 = Node::new("c3");
    let c2 = Node::new("c2");
    let c1 = Node::new("c1");

    root.add(&c1).unwrap().add(&c2).unwrap().add(&c3).unwrap();

    assert_eq!(payloads(&root), vec!["c1", "c2", "c3"]);
}

#[rstest]
fn given_removed_child_when_readded_then_goes_to_the_end(root: Node<&'static str>) {
    let a = Node::new("a");
    let b = Node::new("b");
    let c = Node::new("c");
    root.add(&a).unwrap().add(&b).unwrap().add(&c).unwrap();

    assert!(root.remove(&b));
    root.add(&b).unwrap();

    assert_eq!(payloads(&root), vec!["a", "c", "b"]);
}

#[rstest]
fn given_child_of_other_parent_when_adding_then_moves_it(root: Node<&'static str>) {
    let other = Node::new("other");
    let child = Node::with_parent("c", &other);

    root.add(&child).unwrap();

    assert!(other.is_leaf());
    assert_eq!(child.parent(), Some(root.clone()));
    assert_consistent(&[root.clone(), other, child]);
}

// ============================================================
// set_parent
// ============================================================

#[rstest]
fn given_parentless_node_when_setting_parent_then_parent_lists_it(root: Node<&'static str>) {
    let child = Node::new("c");

    child.set_parent(Some(&root)).unwrap();

    assert_eq!(child.parent(), Some(root.clone()));
    assert_eq!(root.mutable_children(), vec![child]);
}

#[rstest]
fn given_child_when_reparenting_then_moves_without_duplicating() {
    let p1 = Node::new("p1");
    let p2 = Node::new("p2");
    let child = Node::with_parent("c", &p1);

    child.set_parent(Some(&p2)).unwrap();

    assert!(!p1.contains(&child));
    assert!(p1.is_leaf());
    assert_eq!(p2.mutable_children(), vec![child.clone()]);
    assert_eq!(child.parent(), Some(p2.clone()));
}

#[rstest]
fn given_current_parent_when_setting_again_then_order_is_untouched(root: Node<&'static str>) {
    let a = Node::with_parent("a", &root);
    let b = Node::with_parent("b", &root);

    a.set_parent(Some(&root)).unwrap();

    assert_eq!(root.mutable_children(), vec![a, b]);
}

#[rstest]
fn given_child_when_setting_parent_to_none_then_both_are_leaves(root: Node<&'static str>) {
    let child = Node::with_parent("c", &root);

    child.set_parent(None).unwrap();

    assert!(child.is_leaf());
    assert!(root.is_leaf());
    assert!(child.parent().is_none());
}

// ============================================================
// remove / remove_from_parent
// ============================================================

#[rstest]
fn given_child_when_removing_then_returns_true_and_clears_parent(root: Node<&'static str>) {
    let child = Node::with_parent("c", &root);

    assert!(root.remove(&child));
    assert!(child.parent().is_none());
    assert!(root.is_leaf());
}

#[rstest]
fn given_stranger_when_removing_then_returns_false(root: Node<&'static str>) {
    let other = Node::new("other");
    let stranger = Node::with_parent("s", &other);

    assert!(!root.remove(&stranger));
    assert_eq!(stranger.parent(), Some(other));
}

#[rstest]
fn given_child_when_removed_twice_then_second_call_returns_false(root: Node<&'static str>) {
    let child = Node::with_parent("c", &root);

    assert!(root.remove(&child));
    assert!(!root.remove(&child));
}

#[rstest]
fn given_child_when_removing_from_parent_then_detaches(root: Node<&'static str>) {
    let child = Node::with_parent("c", &root);

    child.remove_from_parent();

    assert!(child.parent().is_none());
    assert!(root.is_leaf());
}

#[rstest]
fn given_root_when_removing_from_parent_then_nothing_happens(root: Node<&'static str>) {
    let child = Node::with_parent("c", &root);

    root.remove_from_parent();

    assert!(root.is_root());
    assert_eq!(root.mutable_children(), vec![child]);
}

// ============================================================
// Dropped parents
// ============================================================

/// A child whose parent handle was dropped while it stayed listed.
fn orphan() -> Node<&'static str> {
    let child = Node::new("orphan");
    let gone = Node::new("gone");
    gone.add(&child).unwrap();
    drop(gone);
    child
}

#[rstest]
fn given_orphan_when_setting_new_parent_then_links_are_consistent(root: Node<&'static str>) {
    let child = orphan();
    assert!(child.is_root());

    child.set_parent(Some(&root)).unwrap();

    assert_eq!(child.parent(), Some(root.clone()));
    assert_eq!(root.mutable_children(), vec![child.clone()]);
    assert_consistent(&[root.clone(), child.clone()]);

    child.remove_from_parent();

    assert!(child.is_root());
    assert!(root.is_leaf());
    assert_consistent(&[root.clone(), child]);
}

#[rstest]
fn given_orphan_when_added_to_new_parent_then_links_are_consistent(root: Node<&'static str>) {
    let child = orphan();

    root.add(&child).unwrap();

    assert_eq!(child.parent(), Some(root.clone()));
    assert_consistent(&[root.clone(), child]);
}

#[rstest]
fn given_orphan_when_setting_parent_to_none_then_stays_root() {
    testing::init_test_setup();
    let child = orphan();

    child.set_parent(None).unwrap();
    child.remove_from_parent();

    assert!(child.is_root());
    assert!(child.is_leaf());
}

// ============================================================
// Teardown
// ============================================================

const DEEP: usize = 100_000;

#[test]
fn given_deep_chain_when_dropping_root_then_does_not_overflow() {
    testing::init_test_setup();
    let mut top = Node::new(0);
    for i in 1..DEEP {
        let parent = Node::new(i);
        parent.add(&top).unwrap();
        top = parent;
    }

    assert_eq!(*top.data(), DEEP - 1);
    drop(top);
}

#[test]
fn given_deep_sorted_chain_when_dropping_root_then_does_not_overflow() {
    testing::init_test_setup();
    let mut top = Node::with_children(0, SortedChildren::default());
    for i in 1..DEEP {
        let parent = Node::with_children(i, SortedChildren::default());
        parent.add(&top).unwrap();
        top = parent;
    }

    drop(top);
}

#[test]
fn given_deep_chain_with_kept_leaf_when_dropping_root_then_leaf_becomes_root() {
    testing::init_test_setup();
    let leaf = Node::new(0);
    let mut top = leaf.clone();
    for i in 1..DEEP {
        let parent = Node::new(i);
        parent.add(&top).unwrap();
        top = parent;
    }

    drop(top);

    assert!(leaf.is_root());
    assert_eq!(*leaf.data(), 0);
}

// ============================================================
// Cycles
// ============================================================

#[rstest]
fn given_node_when_adding_itself_then_rejects(root: Node<&'static str>) {
    assert!(matches!(root.add(&root), Err(TreeError::SelfParent)));
    assert!(matches!(root.set_parent(Some(&root)), Err(TreeError::SelfParent)));
    assert!(root.is_leaf());
}

#[rstest]
fn given_grandchild_when_adopting_root_then_rejects_and_keeps_links(root: Node<&'static str>) {
    let mid = Node::with_parent("mid", &root);
    let leaf = Node::with_parent("leaf", &mid);

    assert!(matches!(leaf.add(&root), Err(TreeError::CycleRejected)));
    assert!(matches!(root.set_parent(Some(&leaf)), Err(TreeError::CycleRejected)));

    assert!(root.is_root());
    assert_consistent(&[root.clone(), mid, leaf]);
}

#[rstest]
fn given_sibling_subtree_when_moving_under_cousin_then_is_allowed(root: Node<&'static str>) {
    let a = Node::with_parent("a", &root);
    let b = Node::with_parent("b", &root);
    let b1 = Node::with_parent("b1", &b);

    a.set_parent(Some(&b1)).unwrap();

    assert_eq!(payloads(&root), vec!["b"]);
    assert_eq!(a.parent(), Some(b1.clone()));
    assert_consistent(&[root.clone(), a, b, b1]);
}

// ============================================================
// Mutual consistency across mixed operations
// ============================================================

#[derive(Debug, Clone, Copy)]
enum Op {
    Add(usize, usize),
    SetParent(usize, Option<usize>),
    Remove(usize, usize),
    Detach(usize),
}

#[rstest]
#[case::shuffle(vec![
    Op::Add(0, 1), Op::Add(0, 2), Op::Add(1, 3), Op::SetParent(3, Some(2)),
    Op::Remove(0, 1), Op::Add(2, 1), Op::Detach(3), Op::Add(1, 3),
])]
#[case::rejected_cycles_are_ignored(vec![
    Op::Add(0, 1), Op::Add(1, 2), Op::Add(2, 0), Op::SetParent(0, Some(2)),
    Op::Add(2, 3), Op::SetParent(1, Some(3)), Op::Detach(1),
])]
#[case::repeated_ops(vec![
    Op::Add(0, 1), Op::Add(0, 1), Op::SetParent(1, Some(0)), Op::Remove(2, 1),
    Op::Detach(1), Op::Detach(1), Op::SetParent(1, None), Op::Add(3, 1),
])]
fn given_operation_sequence_when_applied_then_links_stay_consistent(#[case] ops: Vec<Op>) {
    testing::init_test_setup();
    let nodes: Vec<Node<&'static str>> = ["n0", "n1", "n2", "n3"]
        .into_iter()
        .map(Node::new)
        .collect();

    for op in ops {
        match op {
            Op::Add(p, c) => {
                let _ = nodes[p].add(&nodes[c]);
            }
            Op::SetParent(c, p) => {
                let _ = nodes[c].set_parent(p.map(|p| &nodes[p]));
            }
            Op::Remove(p, c) => {
                nodes[p].remove(&nodes[c]);
            }
            Op::Detach(c) => nodes[c].remove_from_parent(),
        }
        assert_consistent(&nodes);
    }
}

#[rstest]
fn given_leaf_check_when_children_change_then_tracks_emptiness(root: Node<&'static str>) {
    assert!(root.is_leaf());
    let child = Node::with_parent("c", &root);
    assert!(!root.is_leaf());
    child.remove_from_parent();
    assert!(root.is_leaf());
}
