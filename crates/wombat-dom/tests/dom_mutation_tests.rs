//! Tests for DOM tree mutation: remove_child, insert_before, move_children, detach.

use wombat_dom::{DomTree, ElementData, Namespace, NodeId, NodeType};

/// Allocate an HTML element and return its id.
fn alloc_element(tree: &mut DomTree, tag: &str) -> NodeId {
    tree.alloc(NodeType::Element(ElementData::new(tag, Namespace::Html)))
        .unwrap()
}

/// A `div` under the document with three children `a`, `b`, `c`.
fn three_children(tree: &mut DomTree) -> (NodeId, NodeId, NodeId, NodeId) {
    let parent = alloc_element(tree, "div");
    tree.append_child(NodeId::ROOT, parent);
    let a = alloc_element(tree, "a");
    let b = alloc_element(tree, "b");
    let c = alloc_element(tree, "c");
    tree.append_child(parent, a);
    tree.append_child(parent, b);
    tree.append_child(parent, c);
    (parent, a, b, c)
}

// ========== remove_child ==========

#[test]
fn test_remove_only_child() {
    let mut tree = DomTree::new();
    let parent = alloc_element(&mut tree, "div");
    tree.append_child(NodeId::ROOT, parent);
    let child = alloc_element(&mut tree, "p");
    tree.append_child(parent, child);

    tree.remove_child(parent, child);

    assert!(tree.children(parent).is_empty());
    assert_eq!(tree.parent(child), None);
    assert_eq!(tree.prev_sibling(child), None);
    assert_eq!(tree.next_sibling(child), None);
}

#[test]
fn test_remove_middle_child_relinks_neighbours() {
    let mut tree = DomTree::new();
    let (parent, a, b, c) = three_children(&mut tree);

    tree.remove_child(parent, b);

    assert_eq!(tree.children(parent), &[a, c]);
    assert_eq!(tree.next_sibling(a), Some(c));
    assert_eq!(tree.prev_sibling(c), Some(a));
}

#[test]
fn test_remove_first_and_last_child() {
    let mut tree = DomTree::new();
    let (parent, a, b, c) = three_children(&mut tree);

    tree.remove_child(parent, a);
    tree.remove_child(parent, c);

    assert_eq!(tree.children(parent), &[b]);
    assert_eq!(tree.prev_sibling(b), None);
    assert_eq!(tree.next_sibling(b), None);
}

#[test]
fn test_remove_non_child_is_noop() {
    let mut tree = DomTree::new();
    let (parent, a, b, c) = three_children(&mut tree);
    let stranger = alloc_element(&mut tree, "span");

    tree.remove_child(parent, stranger);

    assert_eq!(tree.children(parent), &[a, b, c]);
}

// ========== insert_before ==========

#[test]
fn test_insert_before_first_child() {
    let mut tree = DomTree::new();
    let (parent, a, b, c) = three_children(&mut tree);
    let new = alloc_element(&mut tree, "em");

    tree.insert_before(parent, new, a);

    assert_eq!(tree.children(parent), &[new, a, b, c]);
    assert_eq!(tree.prev_sibling(new), None);
    assert_eq!(tree.next_sibling(new), Some(a));
    assert_eq!(tree.prev_sibling(a), Some(new));
    assert_eq!(tree.parent(new), Some(parent));
}

#[test]
fn test_insert_before_middle_child() {
    let mut tree = DomTree::new();
    let (parent, a, b, c) = three_children(&mut tree);
    let new = alloc_element(&mut tree, "em");

    tree.insert_before(parent, new, b);

    assert_eq!(tree.children(parent), &[a, new, b, c]);
    assert_eq!(tree.next_sibling(a), Some(new));
    assert_eq!(tree.prev_sibling(new), Some(a));
    assert_eq!(tree.next_sibling(new), Some(b));
}

#[test]
fn test_insert_before_moves_attached_node() {
    let mut tree = DomTree::new();
    let (parent, a, b, c) = three_children(&mut tree);

    tree.insert_before(parent, c, a);

    assert_eq!(tree.children(parent), &[c, a, b]);
    assert_eq!(tree.next_sibling(b), None);
    assert_eq!(tree.prev_sibling(c), None);
}

#[test]
fn test_insert_before_unknown_reference_appends() {
    let mut tree = DomTree::new();
    let (parent, a, b, c) = three_children(&mut tree);
    let stranger = alloc_element(&mut tree, "span");
    let new = alloc_element(&mut tree, "em");

    tree.insert_before(parent, new, stranger);

    assert_eq!(tree.children(parent), &[a, b, c, new]);
}

// ========== move_children / detach ==========

#[test]
fn test_move_children_preserves_order() {
    let mut tree = DomTree::new();
    let (parent, a, b, c) = three_children(&mut tree);
    let target = alloc_element(&mut tree, "section");
    tree.append_child(NodeId::ROOT, target);
    let existing = alloc_element(&mut tree, "h1");
    tree.append_child(target, existing);

    tree.move_children(parent, target);

    assert!(tree.children(parent).is_empty());
    assert_eq!(tree.children(target), &[existing, a, b, c]);
    assert_eq!(tree.parent(a), Some(target));
    assert_eq!(tree.prev_sibling(a), Some(existing));
}

#[test]
fn test_append_child_reparents() {
    let mut tree = DomTree::new();
    let (parent, a, b, c) = three_children(&mut tree);
    let other = alloc_element(&mut tree, "aside");
    tree.append_child(NodeId::ROOT, other);

    tree.append_child(other, b);

    assert_eq!(tree.children(parent), &[a, c]);
    assert_eq!(tree.children(other), &[b]);
    assert!(tree.is_descendant_of(b, other));
    assert!(!tree.is_descendant_of(b, parent));
}

#[test]
fn test_descendants_are_in_document_order() {
    let mut tree = DomTree::new();
    let (parent, a, b, c) = three_children(&mut tree);
    let inner = alloc_element(&mut tree, "i");
    tree.append_child(a, inner);

    let order: Vec<NodeId> = tree.descendants(parent).collect();

    assert_eq!(order, vec![parent, a, inner, b, c]);
}
