//! Tests for the `NodeFactory` implementation on `DomTree`.

use wombat_common::{Position, SourceRange};
use wombat_dom::{
    Attribute, DomTree, Namespace, NodeFactory, NodeId, QuirksMode, SourceRangeKind, TreeError,
};

fn element(tree: &mut DomTree, name: &str) -> NodeId {
    let id = tree.create_element(name, Namespace::Html, Vec::new()).unwrap();
    NodeFactory::append_child(tree, NodeId::ROOT, id).unwrap();
    id
}

#[test]
fn test_append_text_merges_adjacent_runs() {
    let mut tree = DomTree::new();
    let p = element(&mut tree, "p");

    tree.append_text(p, "one ").unwrap();
    tree.append_text(p, "two").unwrap();

    assert_eq!(tree.children(p).len(), 1);
    assert_eq!(tree.text_content(p), "one two");
}

#[test]
fn test_append_text_after_element_starts_new_node() {
    let mut tree = DomTree::new();
    let p = element(&mut tree, "p");
    tree.append_text(p, "a").unwrap();
    let b = tree.create_element("b", Namespace::Html, Vec::new()).unwrap();
    NodeFactory::append_child(&mut tree, p, b).unwrap();
    tree.append_text(p, "c").unwrap();

    assert_eq!(tree.children(p).len(), 3);
}

#[test]
fn test_insert_text_before_merges_with_previous_text() {
    let mut tree = DomTree::new();
    let body = element(&mut tree, "body");
    tree.append_text(body, "foo").unwrap();
    let table = tree.create_element("table", Namespace::Html, Vec::new()).unwrap();
    NodeFactory::append_child(&mut tree, body, table).unwrap();

    tree.insert_text_before(body, table, "bar").unwrap();

    let children = tree.children(body);
    assert_eq!(children.len(), 2);
    assert_eq!(tree.as_text(children[0]), Some("foobar"));
    assert_eq!(children[1], table);
}

#[test]
fn test_add_attributes_if_missing_keeps_existing_values() {
    let mut tree = DomTree::new();
    let html = tree
        .create_element("html", Namespace::Html, vec![Attribute::new("lang", "en")])
        .unwrap();

    tree.add_attributes_if_missing(
        html,
        vec![Attribute::new("lang", "fr"), Attribute::new("dir", "ltr")],
    )
    .unwrap();

    let data = tree.as_element(html).unwrap();
    assert_eq!(data.get_attribute("lang"), Some("en"));
    assert_eq!(data.get_attribute("dir"), Some("ltr"));
}

#[test]
fn test_node_limit_is_enforced() {
    let mut tree = DomTree::with_node_limit(2);
    let _ = tree.create_element("html", Namespace::Html, Vec::new()).unwrap();

    let err = tree.create_comment("too many").unwrap_err();

    assert_eq!(err, TreeError::NodeLimitExceeded { limit: 2 });
}

#[test]
fn test_unknown_handle_is_rejected() {
    let mut tree = DomTree::new();
    let err = NodeFactory::append_child(&mut tree, NodeId::ROOT, NodeId(42)).unwrap_err();
    assert_eq!(err, TreeError::UnknownNode(42));
}

#[test]
fn test_source_ranges_and_quirks_are_stored() {
    let mut tree = DomTree::new();
    let p = element(&mut tree, "p");
    let start = SourceRange::new(Position::START, Position::new(3, 1, 4));

    tree.set_source_range(p, SourceRangeKind::Start, start);
    tree.set_quirks_mode(QuirksMode::Quirks);

    assert_eq!(tree.get(p).unwrap().start_range, Some(start));
    assert_eq!(tree.get(p).unwrap().end_range, None);
    assert_eq!(tree.quirks_mode(), QuirksMode::Quirks);
}

#[test]
fn test_reparent_children_and_remove() {
    let mut tree = DomTree::new();
    let from = element(&mut tree, "b");
    let to = element(&mut tree, "i");
    tree.append_text(from, "text").unwrap();

    tree.reparent_children(from, to).unwrap();
    tree.remove_from_parent(from).unwrap();

    assert_eq!(tree.text_content(to), "text");
    assert_eq!(tree.parent_of(from), None);
    assert_eq!(tree.children(NodeId::ROOT), &[to]);
}

#[test]
fn test_dump_uses_html5lib_format() {
    let mut tree = DomTree::new();
    let doctype = tree.create_doctype("html", "", "").unwrap();
    NodeFactory::append_child(&mut tree, NodeId::ROOT, doctype).unwrap();
    let html = tree
        .create_element("html", Namespace::Html, vec![Attribute::new("lang", "en")])
        .unwrap();
    NodeFactory::append_child(&mut tree, NodeId::ROOT, html).unwrap();
    let svg = tree.create_element("svg", Namespace::Svg, Vec::new()).unwrap();
    NodeFactory::append_child(&mut tree, html, svg).unwrap();
    tree.append_text(html, "hi").unwrap();

    assert_eq!(
        tree.dump(),
        "| <!DOCTYPE html>\n| <html>\n|   lang=\"en\"\n|   <svg svg>\n|   \"hi\"\n"
    );
}
