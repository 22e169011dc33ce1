//! Integration tests for fragment parsing.

use wombat_dom::{DomTree, Namespace};
use wombat_html::{ParseFailure, ParseOptions, ParsedFragment, Parser, StrCursor, parse_fragment};

fn fragment(input: &str, context: &str) -> ParsedFragment {
    Parser::new(ParseOptions::html().with_max_errors(100))
        .parse_fragment(input, context)
        .unwrap()
}

fn expected(lines: &[&str]) -> String {
    lines.iter().map(|line| format!("{line}\n")).collect()
}

fn error_messages(parsed: &ParsedFragment) -> Vec<String> {
    parsed.errors.iter().map(|e| e.message.clone()).collect()
}

#[test]
fn test_body_context() {
    let parsed = parse_fragment("<p>a</p><p>b", "body").unwrap();
    assert_eq!(
        parsed.dump(),
        expected(&["| <p>", "|   \"a\"", "| <p>", "|   \"b\""])
    );
    assert_eq!(parsed.nodes().len(), 2);
}

#[test]
fn test_root_is_html_element() {
    let parsed = parse_fragment("x", "div").unwrap();
    let root = parsed.tree.as_element(parsed.root).unwrap();
    assert_eq!(root.tag_name, "html");
    assert_eq!(parsed.tree.parent(parsed.root), Some(parsed.tree.root()));
}

#[test]
fn test_context_element_is_not_in_tree() {
    let parsed = fragment("<span>x</span>", "div");
    let tree = &parsed.tree;
    assert!(tree.find_element(tree.root(), "div").is_none());
    assert!(tree.find_element(tree.root(), "body").is_none());
    assert!(tree.find_element(tree.root(), "head").is_none());
}

#[test]
fn test_document_level_tags_are_ignored_in_body_context() {
    let parsed = fragment("<html><head><title>t</title></head><body>x", "div");
    assert_eq!(
        parsed.dump(),
        expected(&["| <title>", "|   \"t\"", "| \"x\""])
    );
}

#[test]
fn test_table_context() {
    assert_eq!(
        fragment("<tr><td>x", "table").dump(),
        expected(&[
            "| <tbody>",
            "|   <tr>",
            "|     <td>",
            "|       \"x\"",
        ])
    );
}

#[test]
fn test_cell_context_ignores_sibling_cells() {
    let parsed = fragment("a<td>b", "td");
    assert_eq!(parsed.dump(), expected(&["| \"ab\""]));
    assert!(!parsed.errors.is_empty());
}

#[test]
fn test_row_context() {
    assert_eq!(
        fragment("<td>a<td>b", "tr").dump(),
        expected(&["| <td>", "|   \"a\"", "| <td>", "|   \"b\""])
    );
}

#[test]
fn test_title_context_is_rcdata() {
    let parsed = fragment("a<b>&amp;</b>", "title");
    assert_eq!(parsed.dump(), expected(&["| \"a<b>&</b>\""]));
}

#[test]
fn test_style_context_is_rawtext() {
    let parsed = fragment("p > a { color: red } &amp;", "style");
    assert_eq!(parsed.dump(), expected(&["| \"p > a { color: red } &amp;\""]));
}

#[test]
fn test_plaintext_context() {
    let parsed = fragment("<b>x</b>", "plaintext");
    assert_eq!(parsed.dump(), expected(&["| \"<b>x</b>\""]));
}

#[test]
fn test_select_context() {
    let parsed = fragment("<option>a<option>b<p>c", "select");
    assert_eq!(
        parsed.dump(),
        expected(&[
            "| <option>",
            "|   \"a\"",
            "| <option>",
            "|   \"bc\"",
        ])
    );
    assert!(!parsed.errors.is_empty());
}

#[test]
fn test_svg_context() {
    let parsed = fragment("<circle r=\"1\"/><g><rect/></g>", "svg svg");
    let tree = &parsed.tree;
    for name in ["circle", "g", "rect"] {
        let id = tree.find_element(tree.root(), name).unwrap();
        assert_eq!(tree.as_element(id).unwrap().namespace, Namespace::Svg);
    }
    assert_eq!(
        parsed.dump(),
        expected(&[
            "| <svg circle>",
            "|   r=\"1\"",
            "| <svg g>",
            "|   <svg rect>",
        ])
    );
}

#[test]
fn test_math_context() {
    let parsed = fragment("<mi>x</mi>", "math math");
    let tree = &parsed.tree;
    let mi = tree.find_element(tree.root(), "mi").unwrap();
    assert_eq!(tree.as_element(mi).unwrap().namespace, Namespace::MathMl);
}

#[test]
fn test_template_context() {
    assert_eq!(
        fragment("<td>x</td>", "template").dump(),
        expected(&["| <td>", "|   \"x\""])
    );
}

#[test]
fn test_form_context_sets_form_pointer() {
    let parsed = fragment("<form><input>", "form");
    let tree = &parsed.tree;
    assert!(tree.find_element(tree.root(), "form").is_none());
    assert!(tree.find_element(tree.root(), "input").is_some());
}

#[test]
fn test_form_allowed_in_other_contexts() {
    let parsed = fragment("<form><input>", "div");
    let tree = &parsed.tree;
    assert!(tree.find_element(tree.root(), "form").is_some());
}

#[test]
fn test_xml_fragment() {
    let parsed = Parser::new(ParseOptions::xml().with_max_errors(10))
        .parse_fragment("<a/>text<b>x</b>", "root")
        .unwrap();
    assert_eq!(
        parsed.dump(),
        expected(&["| <a>", "| \"text\"", "| <b>", "|   \"x\""])
    );
    assert_eq!(parsed.tree.as_element(parsed.root).unwrap().tag_name, "root");
    assert!(parsed.errors.is_empty());
}

#[test]
fn test_xml_fragment_cannot_close_its_root() {
    let parsed = Parser::new(ParseOptions::xml().with_max_errors(10))
        .parse_fragment("a</root>b<c>", "root")
        .unwrap();
    assert_eq!(parsed.dump(), expected(&["| \"ab\"", "| <c>"]));
    let messages = error_messages(&parsed);
    assert!(
        messages
            .iter()
            .any(|m| m == "end tag </root> would close the fragment root")
    );
    assert!(messages.iter().any(|m| m == "end of file with <c> still open"));
}

#[test]
fn test_cursor_closed_when_fragment_root_cannot_be_created() {
    for options in [ParseOptions::html(), ParseOptions::xml()] {
        let cursor = StrCursor::new("<p>x</p>");
        let handle = cursor.close_handle();
        let mut tree = DomTree::with_node_limit(1);
        let result = Parser::new(options).parse_fragment_with(cursor, &mut tree, "div");
        assert!(matches!(result, Err(ParseFailure::Tree(_))));
        assert!(handle.is_closed());
    }
}
