//! Integration tests for XML tree construction.

use wombat_dom::{DomTree, Namespace, NodeId, NodeType};
use wombat_html::{ParseOptions, ParsedDocument, Parser};

fn parse_xml(input: &str) -> ParsedDocument {
    Parser::new(ParseOptions::xml().with_max_errors(100))
        .parse_str(input)
        .unwrap()
}

fn parse_xml_with_namespaces(input: &str) -> ParsedDocument {
    Parser::new(
        ParseOptions::xml()
            .with_max_errors(100)
            .with_namespace_aware(true),
    )
    .parse_str(input)
    .unwrap()
}

fn expected(lines: &[&str]) -> String {
    lines.iter().map(|line| format!("{line}\n")).collect()
}

fn error_messages(parsed: &ParsedDocument) -> Vec<String> {
    parsed.errors.iter().map(|e| e.message.clone()).collect()
}

fn namespace_of(tree: &DomTree, name: &str) -> Namespace {
    let id: NodeId = tree.find_element(tree.root(), name).unwrap();
    tree.as_element(id).unwrap().namespace
}

#[test]
fn test_well_formed_document() {
    let parsed = parse_xml("<note><to>Tove</to><from>Jani</from></note>");
    assert_eq!(
        parsed.dump(),
        expected(&[
            "| <note>",
            "|   <to>",
            "|     \"Tove\"",
            "|   <from>",
            "|     \"Jani\"",
        ])
    );
    assert!(parsed.errors.is_empty());
}

#[test]
fn test_case_is_preserved() {
    let parsed = parse_xml(r#"<Root myAttr="1"><childNode/></Root>"#);
    assert_eq!(
        parsed.dump(),
        expected(&["| <Root>", "|   myAttr=\"1\"", "|   <childNode>"])
    );
}

#[test]
fn test_html_elements_have_no_special_rules() {
    let parsed = parse_xml("<p><p>x</p><table>y</table><script>a<b/></script></p>");
    assert_eq!(
        parsed.dump(),
        expected(&[
            "| <p>",
            "|   <p>",
            "|     \"x\"",
            "|   <table>",
            "|     \"y\"",
            "|   <script>",
            "|     \"a\"",
            "|     <b>",
        ])
    );
    assert!(parsed.errors.is_empty());
}

#[test]
fn test_mismatched_end_tag_closes_inner_elements() {
    let parsed = parse_xml("<a><b><c></a>tail");
    assert_eq!(
        parsed.dump(),
        expected(&["| <a>", "|   <b>", "|     <c>"])
    );
    let messages = error_messages(&parsed);
    assert!(messages.iter().any(|m| m == "<c> closed by </a>"));
    assert!(messages.iter().any(|m| m == "<b> closed by </a>"));
    assert!(
        messages
            .iter()
            .any(|m| m == "character data outside the root element")
    );
}

#[test]
fn test_unmatched_end_tag_is_ignored() {
    let parsed = parse_xml("<a></b>x</a>");
    assert_eq!(parsed.dump(), expected(&["| <a>", "|   \"x\""]));
    assert_eq!(error_messages(&parsed), vec!["end tag </b> matches no open element"]);
}

#[test]
fn test_unclosed_elements_at_eof() {
    let parsed = parse_xml("<a><b>");
    let messages = error_messages(&parsed);
    assert_eq!(
        messages,
        vec![
            "end of file with <b> still open",
            "end of file with <a> still open"
        ]
    );
}

#[test]
fn test_processing_instructions() {
    let parsed = parse_xml(
        "<?xml version=\"1.0\"?>\n<?xml-stylesheet href=\"a.css\"?><doc/>",
    );
    assert_eq!(
        parsed.dump(),
        expected(&[
            "| <?xml version=\"1.0\">",
            "| <?xml-stylesheet href=\"a.css\">",
            "| <doc>",
        ])
    );
    let tree = &parsed.tree;
    let first = tree.children(tree.root())[0];
    match &tree.get(first).unwrap().node_type {
        NodeType::ProcessingInstruction { target, data } => {
            assert_eq!(target, "xml");
            assert_eq!(data, "version=\"1.0\"");
        }
        other => panic!("Expected processing instruction, got {other:?}"),
    }
}

#[test]
fn test_late_xml_declaration_is_an_error() {
    let parsed = parse_xml("<doc/><?xml version=\"1.0\"?>");
    assert!(
        error_messages(&parsed)
            .iter()
            .any(|m| m == "XML declaration not at the start of the document")
    );
}

#[test]
fn test_prolog_is_not_an_error() {
    let parsed = parse_xml(
        "<?xml version=\"1.0\"?><!--generated--><?xml-stylesheet href=\"a.css\"?><!DOCTYPE note><note/>",
    );
    assert_eq!(error_messages(&parsed), Vec::<String>::new());
    assert_eq!(
        parsed.dump(),
        expected(&[
            "| <?xml version=\"1.0\">",
            "| <!-- generated -->",
            "| <?xml-stylesheet href=\"a.css\">",
            "| <!DOCTYPE note>",
            "| <note>",
        ])
    );
}

#[test]
fn test_doctype_after_root_is_an_error() {
    let parsed = parse_xml("<note/><!DOCTYPE note>");
    assert_eq!(error_messages(&parsed), vec!["DOCTYPE after document content"]);
}

#[test]
fn test_cdata_section() {
    let parsed = parse_xml("<doc><![CDATA[<not> & markup]]></doc>");
    assert_eq!(
        parsed.dump(),
        expected(&["| <doc>", "|   <![CDATA[<not> & markup]]>"])
    );
}

#[test]
fn test_comments_and_declarations() {
    let parsed = parse_xml("<!-- c --><!ELEMENT doc ANY><doc/>");
    let tree = &parsed.tree;
    let children = tree.children(tree.root());
    assert_eq!(children.len(), 3);
    assert!(matches!(
        &tree.get(children[0]).unwrap().node_type,
        NodeType::Comment(data) if data == " c "
    ));
    assert!(matches!(
        &tree.get(children[1]).unwrap().node_type,
        NodeType::Comment(_)
    ));
}

#[test]
fn test_entities_are_decoded() {
    let parsed = parse_xml("<doc a=\"&lt;&amp;\">&gt;&#65;</doc>");
    let doc = parsed.tree.document_element().unwrap();
    let data = parsed.tree.as_element(doc).unwrap();
    assert_eq!(data.get_attribute("a"), Some("<&"));
    assert_eq!(parsed.tree.text_content(doc), ">A");
}

#[test]
fn test_duplicate_attributes_are_case_sensitive() {
    let parsed = parse_xml(r#"<doc a="1" A="2" a="3"/>"#);
    let doc = parsed.tree.document_element().unwrap();
    let data = parsed.tree.as_element(doc).unwrap();
    assert_eq!(data.attrs.len(), 2);
    assert_eq!(data.get_attribute("a"), Some("1"));
    assert_eq!(data.get_attribute("A"), Some("2"));
    assert_eq!(
        error_messages(&parsed),
        vec!["duplicate-attribute: 1 duplicate(s) on <doc> dropped"]
    );
}

#[test]
fn test_second_root_element_is_an_error() {
    let parsed = parse_xml("<a/><b/>");
    assert!(
        error_messages(&parsed)
            .iter()
            .any(|m| m == "second root element <b>")
    );
    assert_eq!(parsed.tree.children(parsed.tree.root()).len(), 2);
}

#[test]
fn test_whitespace_outside_root_is_dropped_silently() {
    let parsed = parse_xml("  <a/>\n");
    assert!(parsed.errors.is_empty());
    assert_eq!(parsed.dump(), expected(&["| <a>"]));
}

#[test]
fn test_namespaces_ignored_by_default() {
    let parsed = parse_xml(r#"<svg xmlns="http://www.w3.org/2000/svg"/>"#);
    assert_eq!(namespace_of(&parsed.tree, "svg"), Namespace::Xml);
}

#[test]
fn test_default_namespace_resolution() {
    let parsed = parse_xml_with_namespaces(
        r#"<html xmlns="http://www.w3.org/1999/xhtml"><body><svg xmlns="http://www.w3.org/2000/svg"><g/></svg><p/></body></html>"#,
    );
    let tree = &parsed.tree;
    assert_eq!(namespace_of(tree, "html"), Namespace::Html);
    assert_eq!(namespace_of(tree, "body"), Namespace::Html);
    assert_eq!(namespace_of(tree, "svg"), Namespace::Svg);
    assert_eq!(namespace_of(tree, "g"), Namespace::Svg);
    assert_eq!(namespace_of(tree, "p"), Namespace::Html);
    assert!(parsed.errors.is_empty());
}

#[test]
fn test_prefixed_namespace_resolution() {
    let parsed = parse_xml_with_namespaces(
        r#"<doc xmlns:m="http://www.w3.org/1998/Math/MathML"><m:math/><plain/></doc>"#,
    );
    let tree = &parsed.tree;
    assert_eq!(namespace_of(tree, "m:math"), Namespace::MathMl);
    assert_eq!(namespace_of(tree, "plain"), Namespace::Xml);
}

#[test]
fn test_prefix_scope_ends_with_its_element() {
    let parsed = parse_xml_with_namespaces(
        r#"<doc><a xmlns:s="http://www.w3.org/2000/svg"><s:x/></a><s:y/></doc>"#,
    );
    let tree = &parsed.tree;
    assert_eq!(namespace_of(tree, "s:x"), Namespace::Svg);
    assert_eq!(namespace_of(tree, "s:y"), Namespace::Xml);
    assert_eq!(
        error_messages(&parsed),
        vec!["undeclared namespace prefix \"s\""]
    );
}

#[test]
fn test_empty_prefix_declaration_is_invalid() {
    let parsed = parse_xml_with_namespaces(r#"<doc xmlns:p=""><p:x/></doc>"#);
    let messages = error_messages(&parsed);
    assert!(messages.iter().any(|m| m == "invalid namespace declaration xmlns:p"));
    assert!(messages.iter().any(|m| m == "undeclared namespace prefix \"p\""));
}

#[test]
fn test_xml_prefix_is_predeclared() {
    let parsed = parse_xml_with_namespaces(r#"<doc><xml:thing/></doc>"#);
    assert_eq!(namespace_of(&parsed.tree, "xml:thing"), Namespace::Xml);
    assert!(parsed.errors.is_empty());
}

#[test]
fn test_source_ranges_in_xml() {
    let parsed = Parser::new(ParseOptions::xml().with_track_position(true))
        .parse_str("<a><b/></a>")
        .unwrap();
    let tree = &parsed.tree;
    let a = tree.find_element(tree.root(), "a").unwrap();
    let b = tree.find_element(tree.root(), "b").unwrap();

    let a_node = tree.get(a).unwrap();
    assert_eq!(a_node.start_range.unwrap().start.offset, 0);
    assert_eq!(a_node.end_range.unwrap().start.offset, 7);
    assert_eq!(a_node.end_range.unwrap().end.offset, 11);

    let b_node = tree.get(b).unwrap();
    assert_eq!(b_node.start_range, b_node.end_range);
}
