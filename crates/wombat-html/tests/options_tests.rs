//! Integration tests for parser options: configuration loading, name case,
//! error limits and source positions.

use wombat_dom::{DomTree, NodeId};
use wombat_html::{ParseOptions, ParseSettings, Parser, ParserMode};

fn element(tree: &DomTree, name: &str) -> NodeId {
    tree.find_element(tree.root(), name)
        .unwrap_or_else(|| panic!("no <{name}> in tree"))
}

#[test]
fn test_default_options() {
    let options = ParseOptions::default();
    assert_eq!(options.mode, ParserMode::Html);
    assert!(!options.track_position);
    assert_eq!(options.max_errors, 0);
    assert!(!options.preserve_tag_case);
    assert!(!options.namespace_aware);
    assert_eq!(options.max_lookback, 4096);
    assert_eq!(options.settings(), ParseSettings::HTML_DEFAULT);
}

#[test]
fn test_options_from_partial_json() {
    let options: ParseOptions =
        serde_json::from_str(r#"{ "mode": "xml", "namespace_aware": true, "max_errors": 50 }"#)
            .unwrap();
    assert_eq!(options.mode, ParserMode::Xml);
    assert!(options.namespace_aware);
    assert_eq!(options.max_errors, 50);
    assert_eq!(options.max_lookback, 4096);
}

#[test]
fn test_options_json_round_trip() {
    let options = ParseOptions::html()
        .with_track_position(true)
        .with_max_errors(10)
        .with_preserve_attribute_case(true);
    let json = serde_json::to_string(&options).unwrap();
    assert!(json.contains(r#""mode":"html""#));
    let back: ParseOptions = serde_json::from_str(&json).unwrap();
    assert_eq!(back, options);
}

#[test]
fn test_unknown_mode_is_rejected() {
    let result = serde_json::from_str::<ParseOptions>(r#"{ "mode": "sgml" }"#);
    assert!(result.is_err());
}

#[test]
fn test_parser_mode_names() {
    assert_eq!(ParserMode::Xml.to_string(), "xml");
    assert_eq!("html".parse::<ParserMode>().unwrap(), ParserMode::Html);
    assert!("HTML5".parse::<ParserMode>().is_err());
}

#[test]
fn test_xml_always_preserves_case() {
    let options = ParseOptions::xml();
    assert_eq!(options.settings(), ParseSettings::PRESERVE_CASE);
}

#[test]
fn test_html_lowercases_names_by_default() {
    let parsed = Parser::html().parse_str("<DIV ClAsS=x>y</DiV>").unwrap();
    let div = element(&parsed.tree, "div");
    let data = parsed.tree.as_element(div).unwrap();
    assert_eq!(data.get_attribute("class"), Some("x"));
    assert_eq!(parsed.tree.text_content(div), "y");
}

#[test]
fn test_preserve_tag_case() {
    let parsed = Parser::new(ParseOptions::html().with_preserve_tag_case(true))
        .parse_str("<DiV>a</div><P>b")
        .unwrap();
    let div = element(&parsed.tree, "DiV");
    assert_eq!(parsed.tree.text_content(div), "a");
    let p = element(&parsed.tree, "P");
    assert_eq!(parsed.tree.text_content(p), "b");
    assert!(parsed.tree.find_element(parsed.tree.root(), "div").is_none());
}

#[test]
fn test_preserve_attribute_case() {
    let parsed = Parser::new(ParseOptions::html().with_preserve_attribute_case(true))
        .parse_str("<p DataId=1 dataid=2>")
        .unwrap();
    let p = element(&parsed.tree, "p");
    let data = parsed.tree.as_element(p).unwrap();
    assert_eq!(data.get_attribute("DataId"), Some("1"));
    assert_eq!(data.get_attribute("dataid"), Some("2"));
}

#[test]
fn test_errors_not_tracked_by_default() {
    let parsed = Parser::html().parse_str("<p></div></span>&#0;").unwrap();
    assert!(parsed.errors.is_empty());
}

#[test]
fn test_error_limit_truncates() {
    let parsed = Parser::new(ParseOptions::html().with_max_errors(2))
        .parse_str("</a></b></c></d></e>")
        .unwrap();
    assert_eq!(parsed.errors.len(), 2);
    // The first errors are the ones kept.
    assert_eq!(parsed.errors.as_slice()[0].message, "missing DOCTYPE");
}

#[test]
fn test_error_positions() {
    let parsed = Parser::new(ParseOptions::html().with_max_errors(10))
        .parse_str("<!DOCTYPE html>\n<p>&#0;")
        .unwrap();
    let error = parsed
        .errors
        .iter()
        .find(|e| e.message == "null-character-reference")
        .unwrap();
    assert_eq!(error.position.line, 2);
}

#[test]
fn test_positions_not_tracked_by_default() {
    let parsed = Parser::html().parse_str("<p>ab</p>").unwrap();
    let p = element(&parsed.tree, "p");
    let node = parsed.tree.get(p).unwrap();
    assert!(node.start_range.is_none());
    assert!(node.end_range.is_none());
}

#[test]
fn test_explicit_tag_ranges() {
    let parsed = Parser::new(ParseOptions::html().with_track_position(true))
        .parse_str("<p>ab</p>")
        .unwrap();
    let tree = &parsed.tree;
    let p = tree.get(element(tree, "p")).unwrap();

    let start = p.start_range.unwrap();
    assert_eq!((start.start.offset, start.end.offset), (0, 3));
    let end = p.end_range.unwrap();
    assert_eq!((end.start.offset, end.end.offset), (5, 9));
}

#[test]
fn test_implied_elements_have_empty_ranges() {
    let parsed = Parser::new(ParseOptions::html().with_track_position(true))
        .parse_str("<p>ab</p>")
        .unwrap();
    let tree = &parsed.tree;

    for name in ["html", "head", "body"] {
        let node = tree.get(element(tree, name)).unwrap();
        let start = node.start_range.unwrap();
        assert!(start.is_empty(), "<{name}> start should be empty");
    }

    let body = tree.get(element(tree, "body")).unwrap();
    let end = body.end_range.unwrap();
    assert!(end.is_empty());
    assert_eq!(end.start.offset, 9);
}

#[test]
fn test_implicitly_closed_element_has_empty_end_range() {
    let parsed = Parser::new(ParseOptions::html().with_track_position(true))
        .parse_str("<!DOCTYPE html><li>a<li>b")
        .unwrap();
    let tree = &parsed.tree;
    let items = tree.find_elements(tree.root(), "li");
    let first = tree.get(items[0]).unwrap();
    let end = first.end_range.unwrap();
    assert!(end.is_empty());
    assert_eq!(end.start.offset, 20);
}

#[test]
fn test_position_line_and_column() {
    let parsed = Parser::new(ParseOptions::html().with_track_position(true))
        .parse_str("<!DOCTYPE html>\n<body>\n  <span>x</span>")
        .unwrap();
    let tree = &parsed.tree;
    let span = tree.get(element(tree, "span")).unwrap();
    let start = span.start_range.unwrap().start;
    assert_eq!((start.line, start.column), (3, 3));
}
