//! Integration tests for HTML tree construction.
//!
//! Expected trees are written in the html5lib dump format.

use wombat_dom::{DomTree, Namespace, NodeId, QuirksMode};
use wombat_html::{ParseOptions, ParsedDocument, Parser};

/// Helper to parse HTML with error tracking on.
fn parse(html: &str) -> ParsedDocument {
    Parser::new(ParseOptions::html().with_max_errors(100))
        .parse_str(html)
        .unwrap()
}

/// Helper to parse HTML and dump the tree.
fn dump(html: &str) -> String {
    parse(html).dump()
}

/// Helper to turn `|`-prefixed lines into the expected dump.
fn expected(lines: &[&str]) -> String {
    lines.iter().map(|line| format!("{line}\n")).collect()
}

fn error_messages(parsed: &ParsedDocument) -> Vec<String> {
    parsed.errors.iter().map(|e| e.message.clone()).collect()
}

/// Helper to get element by tag name (first match, depth-first)
fn find_element(tree: &DomTree, tag: &str) -> Option<NodeId> {
    tree.find_element(tree.root(), tag)
}

#[test]
fn test_document_structure() {
    assert_eq!(
        dump("<!DOCTYPE html><html><head></head><body></body></html>"),
        expected(&["| <!DOCTYPE html>", "| <html>", "|   <head>", "|   <body>"])
    );
}

#[test]
fn test_empty_input_still_builds_a_document() {
    assert_eq!(
        dump(""),
        expected(&["| <html>", "|   <head>", "|   <body>"])
    );
}

#[test]
fn test_text_node() {
    let parsed = parse("<html><body>Hello World</body></html>");
    let body = find_element(&parsed.tree, "body").unwrap();
    assert_eq!(parsed.tree.text_content(body), "Hello World");
}

#[test]
fn test_comment_before_html_stays_on_document() {
    assert_eq!(
        dump("<!--a--><html>"),
        expected(&["| <!-- a -->", "| <html>", "|   <head>", "|   <body>"])
    );
}

#[test]
fn test_comment_after_body_goes_to_html() {
    assert_eq!(
        dump("<!DOCTYPE html><body></body><!--x--></html>"),
        expected(&[
            "| <!DOCTYPE html>",
            "| <html>",
            "|   <head>",
            "|   <body>",
            "|   <!-- x -->",
        ])
    );
}

#[test]
fn test_head_elements() {
    assert_eq!(
        dump("<!DOCTYPE html><title>a &amp; b</title><style>p{}</style>x"),
        expected(&[
            "| <!DOCTYPE html>",
            "| <html>",
            "|   <head>",
            "|     <title>",
            "|       \"a & b\"",
            "|     <style>",
            "|       \"p{}\"",
            "|   <body>",
            "|     \"x\"",
        ])
    );
}

#[test]
fn test_script_content_is_raw() {
    let parsed = parse("<!DOCTYPE html><script>if (a < b) { x = '<p>'; }</script>");
    let script = find_element(&parsed.tree, "script").unwrap();
    assert_eq!(parsed.tree.text_content(script), "if (a < b) { x = '<p>'; }");
    assert!(find_element(&parsed.tree, "p").is_none());
}

#[test]
fn test_foster_parenting() {
    assert_eq!(
        dump("<!DOCTYPE html><table>foo<tr><td>bar</table>"),
        expected(&[
            "| <!DOCTYPE html>",
            "| <html>",
            "|   <head>",
            "|   <body>",
            "|     \"foo\"",
            "|     <table>",
            "|       <tbody>",
            "|         <tr>",
            "|           <td>",
            "|             \"bar\"",
        ])
    );
}

#[test]
fn test_foster_parented_text_records_one_error() {
    let parsed = parse("<!DOCTYPE html><table>foo</table>");
    let messages = error_messages(&parsed);
    assert_eq!(messages.len(), 1, "{messages:?}");
}

#[test]
fn test_whitespace_in_table_stays_in_table() {
    assert_eq!(
        dump("<!DOCTYPE html><table> <tr></tr></table>"),
        expected(&[
            "| <!DOCTYPE html>",
            "| <html>",
            "|   <head>",
            "|   <body>",
            "|     <table>",
            "|       \" \"",
            "|       <tbody>",
            "|         <tr>",
        ])
    );
}

#[test]
fn test_foster_parented_element() {
    assert_eq!(
        dump("<!DOCTYPE html><table><div>x</div><tr><td>y</td></tr></table>"),
        expected(&[
            "| <!DOCTYPE html>",
            "| <html>",
            "|   <head>",
            "|   <body>",
            "|     <div>",
            "|       \"x\"",
            "|     <table>",
            "|       <tbody>",
            "|         <tr>",
            "|           <td>",
            "|             \"y\"",
        ])
    );
}

#[test]
fn test_adoption_agency_misnested_inline() {
    assert_eq!(
        dump("<!DOCTYPE html><p>1<b>2<i>3</b>4</i>5</p>"),
        expected(&[
            "| <!DOCTYPE html>",
            "| <html>",
            "|   <head>",
            "|   <body>",
            "|     <p>",
            "|       \"1\"",
            "|       <b>",
            "|         \"2\"",
            "|         <i>",
            "|           \"3\"",
            "|       <i>",
            "|         \"4\"",
            "|       \"5\"",
        ])
    );
}

#[test]
fn test_adoption_agency_with_block() {
    assert_eq!(
        dump("<!DOCTYPE html><b>1<p>2</b>3</p>"),
        expected(&[
            "| <!DOCTYPE html>",
            "| <html>",
            "|   <head>",
            "|   <body>",
            "|     <b>",
            "|       \"1\"",
            "|     <p>",
            "|       <b>",
            "|         \"2\"",
            "|       \"3\"",
        ])
    );
}

#[test]
fn test_adoption_agency_terminates_on_adversarial_input() {
    let mut html = String::from("<!DOCTYPE html>");
    for _ in 0..50 {
        html.push_str("<a><b><i><u><s><em><strong><code><div>");
    }
    for _ in 0..50 {
        html.push_str("</a></b></i></u></s></em></strong></code>");
    }
    let parsed = parse(&html);
    assert!(parsed.tree.body().is_some());
}

#[test]
fn test_reconstruct_active_formatting_elements() {
    assert_eq!(
        dump("<!DOCTYPE html><p><b>x</p><p>y"),
        expected(&[
            "| <!DOCTYPE html>",
            "| <html>",
            "|   <head>",
            "|   <body>",
            "|     <p>",
            "|       <b>",
            "|         \"x\"",
            "|     <p>",
            "|       <b>",
            "|         \"y\"",
        ])
    );
}

#[test]
fn test_noahs_ark_limits_identical_entries() {
    let parsed = parse("<!DOCTYPE html><p><b><b><b><b>x<p>y");
    let tree = &parsed.tree;
    let paragraphs = tree.find_elements(tree.root(), "p");
    assert_eq!(paragraphs.len(), 2);
    let reopened = tree.find_elements(paragraphs[1], "b");
    assert_eq!(reopened.len(), 3);
}

#[test]
fn test_list_items_close_each_other() {
    assert_eq!(
        dump("<!DOCTYPE html><li>Point one<li>Point two"),
        expected(&[
            "| <!DOCTYPE html>",
            "| <html>",
            "|   <head>",
            "|   <body>",
            "|     <li>",
            "|       \"Point one\"",
            "|     <li>",
            "|       \"Point two\"",
        ])
    );
}

#[test]
fn test_p_closed_by_block() {
    assert_eq!(
        dump("<!DOCTYPE html><p>a<div>b</div>"),
        expected(&[
            "| <!DOCTYPE html>",
            "| <html>",
            "|   <head>",
            "|   <body>",
            "|     <p>",
            "|       \"a\"",
            "|     <div>",
            "|       \"b\"",
        ])
    );
}

#[test]
fn test_definition_list_items() {
    assert_eq!(
        dump("<!DOCTYPE html><dl><dt>a<dd>b<dt>c</dl>"),
        expected(&[
            "| <!DOCTYPE html>",
            "| <html>",
            "|   <head>",
            "|   <body>",
            "|     <dl>",
            "|       <dt>",
            "|         \"a\"",
            "|       <dd>",
            "|         \"b\"",
            "|       <dt>",
            "|         \"c\"",
        ])
    );
}

#[test]
fn test_stray_end_tags_create_elements() {
    assert_eq!(
        dump("<!DOCTYPE html><body></p></br>"),
        expected(&[
            "| <!DOCTYPE html>",
            "| <html>",
            "|   <head>",
            "|   <body>",
            "|     <p>",
            "|     <br>",
        ])
    );
}

#[test]
fn test_image_becomes_img() {
    let parsed = parse("<!DOCTYPE html><image src=a.png>");
    let img = find_element(&parsed.tree, "img").unwrap();
    let data = parsed.tree.as_element(img).unwrap();
    assert_eq!(data.get_attribute("src"), Some("a.png"));
    assert!(find_element(&parsed.tree, "image").is_none());
}

#[test]
fn test_pre_drops_leading_newline() {
    let parsed = parse("<!DOCTYPE html><pre>\nfoo</pre><textarea>\nbar</textarea>");
    let pre = find_element(&parsed.tree, "pre").unwrap();
    let textarea = find_element(&parsed.tree, "textarea").unwrap();
    assert_eq!(parsed.tree.text_content(pre), "foo");
    assert_eq!(parsed.tree.text_content(textarea), "bar");
}

#[test]
fn test_plaintext_swallows_rest_of_input() {
    let parsed = parse("<!DOCTYPE html><plaintext><b>x</plaintext>");
    let plaintext = find_element(&parsed.tree, "plaintext").unwrap();
    assert_eq!(parsed.tree.text_content(plaintext), "<b>x</plaintext>");
    assert!(find_element(&parsed.tree, "b").is_none());
}

#[test]
fn test_table_implies_tbody_and_tr() {
    assert_eq!(
        dump("<!DOCTYPE html><table><td>x</td></table>"),
        expected(&[
            "| <!DOCTYPE html>",
            "| <html>",
            "|   <head>",
            "|   <body>",
            "|     <table>",
            "|       <tbody>",
            "|         <tr>",
            "|           <td>",
            "|             \"x\"",
        ])
    );
}

#[test]
fn test_hidden_input_stays_in_table() {
    assert_eq!(
        dump("<!DOCTYPE html><table><input type=hidden></table>"),
        expected(&[
            "| <!DOCTYPE html>",
            "| <html>",
            "|   <head>",
            "|   <body>",
            "|     <table>",
            "|       <input>",
            "|         type=\"hidden\"",
        ])
    );
}

#[test]
fn test_caption_and_colgroup() {
    assert_eq!(
        dump("<!DOCTYPE html><table><caption>c</caption><col><tr><td>x</table>"),
        expected(&[
            "| <!DOCTYPE html>",
            "| <html>",
            "|   <head>",
            "|   <body>",
            "|     <table>",
            "|       <caption>",
            "|         \"c\"",
            "|       <colgroup>",
            "|         <col>",
            "|       <tbody>",
            "|         <tr>",
            "|           <td>",
            "|             \"x\"",
        ])
    );
}

#[test]
fn test_select_options_close_each_other() {
    assert_eq!(
        dump("<!DOCTYPE html><select><option>a<option>b</select>"),
        expected(&[
            "| <!DOCTYPE html>",
            "| <html>",
            "|   <head>",
            "|   <body>",
            "|     <select>",
            "|       <option>",
            "|         \"a\"",
            "|       <option>",
            "|         \"b\"",
        ])
    );
}

#[test]
fn test_select_in_table_closed_by_cell() {
    assert_eq!(
        dump("<!DOCTYPE html><table><tr><td><select><option>a<td>b</table>"),
        expected(&[
            "| <!DOCTYPE html>",
            "| <html>",
            "|   <head>",
            "|   <body>",
            "|     <table>",
            "|       <tbody>",
            "|         <tr>",
            "|           <td>",
            "|             <select>",
            "|               <option>",
            "|                 \"a\"",
            "|           <td>",
            "|             \"b\"",
        ])
    );
}

#[test]
fn test_template_contents_under_template() {
    assert_eq!(
        dump("<!DOCTYPE html><template><td>x</td></template>"),
        expected(&[
            "| <!DOCTYPE html>",
            "| <html>",
            "|   <head>",
            "|     <template>",
            "|       <td>",
            "|         \"x\"",
            "|   <body>",
        ])
    );
}

#[test]
fn test_frameset() {
    assert_eq!(
        dump("<!DOCTYPE html><frameset><frame></frameset>"),
        expected(&[
            "| <!DOCTYPE html>",
            "| <html>",
            "|   <head>",
            "|   <frameset>",
            "|     <frame>",
        ])
    );
}

#[test]
fn test_frameset_ignored_after_content() {
    let parsed = parse("<!DOCTYPE html><p>x</p><frameset>");
    assert!(find_element(&parsed.tree, "frameset").is_none());
    assert!(parsed.tree.body().is_some());
}

#[test]
fn test_svg_foreign_object_returns_to_html() {
    let parsed = parse("<div><svg><foreignObject><p>One</p></foreignObject></svg></div>");
    let tree = &parsed.tree;
    let svg = find_element(tree, "svg").unwrap();
    let foreign_object = find_element(tree, "foreignObject").unwrap();
    let p = find_element(tree, "p").unwrap();

    assert_eq!(tree.as_element(svg).unwrap().namespace, Namespace::Svg);
    assert_eq!(tree.as_element(foreign_object).unwrap().namespace, Namespace::Svg);
    assert_eq!(tree.as_element(p).unwrap().namespace, Namespace::Html);
    assert_eq!(tree.parent(p), Some(foreign_object));
    assert_eq!(tree.text_content(p), "One");
}

#[test]
fn test_svg_tag_and_attribute_adjustment() {
    assert_eq!(
        dump("<!DOCTYPE html><svg viewbox=\"0 0 1 1\"><lineargradient/></svg>"),
        expected(&[
            "| <!DOCTYPE html>",
            "| <html>",
            "|   <head>",
            "|   <body>",
            "|     <svg svg>",
            "|       viewBox=\"0 0 1 1\"",
            "|       <svg linearGradient>",
        ])
    );
}

#[test]
fn test_html_tag_breaks_out_of_svg() {
    assert_eq!(
        dump("<!DOCTYPE html><svg><p>x"),
        expected(&[
            "| <!DOCTYPE html>",
            "| <html>",
            "|   <head>",
            "|   <body>",
            "|     <svg svg>",
            "|     <p>",
            "|       \"x\"",
        ])
    );
}

#[test]
fn test_font_breaks_out_only_with_presentational_attributes() {
    let parsed = parse("<!DOCTYPE html><svg><font></font><font color=red></font></svg>");
    let tree = &parsed.tree;
    let fonts = tree.find_elements(tree.root(), "font");
    assert_eq!(fonts.len(), 2);
    assert_eq!(tree.as_element(fonts[0]).unwrap().namespace, Namespace::Svg);
    assert_eq!(tree.as_element(fonts[1]).unwrap().namespace, Namespace::Html);
}

#[test]
fn test_mathml_text_integration_point() {
    assert_eq!(
        dump("<!DOCTYPE html><math><mtext><b>x</b></mtext></math>"),
        expected(&[
            "| <!DOCTYPE html>",
            "| <html>",
            "|   <head>",
            "|   <body>",
            "|     <math math>",
            "|       <math mtext>",
            "|         <b>",
            "|           \"x\"",
        ])
    );
}

#[test]
fn test_annotation_xml_html_integration_point() {
    let parsed = parse(
        "<!DOCTYPE html><math><annotation-xml encoding=\"text/html\"><p>x</p></annotation-xml></math>",
    );
    let tree = &parsed.tree;
    let p = find_element(tree, "p").unwrap();
    assert_eq!(tree.as_element(p).unwrap().namespace, Namespace::Html);
    let annotation = tree.parent(p).unwrap();
    assert_eq!(tree.as_element(annotation).unwrap().namespace, Namespace::MathMl);
}

#[test]
fn test_cdata_in_svg() {
    let parsed = parse("<!DOCTYPE html><svg><![CDATA[a<b]]></svg>");
    let svg = find_element(&parsed.tree, "svg").unwrap();
    assert_eq!(parsed.tree.text_content(svg), "a<b");
}

#[test]
fn test_duplicate_attributes_keep_first() {
    let parsed = parse("<!DOCTYPE html><p one=1 ONE=2 one=3>");
    let p = find_element(&parsed.tree, "p").unwrap();
    let data = parsed.tree.as_element(p).unwrap();
    assert_eq!(data.attrs.len(), 1);
    assert_eq!(data.get_attribute("one"), Some("1"));

    let duplicates = error_messages(&parsed)
        .iter()
        .filter(|m| m.starts_with("duplicate-attribute"))
        .count();
    assert_eq!(duplicates, 1);
}

#[test]
fn test_html_attributes_merge_into_root() {
    let parsed = parse("<!DOCTYPE html><html lang=en><body><html lang=fr class=x>");
    let html = parsed.tree.document_element().unwrap();
    let data = parsed.tree.as_element(html).unwrap();
    assert_eq!(data.get_attribute("lang"), Some("en"));
    assert_eq!(data.get_attribute("class"), Some("x"));
}

#[test]
fn test_quirks_mode_from_doctype() {
    assert_eq!(parse("<p>").quirks_mode(), QuirksMode::Quirks);
    assert_eq!(parse("<!DOCTYPE html>").quirks_mode(), QuirksMode::NoQuirks);
    assert_eq!(
        parse(r#"<!DOCTYPE html PUBLIC "-//W3C//DTD HTML 4.01 Transitional//EN">"#).quirks_mode(),
        QuirksMode::Quirks
    );
    assert_eq!(
        parse(
            r#"<!DOCTYPE html PUBLIC "-//W3C//DTD HTML 4.01 Transitional//EN" "http://www.w3.org/TR/html4/loose.dtd">"#
        )
        .quirks_mode(),
        QuirksMode::LimitedQuirks
    );
    assert_eq!(
        parse(r#"<!DOCTYPE html PUBLIC "-//W3C//DTD XHTML 1.0 Transitional//EN" "">"#).quirks_mode(),
        QuirksMode::LimitedQuirks
    );
}

#[test]
fn test_table_closes_p_only_outside_quirks_mode() {
    assert_eq!(
        dump("<!DOCTYPE html><p><table>"),
        expected(&[
            "| <!DOCTYPE html>",
            "| <html>",
            "|   <head>",
            "|   <body>",
            "|     <p>",
            "|     <table>",
        ])
    );
    assert_eq!(
        dump("<p><table>"),
        expected(&["| <html>", "|   <head>", "|   <body>", "|     <p>", "|       <table>"])
    );
}

#[test]
fn test_missing_doctype_is_reported() {
    let parsed = parse("<p>x</p>");
    assert!(error_messages(&parsed).iter().any(|m| m == "missing DOCTYPE"));
}

#[test]
fn test_unclosed_element_at_eof_is_reported_once() {
    let parsed = parse("<!DOCTYPE html><div><span>x");
    let open = error_messages(&parsed)
        .iter()
        .filter(|m| m.ends_with("is still open"))
        .count();
    assert_eq!(open, 1);
}

#[test]
fn test_optional_end_tags_at_eof_are_not_reported() {
    let parsed = parse("<!DOCTYPE html><p>a<li>x");
    assert!(parsed.errors.is_empty(), "{:?}", error_messages(&parsed));
}

#[test]
fn test_self_closing_non_void_is_reported() {
    let parsed = parse("<!DOCTYPE html><div/>x");
    assert!(
        error_messages(&parsed)
            .iter()
            .any(|m| m == "non-void-html-element-start-tag-with-trailing-solidus")
    );
    let div = find_element(&parsed.tree, "div").unwrap();
    assert_eq!(parsed.tree.text_content(div), "x");
}

#[test]
fn test_text_after_html_end_goes_to_body() {
    let parsed = parse("<!DOCTYPE html><body></body></html>x");
    let body = parsed.tree.body().unwrap();
    assert_eq!(parsed.tree.text_content(body), "x");
    assert!(!parsed.errors.is_empty());
}

#[test]
fn test_nested_forms_are_ignored() {
    let parsed = parse("<!DOCTYPE html><form><form><input></form>");
    let tree = &parsed.tree;
    assert_eq!(tree.find_elements(tree.root(), "form").len(), 1);
}

#[test]
fn test_ruby_closing_rules() {
    assert_eq!(
        dump("<!DOCTYPE html><ruby>a<rb>b<rt>c<rp>d</ruby>"),
        expected(&[
            "| <!DOCTYPE html>",
            "| <html>",
            "|   <head>",
            "|   <body>",
            "|     <ruby>",
            "|       \"a\"",
            "|       <rb>",
            "|         \"b\"",
            "|       <rt>",
            "|         \"c\"",
            "|       <rp>",
            "|         \"d\"",
        ])
    );
}

#[test]
fn test_null_in_body_is_dropped() {
    let parsed = parse("<!DOCTYPE html><p>a\0b");
    let p = find_element(&parsed.tree, "p").unwrap();
    assert_eq!(parsed.tree.text_content(p), "ab");
}

#[test]
fn test_reparse_is_deterministic() {
    let html = "<table><b>x<tr><td>y</b>z<svg><desc><i>w</table>";
    assert_eq!(dump(html), dump(html));
}

#[test]
fn test_node_limit_aborts_parse() {
    let mut tree = DomTree::with_node_limit(3);
    let result = Parser::html().parse(
        wombat_html::StrCursor::new("<p>one</p><p>two</p>"),
        &mut tree,
    );
    assert!(matches!(
        result,
        Err(wombat_html::ParseFailure::Tree(wombat_dom::TreeError::NodeLimitExceeded { limit: 3 }))
    ));
}

#[test]
fn test_closed_cursor_completes_empty_document() {
    let cursor = wombat_html::StrCursor::new("<p>never read</p>");
    cursor.close_handle().close();
    let mut tree = DomTree::new();
    let outcome = Parser::html().parse(cursor, &mut tree).unwrap();
    assert_eq!(outcome.root, tree.root());
    assert!(find_element(&tree, "body").is_some());
    assert!(find_element(&tree, "p").is_none());
}
