//! Foreign content: SVG and MathML inside HTML.
//!
//! [§ 13.2.6.3 Creating and inserting nodes](https://html.spec.whatwg.org/multipage/parsing.html#creating-and-inserting-nodes)
//! [§ 13.2.6.5 The rules for parsing tokens in foreign content](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inforeign)

pub(in crate::tree_builder) mod mathml;
pub(in crate::tree_builder) mod svg;

use wombat_dom::{Attribute, Namespace, NodeFactory};

use self::mathml::adjust_mathml_attributes;
use self::svg::{adjust_svg_attributes, adjust_svg_tag_name};
use super::core::{BuildResult, HtmlTreeBuilder, Tag, TreeToken, is_html_whitespace};
use super::tag_sets::breaks_out_of_foreign_content;

/// [§ 13.2.6.3 Adjust foreign attributes](https://html.spec.whatwg.org/multipage/parsing.html#adjust-foreign-attributes)
///
/// Attributes kept in their qualified form. Matching is case-insensitive so
/// the canonical spelling is restored when attribute case is preserved.
const FOREIGN_ATTRIBUTES: &[&str] = &[
    "xlink:actuate",
    "xlink:arcrole",
    "xlink:href",
    "xlink:role",
    "xlink:show",
    "xlink:title",
    "xlink:type",
    "xml:lang",
    "xml:space",
    "xmlns",
    "xmlns:xlink",
];

pub(super) fn adjust_foreign_attributes(attributes: &mut [Attribute]) {
    for attr in attributes {
        if let Some(canonical) = FOREIGN_ATTRIBUTES
            .iter()
            .find(|name| attr.name.eq_ignore_ascii_case(name))
        {
            attr.name = (*canonical).to_string();
        }
    }
}

/// [HTML integration point](https://html.spec.whatwg.org/multipage/parsing.html#html-integration-point)
///
/// A MathML `annotation-xml` whose `encoding` is `text/html` or
/// `application/xhtml+xml`, or an SVG `foreignObject`, `desc` or `title`.
pub(super) fn is_html_integration_point(namespace: Namespace, name: &str, attributes: &[Attribute]) -> bool {
    match namespace {
        Namespace::MathMl => {
            name == "annotation-xml"
                && attributes.iter().any(|attr| {
                    attr.name.eq_ignore_ascii_case("encoding")
                        && (attr.value.eq_ignore_ascii_case("text/html")
                            || attr.value.eq_ignore_ascii_case("application/xhtml+xml"))
                })
        }
        Namespace::Svg => matches!(name, "foreignObject" | "desc" | "title"),
        Namespace::Html | Namespace::Xml => false,
    }
}

impl<F: NodeFactory> HtmlTreeBuilder<'_, F> {
    /// Insert a start tag as an SVG or MathML element, with the name and
    /// attribute adjustments that namespace needs.
    pub(super) fn insert_foreign_start_tag(&mut self, mut tag: Tag, namespace: Namespace) -> BuildResult {
        match namespace {
            Namespace::MathMl => adjust_mathml_attributes(&mut tag.attributes),
            Namespace::Svg => {
                tag.name = adjust_svg_tag_name(&tag.name);
                adjust_svg_attributes(&mut tag.attributes);
            }
            Namespace::Html | Namespace::Xml => {}
        }
        adjust_foreign_attributes(&mut tag.attributes);
        let _ = self.insert_foreign_element(&tag, namespace)?;

        // "If the token has its self-closing flag set, then ... pop the current
        // node off the stack of open elements and acknowledge the token's
        // self-closing flag."
        if tag.self_closing {
            self.self_closing_acknowledged = true;
            let _ = self.pop();
        }
        Ok(())
    }

    /// [§ 13.2.6.5 The rules for parsing tokens in foreign content](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inforeign)
    pub(super) fn process_in_foreign_content(&mut self, token: TreeToken) -> BuildResult {
        match token {
            // "A character token that is U+0000 NULL: This is a parse error. Insert a
            // U+FFFD REPLACEMENT CHARACTER character."
            TreeToken::Characters(mut text) => {
                if text.contains('\0') {
                    self.parse_error("unexpected-null-character");
                    text = text.replace('\0', "\u{FFFD}");
                }
                // "Any other character token: Insert the token's character. Set the
                // frameset-ok flag to "not ok"."
                if text.chars().any(|c| !is_html_whitespace(c)) {
                    self.frameset_ok = false;
                }
                self.insert_text(&text)
            }
            TreeToken::Comment(data) => self.insert_comment(&data),
            TreeToken::Doctype { .. } => {
                self.parse_error("DOCTYPE in foreign content");
                Ok(())
            }
            TreeToken::StartTag(tag)
                if breaks_out_of_foreign_content(
                    &tag.name,
                    ["color", "face", "size"]
                        .iter()
                        .any(|name| tag.attribute(name).is_some()),
                ) =>
            {
                self.break_out_of_foreign_content(TreeToken::StartTag(tag))
            }
            TreeToken::EndTag(tag) if tag.is_one_of(&["br", "p"]) => {
                self.break_out_of_foreign_content(TreeToken::EndTag(tag))
            }
            // "Any other start tag"
            TreeToken::StartTag(tag) => {
                let namespace = self
                    .adjusted_current_node()
                    .map_or(Namespace::Html, |node| node.namespace);
                self.insert_foreign_start_tag(tag, namespace)
            }
            // "An end tag whose tag name is "script", if the current node is an SVG
            // script element"
            TreeToken::EndTag(tag)
                if tag.name == "script"
                    && self
                        .current_node()
                        .is_some_and(|node| node.namespace == Namespace::Svg && node.name == "script") =>
            {
                let closed = self.pop().map(|node| node.handle);
                self.closed_by_end_tag(closed);
                Ok(())
            }
            TreeToken::EndTag(tag) => self.foreign_end_tag(tag),
            TreeToken::Eof => self.process_in_mode(self.mode, TreeToken::Eof),
        }
    }

    /// "Parse error. While the current node is not a MathML text integration
    /// point, an HTML integration point, or an element in the HTML namespace,
    /// pop elements from the stack of open elements. Reprocess the token
    /// according to the rules given in the section corresponding to the current
    /// insertion mode in HTML content."
    fn break_out_of_foreign_content(&mut self, token: TreeToken) -> BuildResult {
        self.unexpected(&token);
        while let Some(node) = self.current_node() {
            if node.namespace == Namespace::Html
                || node.is_mathml_text_integration_point()
                || node.html_integration_point
            {
                break;
            }
            let _ = self.pop();
        }
        self.process_in_mode(self.mode, token)
    }

    /// "Any other end tag" in foreign content.
    fn foreign_end_tag(&mut self, tag: Tag) -> BuildResult {
        let Some(mut index) = self.open_elements.len().checked_sub(1) else {
            return Ok(());
        };
        // STEP 2: "If node's tag name, converted to ASCII lowercase, is not the
        //          same as the tag name of the token, then this is a parse error."
        if !self.open_elements[index].name.eq_ignore_ascii_case(&tag.name) {
            self.parse_error(&format!("end tag </{}> does not match the open element", tag.name));
        }
        loop {
            // STEP 3: "Loop: If node is the topmost element in the stack of open
            //          elements, then return. (fragment case)"
            if index == 0 {
                return Ok(());
            }
            // STEP 4: "If node's tag name, converted to ASCII lowercase, is the same
            //          as the tag name of the token, pop elements from the stack of
            //          open elements until node has been popped from the stack, and
            //          then return."
            let node = &self.open_elements[index];
            if node.name.eq_ignore_ascii_case(&tag.name) {
                let handle = node.handle;
                self.pop_until_handle(handle);
                self.closed_by_end_tag(Some(handle));
                return Ok(());
            }
            // STEP 5: "Set node to the previous entry in the stack of open elements."
            index -= 1;
            // STEP 6-7: "If node is not an element in the HTML namespace, return to
            //            the step labeled loop. Otherwise, process the token according
            //            to the rules given in the section corresponding to the current
            //            insertion mode in HTML content."
            if self.open_elements[index].namespace == Namespace::Html {
                return self.process_in_mode(self.mode, TreeToken::EndTag(tag));
            }
        }
    }
}
