//! [§ 13.2.6.4.7 The "in body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inbody)

use wombat_dom::{Namespace, NodeFactory, QuirksMode};

use crate::tokenizer::RawTextMode;
use crate::tree_builder::core::{BuildResult, HtmlTreeBuilder, InsertionMode, Tag, TreeToken, is_html_whitespace};
use crate::tree_builder::scope::Scope;
use crate::tree_builder::tag_sets::{
    BLOCK_END_TAGS, BLOCK_START_TAGS, FORMATTING, HEAD_CONTENT, HEADINGS, TABLE_STRUCTURE, is_special,
};

impl<F: NodeFactory> HtmlTreeBuilder<'_, F> {
    pub(super) fn handle_in_body_mode(&mut self, token: TreeToken) -> BuildResult {
        match token {
            TreeToken::Characters(text) => self.in_body_characters(text),
            // "A comment token: Insert a comment."
            TreeToken::Comment(data) => self.insert_comment(&data),
            // "A DOCTYPE token: Parse error. Ignore the token."
            TreeToken::Doctype { .. } => {
                self.unexpected(&token);
                Ok(())
            }
            TreeToken::StartTag(tag) => self.in_body_start_tag(tag),
            TreeToken::EndTag(tag) => self.in_body_end_tag(tag),
            // "An end-of-file token"
            TreeToken::Eof => {
                // "If the stack of template insertion modes is not empty, then
                // process the token using the rules for the "in template"
                // insertion mode."
                if !self.template_modes.is_empty() {
                    return self.process_in_mode(InsertionMode::InTemplate, token);
                }
                // "If there is a node in the stack of open elements that is not
                // either a dd element, a dt element, ... then this is a parse error."
                self.check_unclosed_elements();
                // "Stop parsing."
                self.stop_parsing();
                Ok(())
            }
        }
    }

    /// "A character token that is U+0000 NULL: Parse error. Ignore the token."
    /// Whitespace reconstructs and inserts; anything else also clears
    /// frameset-ok.
    fn in_body_characters(&mut self, text: String) -> BuildResult {
        let text = if text.contains('\0') {
            self.parse_error("unexpected-null-character");
            text.replace('\0', "")
        } else {
            text
        };
        if text.is_empty() {
            return Ok(());
        }
        self.reconstruct_active_formatting_elements()?;
        self.insert_text(&text)?;
        if text.chars().any(|c| !is_html_whitespace(c)) {
            self.frameset_ok = false;
        }
        Ok(())
    }

    #[allow(clippy::too_many_lines)]
    fn in_body_start_tag(&mut self, mut tag: Tag) -> BuildResult {
        let name = tag.name.clone();
        match name.as_str() {
            // "A start tag whose tag name is "html""
            "html" => {
                self.parse_error("unexpected <html> start tag");
                // "If there is a template element on the stack of open elements, then
                // ignore the token. Otherwise, for each attribute on the token, check
                // to see if the attribute is already present on the top element of
                // the stack of open elements. If it is not, add the attribute..."
                if self.stack_has("template") {
                    return Ok(());
                }
                if let Some(root) = self.open_elements.first().map(|node| node.handle) {
                    self.factory.add_attributes_if_missing(root, tag.attributes)?;
                }
                Ok(())
            }
            n if HEAD_CONTENT.contains(&n) => {
                self.process_in_mode(InsertionMode::InHead, TreeToken::StartTag(tag))
            }
            // "A start tag whose tag name is "body""
            "body" => {
                self.parse_error("unexpected <body> start tag");
                // "If the second element on the stack of open elements is not a body
                // element, if the stack of open elements has only one node on it, or
                // if there is a template element on the stack of open elements, then
                // ignore the token. (fragment case or there is a template element on
                // the stack)"
                let Some(body) = self.open_elements.get(1).filter(|node| node.is_html("body")) else {
                    return Ok(());
                };
                let body = body.handle;
                if self.stack_has("template") {
                    return Ok(());
                }
                self.frameset_ok = false;
                self.factory.add_attributes_if_missing(body, tag.attributes)
            }
            // "A start tag whose tag name is "frameset""
            "frameset" => {
                self.parse_error("unexpected <frameset> start tag");
                let Some(body) = self.open_elements.get(1).filter(|node| node.is_html("body")) else {
                    return Ok(());
                };
                // "If the frameset-ok flag is set to "not ok", ignore the token."
                if !self.frameset_ok {
                    return Ok(());
                }
                // "1. Remove the second element on the stack of open elements from its
                //     parent node, if it has one.
                //  2. Pop all the nodes from the bottom of the stack of open elements,
                //     from the current node up to, but not including, the root html
                //     element.
                //  3. Insert an HTML element for the token.
                //  4. Switch the insertion mode to "in frameset"."
                let body = body.handle;
                self.factory.remove_from_parent(body)?;
                while self.open_elements.len() > 1 {
                    let _ = self.pop();
                }
                let _ = self.insert_html_element(&tag)?;
                self.switch_mode(InsertionMode::InFrameset);
                Ok(())
            }
            // "A start tag whose tag name is one of: "address", "article", ...:
            // If the stack of open elements has a p element in button scope, then
            // close a p element. Insert an HTML element for the token."
            n if BLOCK_START_TAGS.contains(&n) => {
                self.close_p_if_in_button_scope();
                let _ = self.insert_html_element(&tag)?;
                Ok(())
            }
            // "A start tag whose tag name is one of: "h1", "h2", "h3", "h4", "h5", "h6""
            n if HEADINGS.contains(&n) => {
                self.close_p_if_in_button_scope();
                // "If the current node is an HTML element whose tag name is one of
                // "h1", "h2", "h3", "h4", "h5", or "h6", then this is a parse error;
                // pop the current node off the stack of open elements."
                if self.current_is_one_of(HEADINGS) {
                    self.parse_error("nested heading");
                    let _ = self.pop();
                }
                let _ = self.insert_html_element(&tag)?;
                Ok(())
            }
            // "A start tag whose tag name is one of: "pre", "listing""
            "pre" | "listing" => {
                self.close_p_if_in_button_scope();
                let _ = self.insert_html_element(&tag)?;
                // "If the next token is a U+000A LINE FEED (LF) character token, then
                // ignore that token and move on to the next one."
                self.skip_next_newline = true;
                self.frameset_ok = false;
                Ok(())
            }
            // "A start tag whose tag name is "form""
            "form" => {
                // "If the form element pointer is not null, and there is no template
                // element on the stack of open elements, then this is a parse error;
                // ignore the token."
                let in_template = self.stack_has("template");
                if self.form_element.is_some() && !in_template {
                    self.parse_error("nested <form>");
                    return Ok(());
                }
                self.close_p_if_in_button_scope();
                let form = self.insert_html_element(&tag)?;
                if !in_template {
                    self.form_element = Some(form);
                }
                Ok(())
            }
            "li" => self.start_list_item(&tag, &["li"]),
            "dd" | "dt" => self.start_list_item(&tag, &["dd", "dt"]),
            // "A start tag whose tag name is "plaintext""
            "plaintext" => {
                self.close_p_if_in_button_scope();
                let _ = self.insert_html_element(&tag)?;
                // "Switch the tokenizer to the PLAINTEXT state."
                self.raw_text_request = Some(RawTextMode::Plaintext);
                Ok(())
            }
            // "A start tag whose tag name is "button""
            "button" => {
                if self.in_scope("button", Scope::Default) {
                    self.parse_error("nested <button>");
                    self.generate_implied_end_tags(None);
                    let _ = self.pop_until("button");
                }
                self.reconstruct_active_formatting_elements()?;
                let _ = self.insert_html_element(&tag)?;
                self.frameset_ok = false;
                Ok(())
            }
            // "A start tag whose tag name is "a""
            "a" => {
                // "If the list of active formatting elements contains an a element
                // between the end of the list and the last marker on the list (or the
                // start of the list if there is no marker on the list), then this is a
                // parse error; run the adoption agency algorithm for the token, then
                // remove that element from the list of active formatting elements and
                // the stack of open elements if the adoption agency algorithm didn't
                // already remove it (it might not have if the element is not in table
                // scope)."
                if let Some((_, existing)) = self.formatting_element_after_marker("a") {
                    self.parse_error("nested <a>");
                    self.run_adoption_agency("a")?;
                    self.remove_formatting_element(existing);
                    if let Some(position) = self.stack_position(existing) {
                        let _ = self.open_elements.remove(position);
                    }
                }
                self.insert_formatting_element(&tag)
            }
            // "A start tag whose tag name is "nobr""
            "nobr" => {
                self.reconstruct_active_formatting_elements()?;
                if self.in_scope("nobr", Scope::Default) {
                    self.parse_error("nested <nobr>");
                    self.run_adoption_agency("nobr")?;
                }
                self.insert_formatting_element(&tag)
            }
            n if FORMATTING.contains(&n) => self.insert_formatting_element(&tag),
            // "A start tag whose tag name is one of: "applet", "marquee", "object""
            "applet" | "marquee" | "object" => {
                self.reconstruct_active_formatting_elements()?;
                let _ = self.insert_html_element(&tag)?;
                self.push_formatting_marker();
                self.frameset_ok = false;
                Ok(())
            }
            // "A start tag whose tag name is "table""
            "table" => {
                // "If the Document is not set to quirks mode, and the stack of open
                // elements has a p element in button scope, then close a p element."
                if self.quirks_mode != QuirksMode::Quirks {
                    self.close_p_if_in_button_scope();
                }
                let _ = self.insert_html_element(&tag)?;
                self.frameset_ok = false;
                self.switch_mode(InsertionMode::InTable);
                Ok(())
            }
            // "A start tag whose tag name is one of: "area", "br", "embed", "img",
            // "keygen", "wbr""
            "area" | "br" | "embed" | "img" | "keygen" | "wbr" => {
                self.reconstruct_active_formatting_elements()?;
                self.insert_void_element(&tag)?;
                self.frameset_ok = false;
                Ok(())
            }
            // "A start tag whose tag name is "input""
            "input" => {
                self.reconstruct_active_formatting_elements()?;
                self.insert_void_element(&tag)?;
                // "If the token does not have an attribute with the name "type", or if
                // it does, but that attribute's value is not an ASCII case-insensitive
                // match for the string "hidden", then: set the frameset-ok flag to
                // "not ok"."
                if !tag
                    .attribute("type")
                    .is_some_and(|value| value.eq_ignore_ascii_case("hidden"))
                {
                    self.frameset_ok = false;
                }
                Ok(())
            }
            "param" | "source" | "track" => self.insert_void_element(&tag),
            // "A start tag whose tag name is "hr""
            "hr" => {
                self.close_p_if_in_button_scope();
                self.insert_void_element(&tag)?;
                self.frameset_ok = false;
                Ok(())
            }
            // "A start tag whose tag name is "image": Parse error. Change the token's
            // tag name to "img" and reprocess it. (Don't ask.)"
            "image" => {
                self.parse_error("<image> treated as <img>");
                tag.name = "img".to_string();
                tag.source_name = "img".to_string();
                self.dispatch(TreeToken::StartTag(tag))
            }
            // "A start tag whose tag name is "textarea""
            "textarea" => {
                let _ = self.insert_html_element(&tag)?;
                self.skip_next_newline = true;
                self.raw_text_request = Some(RawTextMode::Rcdata);
                self.original_mode = self.mode;
                self.frameset_ok = false;
                self.switch_mode(InsertionMode::Text);
                Ok(())
            }
            // "A start tag whose tag name is "xmp""
            "xmp" => {
                self.close_p_if_in_button_scope();
                self.reconstruct_active_formatting_elements()?;
                self.frameset_ok = false;
                self.parse_raw_text_element(&tag, RawTextMode::Rawtext)
            }
            "iframe" => {
                self.frameset_ok = false;
                self.parse_raw_text_element(&tag, RawTextMode::Rawtext)
            }
            // "A start tag whose tag name is "noembed"" (and "noscript", if the
            // scripting flag is enabled, which it never is here)
            "noembed" => self.parse_raw_text_element(&tag, RawTextMode::Rawtext),
            // "A start tag whose tag name is "select""
            "select" => {
                self.reconstruct_active_formatting_elements()?;
                let _ = self.insert_html_element(&tag)?;
                self.frameset_ok = false;
                // "If the insertion mode is one of "in table", "in caption", "in table
                // body", "in row", or "in cell", then switch the insertion mode to "in
                // select in table". Otherwise, switch the insertion mode to "in select"."
                let mode = match self.mode {
                    InsertionMode::InTable
                    | InsertionMode::InCaption
                    | InsertionMode::InTableBody
                    | InsertionMode::InRow
                    | InsertionMode::InCell => InsertionMode::InSelectInTable,
                    _ => InsertionMode::InSelect,
                };
                self.switch_mode(mode);
                Ok(())
            }
            // "A start tag whose tag name is one of: "optgroup", "option""
            "optgroup" | "option" => {
                if self.current_is("option") {
                    let _ = self.pop();
                }
                self.reconstruct_active_formatting_elements()?;
                let _ = self.insert_html_element(&tag)?;
                Ok(())
            }
            // "A start tag whose tag name is one of: "rb", "rtc""
            "rb" | "rtc" => {
                if self.in_scope("ruby", Scope::Default) {
                    self.generate_implied_end_tags(None);
                    if !self.current_is("ruby") {
                        self.parse_error(&format!("<{name}> outside <ruby>"));
                    }
                }
                let _ = self.insert_html_element(&tag)?;
                Ok(())
            }
            // "A start tag whose tag name is one of: "rp", "rt""
            "rp" | "rt" => {
                if self.in_scope("ruby", Scope::Default) {
                    self.generate_implied_end_tags(Some("rtc"));
                    if !self.current_is_one_of(&["rtc", "ruby"]) {
                        self.parse_error(&format!("<{name}> outside <ruby>"));
                    }
                }
                let _ = self.insert_html_element(&tag)?;
                Ok(())
            }
            // "A start tag whose tag name is "math"" / "A start tag whose tag name
            // is "svg"": reconstruct, adjust attributes, insert a foreign element.
            "math" => {
                self.reconstruct_active_formatting_elements()?;
                self.insert_foreign_start_tag(tag, Namespace::MathMl)
            }
            "svg" => {
                self.reconstruct_active_formatting_elements()?;
                self.insert_foreign_start_tag(tag, Namespace::Svg)
            }
            // "A start tag whose tag name is one of: "caption", "col", "colgroup",
            // "frame", "head", "tbody", "td", "tfoot", "th", "thead", "tr": Parse
            // error. Ignore the token."
            n if TABLE_STRUCTURE.contains(&n) || n == "frame" || n == "head" => {
                self.unexpected(&TreeToken::StartTag(tag));
                Ok(())
            }
            // "Any other start tag: Reconstruct the active formatting elements, if
            // any. Insert an HTML element for the token."
            _ => {
                self.reconstruct_active_formatting_elements()?;
                let _ = self.insert_html_element(&tag)?;
                Ok(())
            }
        }
    }

    /// Reconstruct, insert, and push onto the list of active formatting
    /// elements.
    fn insert_formatting_element(&mut self, tag: &Tag) -> BuildResult {
        self.reconstruct_active_formatting_elements()?;
        let handle = self.insert_html_element(tag)?;
        self.push_formatting_element(handle, tag);
        Ok(())
    }

    /// The `li`, `dd` and `dt` start tags: close an open item of the same
    /// kind first.
    fn start_list_item(&mut self, tag: &Tag, closes: &[&str]) -> BuildResult {
        // STEP 1: "Set the frameset-ok flag to "not ok"."
        self.frameset_ok = false;

        // STEP 2-5: "Loop: If node is an li element, then run these substeps..."
        for index in (0..self.open_elements.len()).rev() {
            let node = &self.open_elements[index];
            if node.is_html_one_of(closes) {
                let item = node.name.clone();
                // "Generate implied end tags, except for li elements."
                self.generate_implied_end_tags(Some(&item));
                // "If the current node is not an li element, then this is a parse error."
                if !self.current_is(&item) {
                    self.parse_error(&format!("<{}> closes an <{item}> with open children", tag.name));
                }
                // "Pop elements from the stack of open elements until an li element
                // has been popped from the stack."
                let _ = self.pop_until(&item);
                break;
            }
            // "If node is in the special category, but is not an address, div, or p
            // element, then jump to the step labeled done below."
            if is_special(node) && !node.is_html_one_of(&["address", "div", "p"]) {
                break;
            }
        }

        // STEP 6: "Done: If the stack of open elements has a p element in button
        //          scope, then close a p element."
        self.close_p_if_in_button_scope();
        // STEP 7: "Finally, insert an HTML element for the token."
        let _ = self.insert_html_element(tag)?;
        Ok(())
    }

    #[allow(clippy::too_many_lines)]
    fn in_body_end_tag(&mut self, tag: Tag) -> BuildResult {
        let name = tag.name.clone();
        match name.as_str() {
            "template" => self.process_in_mode(InsertionMode::InHead, TreeToken::EndTag(tag)),
            // "An end tag whose tag name is "body""
            "body" => {
                if !self.in_scope("body", Scope::Default) {
                    self.parse_error("</body> without an open <body>");
                    return Ok(());
                }
                self.check_unclosed_elements();
                self.end_tag_seen_for("body");
                self.switch_mode(InsertionMode::AfterBody);
                Ok(())
            }
            // "An end tag whose tag name is "html""
            "html" => {
                if !self.in_scope("body", Scope::Default) {
                    self.parse_error("</html> without an open <body>");
                    return Ok(());
                }
                self.check_unclosed_elements();
                self.reprocess_in(InsertionMode::AfterBody, TreeToken::EndTag(tag))
            }
            // "An end tag whose tag name is one of: "address", "article", ...:
            // If the stack of open elements does not have an element in scope that is
            // an HTML element with the same tag name as that of the token, then this
            // is a parse error; ignore the token."
            n if BLOCK_END_TAGS.contains(&n) => {
                if !self.in_scope(n, Scope::Default) {
                    self.parse_error(&format!("stray end tag </{n}>"));
                    return Ok(());
                }
                self.close_with_implied_end_tags(n);
                Ok(())
            }
            // "An end tag whose tag name is "form""
            "form" => {
                if self.stack_has("template") {
                    if !self.in_scope("form", Scope::Default) {
                        self.parse_error("stray end tag </form>");
                        return Ok(());
                    }
                    self.close_with_implied_end_tags("form");
                    return Ok(());
                }
                // "Let node be the element that the form element pointer is set to,
                // or null if it is not set to an element. Set the form element pointer
                // to null."
                let Some(node) = self.form_element.take() else {
                    self.parse_error("stray end tag </form>");
                    return Ok(());
                };
                // "If node is null or if the stack of open elements does not have node
                // in scope, then this is a parse error; return and ignore the token."
                if !self.handle_in_scope(node, Scope::Default) {
                    self.parse_error("stray end tag </form>");
                    return Ok(());
                }
                self.generate_implied_end_tags(None);
                if self.current_node().map(|n| n.handle) != Some(node) {
                    self.parse_error("</form> with unclosed children");
                }
                // "Remove node from the stack of open elements."
                if let Some(position) = self.stack_position(node) {
                    let _ = self.open_elements.remove(position);
                }
                self.closed_by_end_tag(Some(node));
                Ok(())
            }
            // "An end tag whose tag name is "p""
            "p" => {
                // "If the stack of open elements does not have a p element in button
                // scope, then this is a parse error; insert an HTML element for a "p"
                // start tag token with no attributes."
                if !self.in_scope("p", Scope::Button) {
                    self.parse_error("</p> without an open <p>");
                    let _ = self.insert_implied_element("p")?;
                }
                self.close_p_element();
                Ok(())
            }
            // "An end tag whose tag name is "li""
            "li" => {
                if !self.in_scope("li", Scope::ListItem) {
                    self.parse_error("stray end tag </li>");
                    return Ok(());
                }
                self.generate_implied_end_tags(Some("li"));
                if !self.current_is("li") {
                    self.parse_error("</li> with unclosed children");
                }
                self.close_element("li");
                Ok(())
            }
            // "An end tag whose tag name is one of: "dd", "dt""
            "dd" | "dt" => {
                if !self.in_scope(&name, Scope::Default) {
                    self.parse_error(&format!("stray end tag </{name}>"));
                    return Ok(());
                }
                self.generate_implied_end_tags(Some(&name));
                if !self.current_is(&name) {
                    self.parse_error(&format!("</{name}> with unclosed children"));
                }
                self.close_element(&name);
                Ok(())
            }
            // "An end tag whose tag name is one of: "h1", "h2", "h3", "h4", "h5", "h6""
            n if HEADINGS.contains(&n) => {
                if !self.any_in_scope(HEADINGS, Scope::Default) {
                    self.parse_error(&format!("stray end tag </{n}>"));
                    return Ok(());
                }
                self.generate_implied_end_tags(None);
                if !self.current_is(n) {
                    self.parse_error(&format!("</{n}> closes a different heading"));
                }
                let closed = self.pop_until_one_of(HEADINGS);
                self.closed_by_end_tag(closed);
                Ok(())
            }
            // "An end tag whose tag name is one of: "a", "b", "big", "code", "em",
            // "font", "i", "nobr", "s", "small", "strike", "strong", "tt", "u": Run
            // the adoption agency algorithm for the token."
            n if FORMATTING.contains(&n) => self.run_adoption_agency(n),
            // "An end tag token whose tag name is one of: "applet", "marquee", "object""
            "applet" | "marquee" | "object" => {
                if !self.in_scope(&name, Scope::Default) {
                    self.parse_error(&format!("stray end tag </{name}>"));
                    return Ok(());
                }
                self.close_with_implied_end_tags(&name);
                self.clear_formatting_to_last_marker();
                Ok(())
            }
            // "An end tag whose tag name is "br": Parse error. Drop the attributes
            // from the token, and act as described in the next entry; i.e. act as if
            // this was a "br" start tag token with no attributes, rather than the end
            // tag token that it actually is."
            "br" => {
                self.parse_error("</br> treated as <br>");
                self.in_body_start_tag(Tag {
                    attributes: Vec::new(),
                    self_closing: false,
                    ..tag
                })
            }
            // "Any other end tag"
            _ => {
                self.any_other_end_tag(&name);
                Ok(())
            }
        }
    }
}
