//! Table modes: "in table" through "in cell".

use wombat_dom::NodeFactory;

use crate::tree_builder::core::{BuildResult, HtmlTreeBuilder, InsertionMode, TreeToken, is_html_whitespace};
use crate::tree_builder::scope::Scope;
use crate::tree_builder::tag_sets::{TABLE_SECTIONS, TABLE_STRUCTURE};

impl<F: NodeFactory> HtmlTreeBuilder<'_, F> {
    /// [§ 13.2.6.4.9 The "in table" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intable)
    #[allow(clippy::too_many_lines)]
    pub(super) fn handle_in_table_mode(&mut self, token: TreeToken) -> BuildResult {
        match token {
            // "A character token, if the current node is table, tbody, template,
            // tfoot, thead, or tr element: Let the pending table character tokens be
            // an empty list of tokens. Let the original insertion mode be the current
            // insertion mode. Switch the insertion mode to "in table text" and
            // reprocess the token."
            TreeToken::Characters(_)
                if self.current_is_one_of(&["table", "tbody", "template", "tfoot", "thead", "tr"]) =>
            {
                self.pending_table_text.clear();
                self.original_mode = self.mode;
                self.reprocess_in(InsertionMode::InTableText, token)
            }
            TreeToken::Comment(data) => self.insert_comment(&data),
            TreeToken::Doctype { .. } => {
                self.unexpected(&token);
                Ok(())
            }
            // "A start tag whose tag name is "caption": Clear the stack back to a
            // table context. Insert a marker at the end of the list of active
            // formatting elements. Insert an HTML element for the token, then switch
            // the insertion mode to "in caption"."
            TreeToken::StartTag(tag) if tag.name == "caption" => {
                self.clear_stack_to_table_context();
                self.push_formatting_marker();
                let _ = self.insert_html_element(&tag)?;
                self.switch_mode(InsertionMode::InCaption);
                Ok(())
            }
            TreeToken::StartTag(tag) if tag.name == "colgroup" => {
                self.clear_stack_to_table_context();
                let _ = self.insert_html_element(&tag)?;
                self.switch_mode(InsertionMode::InColumnGroup);
                Ok(())
            }
            // "A start tag whose tag name is "col": Clear the stack back to a table
            // context. Insert an HTML element for a "colgroup" start tag token with
            // no attributes, then switch the insertion mode to "in column group".
            // Reprocess the current token."
            TreeToken::StartTag(ref tag) if tag.name == "col" => {
                self.clear_stack_to_table_context();
                let _ = self.insert_implied_element("colgroup")?;
                self.reprocess_in(InsertionMode::InColumnGroup, token)
            }
            TreeToken::StartTag(tag) if tag.is_one_of(TABLE_SECTIONS) => {
                self.clear_stack_to_table_context();
                let _ = self.insert_html_element(&tag)?;
                self.switch_mode(InsertionMode::InTableBody);
                Ok(())
            }
            TreeToken::StartTag(ref tag) if tag.is_one_of(&["td", "th", "tr"]) => {
                self.clear_stack_to_table_context();
                let _ = self.insert_implied_element("tbody")?;
                self.reprocess_in(InsertionMode::InTableBody, token)
            }
            // "A start tag whose tag name is "table": Parse error. If the stack of
            // open elements does not have a table element in table scope, ignore the
            // token. Otherwise: Pop elements from this stack until a table element
            // has been popped from the stack. Reset the insertion mode appropriately.
            // Reprocess the token."
            TreeToken::StartTag(ref tag) if tag.name == "table" => {
                self.parse_error("<table> inside <table>");
                if !self.in_scope("table", Scope::Table) {
                    return Ok(());
                }
                let _ = self.pop_until("table");
                self.reset_insertion_mode();
                self.dispatch(token)
            }
            TreeToken::EndTag(ref tag) if tag.name == "table" => {
                if !self.in_scope("table", Scope::Table) {
                    self.unexpected(&token);
                    return Ok(());
                }
                self.close_element("table");
                self.reset_insertion_mode();
                Ok(())
            }
            TreeToken::EndTag(ref tag)
                if tag.is_one_of(&[
                    "body", "caption", "col", "colgroup", "html", "tbody", "td", "tfoot", "th",
                    "thead", "tr",
                ]) =>
            {
                self.unexpected(&token);
                Ok(())
            }
            TreeToken::StartTag(ref tag) if tag.is_one_of(&["style", "script", "template"]) => {
                self.process_in_mode(InsertionMode::InHead, token)
            }
            TreeToken::EndTag(ref tag) if tag.name == "template" => {
                self.process_in_mode(InsertionMode::InHead, token)
            }
            // "A start tag whose tag name is "input": If the token does not have an
            // attribute with the name "type", or if it does, but that attribute's
            // value is not an ASCII case-insensitive match for the string "hidden",
            // then: act as described in the "anything else" entry below."
            TreeToken::StartTag(ref tag)
                if tag.name == "input"
                    && tag
                        .attribute("type")
                        .is_some_and(|value| value.eq_ignore_ascii_case("hidden")) =>
            {
                self.unexpected(&token);
                let TreeToken::StartTag(tag) = token else {
                    return Ok(());
                };
                self.insert_void_element(&tag)
            }
            // "A start tag whose tag name is "form""
            TreeToken::StartTag(tag) if tag.name == "form" => {
                self.parse_error("<form> inside <table>");
                if self.stack_has("template") || self.form_element.is_some() {
                    return Ok(());
                }
                let form = self.insert_html_element(&tag)?;
                self.form_element = Some(form);
                let _ = self.pop();
                Ok(())
            }
            TreeToken::Eof => self.process_in_mode(InsertionMode::InBody, token),
            other => self.in_table_anything_else(other),
        }
    }

    /// "Parse error. Enable foster parenting, process the token using the rules
    /// for the "in body" insertion mode, and then disable foster parenting."
    fn in_table_anything_else(&mut self, token: TreeToken) -> BuildResult {
        self.unexpected(&token);
        self.foster_parenting = true;
        let result = self.process_in_mode(InsertionMode::InBody, token);
        self.foster_parenting = false;
        result
    }

    /// [§ 13.2.6.4.10 The "in table text" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intabletext)
    pub(super) fn handle_in_table_text_mode(&mut self, token: TreeToken) -> BuildResult {
        match token {
            // "A character token that is U+0000 NULL: Parse error. Ignore the token."
            // "Any other character token: Append the character token to the pending
            // table character tokens list."
            TreeToken::Characters(text) => {
                if text.contains('\0') {
                    self.parse_error("unexpected-null-character");
                    self.pending_table_text.push(text.replace('\0', ""));
                } else {
                    self.pending_table_text.push(text);
                }
                Ok(())
            }
            other => {
                let pending = std::mem::take(&mut self.pending_table_text).concat();
                // "If any of the tokens in the pending table character tokens list are
                // character tokens that are not ASCII whitespace, then this is a parse
                // error: reprocess the character tokens in the pending table character
                // tokens list using the rules given in the "anything else" entry in the
                // "in table" insertion mode."
                if pending.chars().any(|c| !is_html_whitespace(c)) {
                    self.in_table_anything_else(TreeToken::Characters(pending))?;
                } else {
                    // "Otherwise, insert the characters given by the pending table
                    // character tokens list."
                    self.insert_text(&pending)?;
                }
                // "Switch the insertion mode to the original insertion mode and
                // reprocess the token."
                self.switch_mode(self.original_mode);
                self.dispatch(other)
            }
        }
    }

    /// [§ 13.2.6.4.11 The "in caption" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-incaption)
    pub(super) fn handle_in_caption_mode(&mut self, token: TreeToken) -> BuildResult {
        match token {
            TreeToken::EndTag(ref tag) if tag.name == "caption" => {
                if self.close_caption() {
                    self.switch_mode(InsertionMode::InTable);
                } else {
                    self.unexpected(&token);
                }
                Ok(())
            }
            TreeToken::StartTag(ref tag) if tag.is_one_of(TABLE_STRUCTURE) => {
                self.close_caption_and_reprocess(token)
            }
            TreeToken::EndTag(ref tag) if tag.name == "table" => self.close_caption_and_reprocess(token),
            TreeToken::EndTag(ref tag)
                if tag.is_one_of(&[
                    "body", "col", "colgroup", "html", "tbody", "td", "tfoot", "th", "thead", "tr",
                ]) =>
            {
                self.unexpected(&token);
                Ok(())
            }
            other => self.process_in_mode(InsertionMode::InBody, other),
        }
    }

    /// Close the open caption, if there is one in table scope.
    fn close_caption(&mut self) -> bool {
        // "If the stack of open elements does not have a caption element in table
        // scope, this is a parse error; ignore the token. (fragment case)"
        if !self.in_scope("caption", Scope::Table) {
            return false;
        }
        self.generate_implied_end_tags(None);
        if !self.current_is("caption") {
            self.parse_error("</caption> with unclosed children");
        }
        self.close_element("caption");
        self.clear_formatting_to_last_marker();
        true
    }

    fn close_caption_and_reprocess(&mut self, token: TreeToken) -> BuildResult {
        if !self.close_caption() {
            self.unexpected(&token);
            return Ok(());
        }
        self.reprocess_in(InsertionMode::InTable, token)
    }

    /// [§ 13.2.6.4.12 The "in column group" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-incolgroup)
    pub(super) fn handle_in_column_group_mode(&mut self, token: TreeToken) -> BuildResult {
        match token {
            TreeToken::Characters(text) => {
                match self.split_whitespace_run(text, |this, ws| this.insert_text(ws))? {
                    Some(rest) => self.in_column_group_anything_else(TreeToken::Characters(rest)),
                    None => Ok(()),
                }
            }
            TreeToken::Comment(data) => self.insert_comment(&data),
            TreeToken::Doctype { .. } => {
                self.unexpected(&token);
                Ok(())
            }
            TreeToken::StartTag(ref tag) if tag.name == "html" => {
                self.process_in_mode(InsertionMode::InBody, token)
            }
            TreeToken::StartTag(tag) if tag.name == "col" => self.insert_void_element(&tag),
            // "An end tag whose tag name is "colgroup": If the current node is not a
            // colgroup element, then this is a parse error; ignore the token.
            // Otherwise, pop the current node from the stack of open elements.
            // Switch the insertion mode to "in table"."
            TreeToken::EndTag(ref tag) if tag.name == "colgroup" => {
                if !self.current_is("colgroup") {
                    self.unexpected(&token);
                    return Ok(());
                }
                let closed = self.pop().map(|node| node.handle);
                self.closed_by_end_tag(closed);
                self.switch_mode(InsertionMode::InTable);
                Ok(())
            }
            TreeToken::EndTag(ref tag) if tag.name == "col" => {
                self.unexpected(&token);
                Ok(())
            }
            TreeToken::StartTag(ref tag) if tag.name == "template" => {
                self.process_in_mode(InsertionMode::InHead, token)
            }
            TreeToken::EndTag(ref tag) if tag.name == "template" => {
                self.process_in_mode(InsertionMode::InHead, token)
            }
            TreeToken::Eof => self.process_in_mode(InsertionMode::InBody, token),
            other => self.in_column_group_anything_else(other),
        }
    }

    /// "If the current node is not a colgroup element, then this is a parse
    /// error; ignore the token. Otherwise, pop the current node from the stack
    /// of open elements. Switch the insertion mode to "in table". Reprocess the
    /// token."
    fn in_column_group_anything_else(&mut self, token: TreeToken) -> BuildResult {
        if !self.current_is("colgroup") {
            self.unexpected(&token);
            return Ok(());
        }
        let _ = self.pop();
        self.reprocess_in(InsertionMode::InTable, token)
    }

    /// [§ 13.2.6.4.13 The "in table body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intbody)
    pub(super) fn handle_in_table_body_mode(&mut self, token: TreeToken) -> BuildResult {
        match token {
            // "A start tag whose tag name is "tr": Clear the stack back to a table
            // body context. Insert an HTML element for the token, then switch the
            // insertion mode to "in row"."
            TreeToken::StartTag(tag) if tag.name == "tr" => {
                self.clear_stack_to_table_body_context();
                let _ = self.insert_html_element(&tag)?;
                self.switch_mode(InsertionMode::InRow);
                Ok(())
            }
            TreeToken::StartTag(ref tag) if tag.is_one_of(&["th", "td"]) => {
                self.unexpected(&token);
                self.clear_stack_to_table_body_context();
                let _ = self.insert_implied_element("tr")?;
                self.reprocess_in(InsertionMode::InRow, token)
            }
            TreeToken::EndTag(ref tag) if tag.is_one_of(TABLE_SECTIONS) => {
                if !self.in_scope(&tag.name, Scope::Table) {
                    self.unexpected(&token);
                    return Ok(());
                }
                self.clear_stack_to_table_body_context();
                let closed = self.pop().map(|node| node.handle);
                self.closed_by_end_tag(closed);
                self.switch_mode(InsertionMode::InTable);
                Ok(())
            }
            TreeToken::StartTag(ref tag)
                if tag.is_one_of(&["caption", "col", "colgroup", "tbody", "tfoot", "thead"]) =>
            {
                self.close_table_section_and_reprocess(token)
            }
            TreeToken::EndTag(ref tag) if tag.name == "table" => self.close_table_section_and_reprocess(token),
            TreeToken::EndTag(ref tag)
                if tag.is_one_of(&["body", "caption", "col", "colgroup", "html", "td", "th", "tr"]) =>
            {
                self.unexpected(&token);
                Ok(())
            }
            other => self.process_in_mode(InsertionMode::InTable, other),
        }
    }

    /// "If the stack of open elements does not have a tbody, thead, or tfoot
    /// element in table scope, this is a parse error; ignore the token.
    /// Otherwise: Clear the stack back to a table body context. Pop the current
    /// node from the stack of open elements. Switch the insertion mode to "in
    /// table". Reprocess the token."
    fn close_table_section_and_reprocess(&mut self, token: TreeToken) -> BuildResult {
        if !self.any_in_scope(TABLE_SECTIONS, Scope::Table) {
            self.unexpected(&token);
            return Ok(());
        }
        self.clear_stack_to_table_body_context();
        let _ = self.pop();
        self.reprocess_in(InsertionMode::InTable, token)
    }

    /// [§ 13.2.6.4.14 The "in row" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intr)
    pub(super) fn handle_in_row_mode(&mut self, token: TreeToken) -> BuildResult {
        match token {
            // "A start tag whose tag name is one of: "th", "td": Clear the stack back
            // to a table row context. Insert an HTML element for the token, then
            // switch the insertion mode to "in cell". Insert a marker at the end of
            // the list of active formatting elements."
            TreeToken::StartTag(tag) if tag.is_one_of(&["th", "td"]) => {
                self.clear_stack_to_table_row_context();
                let _ = self.insert_html_element(&tag)?;
                self.switch_mode(InsertionMode::InCell);
                self.push_formatting_marker();
                Ok(())
            }
            TreeToken::EndTag(ref tag) if tag.name == "tr" => {
                if !self.in_scope("tr", Scope::Table) {
                    self.unexpected(&token);
                    return Ok(());
                }
                self.clear_stack_to_table_row_context();
                let closed = self.pop().map(|node| node.handle);
                self.closed_by_end_tag(closed);
                self.switch_mode(InsertionMode::InTableBody);
                Ok(())
            }
            TreeToken::StartTag(ref tag)
                if tag.is_one_of(&["caption", "col", "colgroup", "tbody", "tfoot", "thead", "tr"]) =>
            {
                self.close_row_and_reprocess(token)
            }
            TreeToken::EndTag(ref tag) if tag.name == "table" => self.close_row_and_reprocess(token),
            // "An end tag whose tag name is one of: "tbody", "tfoot", "thead": If the
            // stack of open elements does not have an element in table scope that is
            // an HTML element with the same tag name as the token, this is a parse
            // error; ignore the token."
            TreeToken::EndTag(ref tag) if tag.is_one_of(TABLE_SECTIONS) => {
                if !self.in_scope(&tag.name, Scope::Table) {
                    self.unexpected(&token);
                    return Ok(());
                }
                // "If the stack of open elements does not have a tr element in table
                // scope, ignore the token."
                if !self.in_scope("tr", Scope::Table) {
                    return Ok(());
                }
                self.clear_stack_to_table_row_context();
                let _ = self.pop();
                self.reprocess_in(InsertionMode::InTableBody, token)
            }
            TreeToken::EndTag(ref tag)
                if tag.is_one_of(&["body", "caption", "col", "colgroup", "html", "td", "th"]) =>
            {
                self.unexpected(&token);
                Ok(())
            }
            other => self.process_in_mode(InsertionMode::InTable, other),
        }
    }

    fn close_row_and_reprocess(&mut self, token: TreeToken) -> BuildResult {
        if !self.in_scope("tr", Scope::Table) {
            self.unexpected(&token);
            return Ok(());
        }
        self.clear_stack_to_table_row_context();
        let _ = self.pop();
        self.reprocess_in(InsertionMode::InTableBody, token)
    }

    /// [§ 13.2.6.4.15 The "in cell" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intd)
    pub(super) fn handle_in_cell_mode(&mut self, token: TreeToken) -> BuildResult {
        match token {
            // "An end tag whose tag name is one of: "td", "th""
            TreeToken::EndTag(ref tag) if tag.is_one_of(&["td", "th"]) => {
                let name = tag.name.clone();
                if !self.in_scope(&name, Scope::Table) {
                    self.unexpected(&token);
                    return Ok(());
                }
                self.generate_implied_end_tags(None);
                if !self.current_is(&name) {
                    self.parse_error(&format!("</{name}> with unclosed children"));
                }
                self.close_element(&name);
                self.clear_formatting_to_last_marker();
                self.switch_mode(InsertionMode::InRow);
                Ok(())
            }
            // "A start tag whose tag name is one of: "caption", "col", "colgroup",
            // "tbody", "td", "tfoot", "th", "thead", "tr": Assert: The stack of open
            // elements has a td or th element in table scope. Close the cell and
            // reprocess the token."
            TreeToken::StartTag(ref tag) if tag.is_one_of(TABLE_STRUCTURE) => {
                if !self.any_in_scope(&["td", "th"], Scope::Table) {
                    self.unexpected(&token);
                    return Ok(());
                }
                self.close_cell();
                self.dispatch(token)
            }
            TreeToken::EndTag(ref tag) if tag.is_one_of(&["body", "caption", "col", "colgroup", "html"]) => {
                self.unexpected(&token);
                Ok(())
            }
            TreeToken::EndTag(ref tag) if tag.is_one_of(&["table", "tbody", "tfoot", "thead", "tr"]) => {
                if !self.in_scope(&tag.name, Scope::Table) {
                    self.unexpected(&token);
                    return Ok(());
                }
                self.close_cell();
                self.dispatch(token)
            }
            other => self.process_in_mode(InsertionMode::InBody, other),
        }
    }
}
