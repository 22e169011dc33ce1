use wombat_dom::NodeFactory;

use crate::tree_builder::core::{BuildResult, HtmlTreeBuilder, InsertionMode, TreeToken};
use crate::tree_builder::scope::Scope;

/// Table tags that close a `select` opened inside a table.
const TABLE_TAGS: &[&str] = &["caption", "table", "tbody", "tfoot", "thead", "tr", "td", "th"];

impl<F: NodeFactory> HtmlTreeBuilder<'_, F> {
    /// [§ 13.2.6.4.16 The "in select" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inselect)
    pub(super) fn handle_in_select_mode(&mut self, token: TreeToken) -> BuildResult {
        match token {
            TreeToken::Characters(text) => {
                let text = if text.contains('\0') {
                    self.parse_error("unexpected-null-character");
                    text.replace('\0', "")
                } else {
                    text
                };
                self.insert_text(&text)
            }
            TreeToken::Comment(data) => self.insert_comment(&data),
            TreeToken::Doctype { .. } => {
                self.unexpected(&token);
                Ok(())
            }
            TreeToken::StartTag(ref tag) if tag.name == "html" => {
                self.process_in_mode(InsertionMode::InBody, token)
            }
            // "A start tag whose tag name is "option": If the current node is an
            // option element, pop that node from the stack of open elements. Insert
            // an HTML element for the token."
            TreeToken::StartTag(tag) if tag.name == "option" => {
                self.pop_if_current("option");
                let _ = self.insert_html_element(&tag)?;
                Ok(())
            }
            TreeToken::StartTag(tag) if tag.name == "optgroup" => {
                self.pop_if_current("option");
                self.pop_if_current("optgroup");
                let _ = self.insert_html_element(&tag)?;
                Ok(())
            }
            TreeToken::StartTag(tag) if tag.name == "hr" => {
                self.pop_if_current("option");
                self.pop_if_current("optgroup");
                self.insert_void_element(&tag)
            }
            // "An end tag whose tag name is "optgroup": First, if the current node is
            // an option element, and the node immediately before it in the stack of
            // open elements is an optgroup element, then pop the current node from
            // the stack of open elements."
            TreeToken::EndTag(ref tag) if tag.name == "optgroup" => {
                let len = self.open_elements.len();
                if len >= 2
                    && self.open_elements[len - 1].is_html("option")
                    && self.open_elements[len - 2].is_html("optgroup")
                {
                    let _ = self.pop();
                }
                if self.current_is("optgroup") {
                    let closed = self.pop().map(|node| node.handle);
                    self.closed_by_end_tag(closed);
                } else {
                    self.unexpected(&token);
                }
                Ok(())
            }
            TreeToken::EndTag(ref tag) if tag.name == "option" => {
                if self.current_is("option") {
                    let closed = self.pop().map(|node| node.handle);
                    self.closed_by_end_tag(closed);
                } else {
                    self.unexpected(&token);
                }
                Ok(())
            }
            // "An end tag whose tag name is "select": If the stack of open elements
            // does not have a select element in select scope, this is a parse error;
            // ignore the token. Otherwise: Pop elements from the stack of open
            // elements until a select element has been popped from the stack. Reset
            // the insertion mode appropriately."
            TreeToken::EndTag(ref tag) if tag.name == "select" => {
                if !self.in_scope("select", Scope::Select) {
                    self.unexpected(&token);
                    return Ok(());
                }
                self.close_element("select");
                self.reset_insertion_mode();
                Ok(())
            }
            // "A start tag whose tag name is "select": Parse error. If the stack of
            // open elements does not have a select element in select scope, ignore
            // the token. Otherwise: Pop elements ... until a select element has been
            // popped from the stack. Reset the insertion mode appropriately."
            TreeToken::StartTag(ref tag) if tag.name == "select" => {
                self.unexpected(&token);
                if self.in_scope("select", Scope::Select) {
                    let _ = self.pop_until("select");
                    self.reset_insertion_mode();
                }
                Ok(())
            }
            TreeToken::StartTag(ref tag) if tag.is_one_of(&["input", "keygen", "textarea"]) => {
                self.unexpected(&token);
                if !self.in_scope("select", Scope::Select) {
                    return Ok(());
                }
                let _ = self.pop_until("select");
                self.reset_insertion_mode();
                self.dispatch(token)
            }
            TreeToken::StartTag(ref tag) if tag.is_one_of(&["script", "template"]) => {
                self.process_in_mode(InsertionMode::InHead, token)
            }
            TreeToken::EndTag(ref tag) if tag.name == "template" => {
                self.process_in_mode(InsertionMode::InHead, token)
            }
            TreeToken::Eof => self.process_in_mode(InsertionMode::InBody, token),
            other => {
                self.unexpected(&other);
                Ok(())
            }
        }
    }

    fn pop_if_current(&mut self, name: &str) {
        if self.current_is(name) {
            let _ = self.pop();
        }
    }

    /// [§ 13.2.6.4.17 The "in select in table" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inselectintable)
    pub(super) fn handle_in_select_in_table_mode(&mut self, token: TreeToken) -> BuildResult {
        match token {
            TreeToken::StartTag(ref tag) if tag.is_one_of(TABLE_TAGS) => {
                self.unexpected(&token);
                let _ = self.pop_until("select");
                self.reset_insertion_mode();
                self.dispatch(token)
            }
            TreeToken::EndTag(ref tag) if tag.is_one_of(TABLE_TAGS) => {
                self.unexpected(&token);
                if !self.in_scope(&tag.name, Scope::Table) {
                    return Ok(());
                }
                let _ = self.pop_until("select");
                self.reset_insertion_mode();
                self.dispatch(token)
            }
            other => self.process_in_mode(InsertionMode::InSelect, other),
        }
    }
}
