//! [§ 13.2.6.4 The rules for parsing tokens in HTML content](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inhtml)
//!
//! One file per family of insertion modes.

mod after;
mod body;
mod head;
mod initial;
mod select;
mod table;
mod template;

use wombat_dom::NodeFactory;

use super::core::{BuildResult, HtmlTreeBuilder, InsertionMode, TreeToken};

impl<F: NodeFactory> HtmlTreeBuilder<'_, F> {
    /// Process `token` with the rules of `mode`. Callers that "process the
    /// token using the rules for" another mode pass that mode without
    /// switching to it.
    pub(in crate::tree_builder) fn process_in_mode(&mut self, mode: InsertionMode, token: TreeToken) -> BuildResult {
        match mode {
            InsertionMode::Initial => self.handle_initial_mode(token),
            InsertionMode::BeforeHtml => self.handle_before_html_mode(token),
            InsertionMode::BeforeHead => self.handle_before_head_mode(token),
            InsertionMode::InHead => self.handle_in_head_mode(token),
            InsertionMode::InHeadNoscript => self.handle_in_head_noscript_mode(token),
            InsertionMode::AfterHead => self.handle_after_head_mode(token),
            InsertionMode::InBody => self.handle_in_body_mode(token),
            InsertionMode::Text => self.handle_text_mode(token),
            InsertionMode::InTable => self.handle_in_table_mode(token),
            InsertionMode::InTableText => self.handle_in_table_text_mode(token),
            InsertionMode::InCaption => self.handle_in_caption_mode(token),
            InsertionMode::InColumnGroup => self.handle_in_column_group_mode(token),
            InsertionMode::InTableBody => self.handle_in_table_body_mode(token),
            InsertionMode::InRow => self.handle_in_row_mode(token),
            InsertionMode::InCell => self.handle_in_cell_mode(token),
            InsertionMode::InSelect => self.handle_in_select_mode(token),
            InsertionMode::InSelectInTable => self.handle_in_select_in_table_mode(token),
            InsertionMode::InTemplate => self.handle_in_template_mode(token),
            InsertionMode::AfterBody => self.handle_after_body_mode(token),
            InsertionMode::InFrameset => self.handle_in_frameset_mode(token),
            InsertionMode::AfterFrameset => self.handle_after_frameset_mode(token),
            InsertionMode::AfterAfterBody => self.handle_after_after_body_mode(token),
            InsertionMode::AfterAfterFrameset => self.handle_after_after_frameset_mode(token),
        }
    }

    /// Switch modes and hand the token to the new one.
    pub(in crate::tree_builder) fn reprocess_in(&mut self, mode: InsertionMode, token: TreeToken) -> BuildResult {
        self.switch_mode(mode);
        self.process_in_mode(mode, token)
    }

    /// Handle the leading whitespace of a character run with `on_whitespace`
    /// and return the rest, if any, for the mode's "anything else" branch.
    pub(in crate::tree_builder) fn split_whitespace_run(
        &mut self,
        text: String,
        on_whitespace: impl FnOnce(&mut Self, &str) -> BuildResult,
    ) -> BuildResult<Option<String>> {
        let (whitespace, rest) = super::core::split_leading_whitespace(&text);
        if !whitespace.is_empty() {
            on_whitespace(self, whitespace)?;
        }
        Ok((!rest.is_empty()).then(|| rest.to_string()))
    }
}
