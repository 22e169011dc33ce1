use wombat_dom::NodeFactory;

use crate::tree_builder::core::{BuildResult, HtmlTreeBuilder, InsertionMode, TreeToken};
use crate::tree_builder::tag_sets::HEAD_CONTENT;

impl<F: NodeFactory> HtmlTreeBuilder<'_, F> {
    /// [§ 13.2.6.4.18 The "in template" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intemplate)
    ///
    /// Template contents are built as ordinary children of the `template`
    /// element.
    pub(super) fn handle_in_template_mode(&mut self, token: TreeToken) -> BuildResult {
        match token {
            TreeToken::Characters(_) | TreeToken::Comment(_) | TreeToken::Doctype { .. } => {
                self.process_in_mode(InsertionMode::InBody, token)
            }
            TreeToken::StartTag(ref tag) if tag.is_one_of(HEAD_CONTENT) => {
                self.process_in_mode(InsertionMode::InHead, token)
            }
            TreeToken::EndTag(ref tag) if tag.name == "template" => {
                self.process_in_mode(InsertionMode::InHead, token)
            }
            // "A start tag whose tag name is one of: "caption", "colgroup", "tbody",
            // "tfoot", "thead": Pop the current template insertion mode off the stack
            // of template insertion modes. Push "in table" onto the stack of template
            // insertion modes so that it is the new current template insertion mode.
            // Switch the insertion mode to "in table", and reprocess the token."
            TreeToken::StartTag(ref tag) if tag.is_one_of(&["caption", "colgroup", "tbody", "tfoot", "thead"]) => {
                self.retarget_template(InsertionMode::InTable, token)
            }
            TreeToken::StartTag(ref tag) if tag.name == "col" => {
                self.retarget_template(InsertionMode::InColumnGroup, token)
            }
            TreeToken::StartTag(ref tag) if tag.name == "tr" => {
                self.retarget_template(InsertionMode::InTableBody, token)
            }
            TreeToken::StartTag(ref tag) if tag.is_one_of(&["td", "th"]) => {
                self.retarget_template(InsertionMode::InRow, token)
            }
            TreeToken::StartTag(_) => self.retarget_template(InsertionMode::InBody, token),
            TreeToken::EndTag(_) => {
                self.unexpected(&token);
                Ok(())
            }
            // "An end-of-file token"
            TreeToken::Eof => {
                // "If there is no template element on the stack of open elements, then
                // stop parsing. (fragment case)"
                if !self.stack_has("template") {
                    self.stop_parsing();
                    return Ok(());
                }
                // "Otherwise, this is a parse error."
                self.parse_error("end of file inside <template>");
                // "Pop elements from the stack of open elements until a template
                // element has been popped from the stack. Clear the list of active
                // formatting elements up to the last marker. Pop the current template
                // insertion mode off the stack of template insertion modes. Reset the
                // insertion mode appropriately. Reprocess the token."
                let _ = self.pop_until("template");
                self.clear_formatting_to_last_marker();
                let _ = self.template_modes.pop();
                self.reset_insertion_mode();
                self.dispatch(token)
            }
        }
    }

    fn retarget_template(&mut self, mode: InsertionMode, token: TreeToken) -> BuildResult {
        let _ = self.template_modes.pop();
        self.template_modes.push(mode);
        self.reprocess_in(mode, token)
    }
}
