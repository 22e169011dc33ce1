//! The head section and the "text" mode used for raw text elements.

use wombat_dom::{Namespace, NodeFactory};

use crate::tokenizer::RawTextMode;
use crate::tree_builder::core::{BuildResult, HtmlTreeBuilder, InsertionMode, OpenElement, TreeToken};
use crate::tree_builder::tag_sets::HEAD_CONTENT;

impl<F: NodeFactory> HtmlTreeBuilder<'_, F> {
    /// [§ 13.2.6.4.4 The "in head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inhead)
    pub(super) fn handle_in_head_mode(&mut self, token: TreeToken) -> BuildResult {
        match token {
            // "A character token that is one of U+0009 CHARACTER TABULATION, U+000A
            // LINE FEED (LF), U+000C FORM FEED (FF), U+000D CARRIAGE RETURN (CR), or
            // U+0020 SPACE: Insert the character."
            TreeToken::Characters(text) => {
                match self.split_whitespace_run(text, |this, ws| this.insert_text(ws))? {
                    Some(rest) => self.in_head_anything_else(TreeToken::Characters(rest)),
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
            // "A start tag whose tag name is one of: "base", "basefont", "bgsound",
            // "link": Insert an HTML element for the token. Immediately pop the
            // current node off the stack of open elements. Acknowledge the token's
            // self-closing flag, if it is set." `meta` is handled the same way
            // since encodings are not sniffed.
            TreeToken::StartTag(tag) if tag.is_one_of(&["base", "basefont", "bgsound", "link", "meta"]) => {
                self.insert_void_element(&tag)
            }
            // "A start tag whose tag name is "title": Follow the generic RCDATA
            // element parsing algorithm."
            TreeToken::StartTag(tag) if tag.name == "title" => {
                self.parse_raw_text_element(&tag, RawTextMode::Rcdata)
            }
            // "A start tag whose tag name is "noscript", if the scripting flag is
            // disabled: Insert an HTML element for the token. Switch the insertion
            // mode to "in head noscript"."
            TreeToken::StartTag(tag) if tag.name == "noscript" => {
                let _ = self.insert_html_element(&tag)?;
                self.switch_mode(InsertionMode::InHeadNoscript);
                Ok(())
            }
            // "A start tag whose tag name is one of: "noframes", "style": Follow the
            // generic raw text element parsing algorithm."
            TreeToken::StartTag(tag) if tag.is_one_of(&["noframes", "style"]) => {
                self.parse_raw_text_element(&tag, RawTextMode::Rawtext)
            }
            // "A start tag whose tag name is "script"": insert it, then switch the
            // tokenizer to the script data state and the insertion mode to "text".
            TreeToken::StartTag(tag) if tag.name == "script" => {
                self.parse_raw_text_element(&tag, RawTextMode::ScriptData)
            }
            // "An end tag whose tag name is "head": Pop the current node (which will
            // be the head element) off the stack of open elements. Switch the
            // insertion mode to "after head"."
            TreeToken::EndTag(tag) if tag.name == "head" => {
                let closed = self.pop().map(|node| node.handle);
                self.closed_by_end_tag(closed);
                self.switch_mode(InsertionMode::AfterHead);
                Ok(())
            }
            // "A start tag whose tag name is "template""
            TreeToken::StartTag(tag) if tag.name == "template" => {
                let _ = self.insert_html_element(&tag)?;
                self.push_formatting_marker();
                self.frameset_ok = false;
                self.switch_mode(InsertionMode::InTemplate);
                self.template_modes.push(InsertionMode::InTemplate);
                Ok(())
            }
            // "An end tag whose tag name is "template""
            TreeToken::EndTag(ref tag) if tag.name == "template" => {
                if !self.stack_has("template") {
                    self.unexpected(&token);
                    return Ok(());
                }
                self.generate_implied_end_tags_thoroughly();
                if !self.current_is("template") {
                    self.parse_error("</template> with unclosed children");
                }
                self.close_element("template");
                self.clear_formatting_to_last_marker();
                let _ = self.template_modes.pop();
                self.reset_insertion_mode();
                Ok(())
            }
            TreeToken::EndTag(ref tag) if tag.is_one_of(&["body", "html", "br"]) => {
                self.in_head_anything_else(token)
            }
            // "A start tag whose tag name is "head"" / "Any other end tag":
            // "Parse error. Ignore the token."
            TreeToken::StartTag(ref tag) if tag.name == "head" => {
                self.unexpected(&token);
                Ok(())
            }
            TreeToken::EndTag(_) => {
                self.unexpected(&token);
                Ok(())
            }
            other => self.in_head_anything_else(other),
        }
    }

    /// "Pop the current node (which will be the head element) off the stack of
    /// open elements. Switch the insertion mode to "after head". Reprocess the
    /// token."
    fn in_head_anything_else(&mut self, token: TreeToken) -> BuildResult {
        let _ = self.pop();
        self.reprocess_in(InsertionMode::AfterHead, token)
    }

    /// [§ 13.2.6.4.5 The "in head noscript" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inheadnoscript)
    pub(super) fn handle_in_head_noscript_mode(&mut self, token: TreeToken) -> BuildResult {
        match token {
            TreeToken::Doctype { .. } => {
                self.unexpected(&token);
                Ok(())
            }
            TreeToken::StartTag(ref tag) if tag.name == "html" => {
                self.process_in_mode(InsertionMode::InBody, token)
            }
            TreeToken::EndTag(tag) if tag.name == "noscript" => {
                let closed = self.pop().map(|node| node.handle);
                self.closed_by_end_tag(closed);
                self.switch_mode(InsertionMode::InHead);
                Ok(())
            }
            TreeToken::Characters(text) => {
                let rest = self.split_whitespace_run(text, |this, ws| {
                    this.process_in_mode(InsertionMode::InHead, TreeToken::Characters(ws.to_string()))
                })?;
                match rest {
                    Some(rest) => self.in_head_noscript_anything_else(TreeToken::Characters(rest)),
                    None => Ok(()),
                }
            }
            TreeToken::Comment(_) => self.process_in_mode(InsertionMode::InHead, token),
            TreeToken::StartTag(ref tag)
                if tag.is_one_of(&["basefont", "bgsound", "link", "meta", "noframes", "style"]) =>
            {
                self.process_in_mode(InsertionMode::InHead, token)
            }
            TreeToken::EndTag(ref tag) if tag.name == "br" => self.in_head_noscript_anything_else(token),
            TreeToken::StartTag(ref tag) if tag.is_one_of(&["head", "noscript"]) => {
                self.unexpected(&token);
                Ok(())
            }
            TreeToken::EndTag(_) => {
                self.unexpected(&token);
                Ok(())
            }
            other => self.in_head_noscript_anything_else(other),
        }
    }

    /// "Parse error. Pop the current node (which will be a noscript element)
    /// from the stack of open elements; the new current node will be a head
    /// element. Switch the insertion mode to "in head". Reprocess the token."
    fn in_head_noscript_anything_else(&mut self, token: TreeToken) -> BuildResult {
        self.unexpected(&token);
        let _ = self.pop();
        self.reprocess_in(InsertionMode::InHead, token)
    }

    /// [§ 13.2.6.4.6 The "after head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-after-head-insertion-mode)
    pub(super) fn handle_after_head_mode(&mut self, token: TreeToken) -> BuildResult {
        match token {
            TreeToken::Characters(text) => {
                match self.split_whitespace_run(text, |this, ws| this.insert_text(ws))? {
                    Some(rest) => self.after_head_anything_else(TreeToken::Characters(rest)),
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
            // "A start tag whose tag name is "body": Insert an HTML element for the
            // token. Set the frameset-ok flag to "not ok". Switch the insertion mode
            // to "in body"."
            TreeToken::StartTag(tag) if tag.name == "body" => {
                let _ = self.insert_html_element(&tag)?;
                self.frameset_ok = false;
                self.switch_mode(InsertionMode::InBody);
                Ok(())
            }
            TreeToken::StartTag(tag) if tag.name == "frameset" => {
                let _ = self.insert_html_element(&tag)?;
                self.switch_mode(InsertionMode::InFrameset);
                Ok(())
            }
            // "Parse error. Push the node pointed to by the head element pointer onto
            // the stack of open elements. Process the token using the rules for the
            // "in head" insertion mode. Remove the node pointed to by the head
            // element pointer from the stack of open elements. (It might not be the
            // current node at this point.)"
            TreeToken::StartTag(ref tag) if tag.is_one_of(HEAD_CONTENT) => {
                self.unexpected(&token);
                let Some(head) = self.head_element else {
                    return self.process_in_mode(InsertionMode::InHead, token);
                };
                self.open_elements.push(OpenElement {
                    handle: head,
                    name: "head".to_string(),
                    namespace: Namespace::Html,
                    html_integration_point: false,
                });
                self.process_in_mode(InsertionMode::InHead, token)?;
                if let Some(position) = self.stack_position(head) {
                    let _ = self.open_elements.remove(position);
                }
                Ok(())
            }
            TreeToken::EndTag(ref tag) if tag.name == "template" => {
                self.process_in_mode(InsertionMode::InHead, token)
            }
            TreeToken::EndTag(ref tag) if tag.is_one_of(&["body", "html", "br"]) => {
                self.after_head_anything_else(token)
            }
            TreeToken::StartTag(ref tag) if tag.name == "head" => {
                self.unexpected(&token);
                Ok(())
            }
            TreeToken::EndTag(_) => {
                self.unexpected(&token);
                Ok(())
            }
            other => self.after_head_anything_else(other),
        }
    }

    /// "Insert an HTML element for a "body" start tag token with no attributes.
    /// Switch the insertion mode to "in body". Reprocess the current token."
    fn after_head_anything_else(&mut self, token: TreeToken) -> BuildResult {
        let _ = self.insert_implied_element("body")?;
        self.reprocess_in(InsertionMode::InBody, token)
    }

    /// [§ 13.2.6.4.8 The "text" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-incdata)
    pub(super) fn handle_text_mode(&mut self, token: TreeToken) -> BuildResult {
        match token {
            TreeToken::Characters(text) => self.insert_text(&text),
            // "An end-of-file token: Parse error. ... Pop the current node off the
            // stack of open elements. Switch the insertion mode to the original
            // insertion mode and reprocess the token."
            TreeToken::Eof => {
                let open = self.current_node().map(|node| node.name.clone()).unwrap_or_default();
                self.parse_error(&format!("end of file inside <{open}>"));
                let _ = self.pop();
                self.reprocess_in(self.original_mode, token)
            }
            // "An end tag whose tag name is "script"" and "Any other end tag": pop
            // the current node and return to the original insertion mode. Scripts
            // are not executed.
            TreeToken::EndTag(_) => {
                let closed = self.pop().map(|node| node.handle);
                self.closed_by_end_tag(closed);
                self.switch_mode(self.original_mode);
                Ok(())
            }
            // The tokenizer only produces text and the matching end tag here.
            other => {
                self.unexpected(&other);
                Ok(())
            }
        }
    }
}
