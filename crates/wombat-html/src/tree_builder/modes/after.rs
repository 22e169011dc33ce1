//! The modes after the body or frameset has been closed, and the frameset
//! modes themselves.

use wombat_dom::NodeFactory;

use crate::tree_builder::core::{
    BuildResult, HtmlTreeBuilder, InsertionMode, InsertionPoint, TreeToken, is_html_whitespace,
};

impl<F: NodeFactory> HtmlTreeBuilder<'_, F> {
    /// [§ 13.2.6.4.19 The "after body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-afterbody)
    pub(super) fn handle_after_body_mode(&mut self, token: TreeToken) -> BuildResult {
        match token {
            TreeToken::Characters(text) => {
                let rest = self.split_whitespace_run(text, |this, ws| {
                    this.process_in_mode(InsertionMode::InBody, TreeToken::Characters(ws.to_string()))
                })?;
                match rest {
                    Some(rest) => self.after_body_anything_else(TreeToken::Characters(rest)),
                    None => Ok(()),
                }
            }
            // "A comment token: Insert a comment as the last child of the first
            // element in the stack of open elements (the html element)."
            TreeToken::Comment(data) => {
                let point = self
                    .open_elements
                    .first()
                    .map_or(InsertionPoint::Append(self.document), |root| {
                        InsertionPoint::Append(root.handle)
                    });
                self.insert_comment_at(&data, point)
            }
            TreeToken::Doctype { .. } => {
                self.unexpected(&token);
                Ok(())
            }
            TreeToken::StartTag(ref tag) if tag.name == "html" => {
                self.process_in_mode(InsertionMode::InBody, token)
            }
            // "An end tag whose tag name is "html": If the parser was created as part
            // of the HTML fragment parsing algorithm, this is a parse error; ignore
            // the token. (fragment case) Otherwise, switch the insertion mode to
            // "after after body"."
            TreeToken::EndTag(ref tag) if tag.name == "html" => {
                if self.context.is_some() {
                    self.unexpected(&token);
                    return Ok(());
                }
                self.end_tag_seen_for("html");
                self.switch_mode(InsertionMode::AfterAfterBody);
                Ok(())
            }
            TreeToken::Eof => {
                self.stop_parsing();
                Ok(())
            }
            other => self.after_body_anything_else(other),
        }
    }

    /// "Parse error. Switch the insertion mode to "in body" and reprocess the
    /// token."
    fn after_body_anything_else(&mut self, token: TreeToken) -> BuildResult {
        self.unexpected(&token);
        self.reprocess_in(InsertionMode::InBody, token)
    }

    /// [§ 13.2.6.4.20 The "in frameset" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inframeset)
    pub(super) fn handle_in_frameset_mode(&mut self, token: TreeToken) -> BuildResult {
        match token {
            TreeToken::Characters(text) => self.insert_frameset_whitespace(text),
            TreeToken::Comment(data) => self.insert_comment(&data),
            TreeToken::StartTag(ref tag) if tag.name == "html" => {
                self.process_in_mode(InsertionMode::InBody, token)
            }
            TreeToken::StartTag(tag) if tag.name == "frameset" => {
                let _ = self.insert_html_element(&tag)?;
                Ok(())
            }
            // "An end tag whose tag name is "frameset": If the current node is the
            // root html element, then this is a parse error; ignore the token.
            // (fragment case) Otherwise, pop the current node from the stack of open
            // elements. If the parser was not created as part of the HTML fragment
            // parsing algorithm (fragment case), and the current node is no longer a
            // frameset element, then switch the insertion mode to "after frameset"."
            TreeToken::EndTag(ref tag) if tag.name == "frameset" => {
                if self.open_elements.len() <= 1 {
                    self.unexpected(&token);
                    return Ok(());
                }
                let closed = self.pop().map(|node| node.handle);
                self.closed_by_end_tag(closed);
                if self.context.is_none() && !self.current_is("frameset") {
                    self.switch_mode(InsertionMode::AfterFrameset);
                }
                Ok(())
            }
            TreeToken::StartTag(tag) if tag.name == "frame" => self.insert_void_element(&tag),
            TreeToken::StartTag(ref tag) if tag.name == "noframes" => {
                self.process_in_mode(InsertionMode::InHead, token)
            }
            // "An end-of-file token: If the current node is not the root html
            // element, then this is a parse error. Note: The current node can only be
            // the root html element in the fragment case. Stop parsing."
            TreeToken::Eof => {
                if self.open_elements.len() > 1 {
                    self.parse_error("end of file inside <frameset>");
                }
                self.stop_parsing();
                Ok(())
            }
            other => {
                self.unexpected(&other);
                Ok(())
            }
        }
    }

    /// [§ 13.2.6.4.21 The "after frameset" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-afterframeset)
    pub(super) fn handle_after_frameset_mode(&mut self, token: TreeToken) -> BuildResult {
        match token {
            TreeToken::Characters(text) => self.insert_frameset_whitespace(text),
            TreeToken::Comment(data) => self.insert_comment(&data),
            TreeToken::StartTag(ref tag) if tag.name == "html" => {
                self.process_in_mode(InsertionMode::InBody, token)
            }
            TreeToken::EndTag(ref tag) if tag.name == "html" => {
                self.end_tag_seen_for("html");
                self.switch_mode(InsertionMode::AfterAfterFrameset);
                Ok(())
            }
            TreeToken::StartTag(ref tag) if tag.name == "noframes" => {
                self.process_in_mode(InsertionMode::InHead, token)
            }
            TreeToken::Eof => {
                self.stop_parsing();
                Ok(())
            }
            other => {
                self.unexpected(&other);
                Ok(())
            }
        }
    }

    /// Frameset documents only keep whitespace; other characters are parse
    /// errors and dropped.
    fn insert_frameset_whitespace(&mut self, text: String) -> BuildResult {
        let whitespace: String = text
            .chars()
            .filter(|&c| is_html_whitespace(c))
            .collect();
        if whitespace.len() != text.len() {
            self.parse_error("character data in a frameset");
        }
        self.insert_text(&whitespace)
    }

    /// [§ 13.2.6.4.22 The "after after body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-after-after-body-insertion-mode)
    pub(super) fn handle_after_after_body_mode(&mut self, token: TreeToken) -> BuildResult {
        match token {
            TreeToken::Comment(data) => self.insert_comment_in_document(&data),
            TreeToken::Doctype { .. } => self.process_in_mode(InsertionMode::InBody, token),
            TreeToken::StartTag(ref tag) if tag.name == "html" => {
                self.process_in_mode(InsertionMode::InBody, token)
            }
            TreeToken::Characters(text) => {
                let rest = self.split_whitespace_run(text, |this, ws| {
                    this.process_in_mode(InsertionMode::InBody, TreeToken::Characters(ws.to_string()))
                })?;
                match rest {
                    Some(rest) => self.after_body_anything_else(TreeToken::Characters(rest)),
                    None => Ok(()),
                }
            }
            TreeToken::Eof => {
                self.stop_parsing();
                Ok(())
            }
            other => self.after_body_anything_else(other),
        }
    }

    /// [§ 13.2.6.4.23 The "after after frameset" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-after-after-frameset-insertion-mode)
    pub(super) fn handle_after_after_frameset_mode(&mut self, token: TreeToken) -> BuildResult {
        match token {
            TreeToken::Comment(data) => self.insert_comment_in_document(&data),
            TreeToken::Doctype { .. } => self.process_in_mode(InsertionMode::InBody, token),
            TreeToken::StartTag(ref tag) if tag.name == "html" => {
                self.process_in_mode(InsertionMode::InBody, token)
            }
            TreeToken::Characters(text) => {
                let rest = self.split_whitespace_run(text, |this, ws| {
                    this.process_in_mode(InsertionMode::InBody, TreeToken::Characters(ws.to_string()))
                })?;
                if rest.is_some() {
                    self.parse_error("character data after </html>");
                }
                Ok(())
            }
            TreeToken::StartTag(ref tag) if tag.name == "noframes" => {
                self.process_in_mode(InsertionMode::InHead, token)
            }
            TreeToken::Eof => {
                self.stop_parsing();
                Ok(())
            }
            other => {
                self.unexpected(&other);
                Ok(())
            }
        }
    }
}
