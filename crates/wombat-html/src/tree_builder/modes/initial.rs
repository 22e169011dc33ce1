//! The modes before any element exists: "initial", "before html" and
//! "before head".

use wombat_dom::{Namespace, NodeFactory, QuirksMode};

use crate::tree_builder::core::{
    BuildResult, HtmlTreeBuilder, InsertionMode, InsertionPoint, OpenElement, Tag, TreeToken,
};
use crate::tree_builder::tag_sets::{
    HTML401_PUBLIC_PREFIXES, LIMITED_QUIRKS_PUBLIC_PREFIXES, QUIRKY_PUBLIC_IDS,
    QUIRKY_PUBLIC_PREFIXES, QUIRKY_SYSTEM_ID,
};

impl<F: NodeFactory> HtmlTreeBuilder<'_, F> {
    /// [§ 13.2.6.4.1 The "initial" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-initial-insertion-mode)
    pub(super) fn handle_initial_mode(&mut self, token: TreeToken) -> BuildResult {
        match token {
            // "A character token that is one of U+0009 CHARACTER TABULATION, U+000A
            // LINE FEED (LF), U+000C FORM FEED (FF), U+000D CARRIAGE RETURN (CR), or
            // U+0020 SPACE: Ignore the token."
            TreeToken::Characters(text) => {
                match self.split_whitespace_run(text, |_, _| Ok(()))? {
                    Some(rest) => self.initial_anything_else(TreeToken::Characters(rest)),
                    None => Ok(()),
                }
            }
            // "A comment token: Insert a comment as the last child of the Document object."
            TreeToken::Comment(data) => self.insert_comment_in_document(&data),
            // "A DOCTYPE token"
            TreeToken::Doctype {
                name,
                public_id,
                system_id,
                force_quirks,
            } => {
                // "If the DOCTYPE token's name is not "html", or the token's public
                // identifier is not missing, or the token's system identifier is
                // neither missing nor "about:legacy-compat", then there is a parse
                // error."
                if name.as_deref() != Some("html")
                    || public_id.is_some()
                    || system_id
                        .as_deref()
                        .is_some_and(|id| id != "about:legacy-compat")
                {
                    self.parse_error("unusual DOCTYPE");
                }

                // "Append a DocumentType node to the Document node, with its name set
                // to the name given in the DOCTYPE token, or the empty string if the
                // name was missing..."
                let doctype = self.factory.create_doctype(
                    name.as_deref().unwrap_or(""),
                    public_id.as_deref().unwrap_or(""),
                    system_id.as_deref().unwrap_or(""),
                )?;
                self.insert_at(InsertionPoint::Append(self.document), doctype)?;

                let mode = doctype_quirks_mode(
                    name.as_deref(),
                    public_id.as_deref(),
                    system_id.as_deref(),
                    force_quirks,
                );
                if mode != QuirksMode::NoQuirks {
                    log::debug!(target: "wombat_html", "DOCTYPE selects {mode} mode");
                }
                self.set_quirks_mode(mode);

                // "Then, switch the insertion mode to "before html"."
                self.switch_mode(InsertionMode::BeforeHtml);
                Ok(())
            }
            other => self.initial_anything_else(other),
        }
    }

    /// "If the document is not an iframe srcdoc document, then this is a parse
    /// error; if the parser cannot change the mode flag is false, set the
    /// Document to quirks mode. In any case, switch the insertion mode to
    /// "before html", then reprocess the token."
    fn initial_anything_else(&mut self, token: TreeToken) -> BuildResult {
        self.parse_error("missing DOCTYPE");
        self.set_quirks_mode(QuirksMode::Quirks);
        self.reprocess_in(InsertionMode::BeforeHtml, token)
    }

    /// [§ 13.2.6.4.2 The "before html" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-before-html-insertion-mode)
    pub(super) fn handle_before_html_mode(&mut self, token: TreeToken) -> BuildResult {
        match token {
            TreeToken::Doctype { .. } => {
                self.unexpected(&token);
                Ok(())
            }
            TreeToken::Comment(data) => self.insert_comment_in_document(&data),
            TreeToken::Characters(text) => {
                match self.split_whitespace_run(text, |_, _| Ok(()))? {
                    Some(rest) => self.before_html_anything_else(TreeToken::Characters(rest)),
                    None => Ok(()),
                }
            }
            // "A start tag whose tag name is "html": Create an element for the token
            // in the HTML namespace, with the Document as the intended parent. Append
            // it to the Document object. Put this element in the stack of open
            // elements. Switch the insertion mode to "before head"."
            TreeToken::StartTag(tag) if tag.name == "html" => {
                self.insert_root_element(&tag)?;
                self.switch_mode(InsertionMode::BeforeHead);
                Ok(())
            }
            // "An end tag whose tag name is one of: "head", "body", "html", "br": Act
            // as described in the "anything else" entry below."
            TreeToken::EndTag(ref tag) if !tag.is_one_of(&["head", "body", "html", "br"]) => {
                self.unexpected(&token);
                Ok(())
            }
            other => self.before_html_anything_else(other),
        }
    }

    /// "Create an html element whose node document is the Document object.
    /// Append it to the Document object. Put this element in the stack of open
    /// elements. Switch the insertion mode to "before head", then reprocess
    /// the token."
    fn before_html_anything_else(&mut self, token: TreeToken) -> BuildResult {
        self.insert_root_element(&Tag::implied("html"))?;
        self.reprocess_in(InsertionMode::BeforeHead, token)
    }

    fn insert_root_element(&mut self, tag: &Tag) -> BuildResult {
        let range = self.range_for(tag);
        let element: OpenElement<F::Handle> = self.create_element_for_tag(tag, Namespace::Html, range)?;
        self.insert_at(InsertionPoint::Append(self.document), element.handle)?;
        self.open_elements.push(element);
        Ok(())
    }

    /// [§ 13.2.6.4.3 The "before head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-before-head-insertion-mode)
    pub(super) fn handle_before_head_mode(&mut self, token: TreeToken) -> BuildResult {
        match token {
            TreeToken::Characters(text) => {
                match self.split_whitespace_run(text, |_, _| Ok(()))? {
                    Some(rest) => self.before_head_anything_else(TreeToken::Characters(rest)),
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
            // "A start tag whose tag name is "head": Insert an HTML element for the
            // token. Set the head element pointer to the newly created head element.
            // Switch the insertion mode to "in head"."
            TreeToken::StartTag(tag) if tag.name == "head" => {
                let head = self.insert_html_element(&tag)?;
                self.head_element = Some(head);
                self.switch_mode(InsertionMode::InHead);
                Ok(())
            }
            TreeToken::EndTag(ref tag) if !tag.is_one_of(&["head", "body", "html", "br"]) => {
                self.unexpected(&token);
                Ok(())
            }
            other => self.before_head_anything_else(other),
        }
    }

    /// "Insert an HTML element for a "head" start tag token with no attributes.
    /// Set the head element pointer to the newly created head element. Switch
    /// the insertion mode to "in head". Reprocess the current token."
    fn before_head_anything_else(&mut self, token: TreeToken) -> BuildResult {
        let head = self.insert_implied_element("head")?;
        self.head_element = Some(head);
        self.reprocess_in(InsertionMode::InHead, token)
    }
}

/// The document mode a DOCTYPE selects. Identifier comparisons are ASCII
/// case-insensitive.
fn doctype_quirks_mode(
    name: Option<&str>,
    public_id: Option<&str>,
    system_id: Option<&str>,
    force_quirks: bool,
) -> QuirksMode {
    let public = public_id.map(str::to_ascii_lowercase);
    let system = system_id.map(str::to_ascii_lowercase);
    let public_starts_with =
        |prefixes: &[&str]| public.as_deref().is_some_and(|id| prefixes.iter().any(|p| id.starts_with(p)));

    let quirks = force_quirks
        || name != Some("html")
        || public.as_deref().is_some_and(|id| QUIRKY_PUBLIC_IDS.contains(&id))
        || system.as_deref() == Some(QUIRKY_SYSTEM_ID)
        || public_starts_with(QUIRKY_PUBLIC_PREFIXES)
        || (system.is_none() && public_starts_with(HTML401_PUBLIC_PREFIXES));
    if quirks {
        return QuirksMode::Quirks;
    }

    if public_starts_with(LIMITED_QUIRKS_PUBLIC_PREFIXES)
        || (system.is_some() && public_starts_with(HTML401_PUBLIC_PREFIXES))
    {
        return QuirksMode::LimitedQuirks;
    }
    QuirksMode::NoQuirks
}
