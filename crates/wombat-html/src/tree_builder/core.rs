use strum_macros::Display;
use wombat_common::{Position, SourceRange};
use wombat_dom::{Attribute, Namespace, NodeFactory, QuirksMode, SourceRangeKind, TreeError};

use super::foreign_content::is_html_integration_point;
use crate::errors::{ParseErrorKind, ParseErrors};
use crate::options::ParseSettings;
use crate::tokenizer::{RawTextMode, SpannedToken, Token};

/// [§ 13.2.4.1 The insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-insertion-mode)
///
/// "The insertion mode is a state variable that controls the primary operation
/// of the tree construction stage."
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum InsertionMode {
    /// [§ 13.2.6.4.1 The "initial" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-initial-insertion-mode)
    Initial,
    /// [§ 13.2.6.4.2 The "before html" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-before-html-insertion-mode)
    BeforeHtml,
    /// [§ 13.2.6.4.3 The "before head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-before-head-insertion-mode)
    BeforeHead,
    /// [§ 13.2.6.4.4 The "in head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inhead)
    InHead,
    /// [§ 13.2.6.4.5 The "in head noscript" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inheadnoscript)
    InHeadNoscript,
    /// [§ 13.2.6.4.6 The "after head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-after-head-insertion-mode)
    AfterHead,
    /// [§ 13.2.6.4.7 The "in body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inbody)
    InBody,
    /// [§ 13.2.6.4.8 The "text" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-incdata)
    Text,
    /// [§ 13.2.6.4.9 The "in table" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intable)
    InTable,
    /// [§ 13.2.6.4.10 The "in table text" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intabletext)
    InTableText,
    /// [§ 13.2.6.4.11 The "in caption" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-incaption)
    InCaption,
    /// [§ 13.2.6.4.12 The "in column group" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-incolgroup)
    InColumnGroup,
    /// [§ 13.2.6.4.13 The "in table body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intbody)
    InTableBody,
    /// [§ 13.2.6.4.14 The "in row" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intr)
    InRow,
    /// [§ 13.2.6.4.15 The "in cell" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intd)
    InCell,
    /// [§ 13.2.6.4.16 The "in select" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inselect)
    InSelect,
    /// [§ 13.2.6.4.17 The "in select in table" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inselectintable)
    InSelectInTable,
    /// [§ 13.2.6.4.18 The "in template" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intemplate)
    InTemplate,
    /// [§ 13.2.6.4.19 The "after body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-afterbody)
    AfterBody,
    /// [§ 13.2.6.4.20 The "in frameset" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inframeset)
    InFrameset,
    /// [§ 13.2.6.4.21 The "after frameset" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-afterframeset)
    AfterFrameset,
    /// [§ 13.2.6.4.22 The "after after body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-after-after-body-insertion-mode)
    AfterAfterBody,
    /// [§ 13.2.6.4.23 The "after after frameset" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-after-after-frameset-insertion-mode)
    AfterAfterFrameset,
}

/// A start or end tag as the tree builder sees it.
///
/// `name` is the ASCII-lowercased name every rule matches on;
/// `source_name` is what the created element is called when tag case is
/// preserved. Attributes are normalized and de-duplicated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct Tag {
    pub(super) name: String,
    pub(super) source_name: String,
    pub(super) attributes: Vec<Attribute>,
    pub(super) self_closing: bool,
    /// Synthesized by the tree builder rather than read from the input.
    pub(super) implied: bool,
}

impl Tag {
    /// A tag the algorithm acts "as if" it had seen.
    pub(super) fn implied(name: &str) -> Self {
        Self {
            name: name.to_string(),
            source_name: name.to_string(),
            attributes: Vec::new(),
            self_closing: false,
            implied: true,
        }
    }

    pub(super) fn is_one_of(&self, names: &[&str]) -> bool {
        names.contains(&self.name.as_str())
    }

    /// Attribute lookup by ASCII case-insensitive name.
    pub(super) fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|attr| attr.name.eq_ignore_ascii_case(name))
            .map(|attr| attr.value.as_str())
    }
}

/// [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
///
/// Tokens after name normalization. CDATA runs arrive as plain characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum TreeToken {
    Doctype {
        name: Option<String>,
        public_id: Option<String>,
        system_id: Option<String>,
        force_quirks: bool,
    },
    StartTag(Tag),
    EndTag(Tag),
    Comment(String),
    Characters(String),
    Eof,
}

/// An entry on the stack of open elements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct OpenElement<H> {
    pub(super) handle: H,
    /// Local name used for matching: lowercase for HTML and MathML, with
    /// the SVG case corrections for SVG.
    pub(super) name: String,
    pub(super) namespace: Namespace,
    /// [HTML integration point](https://html.spec.whatwg.org/multipage/parsing.html#html-integration-point)
    pub(super) html_integration_point: bool,
}

impl<H> OpenElement<H> {
    /// Whether this is an HTML element called `name`.
    pub(super) fn is_html(&self, name: &str) -> bool {
        self.namespace == Namespace::Html && self.name == name
    }

    pub(super) fn is_html_one_of(&self, names: &[&str]) -> bool {
        self.namespace == Namespace::Html && names.contains(&self.name.as_str())
    }

    /// [MathML text integration point](https://html.spec.whatwg.org/multipage/parsing.html#mathml-text-integration-point)
    pub(super) fn is_mathml_text_integration_point(&self) -> bool {
        self.namespace == Namespace::MathMl
            && matches!(self.name.as_str(), "mi" | "mo" | "mn" | "ms" | "mtext")
    }
}

/// [§ 13.2.4.3 The list of active formatting elements](https://html.spec.whatwg.org/multipage/parsing.html#the-list-of-active-formatting-elements)
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum ActiveFormattingElement<H> {
    /// A formatting element and the tag it was created from, kept so the
    /// element can be recreated by reconstruction or the adoption agency.
    Element { handle: H, tag: Tag },
    /// "A marker is an entry in the list of active formatting elements that is
    /// distinct from any element."
    Marker,
}

/// Where "the appropriate place for inserting a node" turned out to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum InsertionPoint<H> {
    /// As the last child of the node.
    Append(H),
    /// Inside `parent`, immediately before `reference`.
    Before { parent: H, reference: H },
}

pub(super) type BuildResult<T = ()> = Result<T, TreeError>;

/// [§ 13.2.6 Tree construction](https://html.spec.whatwg.org/multipage/parsing.html#tree-construction)
///
/// Builds a tree through a [`NodeFactory`] from tokens fed one at a time
/// with [`HtmlTreeBuilder::process_token`].
pub struct HtmlTreeBuilder<'f, F: NodeFactory> {
    pub(super) factory: &'f mut F,
    pub(super) errors: ParseErrors,
    pub(super) settings: ParseSettings,
    pub(super) track_position: bool,
    pub(super) document: F::Handle,

    /// [§ 13.2.4.1 The insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-insertion-mode)
    pub(super) mode: InsertionMode,
    /// [Original insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#original-insertion-mode),
    /// used by the text and in table text modes.
    pub(super) original_mode: InsertionMode,
    /// [Stack of template insertion modes](https://html.spec.whatwg.org/multipage/parsing.html#stack-of-template-insertion-modes)
    pub(super) template_modes: Vec<InsertionMode>,

    /// [§ 13.2.4.3 The stack of open elements](https://html.spec.whatwg.org/multipage/parsing.html#the-stack-of-open-elements)
    pub(super) open_elements: Vec<OpenElement<F::Handle>>,
    /// [§ 13.2.4.3 The list of active formatting elements](https://html.spec.whatwg.org/multipage/parsing.html#the-list-of-active-formatting-elements)
    pub(super) active_formatting: Vec<ActiveFormattingElement<F::Handle>>,

    /// [§ 13.2.4.4 The element pointers](https://html.spec.whatwg.org/multipage/parsing.html#the-element-pointers)
    pub(super) head_element: Option<F::Handle>,
    pub(super) form_element: Option<F::Handle>,

    /// [§ 13.2.4.5 Other parsing state flags](https://html.spec.whatwg.org/multipage/parsing.html#other-parsing-state-flags)
    pub(super) frameset_ok: bool,
    /// [Foster parenting](https://html.spec.whatwg.org/multipage/parsing.html#foster-parent)
    pub(super) foster_parenting: bool,
    /// "The pending table character tokens list"
    pub(super) pending_table_text: Vec<String>,

    pub(super) quirks_mode: QuirksMode,
    /// The context element when parsing a fragment.
    pub(super) context: Option<OpenElement<F::Handle>>,
    /// The root `html` element of a fragment parse.
    pub(super) fragment_root: Option<F::Handle>,
    /// Drop a leading newline from the next token (`<pre>`, `<listing>`,
    /// `<textarea>`).
    pub(super) skip_next_newline: bool,
    /// Set when a start tag with the self-closing flag is allowed to have it.
    pub(super) self_closing_acknowledged: bool,
    /// A tokenizer state switch waiting to be picked up.
    pub(super) raw_text_request: Option<RawTextMode>,
    /// Source range of the token being processed.
    pub(super) token_range: SourceRange,
    /// Elements whose end tag was seen while they stay open (`body`, `html`).
    pub(super) ended_early: Vec<F::Handle>,
    pub(super) stopped: bool,
}

impl<'f, F: NodeFactory> HtmlTreeBuilder<'f, F> {
    /// A builder for a whole document.
    pub fn new(factory: &'f mut F, settings: ParseSettings, errors: ParseErrors) -> Self {
        let document = factory.document();
        Self {
            factory,
            errors,
            settings,
            track_position: false,
            document,
            mode: InsertionMode::Initial,
            original_mode: InsertionMode::Initial,
            template_modes: Vec::new(),
            open_elements: Vec::new(),
            active_formatting: Vec::new(),
            head_element: None,
            form_element: None,
            frameset_ok: true,
            foster_parenting: false,
            pending_table_text: Vec::new(),
            quirks_mode: QuirksMode::NoQuirks,
            context: None,
            fragment_root: None,
            skip_next_newline: false,
            self_closing_acknowledged: false,
            raw_text_request: None,
            token_range: SourceRange::empty_at(Position::START),
            ended_early: Vec::new(),
            stopped: false,
        }
    }

    /// [§ 13.2.10 Parsing HTML fragments](https://html.spec.whatwg.org/multipage/parsing.html#parsing-html-fragments)
    ///
    /// A builder for a fragment parsed as if it were the content of a
    /// `context` element. The parsed nodes end up under a root `html`
    /// element, which [`HtmlTreeBuilder::finish`] returns.
    ///
    /// # Errors
    ///
    /// Fails if the factory cannot create the root or context element.
    pub fn new_fragment(
        factory: &'f mut F,
        settings: ParseSettings,
        errors: ParseErrors,
        context: &str,
    ) -> Result<Self, TreeError> {
        let mut builder = Self::new(factory, settings, errors);

        let (context_name, context_namespace) = fragment_context(context);

        // STEP 4: "Let root be the result of creating an html element..."
        // STEP 5: "Append the element root to the Document node created above."
        // STEP 6: "Set up the parser's stack of open elements so that it contains
        //          just the single element root."
        let root = builder
            .factory
            .create_element("html", Namespace::Html, Vec::new())?;
        builder.factory.append_child(builder.document, root)?;
        builder.fragment_root = Some(root);
        builder.open_elements.push(OpenElement {
            handle: root,
            name: "html".to_string(),
            namespace: Namespace::Html,
            html_integration_point: false,
        });

        // The context element itself is never inserted; it only steers
        // the insertion mode and foreign content decisions.
        let context_handle =
            builder
                .factory
                .create_element(&context_name, context_namespace, Vec::new())?;
        builder.context = Some(OpenElement {
            handle: context_handle,
            html_integration_point: is_html_integration_point(
                context_namespace,
                &context_name,
                &[],
            ),
            name: context_name,
            namespace: context_namespace,
        });

        // STEP 7: "If the context element is a template element, push "in
        //          template" onto the stack of template insertion modes..."
        if builder
            .context
            .as_ref()
            .is_some_and(|ctx| ctx.is_html("template"))
        {
            builder.template_modes.push(InsertionMode::InTemplate);
        }

        // STEP 9: "Reset the parser's insertion mode appropriately."
        builder.reset_insertion_mode();

        // STEP 10: "Set the parser's form element pointer to the nearest node to
        //           the context element that is a form element..."
        if builder
            .context
            .as_ref()
            .is_some_and(|ctx| ctx.is_html("form"))
        {
            builder.form_element = Some(context_handle);
        }
        Ok(builder)
    }

    /// Attach source ranges to created elements.
    #[must_use]
    pub const fn with_track_position(mut self, track: bool) -> Self {
        self.track_position = track;
        self
    }

    /// The current insertion mode.
    #[must_use]
    pub const fn insertion_mode(&self) -> InsertionMode {
        self.mode
    }

    /// The error sink. The tokenizer records into the same sink.
    pub fn errors_mut(&mut self) -> &mut ParseErrors {
        &mut self.errors
    }

    /// The document's quirks mode as decided by the DOCTYPE.
    #[must_use]
    pub const fn quirks_mode(&self) -> QuirksMode {
        self.quirks_mode
    }

    /// Whether the parser has stopped (end of file was processed).
    #[must_use]
    pub const fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// The tokenizer state switch requested by the last token, if any.
    pub fn take_raw_text_request(&mut self) -> Option<RawTextMode> {
        self.raw_text_request.take()
    }

    /// "If there is an adjusted current node and it is not an element in the
    /// HTML namespace" the tokenizer may open CDATA sections.
    #[must_use]
    pub fn cdata_allowed(&self) -> bool {
        self.adjusted_current_node()
            .is_some_and(|node| node.namespace != Namespace::Html)
    }

    /// Finish building. Returns the document, or the fragment's root
    /// `html` element, and the recorded errors.
    pub fn finish(self) -> (F::Handle, ParseErrors) {
        (self.fragment_root.unwrap_or(self.document), self.errors)
    }

    /// [§ 13.2.6 Tree construction](https://html.spec.whatwg.org/multipage/parsing.html#tree-construction)
    ///
    /// Process one token from the tokenizer.
    ///
    /// # Errors
    ///
    /// Only a factory failure is an error. Misplaced tokens are recorded in
    /// the error sink and handled by the recovery rules.
    pub fn process_token(&mut self, spanned: SpannedToken) -> Result<(), TreeError> {
        if self.stopped {
            return Ok(());
        }
        self.token_range = spanned.range;
        let mut token = self.convert_token(spanned.token);

        // "If the next token is a U+000A LINE FEED (LF) character token, then
        // ignore that token and move on to the next one."
        if std::mem::take(&mut self.skip_next_newline) {
            if let TreeToken::Characters(text) = &mut token {
                if text.starts_with('\n') {
                    let _ = text.remove(0);
                    if text.is_empty() {
                        return Ok(());
                    }
                }
            }
        }

        let self_closing_start = matches!(&token, TreeToken::StartTag(tag) if tag.self_closing);
        self.self_closing_acknowledged = false;

        self.dispatch(token)?;

        // "When a start tag token is emitted with its self-closing flag set, if the
        // flag is not acknowledged when the token is processed by the tree
        // construction stage, that is a parse error."
        if self_closing_start && !self.self_closing_acknowledged {
            self.parse_error("non-void-html-element-start-tag-with-trailing-solidus");
        }
        Ok(())
    }

    fn convert_token(&mut self, token: Token) -> TreeToken {
        match token {
            Token::Doctype {
                name,
                public_identifier,
                system_identifier,
                force_quirks,
            } => TreeToken::Doctype {
                name,
                public_id: public_identifier,
                system_id: system_identifier,
                force_quirks,
            },
            Token::StartTag {
                name,
                self_closing,
                attributes,
            } => TreeToken::StartTag(self.make_tag(name, attributes, self_closing)),
            // Attributes on end tags were reported by the tokenizer and are
            // dropped here.
            Token::EndTag {
                name, self_closing, ..
            } => TreeToken::EndTag(self.make_tag(name, Vec::new(), self_closing)),
            Token::Comment { data, .. } => TreeToken::Comment(data),
            Token::Character { data, .. } => TreeToken::Characters(data),
            Token::EndOfFile => TreeToken::Eof,
        }
    }

    /// Normalize names and drop duplicate attributes, keeping the first.
    fn make_tag(&mut self, name: String, attributes: Vec<Attribute>, self_closing: bool) -> Tag {
        let mut kept: Vec<Attribute> = Vec::with_capacity(attributes.len());
        let mut duplicates = 0_usize;
        for attr in attributes {
            let name = self.settings.normalize_attribute(&attr.name);
            if kept.iter().any(|existing| existing.name == name) {
                duplicates += 1;
                continue;
            }
            kept.push(Attribute {
                name,
                value: attr.value,
            });
        }
        if duplicates > 0 {
            self.parse_error(&format!(
                "duplicate-attribute: {duplicates} duplicate(s) on <{name}> dropped"
            ));
        }
        Tag {
            name: name.to_ascii_lowercase(),
            source_name: name,
            attributes: kept,
            self_closing,
            implied: false,
        }
    }

    /// [§ 13.2.6 Tree construction dispatcher](https://html.spec.whatwg.org/multipage/parsing.html#tree-construction-dispatcher)
    pub(super) fn dispatch(&mut self, token: TreeToken) -> BuildResult {
        if self.use_html_rules(&token) {
            self.process_in_mode(self.mode, token)
        } else {
            self.process_in_foreign_content(token)
        }
    }

    /// "As each token is emitted from the tokenizer, the user agent must follow
    /// the appropriate steps from the following list..."
    fn use_html_rules(&self, token: &TreeToken) -> bool {
        let Some(node) = self.adjusted_current_node() else {
            // "If the stack of open elements is empty"
            return true;
        };
        // "If the adjusted current node is an element in the HTML namespace"
        if node.namespace == Namespace::Html {
            return true;
        }
        match token {
            // "If the adjusted current node is a MathML text integration point and
            // the token is a start tag whose tag name is neither "mglyph" nor
            // "malignmark""
            TreeToken::StartTag(tag) if node.is_mathml_text_integration_point() => {
                !tag.is_one_of(&["mglyph", "malignmark"])
            }
            // "If the adjusted current node is an MathML annotation-xml element and
            // the token is a start tag whose tag name is "svg""
            TreeToken::StartTag(tag)
                if node.namespace == Namespace::MathMl
                    && node.name == "annotation-xml"
                    && tag.name == "svg" =>
            {
                true
            }
            // "If the adjusted current node is an HTML integration point and the
            // token is a start tag" / "...and the token is a character token"
            TreeToken::StartTag(_) | TreeToken::Characters(_) => {
                node.html_integration_point
                    || (matches!(token, TreeToken::Characters(_))
                        && node.is_mathml_text_integration_point())
            }
            // "If the token is an end-of-file token"
            TreeToken::Eof => true,
            _ => false,
        }
    }

    /// Record a tree construction error at the current token.
    pub(super) fn parse_error(&mut self, message: &str) {
        self.errors.record(
            self.token_range.start,
            ParseErrorKind::Structural,
            message.to_string(),
        );
    }

    /// Report a token the current insertion mode has no place for.
    pub(super) fn unexpected(&mut self, token: &TreeToken) {
        let what = match token {
            TreeToken::Doctype { .. } => "DOCTYPE".to_string(),
            TreeToken::StartTag(tag) => format!("start tag <{}>", tag.name),
            TreeToken::EndTag(tag) => format!("end tag </{}>", tag.name),
            TreeToken::Comment(_) => "comment".to_string(),
            TreeToken::Characters(_) => "character data".to_string(),
            TreeToken::Eof => "end of file".to_string(),
        };
        let message = format!("unexpected {what} in {} mode", self.mode);
        self.parse_error(&message);
    }

    /// Switch insertion modes.
    pub(super) fn switch_mode(&mut self, mode: InsertionMode) {
        if self.mode != mode {
            log::trace!(target: "wombat_html", "insertion mode {} -> {mode}", self.mode);
        }
        self.mode = mode;
    }

    /// "Stop parsing": pop everything off the stack of open elements.
    pub(super) fn stop_parsing(&mut self) {
        while self.pop().is_some() {}
        self.stopped = true;
    }
}

// =============================================================================
// Stack of open elements
// =============================================================================

impl<F: NodeFactory> HtmlTreeBuilder<'_, F> {
    /// "The current node is the bottommost node in this stack of open elements."
    pub(super) fn current_node(&self) -> Option<&OpenElement<F::Handle>> {
        self.open_elements.last()
    }

    /// "The adjusted current node is the context element if the parser was
    /// created as part of the HTML fragment parsing algorithm and the stack of
    /// open elements has only one element in it (fragment case); otherwise, the
    /// adjusted current node is the current node."
    pub(super) fn adjusted_current_node(&self) -> Option<&OpenElement<F::Handle>> {
        if self.open_elements.len() == 1 {
            if let Some(context) = self.context.as_ref() {
                return Some(context);
            }
        }
        self.current_node()
    }

    /// Whether the current node is the HTML element `name`.
    pub(super) fn current_is(&self, name: &str) -> bool {
        self.current_node().is_some_and(|node| node.is_html(name))
    }

    pub(super) fn current_is_one_of(&self, names: &[&str]) -> bool {
        self.current_node()
            .is_some_and(|node| node.is_html_one_of(names))
    }

    /// Whether the stack holds an HTML element called `name`.
    pub(super) fn stack_has(&self, name: &str) -> bool {
        self.open_elements.iter().any(|node| node.is_html(name))
    }

    pub(super) fn stack_position(&self, handle: F::Handle) -> Option<usize> {
        self.open_elements
            .iter()
            .rposition(|node| node.handle == handle)
    }

    /// Pop the current node, marking where it was implicitly closed.
    pub(super) fn pop(&mut self) -> Option<OpenElement<F::Handle>> {
        let node = self.open_elements.pop()?;
        if self.track_position && !self.ended_early.contains(&node.handle) {
            let at = SourceRange::empty_at(self.token_range.start);
            self.factory
                .set_source_range(node.handle, SourceRangeKind::End, at);
        }
        Some(node)
    }

    /// Pop elements until an HTML element called `name` has been popped.
    /// Returns that element.
    pub(super) fn pop_until(&mut self, name: &str) -> Option<F::Handle> {
        while let Some(node) = self.pop() {
            if node.is_html(name) {
                return Some(node.handle);
            }
        }
        None
    }

    /// Pop elements until one of the HTML elements `names` has been popped.
    pub(super) fn pop_until_one_of(&mut self, names: &[&str]) -> Option<F::Handle> {
        while let Some(node) = self.pop() {
            if node.is_html_one_of(names) {
                return Some(node.handle);
            }
        }
        None
    }

    /// Pop elements until `handle` has been popped.
    pub(super) fn pop_until_handle(&mut self, handle: F::Handle) {
        while let Some(node) = self.pop() {
            if node.handle == handle {
                break;
            }
        }
    }

    /// Record that the current end tag token closed `handle`.
    pub(super) fn closed_by_end_tag(&mut self, handle: Option<F::Handle>) {
        if let Some(handle) = handle {
            if self.track_position {
                self.factory
                    .set_source_range(handle, SourceRangeKind::End, self.token_range);
            }
        }
    }

    /// Record the current end tag on an element that stays open.
    pub(super) fn end_tag_seen_for(&mut self, name: &str) {
        let handle = self
            .open_elements
            .iter()
            .find(|node| node.is_html(name))
            .map(|node| node.handle);
        if let Some(handle) = handle {
            self.closed_by_end_tag(Some(handle));
            self.ended_early.push(handle);
        }
    }

    /// Pop until `name` is popped and record the end tag on it.
    pub(super) fn close_element(&mut self, name: &str) {
        let closed = self.pop_until(name);
        self.closed_by_end_tag(closed);
    }
}

// =============================================================================
// Creating and inserting nodes
// =============================================================================

impl<F: NodeFactory> HtmlTreeBuilder<'_, F> {
    /// [§ 13.2.6.1 Appropriate place for inserting a node](https://html.spec.whatwg.org/multipage/parsing.html#appropriate-place-for-inserting-a-node)
    pub(super) fn appropriate_place(
        &self,
        override_target: Option<F::Handle>,
    ) -> InsertionPoint<F::Handle> {
        // STEP 1: "If there was an override target specified, then let target be
        //          the override target. Otherwise, let target be the current node."
        let target = override_target
            .or_else(|| self.current_node().map(|node| node.handle))
            .unwrap_or(self.document);

        // STEP 2: "If foster parenting is enabled and target is a table, tbody,
        //          tfoot, thead, or tr element"
        let target_is_table_part = self
            .open_elements
            .iter()
            .rev()
            .find(|node| node.handle == target)
            .is_some_and(|node| node.is_html_one_of(&["table", "tbody", "tfoot", "thead", "tr"]));
        if !(self.foster_parenting && target_is_table_part) {
            return InsertionPoint::Append(target);
        }

        // STEP 2.1: "Let last template be the last template element in the stack
        //            of open elements, if any."
        let last_template = self
            .open_elements
            .iter()
            .rposition(|node| node.is_html("template"));
        // STEP 2.2: "Let last table be the last table element in the stack of
        //            open elements, if any."
        let last_table = self
            .open_elements
            .iter()
            .rposition(|node| node.is_html("table"));

        match (last_template, last_table) {
            // STEP 2.3: "If there is a last template and either there is no last
            //            table, or there is one, but last template is lower
            //            (more recently added) than last table in the stack..."
            (Some(template), None) => InsertionPoint::Append(self.open_elements[template].handle),
            (Some(template), Some(table)) if template > table => {
                InsertionPoint::Append(self.open_elements[template].handle)
            }
            // STEP 2.4: "If there is no last table, then let adjusted insertion
            //            location be inside the first element in the stack of open
            //            elements (the html element)... (fragment case)"
            (_, None) => InsertionPoint::Append(
                self.open_elements
                    .first()
                    .map_or(self.document, |node| node.handle),
            ),
            (_, Some(table)) => {
                let table_handle = self.open_elements[table].handle;
                // STEP 2.5: "If last table has a parent node, then let adjusted
                //            insertion location be inside last table's parent node,
                //            immediately before last table, and abort these steps."
                if let Some(parent) = self.factory.parent_of(table_handle) {
                    InsertionPoint::Before {
                        parent,
                        reference: table_handle,
                    }
                } else {
                    // STEP 2.6-2.7: "Let previous element be the element immediately
                    //                above last table in the stack of open elements."
                    let previous = table
                        .checked_sub(1)
                        .and_then(|i| self.open_elements.get(i))
                        .map_or(self.document, |node| node.handle);
                    InsertionPoint::Append(previous)
                }
            }
        }
    }

    pub(super) fn insert_at(&mut self, point: InsertionPoint<F::Handle>, node: F::Handle) -> BuildResult {
        match point {
            InsertionPoint::Append(parent) => self.factory.append_child(parent, node),
            InsertionPoint::Before { parent, reference } => {
                self.factory.insert_before(parent, node, reference)
            }
        }
    }

    /// Range of the element a tag creates: the tag itself, or a zero-width
    /// range at the token that caused it for implied tags.
    pub(super) fn range_for(&self, tag: &Tag) -> SourceRange {
        if tag.implied {
            self.implied_range()
        } else {
            self.token_range
        }
    }

    pub(super) fn implied_range(&self) -> SourceRange {
        SourceRange::empty_at(self.token_range.start)
    }

    /// [§ 13.2.6.1 Create an element for a token](https://html.spec.whatwg.org/multipage/parsing.html#create-an-element-for-the-token)
    pub(super) fn create_element_for_tag(
        &mut self,
        tag: &Tag,
        namespace: Namespace,
        range: SourceRange,
    ) -> BuildResult<OpenElement<F::Handle>> {
        let (name, element_name) = if namespace == Namespace::Html {
            (tag.name.clone(), self.settings.normalize_tag(&tag.source_name))
        } else {
            (tag.name.clone(), tag.name.clone())
        };
        let handle = self
            .factory
            .create_element(&element_name, namespace, tag.attributes.clone())?;
        if self.track_position {
            self.factory
                .set_source_range(handle, SourceRangeKind::Start, range);
        }
        Ok(OpenElement {
            handle,
            html_integration_point: is_html_integration_point(namespace, &name, &tag.attributes),
            name,
            namespace,
        })
    }

    /// [§ 13.2.6.1 Insert a foreign element](https://html.spec.whatwg.org/multipage/parsing.html#insert-a-foreign-element)
    pub(super) fn insert_foreign_element(&mut self, tag: &Tag, namespace: Namespace) -> BuildResult<F::Handle> {
        // STEP 1: "Let the adjusted insertion location be the appropriate place
        //          for inserting a node."
        let point = self.appropriate_place(None);
        // STEP 2: "Let element be the result of creating an element for the token..."
        let element = self.create_element_for_tag(tag, namespace, self.range_for(tag))?;
        let handle = element.handle;
        // STEP 3: "If it is possible to insert element at the adjusted insertion
        //          location, then... insert element at the adjusted insertion location."
        self.insert_at(point, handle)?;
        // STEP 4: "Push element onto the stack of open elements so that it is the
        //          new current node."
        self.open_elements.push(element);
        Ok(handle)
    }

    /// [§ 13.2.6.1 Insert an HTML element](https://html.spec.whatwg.org/multipage/parsing.html#insert-an-html-element)
    pub(super) fn insert_html_element(&mut self, tag: &Tag) -> BuildResult<F::Handle> {
        self.insert_foreign_element(tag, Namespace::Html)
    }

    /// Insert an HTML element the algorithm implies, with no attributes.
    pub(super) fn insert_implied_element(&mut self, name: &str) -> BuildResult<F::Handle> {
        self.insert_html_element(&Tag::implied(name))
    }

    /// Insert an element and pop it straight away (void elements).
    pub(super) fn insert_void_element(&mut self, tag: &Tag) -> BuildResult {
        let _ = self.insert_html_element(tag)?;
        let _ = self.pop();
        // "Acknowledge the token's self-closing flag, if it is set."
        self.self_closing_acknowledged = true;
        Ok(())
    }

    /// [§ 13.2.6.1 Insert a character](https://html.spec.whatwg.org/multipage/parsing.html#insert-a-character)
    pub(super) fn insert_text(&mut self, text: &str) -> BuildResult {
        if text.is_empty() {
            return Ok(());
        }
        match self.appropriate_place(None) {
            // "If the adjusted insertion location is in a Document node, then return."
            InsertionPoint::Append(parent) if parent == self.document => Ok(()),
            InsertionPoint::Append(parent) => self.factory.append_text(parent, text),
            InsertionPoint::Before { parent, reference } => {
                self.factory.insert_text_before(parent, reference, text)
            }
        }
    }

    /// [§ 13.2.6.1 Insert a comment](https://html.spec.whatwg.org/multipage/parsing.html#insert-a-comment)
    pub(super) fn insert_comment(&mut self, data: &str) -> BuildResult {
        let point = self.appropriate_place(None);
        self.insert_comment_at(data, point)
    }

    pub(super) fn insert_comment_at(&mut self, data: &str, point: InsertionPoint<F::Handle>) -> BuildResult {
        let comment = self.factory.create_comment(data)?;
        self.insert_at(point, comment)
    }

    /// Insert a comment as the last child of the Document.
    pub(super) fn insert_comment_in_document(&mut self, data: &str) -> BuildResult {
        self.insert_comment_at(data, InsertionPoint::Append(self.document))
    }

    /// [§ 13.2.6.2 Generic raw text / RCDATA element parsing](https://html.spec.whatwg.org/multipage/parsing.html#generic-raw-text-element-parsing-algorithm)
    pub(super) fn parse_raw_text_element(&mut self, tag: &Tag, mode: RawTextMode) -> BuildResult {
        // STEP 1: "Insert an HTML element for the token."
        let _ = self.insert_html_element(tag)?;
        // STEP 2: "If the algorithm that was invoked is the generic raw text element
        //          parsing algorithm, switch the tokenizer to the RAWTEXT state;
        //          otherwise ... switch the tokenizer to the RCDATA state."
        self.raw_text_request = Some(mode);
        // STEP 3: "Let the original insertion mode be the current insertion mode."
        self.original_mode = self.mode;
        // STEP 4: "Then, switch the insertion mode to "text"."
        self.switch_mode(InsertionMode::Text);
        Ok(())
    }

    pub(super) fn set_quirks_mode(&mut self, mode: QuirksMode) {
        self.quirks_mode = mode;
        self.factory.set_quirks_mode(mode);
    }
}

/// Split a run of characters into its leading ASCII whitespace and the rest.
pub(super) fn split_leading_whitespace(text: &str) -> (&str, &str) {
    let end = text
        .find(|c: char| !is_html_whitespace(c))
        .unwrap_or(text.len());
    text.split_at(end)
}

/// [ASCII whitespace](https://infra.spec.whatwg.org/#ascii-whitespace)
pub(super) const fn is_html_whitespace(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\x0C' | '\r' | ' ')
}

/// Name and namespace of a fragment context given as `name`, `svg name`
/// or `math name`.
fn fragment_context(context: &str) -> (String, Namespace) {
    let context = context.trim();
    if let Some((prefix, name)) = context.split_once(' ') {
        match prefix {
            "svg" => return (super::foreign_content::svg::adjust_svg_tag_name(name), Namespace::Svg),
            "math" => return (name.to_ascii_lowercase(), Namespace::MathMl),
            _ => {}
        }
    }
    match context.to_ascii_lowercase().as_str() {
        "svg" => ("svg".to_string(), Namespace::Svg),
        "math" => ("math".to_string(), Namespace::MathMl),
        other => (other.to_string(), Namespace::Html),
    }
}
