//! The parser façade: configuration plus the loop that pulls tokens from the
//! tokenizer and feeds them to a tree builder.
//!
//! ```
//! use wombat_html::Parser;
//!
//! let parsed = Parser::html().parse_str("<p>Hello").unwrap();
//! let body = parsed.tree.body().unwrap();
//! assert_eq!(parsed.tree.text_content(body), "Hello");
//! ```

use std::io::Read;
use std::sync::Arc;

use wombat_dom::{DomTree, NodeFactory, NodeId, QuirksMode, TreeError};

use crate::entities::{EntityResolver, NamedEntities};
use crate::errors::{ParseErrors, ParseFailure};
use crate::input::{CharacterCursor, ReaderCursor, StrCursor};
use crate::options::{ParseOptions, ParserMode};
use crate::tokenizer::{RawTextMode, SpannedToken, Tokenizer};
use crate::tree_builder::HtmlTreeBuilder;
use crate::xml::XmlTreeBuilder;

/// The result of [`Parser::parse`] over any [`NodeFactory`].
#[derive(Debug)]
pub struct ParseOutcome<H> {
    /// The document node, or the root element of a fragment.
    pub root: H,
    /// Errors recorded by the tokenizer and the tree builder, in order.
    pub errors: ParseErrors,
    /// The quirks mode the DOCTYPE selected. Always no-quirks for XML.
    pub quirks_mode: QuirksMode,
}

/// A document parsed into a [`DomTree`].
#[derive(Debug)]
pub struct ParsedDocument {
    /// The parsed tree.
    pub tree: DomTree,
    /// Errors recorded during the parse.
    pub errors: ParseErrors,
}

impl ParsedDocument {
    /// The tree in the html5lib dump format.
    #[must_use]
    pub fn dump(&self) -> String {
        self.tree.dump()
    }

    /// The quirks mode the DOCTYPE selected.
    #[must_use]
    pub const fn quirks_mode(&self) -> QuirksMode {
        self.tree.quirks_mode()
    }
}

/// A fragment parsed into a [`DomTree`]. The parsed nodes are the children
/// of `root`.
#[derive(Debug)]
pub struct ParsedFragment {
    /// The tree holding the fragment.
    pub tree: DomTree,
    /// The `html` element (HTML) or synthetic context element (XML) that
    /// holds the fragment.
    pub root: NodeId,
    /// Errors recorded during the parse.
    pub errors: ParseErrors,
}

impl ParsedFragment {
    /// The fragment's nodes in the html5lib dump format.
    #[must_use]
    pub fn dump(&self) -> String {
        self.tree.dump_children(self.root)
    }

    /// The top-level nodes of the fragment.
    #[must_use]
    pub fn nodes(&self) -> &[NodeId] {
        self.tree.children(self.root)
    }
}

/// What the pull loop needs from a tree builder.
trait TokenSink {
    fn process(&mut self, token: SpannedToken) -> Result<(), TreeError>;
    fn errors(&mut self) -> &mut ParseErrors;
    fn finished(&self) -> bool;
    fn allows_cdata(&self) -> bool;
    fn raw_text_request(&mut self) -> Option<RawTextMode>;
}

impl<F: NodeFactory> TokenSink for HtmlTreeBuilder<'_, F> {
    fn process(&mut self, token: SpannedToken) -> Result<(), TreeError> {
        self.process_token(token)
    }

    fn errors(&mut self) -> &mut ParseErrors {
        self.errors_mut()
    }

    fn finished(&self) -> bool {
        self.is_stopped()
    }

    fn allows_cdata(&self) -> bool {
        self.cdata_allowed()
    }

    fn raw_text_request(&mut self) -> Option<RawTextMode> {
        self.take_raw_text_request()
    }
}

impl<F: NodeFactory> TokenSink for XmlTreeBuilder<'_, F> {
    fn process(&mut self, token: SpannedToken) -> Result<(), TreeError> {
        self.process_token(token)
    }

    fn errors(&mut self) -> &mut ParseErrors {
        self.errors_mut()
    }

    fn finished(&self) -> bool {
        self.is_stopped()
    }

    fn allows_cdata(&self) -> bool {
        true
    }

    fn raw_text_request(&mut self) -> Option<RawTextMode> {
        None
    }
}

/// Pull tokens until the builder has processed end of file.
fn drive<C: CharacterCursor, S: TokenSink>(
    tokenizer: &mut Tokenizer<C>,
    sink: &mut S,
) -> Result<(), ParseFailure> {
    loop {
        tokenizer.set_cdata_allowed(sink.allows_cdata());
        let token = tokenizer.next_token(sink.errors())?;
        let eof = token.token.is_eof();
        sink.process(token)?;
        if let Some(mode) = sink.raw_text_request() {
            tokenizer.set_raw_text_mode(mode);
        }
        if eof || sink.finished() {
            return Ok(());
        }
    }
}

/// Run the loop and close the cursor, whether or not the loop failed.
fn drive_and_close<C: CharacterCursor, S: TokenSink>(
    mut tokenizer: Tokenizer<C>,
    sink: &mut S,
) -> Result<(), ParseFailure> {
    let result = drive(&mut tokenizer, sink);
    tokenizer.into_cursor().close();
    result
}

/// Close the cursor of a parse that failed before its loop started.
fn abandon<C: CharacterCursor>(tokenizer: Tokenizer<C>, error: TreeError) -> ParseFailure {
    tokenizer.into_cursor().close();
    ParseFailure::Tree(error)
}

/// [§ 13.2.10 Parsing HTML fragments](https://html.spec.whatwg.org/multipage/parsing.html#parsing-html-fragments)
///
/// STEP 4.1: "Set the state of the HTML parser's tokenization stage as follows,
/// switching on the context element". Foreign contexts start in the data state.
fn fragment_tokenizer_mode(context: &str) -> Option<RawTextMode> {
    match context.to_ascii_lowercase().as_str() {
        "title" | "textarea" => Some(RawTextMode::Rcdata),
        "style" | "xmp" | "iframe" | "noembed" | "noframes" => Some(RawTextMode::Rawtext),
        "script" => Some(RawTextMode::ScriptData),
        "plaintext" => Some(RawTextMode::Plaintext),
        _ => None,
    }
}

/// Parses HTML or XML according to a set of [`ParseOptions`].
///
/// A `Parser` holds no per-parse state and can be reused.
#[derive(Clone)]
pub struct Parser {
    options: ParseOptions,
    resolver: Arc<dyn EntityResolver>,
}

impl std::fmt::Debug for Parser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Parser")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new(ParseOptions::default())
    }
}

impl Parser {
    /// A parser with the given options.
    #[must_use]
    pub fn new(options: ParseOptions) -> Self {
        Self {
            options,
            resolver: Arc::new(NamedEntities),
        }
    }

    /// A parser with the default HTML options.
    #[must_use]
    pub fn html() -> Self {
        Self::new(ParseOptions::html())
    }

    /// A parser with the default XML options.
    #[must_use]
    pub fn xml() -> Self {
        Self::new(ParseOptions::xml())
    }

    /// Resolve named character references through `resolver` instead of the
    /// built-in table.
    #[must_use]
    pub fn with_resolver(mut self, resolver: Arc<dyn EntityResolver>) -> Self {
        self.resolver = resolver;
        self
    }

    /// The options every parse started by this parser uses.
    #[must_use]
    pub const fn options(&self) -> &ParseOptions {
        &self.options
    }

    fn tokenizer<C: CharacterCursor>(&self, cursor: C) -> Tokenizer<C> {
        Tokenizer::with_resolver(cursor, Arc::clone(&self.resolver))
            .with_xml_syntax(self.options.mode == ParserMode::Xml)
    }

    /// Parse a whole document from `cursor` into `factory`.
    ///
    /// The cursor is closed when the parse ends, on success and on failure.
    ///
    /// # Errors
    ///
    /// Fails if the cursor cannot be read or the factory refuses a node.
    /// Malformed markup is never an error; it is recorded in
    /// [`ParseOutcome::errors`].
    pub fn parse<C, F>(&self, cursor: C, factory: &mut F) -> Result<ParseOutcome<F::Handle>, ParseFailure>
    where
        C: CharacterCursor,
        F: NodeFactory,
    {
        log::debug!(target: "wombat_html", "parsing document as {}", self.options.mode);
        let errors = ParseErrors::with_capacity(self.options.max_errors);
        let tokenizer = self.tokenizer(cursor);

        let (root, errors, quirks_mode) = match self.options.mode {
            ParserMode::Html => {
                let mut builder = HtmlTreeBuilder::new(factory, self.options.settings(), errors)
                    .with_track_position(self.options.track_position);
                drive_and_close(tokenizer, &mut builder)?;
                let quirks_mode = builder.quirks_mode();
                let (root, errors) = builder.finish();
                (root, errors, quirks_mode)
            }
            ParserMode::Xml => {
                let mut builder = XmlTreeBuilder::new(factory, errors)
                    .with_namespace_aware(self.options.namespace_aware)
                    .with_track_position(self.options.track_position);
                drive_and_close(tokenizer, &mut builder)?;
                let (root, errors) = builder.finish();
                (root, errors, QuirksMode::NoQuirks)
            }
        };
        log::debug!(target: "wombat_html", "parse finished with {} error(s)", errors.len());
        Ok(ParseOutcome {
            root,
            errors,
            quirks_mode,
        })
    }

    /// Parse `cursor` as the contents of a `context` element.
    ///
    /// For HTML, `context` is a tag name, optionally prefixed by `svg ` or
    /// `math ` for a foreign context (`"svg path"`). The returned root is
    /// the `html` element the fragment's nodes were inserted under.
    ///
    /// # Errors
    ///
    /// Fails if the cursor cannot be read or the factory refuses a node.
    pub fn parse_fragment_with<C, F>(
        &self,
        cursor: C,
        factory: &mut F,
        context: &str,
    ) -> Result<ParseOutcome<F::Handle>, ParseFailure>
    where
        C: CharacterCursor,
        F: NodeFactory,
    {
        log::debug!(target: "wombat_html", "parsing {} fragment in <{context}>", self.options.mode);
        let errors = ParseErrors::with_capacity(self.options.max_errors);
        let mut tokenizer = self.tokenizer(cursor);

        let (root, errors) = match self.options.mode {
            ParserMode::Html => {
                let builder =
                    HtmlTreeBuilder::new_fragment(factory, self.options.settings(), errors, context);
                let mut builder = match builder {
                    Ok(builder) => builder.with_track_position(self.options.track_position),
                    Err(err) => return Err(abandon(tokenizer, err)),
                };
                if let Some(mode) = fragment_tokenizer_mode(context) {
                    tokenizer.set_raw_text_mode(mode);
                }
                tokenizer.set_last_start_tag(Some(context));
                drive_and_close(tokenizer, &mut builder)?;
                builder.finish()
            }
            ParserMode::Xml => {
                let mut builder = match XmlTreeBuilder::new_fragment(factory, errors, context) {
                    Ok(builder) => builder
                        .with_namespace_aware(self.options.namespace_aware)
                        .with_track_position(self.options.track_position),
                    Err(err) => return Err(abandon(tokenizer, err)),
                };
                drive_and_close(tokenizer, &mut builder)?;
                builder.finish()
            }
        };
        Ok(ParseOutcome {
            root,
            errors,
            quirks_mode: QuirksMode::NoQuirks,
        })
    }

    /// Parse a string into a new [`DomTree`].
    ///
    /// # Errors
    ///
    /// See [`Parser::parse`].
    pub fn parse_str(&self, input: &str) -> Result<ParsedDocument, ParseFailure> {
        let mut tree = DomTree::new();
        let outcome = self.parse(StrCursor::new(input), &mut tree)?;
        Ok(ParsedDocument {
            tree,
            errors: outcome.errors,
        })
    }

    /// Parse UTF-8 bytes from `reader` into a new [`DomTree`].
    ///
    /// # Errors
    ///
    /// Fails on an I/O error, in addition to the failures of
    /// [`Parser::parse`].
    pub fn parse_reader<R: Read>(&self, reader: R) -> Result<ParsedDocument, ParseFailure> {
        let mut tree = DomTree::new();
        let cursor = ReaderCursor::new(reader, self.options.max_lookback);
        let outcome = self.parse(cursor, &mut tree)?;
        Ok(ParsedDocument {
            tree,
            errors: outcome.errors,
        })
    }

    /// Parse a string as the contents of `context` into a new [`DomTree`].
    ///
    /// # Errors
    ///
    /// See [`Parser::parse_fragment_with`].
    pub fn parse_fragment(&self, input: &str, context: &str) -> Result<ParsedFragment, ParseFailure> {
        let mut tree = DomTree::new();
        let outcome = self.parse_fragment_with(StrCursor::new(input), &mut tree, context)?;
        Ok(ParsedFragment {
            tree,
            root: outcome.root,
            errors: outcome.errors,
        })
    }
}

/// Parse an HTML document with the default options.
///
/// # Errors
///
/// See [`Parser::parse`].
pub fn parse(input: &str) -> Result<ParsedDocument, ParseFailure> {
    Parser::html().parse_str(input)
}

/// Parse an HTML fragment in `context` with the default options.
///
/// # Errors
///
/// See [`Parser::parse_fragment_with`].
pub fn parse_fragment(input: &str, context: &str) -> Result<ParsedFragment, ParseFailure> {
    Parser::html().parse_fragment(input, context)
}

/// Decode the character references in `text` the way the tokenizer would in
/// text (`in_attribute == false`) or in an attribute value. Markup is left
/// alone.
#[must_use]
pub fn unescape_entities(text: &str, in_attribute: bool) -> String {
    let mut tokenizer = Tokenizer::new(StrCursor::new(text));
    tokenizer
        .unescape_remaining(in_attribute)
        .unwrap_or_else(|_| text.to_string())
}
