//! XML tree construction.
//!
//! A much simpler consumer of the same token stream the HTML builder reads.
//! There are no insertion modes: start tags push, end tags pop back to the
//! nearest open element with the same name, and names keep their case.
//!
//! With namespace awareness on, `xmlns` and `xmlns:prefix` attributes open a
//! namespace scope that lasts until their element is closed, and each
//! element's namespace is resolved from its prefix.

use wombat_common::{Position, SourceRange};
use wombat_dom::{Attribute, Namespace, NodeFactory, SourceRangeKind, TreeError};

use crate::errors::{ParseErrorKind, ParseErrors};
use crate::tokenizer::{CharacterKind, SpannedToken, Token};

/// An element on the XML builder's stack.
#[derive(Debug, Clone)]
struct XmlOpenElement<H> {
    handle: H,
    name: String,
}

/// One `xmlns` declaration in force.
#[derive(Debug, Clone)]
struct NamespaceBinding {
    /// `None` for the default namespace.
    prefix: Option<String>,
    uri: String,
    /// Stack depth of the declaring element. The binding ends when the
    /// stack shrinks below it.
    depth: usize,
}

/// Builds a tree from XML tokens.
pub struct XmlTreeBuilder<'f, F: NodeFactory> {
    factory: &'f mut F,
    errors: ParseErrors,
    document: F::Handle,
    open_elements: Vec<XmlOpenElement<F::Handle>>,
    bindings: Vec<NamespaceBinding>,
    namespace_aware: bool,
    track_position: bool,
    token_range: SourceRange,
    /// Synthetic root of a fragment parse.
    fragment_root: Option<F::Handle>,
    /// Whether the document element has been closed.
    root_closed: bool,
    /// Whether an element has been opened. Comments, processing
    /// instructions and the DOCTYPE are prolog, not content.
    content_seen: bool,
    /// Whether any node has been inserted. The XML declaration must come
    /// before all of them.
    node_seen: bool,
    stopped: bool,
}

impl<'f, F: NodeFactory> XmlTreeBuilder<'f, F> {
    /// A builder for a whole document.
    pub fn new(factory: &'f mut F, errors: ParseErrors) -> Self {
        let document = factory.document();
        Self {
            factory,
            errors,
            document,
            open_elements: Vec::new(),
            bindings: Vec::new(),
            namespace_aware: false,
            track_position: false,
            token_range: SourceRange::empty_at(Position::START),
            fragment_root: None,
            root_closed: false,
            content_seen: false,
            node_seen: false,
            stopped: false,
        }
    }

    /// A builder for a fragment. Parsed nodes end up under a synthetic
    /// element called `context`, which [`XmlTreeBuilder::finish`] returns.
    ///
    /// # Errors
    ///
    /// Fails if the factory cannot create the synthetic root.
    pub fn new_fragment(
        factory: &'f mut F,
        errors: ParseErrors,
        context: &str,
    ) -> Result<Self, TreeError> {
        let mut builder = Self::new(factory, errors);
        let root = builder
            .factory
            .create_element(context, Namespace::Xml, Vec::new())?;
        builder.factory.append_child(builder.document, root)?;
        builder.fragment_root = Some(root);
        builder.open_elements.push(XmlOpenElement {
            handle: root,
            name: context.to_string(),
        });
        Ok(builder)
    }

    /// Resolve element namespaces from `xmlns` declarations.
    #[must_use]
    pub const fn with_namespace_aware(mut self, aware: bool) -> Self {
        self.namespace_aware = aware;
        self
    }

    /// Attach source ranges to created elements.
    #[must_use]
    pub const fn with_track_position(mut self, track: bool) -> Self {
        self.track_position = track;
        self
    }

    /// The error sink. The tokenizer records into the same sink.
    pub fn errors_mut(&mut self) -> &mut ParseErrors {
        &mut self.errors
    }

    /// Whether end of file has been processed.
    #[must_use]
    pub const fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// Finish building. Returns the document, or the fragment's synthetic
    /// root, and the recorded errors.
    pub fn finish(self) -> (F::Handle, ParseErrors) {
        (self.fragment_root.unwrap_or(self.document), self.errors)
    }

    /// Process one token.
    ///
    /// # Errors
    ///
    /// Only a factory failure is an error.
    pub fn process_token(&mut self, spanned: SpannedToken) -> Result<(), TreeError> {
        if self.stopped {
            return Ok(());
        }
        self.token_range = spanned.range;
        match spanned.token {
            Token::Doctype {
                name,
                public_identifier,
                system_identifier,
                ..
            } => {
                if self.content_seen {
                    self.parse_error("DOCTYPE after document content");
                }
                let node = self.factory.create_doctype(
                    name.as_deref().unwrap_or_default(),
                    public_identifier.as_deref().unwrap_or_default(),
                    system_identifier.as_deref().unwrap_or_default(),
                )?;
                self.node_seen = true;
                self.append(node)
            }
            Token::StartTag {
                name,
                self_closing,
                attributes,
            } => self.start_element(name, attributes, self_closing),
            Token::EndTag { name, .. } => {
                self.end_element(&name);
                Ok(())
            }
            Token::Comment { data, bogus } => self.comment(data, bogus),
            Token::Character { data, kind } => self.characters(&data, kind),
            Token::EndOfFile => {
                self.end_of_file();
                Ok(())
            }
        }
    }

    fn parse_error(&mut self, message: &str) {
        self.errors.record(
            self.token_range.start,
            ParseErrorKind::Structural,
            message.to_string(),
        );
    }

    fn current_parent(&self) -> F::Handle {
        self.open_elements
            .last()
            .map_or(self.document, |node| node.handle)
    }

    fn append(&mut self, node: F::Handle) -> Result<(), TreeError> {
        let parent = self.current_parent();
        self.factory.append_child(parent, node)
    }

    fn start_element(
        &mut self,
        name: String,
        attributes: Vec<Attribute>,
        self_closing: bool,
    ) -> Result<(), TreeError> {
        self.content_seen = true;
        self.node_seen = true;
        if self.open_elements.is_empty() && self.root_closed {
            self.parse_error(&format!("second root element <{name}>"));
        }

        let mut kept: Vec<Attribute> = Vec::with_capacity(attributes.len());
        let mut duplicates = 0_usize;
        for attr in attributes {
            if kept.iter().any(|existing| existing.name == attr.name) {
                duplicates += 1;
            } else {
                kept.push(attr);
            }
        }
        if duplicates > 0 {
            self.parse_error(&format!(
                "duplicate-attribute: {duplicates} duplicate(s) on <{name}> dropped"
            ));
        }

        let depth = self.open_elements.len() + 1;
        let namespace = if self.namespace_aware {
            self.declare_namespaces(&kept, depth);
            self.resolve_namespace(&name)
        } else {
            Namespace::Xml
        };

        let handle = self.factory.create_element(&name, namespace, kept)?;
        self.append(handle)?;
        if self.track_position {
            self.factory
                .set_source_range(handle, SourceRangeKind::Start, self.token_range);
        }

        if self_closing {
            if self.track_position {
                self.factory
                    .set_source_range(handle, SourceRangeKind::End, self.token_range);
            }
            self.end_scope(depth - 1);
            if self.open_elements.is_empty() {
                self.root_closed = true;
            }
        } else {
            self.open_elements.push(XmlOpenElement { handle, name });
        }
        Ok(())
    }

    /// Pop up to and including the nearest open element called `name`.
    fn end_element(&mut self, name: &str) {
        let Some(index) = self
            .open_elements
            .iter()
            .rposition(|node| node.name == name)
        else {
            self.parse_error(&format!("end tag </{name}> matches no open element"));
            return;
        };
        if self.fragment_root.is_some() && index == 0 {
            self.parse_error(&format!("end tag </{name}> would close the fragment root"));
            return;
        }

        while self.open_elements.len() > index + 1 {
            if let Some(node) = self.open_elements.pop() {
                self.parse_error(&format!("<{}> closed by </{name}>", node.name));
                self.mark_implicit_end(node.handle);
            }
        }
        if let Some(node) = self.open_elements.pop() {
            if self.track_position {
                self.factory
                    .set_source_range(node.handle, SourceRangeKind::End, self.token_range);
            }
        }
        self.end_scope(index);
        if self.open_elements.is_empty() {
            self.root_closed = true;
        }
    }

    fn mark_implicit_end(&mut self, handle: F::Handle) {
        if self.track_position {
            let at = SourceRange::empty_at(self.token_range.start);
            self.factory.set_source_range(handle, SourceRangeKind::End, at);
        }
    }

    /// Bogus comments starting with `?` are processing instructions. Other
    /// declarations (`<!ELEMENT ...>`) are kept as comments.
    fn comment(&mut self, data: String, bogus: bool) -> Result<(), TreeError> {
        let node = match data.strip_prefix('?') {
            Some(body) if bogus => {
                let body = body.strip_suffix('?').unwrap_or(body);
                let (target, content) = body
                    .split_once(|c: char| c.is_ascii_whitespace())
                    .unwrap_or((body, ""));
                if target.eq_ignore_ascii_case("xml") {
                    if self.node_seen {
                        self.parse_error("XML declaration not at the start of the document");
                    }
                    log::trace!(target: "wombat_html", "XML declaration: {content}");
                } else if target.is_empty() {
                    self.parse_error("processing instruction without a target");
                }
                self.factory
                    .create_processing_instruction(target, content.trim_start())?
            }
            _ => self.factory.create_comment(&data)?,
        };
        self.node_seen = true;
        self.append(node)
    }

    fn characters(&mut self, data: &str, kind: CharacterKind) -> Result<(), TreeError> {
        if self.open_elements.is_empty() {
            if kind == CharacterKind::CData || !data.chars().all(|c| c.is_ascii_whitespace()) {
                self.parse_error("character data outside the root element");
            }
            return Ok(());
        }
        let parent = self.current_parent();
        match kind {
            CharacterKind::Text => self.factory.append_text(parent, data),
            CharacterKind::CData => {
                let node = self.factory.create_cdata(data)?;
                self.factory.append_child(parent, node)
            }
        }
    }

    fn end_of_file(&mut self) {
        let floor = usize::from(self.fragment_root.is_some());
        while self.open_elements.len() > floor {
            if let Some(node) = self.open_elements.pop() {
                self.parse_error(&format!("end of file with <{}> still open", node.name));
                self.mark_implicit_end(node.handle);
            }
        }
        if !self.content_seen {
            log::debug!(target: "wombat_html", "XML input had no content");
        }
        self.stopped = true;
    }
}

// =============================================================================
// Namespaces
// =============================================================================

impl<F: NodeFactory> XmlTreeBuilder<'_, F> {
    /// Open the scope of every `xmlns` attribute on an element at `depth`.
    fn declare_namespaces(&mut self, attributes: &[Attribute], depth: usize) {
        for attr in attributes {
            let prefix = if attr.name == "xmlns" {
                None
            } else if let Some(prefix) = attr.name.strip_prefix("xmlns:") {
                // "xmlns:p" with an empty value cannot undeclare a prefix.
                if attr.value.is_empty() {
                    self.parse_error(&format!("invalid namespace declaration {}", attr.name));
                    continue;
                }
                Some(prefix.to_string())
            } else {
                continue;
            };
            self.bindings.push(NamespaceBinding {
                prefix,
                uri: attr.value.clone(),
                depth,
            });
        }
    }

    /// Drop the bindings of elements deeper than `depth`.
    fn end_scope(&mut self, depth: usize) {
        while self
            .bindings
            .last()
            .is_some_and(|binding| binding.depth > depth)
        {
            let _ = self.bindings.pop();
        }
    }

    fn resolve_namespace(&mut self, qualified_name: &str) -> Namespace {
        let prefix = qualified_name
            .split_once(':')
            .map(|(prefix, _)| prefix);
        if prefix == Some("xml") {
            return Namespace::Xml;
        }
        let binding = self
            .bindings
            .iter()
            .rev()
            .find(|binding| binding.prefix.as_deref() == prefix);
        match (binding, prefix) {
            (Some(binding), _) => Namespace::from_url(&binding.uri),
            (None, Some(prefix)) => {
                self.parse_error(&format!("undeclared namespace prefix \"{prefix}\""));
                Namespace::Xml
            }
            (None, None) => Namespace::Xml,
        }
    }
}
