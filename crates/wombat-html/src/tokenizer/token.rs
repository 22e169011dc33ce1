use core::fmt;

use wombat_common::{Position, SourceRange};
pub use wombat_dom::Attribute;

/// What a character run was lexed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharacterKind {
    /// Ordinary text (data, RCDATA, RAWTEXT, script data, PLAINTEXT).
    Text,
    /// The inside of a `<![CDATA[ ... ]]>` section.
    CData,
}

/// [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
///
/// "The output of the tokenization step is a series of zero or more of the following
/// tokens: DOCTYPE, start tag, end tag, comment, character, end-of-file."
///
/// Tag and attribute names are kept as written; the tree builder decides
/// whether to lowercase them. Consecutive characters arrive as one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// "DOCTYPE tokens have a name, a public identifier, a system identifier,
    /// and a force-quirks flag." Missing identifiers are `None`, which is
    /// distinct from the empty string.
    Doctype {
        /// "a name"
        name: Option<String>,
        /// "a public identifier"
        public_identifier: Option<String>,
        /// "a system identifier"
        system_identifier: Option<String>,
        /// "a force-quirks flag"
        force_quirks: bool,
    },

    /// "Start and end tag tokens have a tag name, a self-closing flag, and a
    /// list of attributes, each of which has a name and a value."
    StartTag {
        /// "a tag name"
        name: String,
        /// "a self-closing flag"
        self_closing: bool,
        /// "a list of attributes", duplicates included
        attributes: Vec<Attribute>,
    },

    /// End tag token. Attributes and the self-closing flag are parse errors
    /// here but are still carried so the builder can ignore them.
    EndTag {
        /// "a tag name"
        name: String,
        /// "a self-closing flag"
        self_closing: bool,
        /// "a list of attributes"
        attributes: Vec<Attribute>,
    },

    /// "Comment and character tokens have data."
    Comment {
        /// "data"
        data: String,
        /// Produced by the bogus comment state (`<?...>`, `<!...>`, `</ ...>`).
        bogus: bool,
    },

    /// A run of consecutive characters.
    Character {
        /// "data"
        data: String,
        /// Text or CDATA.
        kind: CharacterKind,
    },

    /// End-of-file token signals the end of input.
    EndOfFile,
}

/// A token and the span of input it was produced from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpannedToken {
    /// The token.
    pub token: Token,
    /// Where it came from.
    pub range: SourceRange,
}

impl SpannedToken {
    /// An end-of-file token at `at`.
    #[must_use]
    pub const fn eof(at: Position) -> Self {
        Self {
            token: Token::EndOfFile,
            range: SourceRange::empty_at(at),
        }
    }
}

impl Token {
    /// "When a DOCTYPE token is created, its name, public identifier, and system
    /// identifier must be marked as missing (which is a distinct state from the
    /// empty string), and the force-quirks flag must be set to off."
    #[must_use]
    pub const fn new_doctype() -> Self {
        Self::Doctype {
            name: None,
            public_identifier: None,
            system_identifier: None,
            force_quirks: false,
        }
    }

    /// A start tag with an empty name, no attributes, self-closing unset.
    #[must_use]
    pub const fn new_start_tag() -> Self {
        Self::StartTag {
            name: String::new(),
            self_closing: false,
            attributes: Vec::new(),
        }
    }

    /// An end tag with an empty name.
    #[must_use]
    pub const fn new_end_tag() -> Self {
        Self::EndTag {
            name: String::new(),
            self_closing: false,
            attributes: Vec::new(),
        }
    }

    /// An empty comment.
    #[must_use]
    pub const fn new_comment(bogus: bool) -> Self {
        Self::Comment {
            data: String::new(),
            bogus,
        }
    }

    /// Returns true if this is an end-of-file token.
    #[must_use]
    pub const fn is_eof(&self) -> bool {
        matches!(self, Self::EndOfFile)
    }

    /// The tag name of a start or end tag.
    #[must_use]
    pub fn tag_name(&self) -> Option<&str> {
        match self {
            Self::StartTag { name, .. } | Self::EndTag { name, .. } => Some(name),
            _ => None,
        }
    }

    // Mutation helpers for use during tokenization. Called on the wrong
    // variant they do nothing.

    pub(super) fn append_to_tag_name(&mut self, c: char) {
        if let Self::StartTag { name, .. } | Self::EndTag { name, .. } = self {
            name.push(c);
        }
    }

    pub(super) fn set_self_closing(&mut self) {
        if let Self::StartTag { self_closing, .. } | Self::EndTag { self_closing, .. } = self {
            *self_closing = true;
        }
    }

    pub(super) fn start_new_attribute(&mut self) {
        if let Self::StartTag { attributes, .. } | Self::EndTag { attributes, .. } = self {
            attributes.push(Attribute::new(String::new(), String::new()));
        }
    }

    pub(super) fn append_to_attribute_name(&mut self, c: char) {
        if let Some(attr) = self.current_attribute() {
            attr.name.push(c);
        }
    }

    pub(super) fn append_to_attribute_value(&mut self, text: &str) {
        if let Some(attr) = self.current_attribute() {
            attr.value.push_str(text);
        }
    }

    fn current_attribute(&mut self) -> Option<&mut Attribute> {
        match self {
            Self::StartTag { attributes, .. } | Self::EndTag { attributes, .. } => {
                attributes.last_mut()
            }
            _ => None,
        }
    }

    pub(super) fn append_to_comment(&mut self, text: &str) {
        if let Self::Comment { data, .. } = self {
            data.push_str(text);
        }
    }

    pub(super) fn append_to_doctype_name(&mut self, c: char) {
        if let Self::Doctype { name, .. } = self {
            name.get_or_insert_with(String::new).push(c);
        }
    }

    pub(super) fn set_force_quirks(&mut self) {
        if let Self::Doctype { force_quirks, .. } = self {
            *force_quirks = true;
        }
    }

    /// Mark the public identifier present (empty) so characters can be appended.
    pub(super) fn start_public_identifier(&mut self) {
        if let Self::Doctype {
            public_identifier, ..
        } = self
        {
            *public_identifier = Some(String::new());
        }
    }

    pub(super) fn start_system_identifier(&mut self) {
        if let Self::Doctype {
            system_identifier, ..
        } = self
        {
            *system_identifier = Some(String::new());
        }
    }

    pub(super) fn append_to_public_identifier(&mut self, c: char) {
        if let Self::Doctype {
            public_identifier: Some(id),
            ..
        } = self
        {
            id.push(c);
        }
    }

    pub(super) fn append_to_system_identifier(&mut self, c: char) {
        if let Self::Doctype {
            system_identifier: Some(id),
            ..
        } = self
        {
            id.push(c);
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Doctype {
                name,
                public_identifier,
                system_identifier,
                force_quirks,
            } => {
                write!(f, "DOCTYPE")?;
                if let Some(n) = name {
                    write!(f, " {n}")?;
                }
                if let Some(pub_id) = public_identifier {
                    write!(f, " PUBLIC \"{pub_id}\"")?;
                }
                if let Some(sys_id) = system_identifier {
                    write!(f, " SYSTEM \"{sys_id}\"")?;
                }
                if *force_quirks {
                    write!(f, " (force-quirks)")?;
                }
                Ok(())
            }
            Self::StartTag {
                name,
                self_closing,
                attributes,
            } => {
                write!(f, "<{name}")?;
                for attr in attributes {
                    write!(f, " {}=\"{}\"", attr.name, attr.value)?;
                }
                if *self_closing {
                    write!(f, " /")?;
                }
                write!(f, ">")
            }
            Self::EndTag { name, .. } => write!(f, "</{name}>"),
            Self::Comment { data, .. } => write!(f, "<!--{data}-->"),
            Self::Character { data, kind } => match kind {
                CharacterKind::Text => write!(f, "Characters({data:?})"),
                CharacterKind::CData => write!(f, "CData({data:?})"),
            },
            Self::EndOfFile => write!(f, "EOF"),
        }
    }
}
