use std::collections::VecDeque;
use std::sync::Arc;

use strum_macros::Display;
use wombat_common::Position;

use super::token::{CharacterKind, SpannedToken, Token};
use crate::entities::{EntityResolver, NamedEntities};
use crate::errors::{ParseError, ParseErrors, ParseFailure};
use crate::input::{CharacterCursor, CursorError};

/// [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
///
/// The tokenizer state machine. Each state corresponds to a section in § 13.2.5.
/// The character reference states (§ 13.2.5.72 to § 13.2.5.80) run as a
/// subroutine from the states that recognize `&`, so they have no variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum TokenizerState {
    /// [§ 13.2.5.1 Data state](https://html.spec.whatwg.org/multipage/parsing.html#data-state)
    Data,
    /// [§ 13.2.5.2 RCDATA state](https://html.spec.whatwg.org/multipage/parsing.html#rcdata-state)
    Rcdata,
    /// [§ 13.2.5.3 RAWTEXT state](https://html.spec.whatwg.org/multipage/parsing.html#rawtext-state)
    Rawtext,
    /// [§ 13.2.5.4 Script data state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-state)
    ScriptData,
    /// [§ 13.2.5.5 PLAINTEXT state](https://html.spec.whatwg.org/multipage/parsing.html#plaintext-state)
    Plaintext,
    /// § 13.2.5.6
    TagOpen,
    /// § 13.2.5.7
    EndTagOpen,
    /// § 13.2.5.8
    TagName,
    /// § 13.2.5.9
    RcdataLessThanSign,
    /// § 13.2.5.10
    RcdataEndTagOpen,
    /// § 13.2.5.11
    RcdataEndTagName,
    /// § 13.2.5.12
    RawtextLessThanSign,
    /// § 13.2.5.13
    RawtextEndTagOpen,
    /// § 13.2.5.14
    RawtextEndTagName,
    /// § 13.2.5.15
    ScriptDataLessThanSign,
    /// § 13.2.5.16
    ScriptDataEndTagOpen,
    /// § 13.2.5.17
    ScriptDataEndTagName,
    /// § 13.2.5.18
    ScriptDataEscapeStart,
    /// § 13.2.5.19
    ScriptDataEscapeStartDash,
    /// [§ 13.2.5.20 Script data escaped state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-escaped-state)
    ScriptDataEscaped,
    /// § 13.2.5.21
    ScriptDataEscapedDash,
    /// § 13.2.5.22
    ScriptDataEscapedDashDash,
    /// § 13.2.5.23
    ScriptDataEscapedLessThanSign,
    /// § 13.2.5.24
    ScriptDataEscapedEndTagOpen,
    /// § 13.2.5.25
    ScriptDataEscapedEndTagName,
    /// § 13.2.5.26
    ScriptDataDoubleEscapeStart,
    /// [§ 13.2.5.27 Script data double escaped state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-double-escaped-state)
    ScriptDataDoubleEscaped,
    /// § 13.2.5.28
    ScriptDataDoubleEscapedDash,
    /// § 13.2.5.29
    ScriptDataDoubleEscapedDashDash,
    /// § 13.2.5.30
    ScriptDataDoubleEscapedLessThanSign,
    /// § 13.2.5.31
    ScriptDataDoubleEscapeEnd,
    /// [§ 13.2.5.32 Before attribute name state](https://html.spec.whatwg.org/multipage/parsing.html#before-attribute-name-state)
    BeforeAttributeName,
    /// § 13.2.5.33
    AttributeName,
    /// § 13.2.5.34
    AfterAttributeName,
    /// § 13.2.5.35
    BeforeAttributeValue,
    /// § 13.2.5.36
    AttributeValueDoubleQuoted,
    /// § 13.2.5.37
    AttributeValueSingleQuoted,
    /// § 13.2.5.38
    AttributeValueUnquoted,
    /// § 13.2.5.39
    AfterAttributeValueQuoted,
    /// § 13.2.5.40
    SelfClosingStartTag,
    /// [§ 13.2.5.41 Bogus comment state](https://html.spec.whatwg.org/multipage/parsing.html#bogus-comment-state)
    BogusComment,
    /// [§ 13.2.5.42 Markup declaration open state](https://html.spec.whatwg.org/multipage/parsing.html#markup-declaration-open-state)
    MarkupDeclarationOpen,
    /// § 13.2.5.43
    CommentStart,
    /// § 13.2.5.44
    CommentStartDash,
    /// [§ 13.2.5.45 Comment state](https://html.spec.whatwg.org/multipage/parsing.html#comment-state)
    Comment,
    /// § 13.2.5.46
    CommentLessThanSign,
    /// § 13.2.5.47
    CommentLessThanSignBang,
    /// § 13.2.5.48
    CommentLessThanSignBangDash,
    /// § 13.2.5.49
    CommentLessThanSignBangDashDash,
    /// § 13.2.5.50
    CommentEndDash,
    /// § 13.2.5.51
    CommentEnd,
    /// § 13.2.5.52
    CommentEndBang,
    /// [§ 13.2.5.53 DOCTYPE state](https://html.spec.whatwg.org/multipage/parsing.html#doctype-state)
    Doctype,
    /// § 13.2.5.54
    BeforeDoctypeName,
    /// § 13.2.5.55
    DoctypeName,
    /// § 13.2.5.56
    AfterDoctypeName,
    /// § 13.2.5.57
    AfterDoctypePublicKeyword,
    /// § 13.2.5.58
    BeforeDoctypePublicIdentifier,
    /// § 13.2.5.59
    DoctypePublicIdentifierDoubleQuoted,
    /// § 13.2.5.60
    DoctypePublicIdentifierSingleQuoted,
    /// § 13.2.5.61
    AfterDoctypePublicIdentifier,
    /// § 13.2.5.62
    BetweenDoctypePublicAndSystemIdentifiers,
    /// § 13.2.5.63
    AfterDoctypeSystemKeyword,
    /// § 13.2.5.64
    BeforeDoctypeSystemIdentifier,
    /// § 13.2.5.65
    DoctypeSystemIdentifierDoubleQuoted,
    /// § 13.2.5.66
    DoctypeSystemIdentifierSingleQuoted,
    /// § 13.2.5.67
    AfterDoctypeSystemIdentifier,
    /// § 13.2.5.68
    BogusDoctype,
    /// [§ 13.2.5.69 CDATA section state](https://html.spec.whatwg.org/multipage/parsing.html#cdata-section-state)
    CdataSection,
    /// § 13.2.5.70
    CdataSectionBracket,
    /// § 13.2.5.71
    CdataSectionEnd,
}

/// The text-only content models the tree builder can switch the tokenizer
/// into after it inserts certain elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum RawTextMode {
    /// `<title>`, `<textarea>`: character references decoded, no tags.
    Rcdata,
    /// `<style>`, `<xmp>`, `<iframe>`, `<noembed>`, `<noframes>`: no
    /// references, no tags.
    Rawtext,
    /// `<script>`: like RAWTEXT, but tracks `<!--` escapes.
    ScriptData,
    /// `<plaintext>`: everything to the end of input is text.
    Plaintext,
}

impl RawTextMode {
    pub(super) const fn state(self) -> TokenizerState {
        match self {
            Self::Rcdata => TokenizerState::Rcdata,
            Self::Rawtext => TokenizerState::Rawtext,
            Self::ScriptData => TokenizerState::ScriptData,
            Self::Plaintext => TokenizerState::Plaintext,
        }
    }
}

pub(super) type StepResult = Result<(), CursorError>;

/// [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
///
/// "Implementations must act as if they used the following state machine to tokenize HTML."
///
/// A pull tokenizer: each [`Tokenizer::next_token`] call runs the state
/// machine until one token is ready. Characters are gathered into runs, so
/// a character token is always followed by a non-character token.
pub struct Tokenizer<C> {
    pub(super) cursor: C,
    pub(super) resolver: Arc<dyn EntityResolver>,
    pub(super) state: TokenizerState,
    pub(super) current_input_character: Option<char>,
    // When true, the next iteration of the main loop will not consume a new character.
    // "Reconsume in the X state" sets this flag.
    pub(super) reconsume: bool,
    /// Position of `current_input_character`.
    pub(super) char_start: Position,

    pub(super) current_token: Option<Token>,
    /// Where the markup of `current_token` began (its `<`).
    pub(super) token_start: Position,

    /// "The last start tag token emitted is used as part of the tree construction stage
    /// and in the RCDATA, RAWTEXT, and script data states." Stored lowercased.
    pub(super) last_start_tag_name: Option<String>,

    /// [§ 13.2.5](https://html.spec.whatwg.org/multipage/parsing.html#temporary-buffer)
    pub(super) temporary_buffer: String,

    /// The character run being gathered.
    pub(super) pending_text: String,
    pub(super) pending_kind: CharacterKind,
    pub(super) pending_start: Position,
    pub(super) pending_end: Position,

    pub(super) queue: VecDeque<SpannedToken>,
    /// Errors found since the last token was handed out.
    pub(super) errors: Vec<ParseError>,
    /// How many of those the sink can still keep. Errors past it are
    /// dropped without being buffered.
    pub(super) error_budget: usize,
    /// `<?` opens a processing instruction rather than a bogus comment.
    pub(super) xml_syntax: bool,

    /// Whether `<![CDATA[` opens a CDATA section (foreign content, XML)
    /// or a bogus comment (HTML content).
    pub(super) cdata_allowed: bool,
    pub(super) eof_emitted: bool,
}

impl<C: CharacterCursor> Tokenizer<C> {
    /// Create a tokenizer over `cursor` using the full named entity table.
    ///
    /// "The initial state is the data state."
    pub fn new(cursor: C) -> Self {
        Self::with_resolver(cursor, Arc::new(NamedEntities))
    }

    /// Create a tokenizer that resolves named references through `resolver`.
    pub fn with_resolver(cursor: C, resolver: Arc<dyn EntityResolver>) -> Self {
        let start = cursor.position();
        Self {
            cursor,
            resolver,
            state: TokenizerState::Data,
            current_input_character: None,
            reconsume: false,
            char_start: start,
            current_token: None,
            token_start: start,
            last_start_tag_name: None,
            temporary_buffer: String::new(),
            pending_text: String::new(),
            pending_kind: CharacterKind::Text,
            pending_start: start,
            pending_end: start,
            queue: VecDeque::new(),
            errors: Vec::new(),
            error_budget: usize::MAX,
            xml_syntax: false,
            cdata_allowed: false,
            eof_emitted: false,
        }
    }

    /// The state the machine is currently in.
    #[must_use]
    pub const fn state(&self) -> TokenizerState {
        self.state
    }

    /// Switch to a raw text content model. Called by the tree builder right
    /// after it inserts an element such as `<title>` or `<script>`.
    pub fn set_raw_text_mode(&mut self, mode: RawTextMode) {
        log::trace!(target: "wombat_html", "tokenizer switching to {mode}");
        self.state = mode.state();
    }

    /// Treat `<?target ...?>` as regular XML syntax. The tokens are the
    /// same bogus comments, but no error is recorded for them.
    #[must_use]
    pub const fn with_xml_syntax(mut self, xml: bool) -> Self {
        self.xml_syntax = xml;
        self
    }

    /// Allow or forbid CDATA sections. The tree builder allows them while
    /// the adjusted current node is not in the HTML namespace.
    pub const fn set_cdata_allowed(&mut self, allowed: bool) {
        self.cdata_allowed = allowed;
    }

    /// Set the name used by the "appropriate end tag" check. Used when
    /// parsing a fragment whose context element is a raw text element.
    pub fn set_last_start_tag(&mut self, name: Option<&str>) {
        self.last_start_tag_name = name.map(str::to_ascii_lowercase);
    }

    /// Give the cursor back.
    pub fn into_cursor(self) -> C {
        self.cursor
    }

    /// Run the state machine until a token is ready and return it.
    ///
    /// After the end-of-file token has been returned, every further call
    /// returns another end-of-file token.
    ///
    /// # Errors
    ///
    /// Only a cursor failure is an error. Malformed markup is recorded in
    /// `errors` and recovered from.
    pub fn next_token(&mut self, errors: &mut ParseErrors) -> Result<SpannedToken, ParseFailure> {
        self.error_budget = errors.remaining();
        loop {
            if let Some(token) = self.queue.pop_front() {
                for error in self.errors.drain(..) {
                    errors.record(error.position, error.kind, error.message);
                }
                return Ok(token);
            }
            if self.eof_emitted {
                return Ok(SpannedToken::eof(self.cursor.position()));
            }
            self.step()?;
        }
    }

    /// Tokenize the whole input.
    ///
    /// # Errors
    ///
    /// Fails if the cursor fails.
    pub fn run_to_end(
        &mut self,
        errors: &mut ParseErrors,
    ) -> Result<Vec<SpannedToken>, ParseFailure> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token(errors)?;
            let done = token.token.is_eof();
            tokens.push(token);
            if done {
                return Ok(tokens);
            }
        }
    }

    /// One iteration of the main loop: consume a character (unless
    /// reconsuming) and run the current state's handler.
    fn step(&mut self) -> StepResult {
        // "Markup declaration open state: If the next few characters are..."
        // This state inspects the input without consuming a character first.
        if self.state == TokenizerState::MarkupDeclarationOpen {
            return self.handle_markup_declaration_open_state();
        }

        if self.reconsume {
            self.reconsume = false;
        } else {
            self.char_start = self.cursor.position();
            self.current_input_character = self.cursor.consume()?;
        }

        match self.state {
            TokenizerState::Data => self.handle_data_state(),
            TokenizerState::Rcdata => self.handle_rcdata_state(),
            TokenizerState::Rawtext => self.handle_rawtext_state(),
            TokenizerState::ScriptData => self.handle_script_data_state(),
            TokenizerState::Plaintext => self.handle_plaintext_state(),
            TokenizerState::TagOpen => self.handle_tag_open_state(),
            TokenizerState::EndTagOpen => self.handle_end_tag_open_state(),
            TokenizerState::TagName => self.handle_tag_name_state(),
            TokenizerState::RcdataLessThanSign => {
                self.handle_raw_less_than_sign_state(TokenizerState::Rcdata)
            }
            TokenizerState::RcdataEndTagOpen => {
                self.handle_raw_end_tag_open_state(TokenizerState::Rcdata)
            }
            TokenizerState::RcdataEndTagName => {
                self.handle_raw_end_tag_name_state(TokenizerState::Rcdata)
            }
            TokenizerState::RawtextLessThanSign => {
                self.handle_raw_less_than_sign_state(TokenizerState::Rawtext)
            }
            TokenizerState::RawtextEndTagOpen => {
                self.handle_raw_end_tag_open_state(TokenizerState::Rawtext)
            }
            TokenizerState::RawtextEndTagName => {
                self.handle_raw_end_tag_name_state(TokenizerState::Rawtext)
            }
            TokenizerState::ScriptDataLessThanSign => {
                self.handle_script_data_less_than_sign_state()
            }
            TokenizerState::ScriptDataEndTagOpen => {
                self.handle_raw_end_tag_open_state(TokenizerState::ScriptData)
            }
            TokenizerState::ScriptDataEndTagName => {
                self.handle_raw_end_tag_name_state(TokenizerState::ScriptData)
            }
            TokenizerState::ScriptDataEscapeStart => self.handle_script_data_escape_start_state(),
            TokenizerState::ScriptDataEscapeStartDash => {
                self.handle_script_data_escape_start_dash_state()
            }
            TokenizerState::ScriptDataEscaped => self.handle_script_data_escaped_state(),
            TokenizerState::ScriptDataEscapedDash => self.handle_script_data_escaped_dash_state(),
            TokenizerState::ScriptDataEscapedDashDash => {
                self.handle_script_data_escaped_dash_dash_state()
            }
            TokenizerState::ScriptDataEscapedLessThanSign => {
                self.handle_script_data_escaped_less_than_sign_state()
            }
            TokenizerState::ScriptDataEscapedEndTagOpen => {
                self.handle_raw_end_tag_open_state(TokenizerState::ScriptDataEscaped)
            }
            TokenizerState::ScriptDataEscapedEndTagName => {
                self.handle_raw_end_tag_name_state(TokenizerState::ScriptDataEscaped)
            }
            TokenizerState::ScriptDataDoubleEscapeStart => {
                self.handle_script_data_double_escape_boundary_state(
                    TokenizerState::ScriptDataDoubleEscaped,
                    TokenizerState::ScriptDataEscaped,
                )
            }
            TokenizerState::ScriptDataDoubleEscaped => {
                self.handle_script_data_double_escaped_state()
            }
            TokenizerState::ScriptDataDoubleEscapedDash => {
                self.handle_script_data_double_escaped_dash_state()
            }
            TokenizerState::ScriptDataDoubleEscapedDashDash => {
                self.handle_script_data_double_escaped_dash_dash_state()
            }
            TokenizerState::ScriptDataDoubleEscapedLessThanSign => {
                self.handle_script_data_double_escaped_less_than_sign_state()
            }
            TokenizerState::ScriptDataDoubleEscapeEnd => {
                self.handle_script_data_double_escape_boundary_state(
                    TokenizerState::ScriptDataEscaped,
                    TokenizerState::ScriptDataDoubleEscaped,
                )
            }
            TokenizerState::BeforeAttributeName => self.handle_before_attribute_name_state(),
            TokenizerState::AttributeName => self.handle_attribute_name_state(),
            TokenizerState::AfterAttributeName => self.handle_after_attribute_name_state(),
            TokenizerState::BeforeAttributeValue => self.handle_before_attribute_value_state(),
            TokenizerState::AttributeValueDoubleQuoted => {
                self.handle_attribute_value_quoted_state('"')
            }
            TokenizerState::AttributeValueSingleQuoted => {
                self.handle_attribute_value_quoted_state('\'')
            }
            TokenizerState::AttributeValueUnquoted => self.handle_attribute_value_unquoted_state(),
            TokenizerState::AfterAttributeValueQuoted => {
                self.handle_after_attribute_value_quoted_state()
            }
            TokenizerState::SelfClosingStartTag => self.handle_self_closing_start_tag_state(),
            TokenizerState::BogusComment => self.handle_bogus_comment_state(),
            TokenizerState::MarkupDeclarationOpen => self.handle_markup_declaration_open_state(),
            TokenizerState::CommentStart => self.handle_comment_start_state(),
            TokenizerState::CommentStartDash => self.handle_comment_start_dash_state(),
            TokenizerState::Comment => self.handle_comment_state(),
            TokenizerState::CommentLessThanSign => self.handle_comment_less_than_sign_state(),
            TokenizerState::CommentLessThanSignBang => {
                self.handle_comment_less_than_sign_bang_state()
            }
            TokenizerState::CommentLessThanSignBangDash => {
                self.handle_comment_less_than_sign_bang_dash_state()
            }
            TokenizerState::CommentLessThanSignBangDashDash => {
                self.handle_comment_less_than_sign_bang_dash_dash_state()
            }
            TokenizerState::CommentEndDash => self.handle_comment_end_dash_state(),
            TokenizerState::CommentEnd => self.handle_comment_end_state(),
            TokenizerState::CommentEndBang => self.handle_comment_end_bang_state(),
            TokenizerState::Doctype => self.handle_doctype_state(),
            TokenizerState::BeforeDoctypeName => self.handle_before_doctype_name_state(),
            TokenizerState::DoctypeName => self.handle_doctype_name_state(),
            TokenizerState::AfterDoctypeName => self.handle_after_doctype_name_state(),
            TokenizerState::AfterDoctypePublicKeyword => {
                self.handle_after_doctype_keyword_state(DoctypeId::Public)
            }
            TokenizerState::BeforeDoctypePublicIdentifier => {
                self.handle_before_doctype_identifier_state(DoctypeId::Public)
            }
            TokenizerState::DoctypePublicIdentifierDoubleQuoted => {
                self.handle_doctype_identifier_quoted_state(DoctypeId::Public, '"')
            }
            TokenizerState::DoctypePublicIdentifierSingleQuoted => {
                self.handle_doctype_identifier_quoted_state(DoctypeId::Public, '\'')
            }
            TokenizerState::AfterDoctypePublicIdentifier => {
                self.handle_after_doctype_public_identifier_state()
            }
            TokenizerState::BetweenDoctypePublicAndSystemIdentifiers => {
                self.handle_between_doctype_public_and_system_identifiers_state()
            }
            TokenizerState::AfterDoctypeSystemKeyword => {
                self.handle_after_doctype_keyword_state(DoctypeId::System)
            }
            TokenizerState::BeforeDoctypeSystemIdentifier => {
                self.handle_before_doctype_identifier_state(DoctypeId::System)
            }
            TokenizerState::DoctypeSystemIdentifierDoubleQuoted => {
                self.handle_doctype_identifier_quoted_state(DoctypeId::System, '"')
            }
            TokenizerState::DoctypeSystemIdentifierSingleQuoted => {
                self.handle_doctype_identifier_quoted_state(DoctypeId::System, '\'')
            }
            TokenizerState::AfterDoctypeSystemIdentifier => {
                self.handle_after_doctype_system_identifier_state()
            }
            TokenizerState::BogusDoctype => self.handle_bogus_doctype_state(),
            TokenizerState::CdataSection => self.handle_cdata_section_state(),
            TokenizerState::CdataSectionBracket => self.handle_cdata_section_bracket_state(),
            TokenizerState::CdataSectionEnd => self.handle_cdata_section_end_state(),
        }
    }
}

/// Which DOCTYPE identifier a shared state handler is working on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum DoctypeId {
    Public,
    System,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::StrCursor;

    /// Run the state machine without handing out tokens, so nothing drains
    /// the pending errors.
    fn run_without_draining(tokenizer: &mut Tokenizer<StrCursor<'_>>) {
        while !tokenizer.eof_emitted {
            tokenizer.step().unwrap();
        }
    }

    #[test]
    fn pending_errors_stop_at_the_sink_budget() {
        let input = format!("<p>{}", "\0".repeat(5_000));
        let mut tokenizer = Tokenizer::new(StrCursor::new(&input));
        tokenizer.error_budget = ParseErrors::with_capacity(10).remaining();
        run_without_draining(&mut tokenizer);
        assert_eq!(tokenizer.errors.len(), 10);
    }

    #[test]
    fn disabled_sink_buffers_nothing() {
        let input = "&amp ".repeat(1_000);
        let mut tokenizer = Tokenizer::new(StrCursor::new(&input));
        tokenizer.error_budget = ParseErrors::disabled().remaining();
        run_without_draining(&mut tokenizer);
        assert!(tokenizer.errors.is_empty());
    }

    #[test]
    fn budget_follows_the_sink_between_tokens() {
        let input = format!("{}<p>{}", "\0".repeat(50), "\0".repeat(50));
        let mut tokenizer = Tokenizer::new(StrCursor::new(&input));
        let mut errors = ParseErrors::with_capacity(60);
        let tokens = tokenizer.run_to_end(&mut errors).unwrap();
        assert!(tokens.last().is_some_and(|t| t.token.is_eof()));
        assert_eq!(errors.len(), 60);
        assert!(tokenizer.errors.is_empty());
    }
}
