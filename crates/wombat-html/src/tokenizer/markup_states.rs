//! Comment, DOCTYPE and CDATA states.
//!
//! [§ 13.2.5.41](https://html.spec.whatwg.org/multipage/parsing.html#bogus-comment-state) to
//! [§ 13.2.5.71](https://html.spec.whatwg.org/multipage/parsing.html#cdata-section-end-state)

use super::core::{DoctypeId, StepResult, Tokenizer, TokenizerState};
use super::token::Token;
use crate::input::CharacterCursor;

// =============================================================================
// Comments
// =============================================================================

impl<C: CharacterCursor> Tokenizer<C> {
    /// [§ 13.2.5.41 Bogus comment state](https://html.spec.whatwg.org/multipage/parsing.html#bogus-comment-state)
    pub(super) fn handle_bogus_comment_state(&mut self) -> StepResult {
        match self.current_input_character {
            Some('>') => {
                self.switch_to(TokenizerState::Data);
                self.emit_current_token();
            }
            None => self.emit_current_token_and_eof(),
            Some('\0') => {
                self.parse_error("unexpected-null-character");
                self.append_to_comment("\u{FFFD}");
            }
            Some(c) => self.append_char_to_comment(c),
        }
        Ok(())
    }

    /// [§ 13.2.5.42 Markup declaration open state](https://html.spec.whatwg.org/multipage/parsing.html#markup-declaration-open-state)
    ///
    /// Runs without a current input character; the lookahead decides what
    /// gets consumed.
    pub(super) fn handle_markup_declaration_open_state(&mut self) -> StepResult {
        // "Two U+002D HYPHEN-MINUS characters (-)"
        // "Consume those two characters, create a comment token whose data is the
        // empty string, and switch to the comment start state."
        if self.next_few_characters_are("--", false)? {
            self.skip_characters(2)?;
            self.current_token = Some(Token::new_comment(false));
            self.switch_to(TokenizerState::CommentStart);
            return Ok(());
        }

        // "ASCII case-insensitive match for the word "DOCTYPE""
        // "Consume those characters and switch to the DOCTYPE state."
        if self.next_few_characters_are("DOCTYPE", true)? {
            self.skip_characters(7)?;
            self.switch_to(TokenizerState::Doctype);
            return Ok(());
        }

        // "The string "[CDATA[" (the five uppercase letters "CDATA" with a U+005B
        // LEFT SQUARE BRACKET character before and after)"
        // "Consume those characters. If there is an adjusted current node and it is
        // not an element in the HTML namespace, then switch to the CDATA section
        // state. Otherwise, this is a cdata-in-html-content parse error. Create a
        // comment token whose data is the "[CDATA[" string. Switch to the bogus
        // comment state."
        if self.next_few_characters_are("[CDATA[", false)? {
            self.skip_characters(7)?;
            if self.cdata_allowed {
                self.switch_to(TokenizerState::CdataSection);
            } else {
                self.char_start = self.token_start;
                self.parse_error("cdata-in-html-content");
                let mut comment = Token::new_comment(true);
                comment.append_to_comment("[CDATA[");
                self.current_token = Some(comment);
                self.switch_to(TokenizerState::BogusComment);
            }
            return Ok(());
        }

        // "Anything else"
        // "This is an incorrectly-opened-comment parse error. Create a comment token
        // whose data is the empty string. Switch to the bogus comment state (don't
        // consume anything in the current state)."
        self.char_start = self.token_start;
        self.parse_error("incorrectly-opened-comment");
        self.current_token = Some(Token::new_comment(true));
        self.switch_to(TokenizerState::BogusComment);
        Ok(())
    }

    /// [§ 13.2.5.43 Comment start state](https://html.spec.whatwg.org/multipage/parsing.html#comment-start-state)
    pub(super) fn handle_comment_start_state(&mut self) -> StepResult {
        match self.current_input_character {
            Some('-') => self.switch_to(TokenizerState::CommentStartDash),
            // "This is an abrupt-closing-of-empty-comment parse error. Switch to the
            // data state. Emit the current comment token."
            Some('>') => {
                self.parse_error("abrupt-closing-of-empty-comment");
                self.switch_to(TokenizerState::Data);
                self.emit_current_token();
            }
            _ => self.reconsume_in(TokenizerState::Comment),
        }
        Ok(())
    }

    /// [§ 13.2.5.44 Comment start dash state](https://html.spec.whatwg.org/multipage/parsing.html#comment-start-dash-state)
    pub(super) fn handle_comment_start_dash_state(&mut self) -> StepResult {
        match self.current_input_character {
            Some('-') => self.switch_to(TokenizerState::CommentEnd),
            Some('>') => {
                self.parse_error("abrupt-closing-of-empty-comment");
                self.switch_to(TokenizerState::Data);
                self.emit_current_token();
            }
            None => self.eof_in_comment(),
            Some(_) => {
                self.append_to_comment("-");
                self.reconsume_in(TokenizerState::Comment);
            }
        }
        Ok(())
    }

    /// [§ 13.2.5.45 Comment state](https://html.spec.whatwg.org/multipage/parsing.html#comment-state)
    pub(super) fn handle_comment_state(&mut self) -> StepResult {
        match self.current_input_character {
            Some('<') => {
                self.append_to_comment("<");
                self.switch_to(TokenizerState::CommentLessThanSign);
            }
            Some('-') => self.switch_to(TokenizerState::CommentEndDash),
            Some('\0') => {
                self.parse_error("unexpected-null-character");
                self.append_to_comment("\u{FFFD}");
            }
            None => self.eof_in_comment(),
            Some(c) => self.append_char_to_comment(c),
        }
        Ok(())
    }

    /// [§ 13.2.5.46 Comment less-than sign state](https://html.spec.whatwg.org/multipage/parsing.html#comment-less-than-sign-state)
    pub(super) fn handle_comment_less_than_sign_state(&mut self) -> StepResult {
        match self.current_input_character {
            Some('!') => {
                self.append_to_comment("!");
                self.switch_to(TokenizerState::CommentLessThanSignBang);
            }
            Some('<') => self.append_to_comment("<"),
            _ => self.reconsume_in(TokenizerState::Comment),
        }
        Ok(())
    }

    /// [§ 13.2.5.47 Comment less-than sign bang state](https://html.spec.whatwg.org/multipage/parsing.html#comment-less-than-sign-bang-state)
    pub(super) fn handle_comment_less_than_sign_bang_state(&mut self) -> StepResult {
        if self.current_input_character == Some('-') {
            self.switch_to(TokenizerState::CommentLessThanSignBangDash);
        } else {
            self.reconsume_in(TokenizerState::Comment);
        }
        Ok(())
    }

    /// [§ 13.2.5.48 Comment less-than sign bang dash state](https://html.spec.whatwg.org/multipage/parsing.html#comment-less-than-sign-bang-dash-state)
    pub(super) fn handle_comment_less_than_sign_bang_dash_state(&mut self) -> StepResult {
        if self.current_input_character == Some('-') {
            self.switch_to(TokenizerState::CommentLessThanSignBangDashDash);
        } else {
            self.reconsume_in(TokenizerState::CommentEndDash);
        }
        Ok(())
    }

    /// [§ 13.2.5.49 Comment less-than sign bang dash dash state](https://html.spec.whatwg.org/multipage/parsing.html#comment-less-than-sign-bang-dash-dash-state)
    pub(super) fn handle_comment_less_than_sign_bang_dash_dash_state(&mut self) -> StepResult {
        match self.current_input_character {
            Some('>') | None => {}
            // "This is a nested-comment parse error. Reconsume in the comment end state."
            Some(_) => self.parse_error("nested-comment"),
        }
        self.reconsume_in(TokenizerState::CommentEnd);
        Ok(())
    }

    /// [§ 13.2.5.50 Comment end dash state](https://html.spec.whatwg.org/multipage/parsing.html#comment-end-dash-state)
    pub(super) fn handle_comment_end_dash_state(&mut self) -> StepResult {
        match self.current_input_character {
            Some('-') => self.switch_to(TokenizerState::CommentEnd),
            None => self.eof_in_comment(),
            Some(_) => {
                self.append_to_comment("-");
                self.reconsume_in(TokenizerState::Comment);
            }
        }
        Ok(())
    }

    /// [§ 13.2.5.51 Comment end state](https://html.spec.whatwg.org/multipage/parsing.html#comment-end-state)
    pub(super) fn handle_comment_end_state(&mut self) -> StepResult {
        match self.current_input_character {
            Some('>') => {
                self.switch_to(TokenizerState::Data);
                self.emit_current_token();
            }
            Some('!') => self.switch_to(TokenizerState::CommentEndBang),
            Some('-') => self.append_to_comment("-"),
            None => self.eof_in_comment(),
            Some(_) => {
                self.append_to_comment("--");
                self.reconsume_in(TokenizerState::Comment);
            }
        }
        Ok(())
    }

    /// [§ 13.2.5.52 Comment end bang state](https://html.spec.whatwg.org/multipage/parsing.html#comment-end-bang-state)
    pub(super) fn handle_comment_end_bang_state(&mut self) -> StepResult {
        match self.current_input_character {
            Some('-') => {
                self.append_to_comment("--!");
                self.switch_to(TokenizerState::CommentEndDash);
            }
            // "This is an incorrectly-closed-comment parse error. Switch to the data
            // state. Emit the current comment token."
            Some('>') => {
                self.parse_error("incorrectly-closed-comment");
                self.switch_to(TokenizerState::Data);
                self.emit_current_token();
            }
            None => self.eof_in_comment(),
            Some(_) => {
                self.append_to_comment("--!");
                self.reconsume_in(TokenizerState::Comment);
            }
        }
        Ok(())
    }

    /// "This is an eof-in-comment parse error. Emit the current comment token.
    /// Emit an end-of-file token."
    fn eof_in_comment(&mut self) {
        self.parse_error("eof-in-comment");
        self.emit_current_token_and_eof();
    }

    fn append_to_comment(&mut self, text: &str) {
        if let Some(token) = self.current_token.as_mut() {
            token.append_to_comment(text);
        }
    }

    fn append_char_to_comment(&mut self, c: char) {
        let mut buf = [0_u8; 4];
        self.append_to_comment(c.encode_utf8(&mut buf));
    }
}

// =============================================================================
// DOCTYPE
// =============================================================================

impl<C: CharacterCursor> Tokenizer<C> {
    /// [§ 13.2.5.53 DOCTYPE state](https://html.spec.whatwg.org/multipage/parsing.html#doctype-state)
    pub(super) fn handle_doctype_state(&mut self) -> StepResult {
        match self.current_input_character {
            Some(c) if Self::is_whitespace_char(c) => {
                self.switch_to(TokenizerState::BeforeDoctypeName);
            }
            Some('>') => self.reconsume_in(TokenizerState::BeforeDoctypeName),
            // "This is an eof-in-doctype parse error. Create a new DOCTYPE token. Set
            // its force-quirks flag to on. Emit the current token. Emit an
            // end-of-file token."
            None => {
                self.parse_error("eof-in-doctype");
                self.current_token = Some(Token::new_doctype());
                self.force_quirks();
                self.emit_current_token_and_eof();
            }
            Some(_) => {
                self.parse_error("missing-whitespace-before-doctype-name");
                self.reconsume_in(TokenizerState::BeforeDoctypeName);
            }
        }
        Ok(())
    }

    /// [§ 13.2.5.54 Before DOCTYPE name state](https://html.spec.whatwg.org/multipage/parsing.html#before-doctype-name-state)
    pub(super) fn handle_before_doctype_name_state(&mut self) -> StepResult {
        match self.current_input_character {
            Some(c) if Self::is_whitespace_char(c) => {}
            Some('\0') => {
                self.parse_error("unexpected-null-character");
                self.start_doctype_name('\u{FFFD}');
            }
            // "This is a missing-doctype-name parse error. Create a new DOCTYPE token.
            // Set its force-quirks flag to on. Switch to the data state. Emit the
            // current token."
            Some('>') => {
                self.parse_error("missing-doctype-name");
                self.current_token = Some(Token::new_doctype());
                self.force_quirks();
                self.switch_to(TokenizerState::Data);
                self.emit_current_token();
            }
            None => {
                self.parse_error("eof-in-doctype");
                self.current_token = Some(Token::new_doctype());
                self.force_quirks();
                self.emit_current_token_and_eof();
            }
            // "ASCII upper alpha: ... set the token's name to the lowercase version
            // of the current input character."
            Some(c) => self.start_doctype_name(c.to_ascii_lowercase()),
        }
        Ok(())
    }

    fn start_doctype_name(&mut self, first: char) {
        let mut token = Token::new_doctype();
        token.append_to_doctype_name(first);
        self.current_token = Some(token);
        self.switch_to(TokenizerState::DoctypeName);
    }

    /// [§ 13.2.5.55 DOCTYPE name state](https://html.spec.whatwg.org/multipage/parsing.html#doctype-name-state)
    pub(super) fn handle_doctype_name_state(&mut self) -> StepResult {
        match self.current_input_character {
            Some(c) if Self::is_whitespace_char(c) => {
                self.switch_to(TokenizerState::AfterDoctypeName);
            }
            Some('>') => {
                self.switch_to(TokenizerState::Data);
                self.emit_current_token();
            }
            Some('\0') => {
                self.parse_error("unexpected-null-character");
                self.with_doctype(|t| t.append_to_doctype_name('\u{FFFD}'));
            }
            None => self.eof_in_doctype(),
            Some(c) => self.with_doctype(|t| t.append_to_doctype_name(c.to_ascii_lowercase())),
        }
        Ok(())
    }

    /// [§ 13.2.5.56 After DOCTYPE name state](https://html.spec.whatwg.org/multipage/parsing.html#after-doctype-name-state)
    pub(super) fn handle_after_doctype_name_state(&mut self) -> StepResult {
        match self.current_input_character {
            Some(c) if Self::is_whitespace_char(c) => {}
            Some('>') => {
                self.switch_to(TokenizerState::Data);
                self.emit_current_token();
            }
            None => self.eof_in_doctype(),
            Some(c) => {
                // "If the six characters starting from the current input character are
                // an ASCII case-insensitive match for the word "PUBLIC", then consume
                // those characters and switch to the after DOCTYPE public keyword state."
                if c.eq_ignore_ascii_case(&'p') && self.next_few_characters_are("UBLIC", true)? {
                    self.skip_characters(5)?;
                    self.switch_to(TokenizerState::AfterDoctypePublicKeyword);
                } else if c.eq_ignore_ascii_case(&'s')
                    && self.next_few_characters_are("YSTEM", true)?
                {
                    self.skip_characters(5)?;
                    self.switch_to(TokenizerState::AfterDoctypeSystemKeyword);
                } else {
                    // "This is an invalid-character-sequence-after-doctype-name parse
                    // error. Set the current DOCTYPE token's force-quirks flag to on.
                    // Reconsume in the bogus DOCTYPE state."
                    self.parse_error("invalid-character-sequence-after-doctype-name");
                    self.force_quirks();
                    self.reconsume_in(TokenizerState::BogusDoctype);
                }
            }
        }
        Ok(())
    }

    /// [§ 13.2.5.57 After DOCTYPE public keyword state](https://html.spec.whatwg.org/multipage/parsing.html#after-doctype-public-keyword-state)
    /// and [§ 13.2.5.63 After DOCTYPE system keyword state](https://html.spec.whatwg.org/multipage/parsing.html#after-doctype-system-keyword-state)
    pub(super) fn handle_after_doctype_keyword_state(&mut self, which: DoctypeId) -> StepResult {
        match self.current_input_character {
            Some(c) if Self::is_whitespace_char(c) => {
                self.switch_to(match which {
                    DoctypeId::Public => TokenizerState::BeforeDoctypePublicIdentifier,
                    DoctypeId::System => TokenizerState::BeforeDoctypeSystemIdentifier,
                });
            }
            Some(quote @ ('"' | '\'')) => {
                self.parse_error(match which {
                    DoctypeId::Public => "missing-whitespace-after-doctype-public-keyword",
                    DoctypeId::System => "missing-whitespace-after-doctype-system-keyword",
                });
                self.open_doctype_identifier(which, quote);
            }
            Some('>') => self.missing_doctype_identifier(which),
            None => self.eof_in_doctype(),
            Some(_) => self.missing_quote_before_identifier(which),
        }
        Ok(())
    }

    /// [§ 13.2.5.58 Before DOCTYPE public identifier state](https://html.spec.whatwg.org/multipage/parsing.html#before-doctype-public-identifier-state)
    /// and [§ 13.2.5.64 Before DOCTYPE system identifier state](https://html.spec.whatwg.org/multipage/parsing.html#before-doctype-system-identifier-state)
    pub(super) fn handle_before_doctype_identifier_state(&mut self, which: DoctypeId) -> StepResult {
        match self.current_input_character {
            Some(c) if Self::is_whitespace_char(c) => {}
            Some(quote @ ('"' | '\'')) => self.open_doctype_identifier(which, quote),
            Some('>') => self.missing_doctype_identifier(which),
            None => self.eof_in_doctype(),
            Some(_) => self.missing_quote_before_identifier(which),
        }
        Ok(())
    }

    /// Doctype identifier (double-quoted and single-quoted) states,
    /// § 13.2.5.59, § 13.2.5.60, § 13.2.5.65 and § 13.2.5.66.
    pub(super) fn handle_doctype_identifier_quoted_state(
        &mut self,
        which: DoctypeId,
        quote: char,
    ) -> StepResult {
        match self.current_input_character {
            Some(c) if c == quote => self.switch_to(match which {
                DoctypeId::Public => TokenizerState::AfterDoctypePublicIdentifier,
                DoctypeId::System => TokenizerState::AfterDoctypeSystemIdentifier,
            }),
            Some('\0') => {
                self.parse_error("unexpected-null-character");
                self.append_to_doctype_identifier(which, '\u{FFFD}');
            }
            // "This is an abrupt-doctype-public-identifier parse error. Set the
            // current DOCTYPE token's force-quirks flag to on. Switch to the data
            // state. Emit the current DOCTYPE token."
            Some('>') => {
                self.parse_error(match which {
                    DoctypeId::Public => "abrupt-doctype-public-identifier",
                    DoctypeId::System => "abrupt-doctype-system-identifier",
                });
                self.force_quirks();
                self.switch_to(TokenizerState::Data);
                self.emit_current_token();
            }
            None => self.eof_in_doctype(),
            Some(c) => self.append_to_doctype_identifier(which, c),
        }
        Ok(())
    }

    /// [§ 13.2.5.61 After DOCTYPE public identifier state](https://html.spec.whatwg.org/multipage/parsing.html#after-doctype-public-identifier-state)
    pub(super) fn handle_after_doctype_public_identifier_state(&mut self) -> StepResult {
        match self.current_input_character {
            Some(c) if Self::is_whitespace_char(c) => {
                self.switch_to(TokenizerState::BetweenDoctypePublicAndSystemIdentifiers);
            }
            Some('>') => {
                self.switch_to(TokenizerState::Data);
                self.emit_current_token();
            }
            Some(quote @ ('"' | '\'')) => {
                self.parse_error("missing-whitespace-between-doctype-public-and-system-identifiers");
                self.open_doctype_identifier(DoctypeId::System, quote);
            }
            None => self.eof_in_doctype(),
            Some(_) => self.missing_quote_before_identifier(DoctypeId::System),
        }
        Ok(())
    }

    /// [§ 13.2.5.62 Between DOCTYPE public and system identifiers state](https://html.spec.whatwg.org/multipage/parsing.html#between-doctype-public-and-system-identifiers-state)
    pub(super) fn handle_between_doctype_public_and_system_identifiers_state(&mut self) -> StepResult {
        match self.current_input_character {
            Some(c) if Self::is_whitespace_char(c) => {}
            Some('>') => {
                self.switch_to(TokenizerState::Data);
                self.emit_current_token();
            }
            Some(quote @ ('"' | '\'')) => self.open_doctype_identifier(DoctypeId::System, quote),
            None => self.eof_in_doctype(),
            Some(_) => self.missing_quote_before_identifier(DoctypeId::System),
        }
        Ok(())
    }

    /// [§ 13.2.5.67 After DOCTYPE system identifier state](https://html.spec.whatwg.org/multipage/parsing.html#after-doctype-system-identifier-state)
    pub(super) fn handle_after_doctype_system_identifier_state(&mut self) -> StepResult {
        match self.current_input_character {
            Some(c) if Self::is_whitespace_char(c) => {}
            Some('>') => {
                self.switch_to(TokenizerState::Data);
                self.emit_current_token();
            }
            None => self.eof_in_doctype(),
            // "This is an unexpected-character-after-doctype-system-identifier parse
            // error. Reconsume in the bogus DOCTYPE state. (This does not set the
            // current DOCTYPE token's force-quirks flag to on.)"
            Some(_) => {
                self.parse_error("unexpected-character-after-doctype-system-identifier");
                self.reconsume_in(TokenizerState::BogusDoctype);
            }
        }
        Ok(())
    }

    /// [§ 13.2.5.68 Bogus DOCTYPE state](https://html.spec.whatwg.org/multipage/parsing.html#bogus-doctype-state)
    pub(super) fn handle_bogus_doctype_state(&mut self) -> StepResult {
        match self.current_input_character {
            Some('>') => {
                self.switch_to(TokenizerState::Data);
                self.emit_current_token();
            }
            Some('\0') => self.parse_error("unexpected-null-character"),
            None => self.emit_current_token_and_eof(),
            Some(_) => {}
        }
        Ok(())
    }

    fn open_doctype_identifier(&mut self, which: DoctypeId, quote: char) {
        let double = quote == '"';
        match which {
            DoctypeId::Public => {
                self.with_doctype(Token::start_public_identifier);
                self.switch_to(if double {
                    TokenizerState::DoctypePublicIdentifierDoubleQuoted
                } else {
                    TokenizerState::DoctypePublicIdentifierSingleQuoted
                });
            }
            DoctypeId::System => {
                self.with_doctype(Token::start_system_identifier);
                self.switch_to(if double {
                    TokenizerState::DoctypeSystemIdentifierDoubleQuoted
                } else {
                    TokenizerState::DoctypeSystemIdentifierSingleQuoted
                });
            }
        }
    }

    fn append_to_doctype_identifier(&mut self, which: DoctypeId, c: char) {
        match which {
            DoctypeId::Public => self.with_doctype(|t| t.append_to_public_identifier(c)),
            DoctypeId::System => self.with_doctype(|t| t.append_to_system_identifier(c)),
        }
    }

    /// "This is a missing-doctype-X-identifier parse error. Set the current
    /// DOCTYPE token's force-quirks flag to on. Switch to the data state. Emit
    /// the current DOCTYPE token."
    fn missing_doctype_identifier(&mut self, which: DoctypeId) {
        self.parse_error(match which {
            DoctypeId::Public => "missing-doctype-public-identifier",
            DoctypeId::System => "missing-doctype-system-identifier",
        });
        self.force_quirks();
        self.switch_to(TokenizerState::Data);
        self.emit_current_token();
    }

    /// "This is a missing-quote-before-doctype-X-identifier parse error. Set the
    /// current DOCTYPE token's force-quirks flag to on. Reconsume in the bogus
    /// DOCTYPE state."
    fn missing_quote_before_identifier(&mut self, which: DoctypeId) {
        self.parse_error(match which {
            DoctypeId::Public => "missing-quote-before-doctype-public-identifier",
            DoctypeId::System => "missing-quote-before-doctype-system-identifier",
        });
        self.force_quirks();
        self.reconsume_in(TokenizerState::BogusDoctype);
    }

    /// "This is an eof-in-doctype parse error. Set the current DOCTYPE token's
    /// force-quirks flag to on. Emit the current DOCTYPE token. Emit an
    /// end-of-file token."
    fn eof_in_doctype(&mut self) {
        self.parse_error("eof-in-doctype");
        self.force_quirks();
        self.emit_current_token_and_eof();
    }

    fn force_quirks(&mut self) {
        self.with_doctype(Token::set_force_quirks);
    }

    fn with_doctype(&mut self, f: impl FnOnce(&mut Token)) {
        if let Some(token) = self.current_token.as_mut() {
            f(token);
        }
    }
}

// =============================================================================
// CDATA
// =============================================================================

impl<C: CharacterCursor> Tokenizer<C> {
    /// [§ 13.2.5.69 CDATA section state](https://html.spec.whatwg.org/multipage/parsing.html#cdata-section-state)
    pub(super) fn handle_cdata_section_state(&mut self) -> StepResult {
        match self.current_input_character {
            Some(']') => self.switch_to(TokenizerState::CdataSectionBracket),
            // "This is an eof-in-cdata parse error. Emit an end-of-file token."
            None => {
                self.parse_error("eof-in-cdata");
                self.emit_eof();
            }
            Some(c) => {
                let mut buf = [0_u8; 4];
                self.emit_cdata(c.encode_utf8(&mut buf));
            }
        }
        Ok(())
    }

    /// [§ 13.2.5.70 CDATA section bracket state](https://html.spec.whatwg.org/multipage/parsing.html#cdata-section-bracket-state)
    pub(super) fn handle_cdata_section_bracket_state(&mut self) -> StepResult {
        if self.current_input_character == Some(']') {
            self.switch_to(TokenizerState::CdataSectionEnd);
        } else {
            // "Emit a U+005D RIGHT SQUARE BRACKET character token. Reconsume in the
            // CDATA section state."
            self.reconsume_in(TokenizerState::CdataSection);
            self.emit_cdata("]");
        }
        Ok(())
    }

    /// [§ 13.2.5.71 CDATA section end state](https://html.spec.whatwg.org/multipage/parsing.html#cdata-section-end-state)
    pub(super) fn handle_cdata_section_end_state(&mut self) -> StepResult {
        match self.current_input_character {
            Some(']') => self.emit_cdata("]"),
            // "Switch to the data state."
            Some('>') => {
                self.switch_to(TokenizerState::Data);
                self.flush_text();
            }
            _ => {
                self.reconsume_in(TokenizerState::CdataSection);
                self.emit_cdata("]]");
            }
        }
        Ok(())
    }
}
