//! Helper functions for the tokenizer.
//!
//! [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
//!
//! State transitions, lookahead over the cursor, character run buffering,
//! token emission and parse error recording.

use wombat_common::{Position, SourceRange};

use super::core::{StepResult, Tokenizer, TokenizerState};
use super::token::{CharacterKind, SpannedToken, Token};
use crate::errors::{ParseError, ParseErrorKind};
use crate::input::{CharacterCursor, CursorError};

// =============================================================================
// State Transition Helpers
// =============================================================================

impl<C: CharacterCursor> Tokenizer<C> {
    /// "Switch to the X state"
    pub(super) const fn switch_to(&mut self, new_state: TokenizerState) {
        self.state = new_state;
    }

    /// "Reconsume in the X state"
    ///
    /// The same character is processed again in the new state.
    pub(super) const fn reconsume_in(&mut self, new_state: TokenizerState) {
        self.reconsume = true;
        self.state = new_state;
    }

    /// Start a token whose markup began at the current input character.
    pub(super) const fn begin_markup(&mut self) {
        self.token_start = self.char_start;
    }
}

// =============================================================================
// Lookahead Helpers
// =============================================================================

impl<C: CharacterCursor> Tokenizer<C> {
    /// "If the next few characters are..."
    ///
    /// Checks the characters after the current position without consuming
    /// them. With `ignore_case`, compares ASCII case-insensitively.
    pub(super) fn next_few_characters_are(
        &mut self,
        target: &str,
        ignore_case: bool,
    ) -> Result<bool, CursorError> {
        let mark = self.cursor.mark();
        let mut matched = true;
        for expected in target.chars() {
            let same = match self.cursor.consume()? {
                Some(c) if ignore_case => c.eq_ignore_ascii_case(&expected),
                Some(c) => c == expected,
                None => false,
            };
            if !same {
                matched = false;
                break;
            }
        }
        self.cursor.rewind(mark)?;
        Ok(matched)
    }

    /// Consume `count` characters already checked by a lookahead.
    pub(super) fn skip_characters(&mut self, count: usize) -> StepResult {
        for _ in 0..count {
            let _ = self.cursor.consume()?;
        }
        Ok(())
    }

    /// [ASCII whitespace](https://infra.spec.whatwg.org/#ascii-whitespace)
    /// without CR, which the cursor has already normalized away.
    pub(super) const fn is_whitespace_char(input_char: char) -> bool {
        matches!(input_char, ' ' | '\t' | '\n' | '\x0C')
    }
}

// =============================================================================
// Token Emission Helpers
// =============================================================================

impl<C: CharacterCursor> Tokenizer<C> {
    /// Append text to the pending character run, starting a new run when
    /// the kind changes.
    fn push_text(&mut self, text: &str, kind: CharacterKind, start: Position, end: Position) {
        if !self.pending_text.is_empty() && self.pending_kind != kind {
            self.flush_text();
        }
        if self.pending_text.is_empty() {
            self.pending_kind = kind;
            self.pending_start = start;
        }
        self.pending_text.push_str(text);
        self.pending_end = end;
    }

    /// End of the current input character, or its start when it is about
    /// to be reconsumed.
    fn current_end(&self) -> Position {
        if self.reconsume {
            self.char_start
        } else {
            self.cursor.position()
        }
    }

    /// "Emit the current input character as a character token."
    pub(super) fn emit_char(&mut self, c: char) {
        let mut buf = [0_u8; 4];
        let end = self.current_end();
        self.push_text(c.encode_utf8(&mut buf), CharacterKind::Text, self.char_start, end);
    }

    /// Emit text that stands for everything consumed since the current
    /// input character, such as a decoded character reference.
    pub(super) fn emit_str(&mut self, text: &str) {
        let end = self.cursor.position();
        self.push_text(text, CharacterKind::Text, self.char_start, end);
    }

    /// Emit markup that turned out not to be a tag (`<`, `</` and the
    /// temporary buffer) as text. The current character is not included.
    pub(super) fn emit_markup_as_text(&mut self, text: &str) {
        self.push_text(text, CharacterKind::Text, self.token_start, self.char_start);
    }

    /// Emit characters from inside a CDATA section.
    pub(super) fn emit_cdata(&mut self, text: &str) {
        let end = self.current_end();
        self.push_text(text, CharacterKind::CData, self.char_start, end);
    }

    /// Turn the pending character run into a token.
    pub(super) fn flush_text(&mut self) {
        if self.pending_text.is_empty() {
            return;
        }
        let data = std::mem::take(&mut self.pending_text);
        self.queue.push_back(SpannedToken {
            token: Token::Character {
                data,
                kind: self.pending_kind,
            },
            range: SourceRange::new(self.pending_start, self.pending_end),
        });
    }

    /// "Emit the current token"
    ///
    /// Flushes any pending text first so tokens stay in input order.
    pub(super) fn emit_current_token(&mut self) {
        let Some(token) = self.current_token.take() else {
            return;
        };
        self.flush_text();
        match &token {
            Token::StartTag { name, .. } => {
                self.last_start_tag_name = Some(name.to_ascii_lowercase());
            }
            Token::EndTag {
                attributes,
                self_closing,
                ..
            } => {
                if !attributes.is_empty() {
                    self.structural_error("end-tag-with-attributes");
                }
                if *self_closing {
                    self.parse_error("end-tag-with-trailing-solidus");
                }
            }
            _ => {}
        }
        let range = SourceRange::new(self.token_start, self.cursor.position());
        self.queue.push_back(SpannedToken { token, range });
    }

    /// "Emit an end-of-file token."
    pub(super) fn emit_eof(&mut self) {
        self.flush_text();
        self.queue
            .push_back(SpannedToken::eof(self.cursor.position()));
        self.eof_emitted = true;
    }

    /// Emit the current token followed by end of file. Used by the
    /// "EOF in comment/doctype" branches.
    pub(super) fn emit_current_token_and_eof(&mut self) {
        self.emit_current_token();
        self.emit_eof();
    }
}

// =============================================================================
// RCDATA/RAWTEXT/Script Data Helpers
// =============================================================================

impl<C: CharacterCursor> Tokenizer<C> {
    /// "An appropriate end tag token is an end tag token whose tag name matches
    /// the tag name of the last start tag to have been emitted from this
    /// tokenizer, if any."
    ///
    /// Compared ASCII case-insensitively since names keep their source case.
    pub(super) fn is_appropriate_end_tag_token(&self) -> bool {
        if let (Some(last_start_tag), Some(Token::EndTag { name, .. })) =
            (&self.last_start_tag_name, &self.current_token)
        {
            return name.eq_ignore_ascii_case(last_start_tag);
        }
        false
    }

    /// End tag name states, "Anything else":
    /// "Emit a U+003C LESS-THAN SIGN character token, a U+002F SOLIDUS character
    /// token, and a character token for each of the characters in the temporary
    /// buffer... Reconsume in the X state."
    pub(super) fn abandon_end_tag(&mut self, return_state: TokenizerState) {
        let mut text = String::with_capacity(self.temporary_buffer.len() + 2);
        text.push_str("</");
        text.push_str(&self.temporary_buffer);
        self.current_token = None;
        self.reconsume_in(return_state);
        self.emit_markup_as_text(&text);
    }
}

// =============================================================================
// Error Handling
// =============================================================================

impl<C: CharacterCursor> Tokenizer<C> {
    /// [§ 13.2.2 Parse errors](https://html.spec.whatwg.org/multipage/parsing.html#parse-errors)
    ///
    /// Record a lexical error at the current input character. The error is
    /// handed to the sink together with the next token.
    pub(super) fn parse_error(&mut self, code: &str) {
        self.record_error(ParseErrorKind::Lexical, code);
    }

    pub(super) fn structural_error(&mut self, code: &str) {
        self.record_error(ParseErrorKind::Structural, code);
    }

    fn record_error(&mut self, kind: ParseErrorKind, code: &str) {
        if self.errors.len() >= self.error_budget {
            return;
        }
        self.errors.push(ParseError {
            position: self.char_start,
            kind,
            message: code.to_string(),
        });
    }
}
