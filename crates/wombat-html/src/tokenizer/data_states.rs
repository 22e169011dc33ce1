//! Text content states and the tag-opening states.
//!
//! [§ 13.2.5.1](https://html.spec.whatwg.org/multipage/parsing.html#data-state) to
//! [§ 13.2.5.31](https://html.spec.whatwg.org/multipage/parsing.html#script-data-double-escape-end-state)

use super::core::{StepResult, Tokenizer, TokenizerState};
use super::token::Token;
use crate::input::CharacterCursor;

impl<C: CharacterCursor> Tokenizer<C> {
    /// [§ 13.2.5.1 Data state](https://html.spec.whatwg.org/multipage/parsing.html#data-state)
    pub(super) fn handle_data_state(&mut self) -> StepResult {
        match self.current_input_character {
            // "U+0026 AMPERSAND (&)"
            // "Set the return state to the data state. Switch to the character reference state."
            Some('&') => self.emit_character_reference()?,
            // "U+003C LESS-THAN SIGN (<)"
            // "Switch to the tag open state."
            Some('<') => {
                self.begin_markup();
                self.switch_to(TokenizerState::TagOpen);
            }
            // "U+0000 NULL"
            // "This is an unexpected-null-character parse error. Emit the current
            // input character as a character token."
            Some('\0') => {
                self.parse_error("unexpected-null-character");
                self.emit_char('\0');
            }
            // "EOF"
            // "Emit an end-of-file token."
            None => self.emit_eof(),
            // "Anything else"
            // "Emit the current input character as a character token."
            Some(c) => self.emit_char(c),
        }
        Ok(())
    }

    /// [§ 13.2.5.2 RCDATA state](https://html.spec.whatwg.org/multipage/parsing.html#rcdata-state)
    pub(super) fn handle_rcdata_state(&mut self) -> StepResult {
        match self.current_input_character {
            Some('&') => self.emit_character_reference()?,
            Some('<') => {
                self.begin_markup();
                self.switch_to(TokenizerState::RcdataLessThanSign);
            }
            Some('\0') => {
                self.parse_error("unexpected-null-character");
                self.emit_char('\u{FFFD}');
            }
            None => self.emit_eof(),
            Some(c) => self.emit_char(c),
        }
        Ok(())
    }

    /// [§ 13.2.5.3 RAWTEXT state](https://html.spec.whatwg.org/multipage/parsing.html#rawtext-state)
    pub(super) fn handle_rawtext_state(&mut self) -> StepResult {
        self.handle_raw_text_character(TokenizerState::RawtextLessThanSign);
        Ok(())
    }

    /// [§ 13.2.5.4 Script data state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-state)
    pub(super) fn handle_script_data_state(&mut self) -> StepResult {
        self.handle_raw_text_character(TokenizerState::ScriptDataLessThanSign);
        Ok(())
    }

    /// RAWTEXT and script data differ only in where `<` leads.
    fn handle_raw_text_character(&mut self, less_than_state: TokenizerState) {
        match self.current_input_character {
            Some('<') => {
                self.begin_markup();
                self.switch_to(less_than_state);
            }
            Some('\0') => {
                self.parse_error("unexpected-null-character");
                self.emit_char('\u{FFFD}');
            }
            None => self.emit_eof(),
            Some(c) => self.emit_char(c),
        }
    }

    /// [§ 13.2.5.5 PLAINTEXT state](https://html.spec.whatwg.org/multipage/parsing.html#plaintext-state)
    pub(super) fn handle_plaintext_state(&mut self) -> StepResult {
        match self.current_input_character {
            Some('\0') => {
                self.parse_error("unexpected-null-character");
                self.emit_char('\u{FFFD}');
            }
            None => self.emit_eof(),
            Some(c) => self.emit_char(c),
        }
        Ok(())
    }

    /// [§ 13.2.5.6 Tag open state](https://html.spec.whatwg.org/multipage/parsing.html#tag-open-state)
    pub(super) fn handle_tag_open_state(&mut self) -> StepResult {
        match self.current_input_character {
            // "U+0021 EXCLAMATION MARK (!)"
            // "Switch to the markup declaration open state."
            Some('!') => self.switch_to(TokenizerState::MarkupDeclarationOpen),
            // "U+002F SOLIDUS (/)"
            // "Switch to the end tag open state."
            Some('/') => self.switch_to(TokenizerState::EndTagOpen),
            // "ASCII alpha"
            // "Create a new start tag token, set its tag name to the empty string.
            // Reconsume in the tag name state."
            Some(c) if c.is_ascii_alphabetic() => {
                self.current_token = Some(Token::new_start_tag());
                self.reconsume_in(TokenizerState::TagName);
            }
            // "U+003F QUESTION MARK (?)"
            // "This is an unexpected-question-mark-instead-of-tag-name parse error.
            // Create a comment token whose data is the empty string. Reconsume in
            // the bogus comment state."
            Some('?') => {
                if !self.xml_syntax {
                    self.parse_error("unexpected-question-mark-instead-of-tag-name");
                }
                self.current_token = Some(Token::new_comment(true));
                self.reconsume_in(TokenizerState::BogusComment);
            }
            // "EOF"
            // "This is an eof-before-tag-name parse error. Emit a U+003C LESS-THAN
            // SIGN character token and an end-of-file token."
            None => {
                self.parse_error("eof-before-tag-name");
                self.emit_markup_as_text("<");
                self.emit_eof();
            }
            // "Anything else"
            // "This is an invalid-first-character-of-tag-name parse error. Emit a
            // U+003C LESS-THAN SIGN character token. Reconsume in the data state."
            Some(_) => {
                self.parse_error("invalid-first-character-of-tag-name");
                self.emit_markup_as_text("<");
                self.reconsume_in(TokenizerState::Data);
            }
        }
        Ok(())
    }

    /// [§ 13.2.5.7 End tag open state](https://html.spec.whatwg.org/multipage/parsing.html#end-tag-open-state)
    pub(super) fn handle_end_tag_open_state(&mut self) -> StepResult {
        match self.current_input_character {
            Some(c) if c.is_ascii_alphabetic() => {
                self.current_token = Some(Token::new_end_tag());
                self.reconsume_in(TokenizerState::TagName);
            }
            // "This is a missing-end-tag-name parse error. Switch to the data state."
            Some('>') => {
                self.parse_error("missing-end-tag-name");
                self.switch_to(TokenizerState::Data);
            }
            None => {
                self.parse_error("eof-before-tag-name");
                self.emit_markup_as_text("</");
                self.emit_eof();
            }
            // "This is an invalid-first-character-of-tag-name parse error. Create a
            // comment token whose data is the empty string. Reconsume in the bogus
            // comment state."
            Some(_) => {
                self.parse_error("invalid-first-character-of-tag-name");
                self.current_token = Some(Token::new_comment(true));
                self.reconsume_in(TokenizerState::BogusComment);
            }
        }
        Ok(())
    }

    /// [§ 13.2.5.8 Tag name state](https://html.spec.whatwg.org/multipage/parsing.html#tag-name-state)
    ///
    /// The name keeps its source case.
    pub(super) fn handle_tag_name_state(&mut self) -> StepResult {
        match self.current_input_character {
            Some(c) if Self::is_whitespace_char(c) => {
                self.switch_to(TokenizerState::BeforeAttributeName);
            }
            Some('/') => self.switch_to(TokenizerState::SelfClosingStartTag),
            Some('>') => {
                self.switch_to(TokenizerState::Data);
                self.emit_current_token();
            }
            Some('\0') => {
                self.parse_error("unexpected-null-character");
                self.append_to_tag_name('\u{FFFD}');
            }
            // "This is an eof-in-tag parse error. Emit an end-of-file token."
            None => {
                self.parse_error("eof-in-tag");
                self.current_token = None;
                self.emit_eof();
            }
            Some(c) => self.append_to_tag_name(c),
        }
        Ok(())
    }

    pub(super) fn append_to_tag_name(&mut self, c: char) {
        if let Some(token) = self.current_token.as_mut() {
            token.append_to_tag_name(c);
        }
    }

    /// [§ 13.2.5.9 RCDATA less-than sign state](https://html.spec.whatwg.org/multipage/parsing.html#rcdata-less-than-sign-state)
    /// and [§ 13.2.5.12 RAWTEXT less-than sign state](https://html.spec.whatwg.org/multipage/parsing.html#rawtext-less-than-sign-state)
    pub(super) fn handle_raw_less_than_sign_state(&mut self, text_state: TokenizerState) -> StepResult {
        if self.current_input_character == Some('/') {
            // "Set the temporary buffer to the empty string. Switch to the X end tag open state."
            self.temporary_buffer.clear();
            self.switch_to(end_tag_open_state(text_state));
        } else {
            // "Emit a U+003C LESS-THAN SIGN character token. Reconsume in the X state."
            self.reconsume_in(text_state);
            self.emit_markup_as_text("<");
        }
        Ok(())
    }

    /// End tag open states for RCDATA (§ 13.2.5.10), RAWTEXT (§ 13.2.5.13),
    /// script data (§ 13.2.5.16) and script data escaped (§ 13.2.5.24).
    pub(super) fn handle_raw_end_tag_open_state(&mut self, text_state: TokenizerState) -> StepResult {
        match self.current_input_character {
            Some(c) if c.is_ascii_alphabetic() => {
                self.current_token = Some(Token::new_end_tag());
                self.reconsume_in(end_tag_name_state(text_state));
            }
            _ => {
                self.reconsume_in(text_state);
                self.emit_markup_as_text("</");
            }
        }
        Ok(())
    }

    /// End tag name states for RCDATA (§ 13.2.5.11), RAWTEXT (§ 13.2.5.14),
    /// script data (§ 13.2.5.17) and script data escaped (§ 13.2.5.25).
    ///
    /// Whitespace, `/` and `>` only end the tag if it is an appropriate end
    /// tag; otherwise everything seen so far goes back out as text.
    pub(super) fn handle_raw_end_tag_name_state(&mut self, text_state: TokenizerState) -> StepResult {
        match self.current_input_character {
            Some(c) if Self::is_whitespace_char(c) && self.is_appropriate_end_tag_token() => {
                self.switch_to(TokenizerState::BeforeAttributeName);
            }
            Some('/') if self.is_appropriate_end_tag_token() => {
                self.switch_to(TokenizerState::SelfClosingStartTag);
            }
            Some('>') if self.is_appropriate_end_tag_token() => {
                self.switch_to(TokenizerState::Data);
                self.emit_current_token();
            }
            // "Append the current input character to the current tag token's tag
            // name. Append the current input character to the temporary buffer."
            Some(c) if c.is_ascii_alphabetic() => {
                self.append_to_tag_name(c);
                self.temporary_buffer.push(c);
            }
            _ => self.abandon_end_tag(text_state),
        }
        Ok(())
    }

    /// [§ 13.2.5.15 Script data less-than sign state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-less-than-sign-state)
    pub(super) fn handle_script_data_less_than_sign_state(&mut self) -> StepResult {
        match self.current_input_character {
            Some('/') => {
                self.temporary_buffer.clear();
                self.switch_to(TokenizerState::ScriptDataEndTagOpen);
            }
            // "Switch to the script data escape start state. Emit a U+003C LESS-THAN
            // SIGN character token and a U+0021 EXCLAMATION MARK character token."
            Some('!') => {
                self.switch_to(TokenizerState::ScriptDataEscapeStart);
                self.emit_markup_as_text("<");
                self.emit_char('!');
            }
            _ => {
                self.reconsume_in(TokenizerState::ScriptData);
                self.emit_markup_as_text("<");
            }
        }
        Ok(())
    }

    /// [§ 13.2.5.18 Script data escape start state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-escape-start-state)
    pub(super) fn handle_script_data_escape_start_state(&mut self) -> StepResult {
        if self.current_input_character == Some('-') {
            self.switch_to(TokenizerState::ScriptDataEscapeStartDash);
            self.emit_char('-');
        } else {
            self.reconsume_in(TokenizerState::ScriptData);
        }
        Ok(())
    }

    /// [§ 13.2.5.19 Script data escape start dash state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-escape-start-dash-state)
    pub(super) fn handle_script_data_escape_start_dash_state(&mut self) -> StepResult {
        if self.current_input_character == Some('-') {
            self.switch_to(TokenizerState::ScriptDataEscapedDashDash);
            self.emit_char('-');
        } else {
            self.reconsume_in(TokenizerState::ScriptData);
        }
        Ok(())
    }

    /// [§ 13.2.5.20 Script data escaped state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-escaped-state)
    pub(super) fn handle_script_data_escaped_state(&mut self) -> StepResult {
        match self.current_input_character {
            Some('-') => {
                self.switch_to(TokenizerState::ScriptDataEscapedDash);
                self.emit_char('-');
            }
            Some('<') => {
                self.begin_markup();
                self.switch_to(TokenizerState::ScriptDataEscapedLessThanSign);
            }
            Some('\0') => {
                self.parse_error("unexpected-null-character");
                self.emit_char('\u{FFFD}');
            }
            None => {
                self.parse_error("eof-in-script-html-comment-like-text");
                self.emit_eof();
            }
            Some(c) => self.emit_char(c),
        }
        Ok(())
    }

    /// [§ 13.2.5.21 Script data escaped dash state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-escaped-dash-state)
    pub(super) fn handle_script_data_escaped_dash_state(&mut self) -> StepResult {
        match self.current_input_character {
            Some('-') => {
                self.switch_to(TokenizerState::ScriptDataEscapedDashDash);
                self.emit_char('-');
            }
            Some('<') => {
                self.begin_markup();
                self.switch_to(TokenizerState::ScriptDataEscapedLessThanSign);
            }
            Some('\0') => {
                self.parse_error("unexpected-null-character");
                self.switch_to(TokenizerState::ScriptDataEscaped);
                self.emit_char('\u{FFFD}');
            }
            None => {
                self.parse_error("eof-in-script-html-comment-like-text");
                self.emit_eof();
            }
            Some(c) => {
                self.switch_to(TokenizerState::ScriptDataEscaped);
                self.emit_char(c);
            }
        }
        Ok(())
    }

    /// [§ 13.2.5.22 Script data escaped dash dash state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-escaped-dash-dash-state)
    pub(super) fn handle_script_data_escaped_dash_dash_state(&mut self) -> StepResult {
        match self.current_input_character {
            Some('-') => self.emit_char('-'),
            Some('<') => {
                self.begin_markup();
                self.switch_to(TokenizerState::ScriptDataEscapedLessThanSign);
            }
            // "Switch to the script data state. Emit a U+003E GREATER-THAN SIGN character token."
            Some('>') => {
                self.switch_to(TokenizerState::ScriptData);
                self.emit_char('>');
            }
            Some('\0') => {
                self.parse_error("unexpected-null-character");
                self.switch_to(TokenizerState::ScriptDataEscaped);
                self.emit_char('\u{FFFD}');
            }
            None => {
                self.parse_error("eof-in-script-html-comment-like-text");
                self.emit_eof();
            }
            Some(c) => {
                self.switch_to(TokenizerState::ScriptDataEscaped);
                self.emit_char(c);
            }
        }
        Ok(())
    }

    /// [§ 13.2.5.23 Script data escaped less-than sign state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-escaped-less-than-sign-state)
    pub(super) fn handle_script_data_escaped_less_than_sign_state(&mut self) -> StepResult {
        match self.current_input_character {
            Some('/') => {
                self.temporary_buffer.clear();
                self.switch_to(TokenizerState::ScriptDataEscapedEndTagOpen);
            }
            // "Set the temporary buffer to the empty string. Emit a U+003C LESS-THAN
            // SIGN character token. Reconsume in the script data double escape start state."
            Some(c) if c.is_ascii_alphabetic() => {
                self.temporary_buffer.clear();
                self.reconsume_in(TokenizerState::ScriptDataDoubleEscapeStart);
                self.emit_markup_as_text("<");
            }
            _ => {
                self.reconsume_in(TokenizerState::ScriptDataEscaped);
                self.emit_markup_as_text("<");
            }
        }
        Ok(())
    }

    /// [§ 13.2.5.26 Script data double escape start state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-double-escape-start-state)
    /// and [§ 13.2.5.31 Script data double escape end state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-double-escape-end-state)
    ///
    /// Both watch for the word `script`: when it ends, switch to `on_script`,
    /// otherwise fall back to `otherwise`.
    pub(super) fn handle_script_data_double_escape_boundary_state(
        &mut self,
        on_script: TokenizerState,
        otherwise: TokenizerState,
    ) -> StepResult {
        match self.current_input_character {
            // "U+0009 CHARACTER TABULATION (tab), U+000A LINE FEED (LF), U+000C FORM
            // FEED (FF), U+0020 SPACE, U+002F SOLIDUS (/), U+003E GREATER-THAN SIGN (>)"
            // "If the temporary buffer is the string "script", then switch to the
            // X state. Otherwise, switch to the Y state. Emit the current input
            // character as a character token."
            Some(c) if Self::is_whitespace_char(c) || c == '/' || c == '>' => {
                if self.temporary_buffer == "script" {
                    self.switch_to(on_script);
                } else {
                    self.switch_to(otherwise);
                }
                self.emit_char(c);
            }
            // "Append the lowercase version of the current input character to the
            // temporary buffer. Emit the current input character as a character token."
            Some(c) if c.is_ascii_alphabetic() => {
                self.temporary_buffer.push(c.to_ascii_lowercase());
                self.emit_char(c);
            }
            _ => self.reconsume_in(otherwise),
        }
        Ok(())
    }

    /// [§ 13.2.5.27 Script data double escaped state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-double-escaped-state)
    pub(super) fn handle_script_data_double_escaped_state(&mut self) -> StepResult {
        match self.current_input_character {
            Some('-') => {
                self.switch_to(TokenizerState::ScriptDataDoubleEscapedDash);
                self.emit_char('-');
            }
            Some('<') => {
                self.switch_to(TokenizerState::ScriptDataDoubleEscapedLessThanSign);
                self.emit_char('<');
            }
            Some('\0') => {
                self.parse_error("unexpected-null-character");
                self.emit_char('\u{FFFD}');
            }
            None => {
                self.parse_error("eof-in-script-html-comment-like-text");
                self.emit_eof();
            }
            Some(c) => self.emit_char(c),
        }
        Ok(())
    }

    /// [§ 13.2.5.28 Script data double escaped dash state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-double-escaped-dash-state)
    pub(super) fn handle_script_data_double_escaped_dash_state(&mut self) -> StepResult {
        match self.current_input_character {
            Some('-') => {
                self.switch_to(TokenizerState::ScriptDataDoubleEscapedDashDash);
                self.emit_char('-');
            }
            Some('<') => {
                self.switch_to(TokenizerState::ScriptDataDoubleEscapedLessThanSign);
                self.emit_char('<');
            }
            Some('\0') => {
                self.parse_error("unexpected-null-character");
                self.switch_to(TokenizerState::ScriptDataDoubleEscaped);
                self.emit_char('\u{FFFD}');
            }
            None => {
                self.parse_error("eof-in-script-html-comment-like-text");
                self.emit_eof();
            }
            Some(c) => {
                self.switch_to(TokenizerState::ScriptDataDoubleEscaped);
                self.emit_char(c);
            }
        }
        Ok(())
    }

    /// [§ 13.2.5.29 Script data double escaped dash dash state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-double-escaped-dash-dash-state)
    pub(super) fn handle_script_data_double_escaped_dash_dash_state(&mut self) -> StepResult {
        match self.current_input_character {
            Some('-') => self.emit_char('-'),
            Some('<') => {
                self.switch_to(TokenizerState::ScriptDataDoubleEscapedLessThanSign);
                self.emit_char('<');
            }
            Some('>') => {
                self.switch_to(TokenizerState::ScriptData);
                self.emit_char('>');
            }
            Some('\0') => {
                self.parse_error("unexpected-null-character");
                self.switch_to(TokenizerState::ScriptDataDoubleEscaped);
                self.emit_char('\u{FFFD}');
            }
            None => {
                self.parse_error("eof-in-script-html-comment-like-text");
                self.emit_eof();
            }
            Some(c) => {
                self.switch_to(TokenizerState::ScriptDataDoubleEscaped);
                self.emit_char(c);
            }
        }
        Ok(())
    }

    /// [§ 13.2.5.30 Script data double escaped less-than sign state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-double-escaped-less-than-sign-state)
    pub(super) fn handle_script_data_double_escaped_less_than_sign_state(&mut self) -> StepResult {
        if self.current_input_character == Some('/') {
            self.temporary_buffer.clear();
            self.switch_to(TokenizerState::ScriptDataDoubleEscapeEnd);
            self.emit_char('/');
        } else {
            self.reconsume_in(TokenizerState::ScriptDataDoubleEscaped);
        }
        Ok(())
    }
}

const fn end_tag_open_state(text_state: TokenizerState) -> TokenizerState {
    match text_state {
        TokenizerState::Rawtext => TokenizerState::RawtextEndTagOpen,
        TokenizerState::ScriptData => TokenizerState::ScriptDataEndTagOpen,
        TokenizerState::ScriptDataEscaped => TokenizerState::ScriptDataEscapedEndTagOpen,
        _ => TokenizerState::RcdataEndTagOpen,
    }
}

const fn end_tag_name_state(text_state: TokenizerState) -> TokenizerState {
    match text_state {
        TokenizerState::Rawtext => TokenizerState::RawtextEndTagName,
        TokenizerState::ScriptData => TokenizerState::ScriptDataEndTagName,
        TokenizerState::ScriptDataEscaped => TokenizerState::ScriptDataEscapedEndTagName,
        _ => TokenizerState::RcdataEndTagName,
    }
}
