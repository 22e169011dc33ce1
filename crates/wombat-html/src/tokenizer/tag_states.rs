//! Attribute states and the self-closing start tag state.
//!
//! [§ 13.2.5.32](https://html.spec.whatwg.org/multipage/parsing.html#before-attribute-name-state) to
//! [§ 13.2.5.40](https://html.spec.whatwg.org/multipage/parsing.html#self-closing-start-tag-state)
//!
//! Duplicate attribute names are left on the token; the tree builder
//! removes them, since only it knows whether names compare with case.

use super::core::{StepResult, Tokenizer, TokenizerState};
use crate::input::CharacterCursor;

impl<C: CharacterCursor> Tokenizer<C> {
    /// [§ 13.2.5.32 Before attribute name state](https://html.spec.whatwg.org/multipage/parsing.html#before-attribute-name-state)
    pub(super) fn handle_before_attribute_name_state(&mut self) -> StepResult {
        match self.current_input_character {
            // "Ignore the character."
            Some(c) if Self::is_whitespace_char(c) => {}
            // "U+002F SOLIDUS (/), U+003E GREATER-THAN SIGN (>), EOF"
            // "Reconsume in the after attribute name state."
            Some('/' | '>') | None => self.reconsume_in(TokenizerState::AfterAttributeName),
            // "This is an unexpected-equals-sign-before-attribute-name parse error.
            // Start a new attribute in the current tag token. Set that attribute's
            // name to the current input character, and its value to the empty
            // string. Switch to the attribute name state."
            Some('=') => {
                self.parse_error("unexpected-equals-sign-before-attribute-name");
                self.start_new_attribute();
                self.append_to_attribute_name('=');
                self.switch_to(TokenizerState::AttributeName);
            }
            Some(_) => {
                self.start_new_attribute();
                self.reconsume_in(TokenizerState::AttributeName);
            }
        }
        Ok(())
    }

    /// [§ 13.2.5.33 Attribute name state](https://html.spec.whatwg.org/multipage/parsing.html#attribute-name-state)
    pub(super) fn handle_attribute_name_state(&mut self) -> StepResult {
        match self.current_input_character {
            Some(c) if Self::is_whitespace_char(c) => {
                self.reconsume_in(TokenizerState::AfterAttributeName);
            }
            Some('/' | '>') | None => self.reconsume_in(TokenizerState::AfterAttributeName),
            Some('=') => self.switch_to(TokenizerState::BeforeAttributeValue),
            Some('\0') => {
                self.parse_error("unexpected-null-character");
                self.append_to_attribute_name('\u{FFFD}');
            }
            // "This is an unexpected-character-in-attribute-name parse error. Treat
            // it as per the "anything else" entry below."
            Some(c @ ('"' | '\'' | '<')) => {
                self.parse_error("unexpected-character-in-attribute-name");
                self.append_to_attribute_name(c);
            }
            Some(c) => self.append_to_attribute_name(c),
        }
        Ok(())
    }

    /// [§ 13.2.5.34 After attribute name state](https://html.spec.whatwg.org/multipage/parsing.html#after-attribute-name-state)
    pub(super) fn handle_after_attribute_name_state(&mut self) -> StepResult {
        match self.current_input_character {
            Some(c) if Self::is_whitespace_char(c) => {}
            Some('/') => self.switch_to(TokenizerState::SelfClosingStartTag),
            Some('=') => self.switch_to(TokenizerState::BeforeAttributeValue),
            Some('>') => {
                self.switch_to(TokenizerState::Data);
                self.emit_current_token();
            }
            None => self.eof_in_tag(),
            Some(_) => {
                self.start_new_attribute();
                self.reconsume_in(TokenizerState::AttributeName);
            }
        }
        Ok(())
    }

    /// [§ 13.2.5.35 Before attribute value state](https://html.spec.whatwg.org/multipage/parsing.html#before-attribute-value-state)
    pub(super) fn handle_before_attribute_value_state(&mut self) -> StepResult {
        match self.current_input_character {
            Some(c) if Self::is_whitespace_char(c) => {}
            Some('"') => self.switch_to(TokenizerState::AttributeValueDoubleQuoted),
            Some('\'') => self.switch_to(TokenizerState::AttributeValueSingleQuoted),
            // "This is a missing-attribute-value parse error. Switch to the data
            // state. Emit the current tag token."
            Some('>') => {
                self.parse_error("missing-attribute-value");
                self.switch_to(TokenizerState::Data);
                self.emit_current_token();
            }
            _ => self.reconsume_in(TokenizerState::AttributeValueUnquoted),
        }
        Ok(())
    }

    /// [§ 13.2.5.36 Attribute value (double-quoted) state](https://html.spec.whatwg.org/multipage/parsing.html#attribute-value-(double-quoted)-state)
    /// and [§ 13.2.5.37 Attribute value (single-quoted) state](https://html.spec.whatwg.org/multipage/parsing.html#attribute-value-(single-quoted)-state)
    pub(super) fn handle_attribute_value_quoted_state(&mut self, quote: char) -> StepResult {
        match self.current_input_character {
            Some(c) if c == quote => self.switch_to(TokenizerState::AfterAttributeValueQuoted),
            Some('&') => self.append_attribute_character_reference()?,
            Some('\0') => {
                self.parse_error("unexpected-null-character");
                self.append_to_attribute_value("\u{FFFD}");
            }
            None => self.eof_in_tag(),
            Some(c) => self.append_char_to_attribute_value(c),
        }
        Ok(())
    }

    /// [§ 13.2.5.38 Attribute value (unquoted) state](https://html.spec.whatwg.org/multipage/parsing.html#attribute-value-(unquoted)-state)
    pub(super) fn handle_attribute_value_unquoted_state(&mut self) -> StepResult {
        match self.current_input_character {
            Some(c) if Self::is_whitespace_char(c) => {
                self.switch_to(TokenizerState::BeforeAttributeName);
            }
            Some('&') => self.append_attribute_character_reference()?,
            Some('>') => {
                self.switch_to(TokenizerState::Data);
                self.emit_current_token();
            }
            Some('\0') => {
                self.parse_error("unexpected-null-character");
                self.append_to_attribute_value("\u{FFFD}");
            }
            Some(c @ ('"' | '\'' | '<' | '=' | '`')) => {
                self.parse_error("unexpected-character-in-unquoted-attribute-value");
                self.append_char_to_attribute_value(c);
            }
            None => self.eof_in_tag(),
            Some(c) => self.append_char_to_attribute_value(c),
        }
        Ok(())
    }

    /// [§ 13.2.5.39 After attribute value (quoted) state](https://html.spec.whatwg.org/multipage/parsing.html#after-attribute-value-(quoted)-state)
    pub(super) fn handle_after_attribute_value_quoted_state(&mut self) -> StepResult {
        match self.current_input_character {
            Some(c) if Self::is_whitespace_char(c) => {
                self.switch_to(TokenizerState::BeforeAttributeName);
            }
            Some('/') => self.switch_to(TokenizerState::SelfClosingStartTag),
            Some('>') => {
                self.switch_to(TokenizerState::Data);
                self.emit_current_token();
            }
            None => self.eof_in_tag(),
            Some(_) => {
                self.parse_error("missing-whitespace-between-attributes");
                self.reconsume_in(TokenizerState::BeforeAttributeName);
            }
        }
        Ok(())
    }

    /// [§ 13.2.5.40 Self-closing start tag state](https://html.spec.whatwg.org/multipage/parsing.html#self-closing-start-tag-state)
    pub(super) fn handle_self_closing_start_tag_state(&mut self) -> StepResult {
        match self.current_input_character {
            // "Set the self-closing flag of the current tag token. Switch to the
            // data state. Emit the current tag token."
            Some('>') => {
                if let Some(token) = self.current_token.as_mut() {
                    token.set_self_closing();
                }
                self.switch_to(TokenizerState::Data);
                self.emit_current_token();
            }
            None => self.eof_in_tag(),
            Some(_) => {
                self.parse_error("unexpected-solidus-in-tag");
                self.reconsume_in(TokenizerState::BeforeAttributeName);
            }
        }
        Ok(())
    }

    /// "EOF: This is an eof-in-tag parse error. Emit an end-of-file token."
    ///
    /// The unfinished tag is dropped.
    fn eof_in_tag(&mut self) {
        self.parse_error("eof-in-tag");
        self.current_token = None;
        self.emit_eof();
    }

    /// Decode a character reference inside an attribute value, or keep the
    /// `&` literally.
    fn append_attribute_character_reference(&mut self) -> StepResult {
        match self.consume_character_reference(true)? {
            Some(text) => self.append_to_attribute_value(&text),
            None => self.append_char_to_attribute_value('&'),
        }
        Ok(())
    }

    fn start_new_attribute(&mut self) {
        if let Some(token) = self.current_token.as_mut() {
            token.start_new_attribute();
        }
    }

    fn append_to_attribute_name(&mut self, c: char) {
        if let Some(token) = self.current_token.as_mut() {
            token.append_to_attribute_name(c);
        }
    }

    fn append_to_attribute_value(&mut self, text: &str) {
        if let Some(token) = self.current_token.as_mut() {
            token.append_to_attribute_value(text);
        }
    }

    fn append_char_to_attribute_value(&mut self, c: char) {
        let mut buf = [0_u8; 4];
        self.append_to_attribute_value(c.encode_utf8(&mut buf));
    }
}
