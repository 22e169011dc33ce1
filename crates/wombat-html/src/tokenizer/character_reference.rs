//! Character reference decoding.
//!
//! [§ 13.2.5.72 Character reference state](https://html.spec.whatwg.org/multipage/parsing.html#character-reference-state)
//! through [§ 13.2.5.80 Numeric character reference end state](https://html.spec.whatwg.org/multipage/parsing.html#numeric-character-reference-end-state)
//!
//! The reference states run as one subroutine. It is entered with the `&`
//! already consumed and either returns the decoded text, or `None` with the
//! cursor rewound to just after the `&` so the caller keeps it literally.

use super::core::{StepResult, Tokenizer};
use crate::entities::{C1_REPLACEMENTS, MAX_ENTITY_NAME_LEN};
use crate::input::{CharacterCursor, CursorError, Mark};

impl<C: CharacterCursor> Tokenizer<C> {
    /// "Set the return state to the data state. Switch to the character
    /// reference state." Used from the data and RCDATA states.
    pub(super) fn emit_character_reference(&mut self) -> StepResult {
        match self.consume_character_reference(false)? {
            Some(text) => self.emit_str(&text),
            None => self.emit_char('&'),
        }
        Ok(())
    }

    /// [§ 13.2.5.72 Character reference state](https://html.spec.whatwg.org/multipage/parsing.html#character-reference-state)
    pub(super) fn consume_character_reference(
        &mut self,
        in_attribute: bool,
    ) -> Result<Option<String>, CursorError> {
        match self.cursor.peek()? {
            // "ASCII alphanumeric: Reconsume in the named character reference state."
            Some(c) if c.is_ascii_alphanumeric() => self.consume_named_reference(in_attribute),
            // "U+0023 NUMBER SIGN (#): Append the current input character to the
            // temporary buffer. Switch to the numeric character reference state."
            Some('#') => {
                let before_hash = self.cursor.mark();
                let _ = self.cursor.consume()?;
                self.consume_numeric_reference(before_hash)
            }
            // "Anything else: Flush code points consumed as a character reference.
            // Reconsume in the return state."
            _ => Ok(None),
        }
    }

    /// [§ 13.2.5.73 Named character reference state](https://html.spec.whatwg.org/multipage/parsing.html#named-character-reference-state)
    ///
    /// "Consume the maximum number of characters possible, where the consumed
    /// characters are one of the identifiers in the named character references
    /// table."
    fn consume_named_reference(&mut self, in_attribute: bool) -> Result<Option<String>, CursorError> {
        let start = self.cursor.mark();
        let mut candidate = String::new();
        while candidate.len() < MAX_ENTITY_NAME_LEN {
            match self.cursor.consume()? {
                Some(c) if c.is_ascii_alphanumeric() => candidate.push(c),
                Some(';') => {
                    candidate.push(';');
                    break;
                }
                _ => break,
            }
        }
        self.cursor.rewind(start)?;

        // "Otherwise: Flush code points consumed as a character reference.
        // Switch to the ambiguous ampersand state." Unknown names are kept
        // as text without an error. A complete `&name;` only decodes as a
        // whole, so `&notanentity;` stays literal instead of becoming
        // `&not` plus "anentity;".
        let Some(found) = self.resolver.longest_match(&candidate) else {
            return Ok(None);
        };
        if candidate.ends_with(';') && found.consumed < candidate.len() {
            return Ok(None);
        }
        self.skip_characters(found.consumed)?;

        if !found.terminated(&candidate) {
            // "If the character reference was consumed as part of an attribute,
            // and the last character matched is not a U+003B SEMICOLON character
            // (;), and the next input character is either a U+003D EQUALS SIGN
            // character (=) or an ASCII alphanumeric, then, for historical
            // reasons, flush code points consumed as a character reference and
            // switch to the return state."
            let next = self.cursor.peek()?;
            if in_attribute && next.is_some_and(|c| c == '=' || c.is_ascii_alphanumeric()) {
                self.cursor.rewind(start)?;
                self.parse_error("ambiguous-ampersand-in-attribute");
                return Ok(None);
            }
            self.parse_error("missing-semicolon-after-character-reference");
        }
        Ok(Some(found.replacement.to_string()))
    }

    /// [§ 13.2.5.75 Numeric character reference state](https://html.spec.whatwg.org/multipage/parsing.html#numeric-character-reference-state)
    /// to [§ 13.2.5.79 Decimal character reference state](https://html.spec.whatwg.org/multipage/parsing.html#decimal-character-reference-state)
    fn consume_numeric_reference(&mut self, before_hash: Mark) -> Result<Option<String>, CursorError> {
        let hex = matches!(self.cursor.peek()?, Some('x' | 'X'));
        if hex {
            let _ = self.cursor.consume()?;
        }
        let radix = if hex { 16 } else { 10 };

        let mut value: u32 = 0;
        let mut digits = 0_usize;
        while let Some(digit) = self.cursor.peek()?.and_then(|c| c.to_digit(radix)) {
            let _ = self.cursor.consume()?;
            digits += 1;
            // Saturate past the Unicode range; the exact value no longer matters.
            value = value
                .checked_mul(radix)
                .and_then(|v| v.checked_add(digit))
                .map_or(u32::MAX, |v| v.min(0x11_0000));
        }

        // "This is an absence-of-digits-in-numeric-character-reference parse
        // error. Flush code points consumed as a character reference."
        if digits == 0 {
            self.cursor.rewind(before_hash)?;
            self.parse_error("absence-of-digits-in-numeric-character-reference");
            return Ok(None);
        }

        if self.cursor.peek()? == Some(';') {
            let _ = self.cursor.consume()?;
        } else {
            self.parse_error("missing-semicolon-after-character-reference");
        }

        Ok(Some(self.numeric_reference_value(value).to_string()))
    }

    /// [§ 13.2.5.80 Numeric character reference end state](https://html.spec.whatwg.org/multipage/parsing.html#numeric-character-reference-end-state)
    fn numeric_reference_value(&mut self, value: u32) -> char {
        match value {
            0 => {
                self.parse_error("null-character-reference");
                '\u{FFFD}'
            }
            v if v > 0x10_FFFF => {
                self.parse_error("character-reference-outside-unicode-range");
                '\u{FFFD}'
            }
            0xD800..=0xDFFF => {
                self.parse_error("surrogate-character-reference");
                '\u{FFFD}'
            }
            v if is_noncharacter(v) => {
                self.parse_error("noncharacter-character-reference");
                char::from_u32(v).unwrap_or('\u{FFFD}')
            }
            v if v == 0x0D || is_reported_control(v) => {
                self.parse_error("control-character-reference");
                let remapped = (0x80..=0x9F)
                    .contains(&v)
                    .then(|| C1_REPLACEMENTS[(v - 0x80) as usize])
                    .flatten();
                remapped.or_else(|| char::from_u32(v)).unwrap_or('\u{FFFD}')
            }
            v => char::from_u32(v).unwrap_or('\u{FFFD}'),
        }
    }

    /// Decode every character reference in the remaining input, keeping all
    /// other characters as they are.
    pub(crate) fn unescape_remaining(&mut self, in_attribute: bool) -> Result<String, CursorError> {
        self.error_budget = 0;
        let mut out = String::new();
        while let Some(c) = self.cursor.consume()? {
            if c != '&' {
                out.push(c);
                continue;
            }
            match self.consume_character_reference(in_attribute)? {
                Some(text) => out.push_str(&text),
                None => out.push('&'),
            }
        }
        Ok(out)
    }
}

/// [Noncharacter](https://infra.spec.whatwg.org/#noncharacter): U+FDD0 to
/// U+FDEF and the last two code points of every plane.
const fn is_noncharacter(v: u32) -> bool {
    matches!(v, 0xFDD0..=0xFDEF) || (v & 0xFFFE == 0xFFFE && v <= 0x10_FFFF)
}

/// Controls other than ASCII whitespace, plus the C1 block.
const fn is_reported_control(v: u32) -> bool {
    matches!(v, 0x01..=0x08 | 0x0B | 0x0E..=0x1F | 0x7F..=0x9F)
}
