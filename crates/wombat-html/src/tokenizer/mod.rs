//! Tokenizer module.
//!
//! Implements [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
//! of the WHATWG HTML Living Standard over any [`CharacterCursor`](crate::input::CharacterCursor).
//! The same tokenizer feeds both the HTML and the XML tree builders.

/// Character reference decoding per § 13.2.5.72 to § 13.2.5.80.
mod character_reference;
/// The state machine: states, fields and the main loop.
mod core;
/// Text and tag-opening states.
mod data_states;
/// Helper methods for state transitions and emission.
mod helpers;
/// Comment, DOCTYPE and CDATA states.
mod markup_states;
/// Attribute states.
mod tag_states;
/// Token types produced by the tokenizer.
pub mod token;

pub use self::core::{RawTextMode, Tokenizer, TokenizerState};
pub use token::{Attribute, CharacterKind, SpannedToken, Token};
