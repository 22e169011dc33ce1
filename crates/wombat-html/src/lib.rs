//! HTML and XML parsing for Wombat.
//!
//! # Scope
//!
//! This crate implements:
//! - **Tokenizer** ([WHATWG § 13.2.5](https://html.spec.whatwg.org/multipage/parsing.html#tokenization))
//!   - Every tokenizer state, including script data escaping and CDATA sections
//!   - Named and numeric character references against the full entity table
//!
//! - **HTML Tree Builder** ([WHATWG § 13.2.6](https://html.spec.whatwg.org/multipage/parsing.html#tree-construction))
//!   - All 23 insertion modes, templates and framesets
//!   - Foster parenting and the adoption agency algorithm
//!   - SVG and MathML foreign content
//!   - Fragment parsing with a context element
//!
//! - **XML Tree Builder**: stack discipline, processing instructions, CDATA
//!   and optional namespace resolution
//!
//! Markup errors never abort a parse. They are collected in a bounded
//! [`ParseErrors`] list; only input and tree failures surface as
//! [`ParseFailure`].
//!
//! # Not Implemented
//!
//! - Scripting (`<noscript>` is always parsed as markup)
//! - Encoding sniffing (input is UTF-8)
//! - Incremental parsing across suspension points

/// Named character references.
pub mod entities;
/// Parse errors and hard failures.
pub mod errors;
/// Character cursors over strings and byte streams.
pub mod input;
/// Parser configuration.
pub mod options;
/// The parser façade.
pub mod parser;
/// HTML tokenizer.
pub mod tokenizer;
/// HTML tree construction.
pub mod tree_builder;
/// XML tree construction.
pub mod xml;

pub use errors::{ParseError, ParseErrorKind, ParseErrors, ParseFailure};
pub use input::{CharacterCursor, CloseHandle, CursorError, ReaderCursor, StrCursor};
pub use options::{ParseOptions, ParseSettings, ParserMode};
pub use parser::{
    ParseOutcome, ParsedDocument, ParsedFragment, Parser, parse, parse_fragment, unescape_entities,
};
pub use tokenizer::{Token, Tokenizer};
pub use tree_builder::{HtmlTreeBuilder, InsertionMode};
pub use xml::XmlTreeBuilder;
