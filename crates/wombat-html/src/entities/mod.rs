//! Named character reference lookup.
//!
//! [§ 13.5 Named character references](https://html.spec.whatwg.org/multipage/named-characters.html#named-character-references)
//!
//! The tokenizer does not know the entity table itself; it asks an
//! [`EntityResolver`] for the longest name that prefixes the text after an
//! `&`. [`NamedEntities`] is the resolver over the full WHATWG table.

mod table;

use std::collections::HashMap;
use std::sync::LazyLock;

use table::ENTITY_TABLE;

/// Longest entity name in the table, semicolon included.
pub const MAX_ENTITY_NAME_LEN: usize = 32;

/// The named character reference table, keyed by name without the `&`.
///
/// Built on first use. Concurrent first uses are serialized by `LazyLock`;
/// after that every lookup is a plain read.
static NAMED_ENTITIES: LazyLock<HashMap<&'static str, &'static str>> =
    LazyLock::new(|| ENTITY_TABLE.iter().copied().collect());

/// A successful entity lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityMatch {
    /// One or two code points the reference stands for.
    pub replacement: &'static str,
    /// Number of characters of the candidate the name used, `;` included
    /// when present.
    pub consumed: usize,
}

impl EntityMatch {
    /// Whether the matched name ended with a semicolon.
    #[must_use]
    pub fn terminated(&self, candidate: &str) -> bool {
        candidate[..self.consumed].ends_with(';')
    }
}

/// Longest-match lookup of named character references.
pub trait EntityResolver: Send + Sync {
    /// Find the longest entity name that is a prefix of `candidate`, the
    /// characters following an `&`.
    fn longest_match(&self, candidate: &str) -> Option<EntityMatch>;
}

/// The full WHATWG named character reference table.
#[derive(Debug, Clone, Copy, Default)]
pub struct NamedEntities;

impl EntityResolver for NamedEntities {
    fn longest_match(&self, candidate: &str) -> Option<EntityMatch> {
        let limit = candidate.len().min(MAX_ENTITY_NAME_LEN);
        (1..=limit)
            .rev()
            .filter(|&end| candidate.is_char_boundary(end))
            .find_map(|end| {
                lookup_entity(&candidate[..end]).map(|replacement| EntityMatch {
                    replacement,
                    consumed: end,
                })
            })
    }
}

/// Look up one exact entity name (without the leading `&`).
///
/// Names without a trailing `;` only resolve for the legacy entities that
/// may omit it (`amp`, `lt`, `copy`, ...).
#[must_use]
pub fn lookup_entity(name: &str) -> Option<&'static str> {
    NAMED_ENTITIES.get(name).copied()
}

/// Whether any entity name starts with `prefix`.
#[must_use]
pub fn any_entity_has_prefix(prefix: &str) -> bool {
    ENTITY_TABLE.iter().any(|(name, _)| name.starts_with(prefix))
}

/// [§ 13.2.5.80 Numeric character reference end state](https://html.spec.whatwg.org/multipage/parsing.html#numeric-character-reference-end-state)
///
/// Replacements for numeric references in the C1 control range 0x80-0x9F, as
/// Windows-1252 decodes those bytes. `None` entries keep the code point.
pub(crate) const C1_REPLACEMENTS: [Option<char>; 32] = [
    Some('\u{20AC}'), // 0x80 EURO SIGN
    None,             // 0x81
    Some('\u{201A}'), // 0x82 SINGLE LOW-9 QUOTATION MARK
    Some('\u{0192}'), // 0x83 LATIN SMALL LETTER F WITH HOOK
    Some('\u{201E}'), // 0x84 DOUBLE LOW-9 QUOTATION MARK
    Some('\u{2026}'), // 0x85 HORIZONTAL ELLIPSIS
    Some('\u{2020}'), // 0x86 DAGGER
    Some('\u{2021}'), // 0x87 DOUBLE DAGGER
    Some('\u{02C6}'), // 0x88 MODIFIER LETTER CIRCUMFLEX ACCENT
    Some('\u{2030}'), // 0x89 PER MILLE SIGN
    Some('\u{0160}'), // 0x8A LATIN CAPITAL LETTER S WITH CARON
    Some('\u{2039}'), // 0x8B SINGLE LEFT-POINTING ANGLE QUOTATION MARK
    Some('\u{0152}'), // 0x8C LATIN CAPITAL LIGATURE OE
    None,             // 0x8D
    Some('\u{017D}'), // 0x8E LATIN CAPITAL LETTER Z WITH CARON
    None,             // 0x8F
    None,             // 0x90
    Some('\u{2018}'), // 0x91 LEFT SINGLE QUOTATION MARK
    Some('\u{2019}'), // 0x92 RIGHT SINGLE QUOTATION MARK
    Some('\u{201C}'), // 0x93 LEFT DOUBLE QUOTATION MARK
    Some('\u{201D}'), // 0x94 RIGHT DOUBLE QUOTATION MARK
    Some('\u{2022}'), // 0x95 BULLET
    Some('\u{2013}'), // 0x96 EN DASH
    Some('\u{2014}'), // 0x97 EM DASH
    Some('\u{02DC}'), // 0x98 SMALL TILDE
    Some('\u{2122}'), // 0x99 TRADE MARK SIGN
    Some('\u{0161}'), // 0x9A LATIN SMALL LETTER S WITH CARON
    Some('\u{203A}'), // 0x9B SINGLE RIGHT-POINTING ANGLE QUOTATION MARK
    Some('\u{0153}'), // 0x9C LATIN SMALL LIGATURE OE
    None,             // 0x9D
    Some('\u{017E}'), // 0x9E LATIN SMALL LETTER Z WITH CARON
    Some('\u{0178}'), // 0x9F LATIN CAPITAL LETTER Y WITH DIAERESIS
];
