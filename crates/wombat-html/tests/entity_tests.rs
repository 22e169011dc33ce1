//! Integration tests for character references.

use wombat_html::entities::{EntityResolver, NamedEntities, any_entity_has_prefix, lookup_entity};
use wombat_html::tokenizer::{CharacterKind, Token, Tokenizer};
use wombat_html::{ParseErrors, StrCursor, unescape_entities};

/// Helper to tokenize text content and return the first text run and the
/// error messages.
fn decode(input: &str) -> (String, Vec<String>) {
    let mut errors = ParseErrors::with_capacity(100);
    let mut tokenizer = Tokenizer::new(StrCursor::new(input));
    let tokens = tokenizer.run_to_end(&mut errors).unwrap();
    let text = match &tokens[0].token {
        Token::Character {
            data,
            kind: CharacterKind::Text,
        } => data.clone(),
        other => panic!("Expected text, got {other:?}"),
    };
    (text, errors.iter().map(|e| e.message.clone()).collect())
}

/// Helper to get the first attribute value of the first tag.
fn attribute_value(input: &str) -> String {
    let mut errors = ParseErrors::with_capacity(100);
    let mut tokenizer = Tokenizer::new(StrCursor::new(input));
    match tokenizer.next_token(&mut errors).unwrap().token {
        Token::StartTag { attributes, .. } => attributes[0].value.clone(),
        other => panic!("Expected StartTag token, got {other:?}"),
    }
}

#[test]
fn test_named_reference() {
    let (text, errors) = decode("a &amp; b &lt;&gt;");
    assert_eq!(text, "a & b <>");
    assert!(errors.is_empty());
}

#[test]
fn test_legacy_reference_without_semicolon() {
    let (text, errors) = decode("&amp");
    assert_eq!(text, "&");
    assert_eq!(errors, vec!["missing-semicolon-after-character-reference"]);
}

#[test]
fn test_longest_prefix_wins() {
    let (text, errors) = decode("&notit");
    assert_eq!(text, "\u{AC}it");
    assert_eq!(errors, vec!["missing-semicolon-after-character-reference"]);

    let (text, _) = decode("&notin;");
    assert_eq!(text, "\u{2209}");
}

#[test]
fn test_two_code_point_reference() {
    let (text, _) = decode("&NotEqualTilde;");
    assert_eq!(text, "\u{2242}\u{338}");
}

#[test]
fn test_unknown_reference_is_literal() {
    let (text, errors) = decode("&notanentity;");
    assert_eq!(text, "&notanentity;");
    assert!(errors.is_empty());

    let (text, errors) = decode("&zzzz;");
    assert_eq!(text, "&zzzz;");
    assert!(errors.is_empty());
}

#[test]
fn test_bare_ampersand_is_literal() {
    let (text, errors) = decode("fish & chips");
    assert_eq!(text, "fish & chips");
    assert!(errors.is_empty());
}

#[test]
fn test_decimal_and_hex_references() {
    let (text, errors) = decode("&#65;&#x42;&#X43;");
    assert_eq!(text, "ABC");
    assert!(errors.is_empty());
}

#[test]
fn test_null_reference_is_replaced() {
    let (text, errors) = decode("&#x0;");
    assert_eq!(text, "\u{FFFD}");
    assert_eq!(errors, vec!["null-character-reference"]);
}

#[test]
fn test_out_of_range_and_surrogate_references() {
    let (text, errors) = decode("&#x110000;&#xD800;");
    assert_eq!(text, "\u{FFFD}\u{FFFD}");
    assert_eq!(
        errors,
        vec![
            "character-reference-outside-unicode-range",
            "surrogate-character-reference"
        ]
    );
}

#[test]
fn test_huge_numeric_reference_saturates() {
    let (text, _) = decode("&#99999999999999999999;");
    assert_eq!(text, "\u{FFFD}");
}

#[test]
fn test_c1_control_reference_is_remapped() {
    let (text, errors) = decode("&#x80;");
    assert_eq!(text, "\u{20AC}");
    assert_eq!(errors, vec!["control-character-reference"]);
}

#[test]
fn test_numeric_reference_without_digits() {
    let (text, errors) = decode("&#;");
    assert_eq!(text, "&#;");
    assert_eq!(errors, vec!["absence-of-digits-in-numeric-character-reference"]);
}

#[test]
fn test_numeric_reference_without_semicolon() {
    let (text, errors) = decode("&#65x");
    assert_eq!(text, "Ax");
    assert_eq!(errors, vec!["missing-semicolon-after-character-reference"]);
}

#[test]
fn test_attribute_reference_followed_by_equals_is_literal() {
    assert_eq!(attribute_value(r#"<a href="?a=1&copy=2">"#), "?a=1&copy=2");
    assert_eq!(attribute_value(r#"<a href="?a=1&copy;=2">"#), "?a=1\u{A9}=2");
    assert_eq!(attribute_value(r#"<a title="&amp; more">"#), "& more");
}

#[test]
fn test_lookup_entity() {
    assert_eq!(lookup_entity("amp;"), Some("&"));
    assert_eq!(lookup_entity("amp"), Some("&"));
    assert_eq!(lookup_entity("hellip;"), Some("\u{2026}"));
    assert_eq!(lookup_entity("hellip"), None);
    assert_eq!(lookup_entity("nope;"), None);
}

#[test]
fn test_resolver_longest_match() {
    let found = NamedEntities.longest_match("notin;x").unwrap();
    assert_eq!(found.replacement, "\u{2209}");
    assert_eq!(found.consumed, 6);
    assert!(found.terminated("notin;x"));

    let found = NamedEntities.longest_match("copyright").unwrap();
    assert_eq!(found.replacement, "\u{A9}");
    assert_eq!(found.consumed, 4);
    assert!(!found.terminated("copyright"));

    assert!(NamedEntities.longest_match("qqq").is_none());
}

#[test]
fn test_unescape_entities() {
    assert_eq!(unescape_entities("1 &lt; 2 &amp;&amp; 3 &gt; 2", false), "1 < 2 && 3 > 2");
    assert_eq!(unescape_entities("<b>&quot;x&quot;</b>", false), "<b>\"x\"</b>");
    assert_eq!(unescape_entities("a&copy=b", true), "a&copy=b");
    assert_eq!(unescape_entities("a&copy=b", false), "a\u{A9}=b");
    assert_eq!(unescape_entities("no references", false), "no references");
}

#[test]
fn test_any_entity_has_prefix() {
    assert!(any_entity_has_prefix("am"));
    assert!(any_entity_has_prefix("amp;"));
    assert!(!any_entity_has_prefix("ampx"));
    assert!(!any_entity_has_prefix("xyz"));
}
