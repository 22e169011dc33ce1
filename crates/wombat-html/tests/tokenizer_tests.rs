//! Integration tests for the tokenizer.

use wombat_html::tokenizer::{CharacterKind, RawTextMode, Token, Tokenizer, TokenizerState};
use wombat_html::{ParseErrors, StrCursor};

/// Helper to tokenize a string, dropping positions.
fn tokenize(input: &str) -> Vec<Token> {
    tokenize_with_errors(input).0
}

/// Helper to tokenize a string and collect the error messages too.
fn tokenize_with_errors(input: &str) -> (Vec<Token>, Vec<String>) {
    let mut errors = ParseErrors::with_capacity(100);
    let mut tokenizer = Tokenizer::new(StrCursor::new(input));
    let tokens = tokenizer
        .run_to_end(&mut errors)
        .unwrap()
        .into_iter()
        .map(|spanned| spanned.token)
        .collect();
    let messages = errors.iter().map(|e| e.message.clone()).collect();
    (tokens, messages)
}

fn text(data: &str) -> Token {
    Token::Character {
        data: data.to_string(),
        kind: CharacterKind::Text,
    }
}

#[test]
fn test_plain_text_is_one_run() {
    let tokens = tokenize("Hello");
    assert_eq!(tokens, vec![text("Hello"), Token::EndOfFile]);
}

#[test]
fn test_doctype() {
    let tokens = tokenize("<!DOCTYPE html>");
    assert_eq!(tokens.len(), 2);
    match &tokens[0] {
        Token::Doctype {
            name,
            public_identifier,
            system_identifier,
            force_quirks,
        } => {
            assert_eq!(name.as_deref(), Some("html"));
            assert!(public_identifier.is_none());
            assert!(system_identifier.is_none());
            assert!(!force_quirks);
        }
        other => panic!("Expected DOCTYPE token, got {other:?}"),
    }
}

#[test]
fn test_doctype_public_and_system_identifiers() {
    let tokens = tokenize(
        r#"<!DOCTYPE html PUBLIC "-//W3C//DTD HTML 4.01//EN" "http://www.w3.org/TR/html4/strict.dtd">"#,
    );
    match &tokens[0] {
        Token::Doctype {
            public_identifier,
            system_identifier,
            force_quirks,
            ..
        } => {
            assert_eq!(public_identifier.as_deref(), Some("-//W3C//DTD HTML 4.01//EN"));
            assert_eq!(
                system_identifier.as_deref(),
                Some("http://www.w3.org/TR/html4/strict.dtd")
            );
            assert!(!force_quirks);
        }
        other => panic!("Expected DOCTYPE token, got {other:?}"),
    }
}

#[test]
fn test_doctype_without_name_forces_quirks() {
    let (tokens, errors) = tokenize_with_errors("<!DOCTYPE>");
    match &tokens[0] {
        Token::Doctype {
            name, force_quirks, ..
        } => {
            assert!(name.is_none());
            assert!(force_quirks);
        }
        other => panic!("Expected DOCTYPE token, got {other:?}"),
    }
    assert!(errors.iter().any(|e| e == "missing-doctype-name"));
}

#[test]
fn test_start_tag_keeps_source_case() {
    let tokens = tokenize("<DiV>");
    match &tokens[0] {
        Token::StartTag {
            name,
            self_closing,
            attributes,
        } => {
            assert_eq!(name, "DiV");
            assert!(!self_closing);
            assert!(attributes.is_empty());
        }
        other => panic!("Expected StartTag token, got {other:?}"),
    }
}

#[test]
fn test_self_closing_tag() {
    let tokens = tokenize("<br/>");
    assert!(matches!(
        &tokens[0],
        Token::StartTag { name, self_closing: true, .. } if name == "br"
    ));
}

#[test]
fn test_attribute_forms() {
    let tokens = tokenize(r#"<input a="1" b='2' c=3 d>"#);
    let Token::StartTag { attributes, .. } = &tokens[0] else {
        panic!("Expected StartTag token");
    };
    let pairs: Vec<(&str, &str)> = attributes
        .iter()
        .map(|a| (a.name.as_str(), a.value.as_str()))
        .collect();
    assert_eq!(pairs, vec![("a", "1"), ("b", "2"), ("c", "3"), ("d", "")]);
}

#[test]
fn test_duplicate_attributes_are_kept_by_the_tokenizer() {
    let tokens = tokenize("<p one=1 ONE=2>");
    let Token::StartTag { attributes, .. } = &tokens[0] else {
        panic!("Expected StartTag token");
    };
    assert_eq!(attributes.len(), 2);
}

#[test]
fn test_end_tag_with_attributes_is_an_error() {
    let (tokens, errors) = tokenize_with_errors("</div class=x>");
    assert!(matches!(&tokens[0], Token::EndTag { name, .. } if name == "div"));
    assert!(errors.iter().any(|e| e == "end-tag-with-attributes"));
}

#[test]
fn test_comment() {
    let tokens = tokenize("<!-- hi -->");
    assert_eq!(
        tokens[0],
        Token::Comment {
            data: " hi ".to_string(),
            bogus: false
        }
    );
}

#[test]
fn test_incorrectly_closed_comment_recovers() {
    let (tokens, errors) = tokenize_with_errors("<!--a--!>b");
    assert_eq!(
        tokens[0],
        Token::Comment {
            data: "a".to_string(),
            bogus: false
        }
    );
    assert_eq!(tokens[1], text("b"));
    assert!(errors.iter().any(|e| e == "incorrectly-closed-comment"));
}

#[test]
fn test_question_mark_opens_bogus_comment() {
    let (tokens, errors) = tokenize_with_errors("<?xml version=\"1.0\"?>");
    assert_eq!(
        tokens[0],
        Token::Comment {
            data: "?xml version=\"1.0\"?".to_string(),
            bogus: true
        }
    );
    assert!(errors
        .iter()
        .any(|e| e == "unexpected-question-mark-instead-of-tag-name"));
}

#[test]
fn test_invalid_tag_start_is_text() {
    let (tokens, errors) = tokenize_with_errors("a < b");
    assert_eq!(tokens, vec![text("a < b"), Token::EndOfFile]);
    assert!(errors
        .iter()
        .any(|e| e == "invalid-first-character-of-tag-name"));
}

#[test]
fn test_cdata_is_bogus_comment_in_html_content() {
    let (tokens, errors) = tokenize_with_errors("<![CDATA[x]]>");
    assert_eq!(
        tokens[0],
        Token::Comment {
            data: "[CDATA[x]]".to_string(),
            bogus: true
        }
    );
    assert!(errors.iter().any(|e| e == "cdata-in-html-content"));
}

#[test]
fn test_cdata_section_when_allowed() {
    let mut errors = ParseErrors::with_capacity(10);
    let mut tokenizer = Tokenizer::new(StrCursor::new("<![CDATA[a<b]]>"));
    tokenizer.set_cdata_allowed(true);
    let token = tokenizer.next_token(&mut errors).unwrap().token;
    assert_eq!(
        token,
        Token::Character {
            data: "a<b".to_string(),
            kind: CharacterKind::CData
        }
    );
    assert!(errors.is_empty());
}

#[test]
fn test_rcdata_decodes_references_but_not_tags() {
    let mut errors = ParseErrors::with_capacity(10);
    let mut tokenizer = Tokenizer::new(StrCursor::new("a &amp; <b></title>"));
    tokenizer.set_raw_text_mode(RawTextMode::Rcdata);
    tokenizer.set_last_start_tag(Some("title"));
    assert_eq!(tokenizer.state(), TokenizerState::Rcdata);

    let tokens: Vec<Token> = tokenizer
        .run_to_end(&mut errors)
        .unwrap()
        .into_iter()
        .map(|t| t.token)
        .collect();
    assert_eq!(tokens[0], text("a & <b>"));
    assert!(matches!(&tokens[1], Token::EndTag { name, .. } if name == "title"));
}

#[test]
fn test_rawtext_keeps_references() {
    let mut errors = ParseErrors::with_capacity(10);
    let mut tokenizer = Tokenizer::new(StrCursor::new("a &amp; b</style>"));
    tokenizer.set_raw_text_mode(RawTextMode::Rawtext);
    tokenizer.set_last_start_tag(Some("style"));
    let first = tokenizer.next_token(&mut errors).unwrap().token;
    assert_eq!(first, text("a &amp; b"));
}

#[test]
fn test_inappropriate_end_tag_in_rawtext_is_text() {
    let mut errors = ParseErrors::with_capacity(10);
    let mut tokenizer = Tokenizer::new(StrCursor::new("x</p>y</style>"));
    tokenizer.set_raw_text_mode(RawTextMode::Rawtext);
    tokenizer.set_last_start_tag(Some("style"));
    let first = tokenizer.next_token(&mut errors).unwrap().token;
    assert_eq!(first, text("x</p>y"));
}

#[test]
fn test_script_data_escaping_keeps_nested_end_tag_as_text() {
    let mut errors = ParseErrors::with_capacity(10);
    let input = "<!--<script>x</script>-->y</script>";
    let mut tokenizer = Tokenizer::new(StrCursor::new(input));
    tokenizer.set_raw_text_mode(RawTextMode::ScriptData);
    tokenizer.set_last_start_tag(Some("script"));
    let tokens: Vec<Token> = tokenizer
        .run_to_end(&mut errors)
        .unwrap()
        .into_iter()
        .map(|t| t.token)
        .collect();
    assert_eq!(tokens[0], text("<!--<script>x</script>-->y"));
    assert!(matches!(&tokens[1], Token::EndTag { name, .. } if name == "script"));
}

#[test]
fn test_plaintext_consumes_everything() {
    let mut errors = ParseErrors::with_capacity(10);
    let mut tokenizer = Tokenizer::new(StrCursor::new("<b>&amp;</plaintext>"));
    tokenizer.set_raw_text_mode(RawTextMode::Plaintext);
    let first = tokenizer.next_token(&mut errors).unwrap().token;
    assert_eq!(first, text("<b>&amp;</plaintext>"));
}

#[test]
fn test_null_in_data_is_an_error_and_kept() {
    let (tokens, errors) = tokenize_with_errors("a\0b");
    assert_eq!(tokens[0], text("a\0b"));
    assert!(errors.iter().any(|e| e == "unexpected-null-character"));
}

#[test]
fn test_eof_in_tag_drops_the_tag() {
    let (tokens, errors) = tokenize_with_errors("x<div class=");
    assert_eq!(tokens, vec![text("x"), Token::EndOfFile]);
    assert!(errors.iter().any(|e| e == "eof-in-tag"));
}

#[test]
fn test_token_ranges() {
    let mut errors = ParseErrors::with_capacity(10);
    let mut tokenizer = Tokenizer::new(StrCursor::new("ab<p>\ncd"));
    let tokens = tokenizer.run_to_end(&mut errors).unwrap();

    assert_eq!(tokens[0].range.start.offset, 0);
    assert_eq!(tokens[0].range.end.offset, 2);
    assert_eq!(tokens[1].range.start.offset, 2);
    assert_eq!(tokens[1].range.end.offset, 5);
    assert_eq!(tokens[2].range.start.offset, 5);
    assert_eq!(tokens[2].range.end.line, 2);
    assert_eq!(tokens[2].range.end.column, 3);
}

#[test]
fn test_eof_repeats_after_end() {
    let mut errors = ParseErrors::disabled();
    let mut tokenizer = Tokenizer::new(StrCursor::new(""));
    assert!(tokenizer.next_token(&mut errors).unwrap().token.is_eof());
    assert!(tokenizer.next_token(&mut errors).unwrap().token.is_eof());
}
