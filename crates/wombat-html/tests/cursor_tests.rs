//! Integration tests for the character cursors.

use std::io::{self, Read};

use wombat_html::{CharacterCursor, CursorError, Parser, ReaderCursor, StrCursor};

/// A reader that hands out one byte per call, so multi-byte characters and
/// CRLF pairs straddle reads.
struct Trickle<'a>(&'a [u8]);

impl Read for Trickle<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self.0.split_first() {
            Some((&byte, rest)) if !buf.is_empty() => {
                buf[0] = byte;
                self.0 = rest;
                Ok(1)
            }
            _ => Ok(0),
        }
    }
}

/// A reader that fails on its first read.
struct Broken;

impl Read for Broken {
    fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
        Err(io::Error::other("disk on fire"))
    }
}

fn drain(cursor: &mut impl CharacterCursor) -> String {
    let mut out = String::new();
    while let Some(c) = cursor.consume().unwrap() {
        out.push(c);
    }
    out
}

#[test]
fn test_str_cursor_normalizes_newlines() {
    let mut cursor = StrCursor::new("a\r\nb\rc\n");
    assert_eq!(drain(&mut cursor), "a\nb\nc\n");
}

#[test]
fn test_str_cursor_tracks_lines_and_columns() {
    let mut cursor = StrCursor::new("ab\r\ncd");
    for _ in 0..4 {
        let _ = cursor.consume().unwrap();
    }
    let position = cursor.position();
    assert_eq!(position.offset, 4);
    assert_eq!(position.line, 2);
    assert_eq!(position.column, 2);
}

#[test]
fn test_str_cursor_rewinds_anywhere() {
    let mut cursor = StrCursor::new("hello world");
    let start = cursor.mark();
    assert_eq!(drain(&mut cursor), "hello world");
    cursor.rewind(start).unwrap();
    assert_eq!(cursor.peek().unwrap(), Some('h'));
    assert_eq!(cursor.position().offset, 0);
    assert_eq!(cursor.remaining(), "hello world");
}

#[test]
fn test_str_cursor_close_handle_ends_input() {
    let mut cursor = StrCursor::new("abc");
    let handle = cursor.close_handle();
    assert_eq!(cursor.consume().unwrap(), Some('a'));
    handle.close();
    assert!(handle.is_closed());
    assert_eq!(cursor.consume().unwrap(), None);
    assert!(cursor.is_exhausted().unwrap());
}

#[test]
fn test_reader_cursor_decodes_across_reads() {
    let input = "h\u{e9}llo \u{1F600}\r\nnext";
    let mut cursor = ReaderCursor::new(Trickle(input.as_bytes()), 64);
    assert_eq!(drain(&mut cursor), "h\u{e9}llo \u{1F600}\nnext");
    assert_eq!(cursor.position().line, 2);
}

#[test]
fn test_reader_cursor_skips_byte_order_mark() {
    let input = b"\xEF\xBB\xBFabc";
    let mut cursor = ReaderCursor::new(&input[..], 64);
    assert_eq!(drain(&mut cursor), "abc");
    assert_eq!(cursor.position().offset, 3);
}

#[test]
fn test_reader_cursor_replaces_invalid_utf8() {
    let input = b"a\xFFb\xE2\x82";
    let mut cursor = ReaderCursor::new(&input[..], 64);
    assert_eq!(drain(&mut cursor), "a\u{FFFD}b\u{FFFD}");
}

#[test]
fn test_reader_cursor_rewinds_within_window() {
    let input = "x".repeat(200);
    let mut cursor = ReaderCursor::new(input.as_bytes(), 64);
    for _ in 0..100 {
        let _ = cursor.consume().unwrap();
    }
    let mark = cursor.mark();
    for _ in 0..50 {
        let _ = cursor.consume().unwrap();
    }
    cursor.rewind(mark).unwrap();
    assert_eq!(cursor.position().offset, 100);
    assert_eq!(drain(&mut cursor).len(), 100);
}

#[test]
fn test_reader_cursor_mark_outside_window_is_invalidated() {
    let input = "x".repeat(200);
    let mut cursor = ReaderCursor::new(input.as_bytes(), 64);
    let start = cursor.mark();
    for _ in 0..150 {
        let _ = cursor.consume().unwrap();
    }
    match cursor.rewind(start) {
        Err(CursorError::MarkInvalidated { mark, oldest }) => {
            assert_eq!(mark, 0);
            assert!(oldest > 0);
        }
        other => panic!("Expected MarkInvalidated, got {other:?}"),
    }
}

#[test]
fn test_reader_cursor_small_lookback_is_raised() {
    let input = "y".repeat(100);
    let mut cursor = ReaderCursor::new(input.as_bytes(), 1);
    let start = cursor.mark();
    for _ in 0..60 {
        let _ = cursor.consume().unwrap();
    }
    cursor.rewind(start).unwrap();
    assert_eq!(cursor.position().offset, 0);
}

#[test]
fn test_reader_cursor_close() {
    let mut cursor = ReaderCursor::new(&b"abc"[..], 64);
    let handle = cursor.close_handle();
    assert_eq!(cursor.consume().unwrap(), Some('a'));
    cursor.close();
    assert!(handle.is_closed());
    assert_eq!(cursor.peek().unwrap(), None);
    cursor.close();
    assert_eq!(cursor.consume().unwrap(), None);
}

#[test]
fn test_reader_cursor_io_error() {
    let mut cursor = ReaderCursor::new(Broken, 64);
    assert!(matches!(cursor.peek(), Err(CursorError::Io(_))));
}

#[test]
fn test_parse_reader_matches_parse_str() {
    let html = "<!DOCTYPE html><p>caf\u{e9}\r\n<b>bold</b></p>";
    let from_reader = Parser::html()
        .parse_reader(Trickle(html.as_bytes()))
        .unwrap();
    let from_str = Parser::html().parse_str(html).unwrap();
    assert_eq!(from_reader.dump(), from_str.dump());
}

#[test]
fn test_parse_reader_surfaces_io_error() {
    let result = Parser::html().parse_reader(Broken);
    assert!(result.is_err());
}

#[test]
fn test_long_entity_lookahead_through_reader() {
    let html = format!("<p>{}&amp;&notanentityatall;</p>", "z".repeat(10_000));
    let parsed = Parser::html()
        .parse_reader(Trickle(html.as_bytes()))
        .unwrap();
    let p = parsed.tree.find_element(parsed.tree.root(), "p").unwrap();
    let text = parsed.tree.text_content(p);
    assert!(text.ends_with("z&&notanentityatall;"));
}
