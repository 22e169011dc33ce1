use wombat_common::Position;

use super::{CharacterCursor, CloseHandle, CursorError, Mark};

/// A cursor over an in-memory string.
///
/// The whole input stays available, so any mark can be rewound to.
#[derive(Debug)]
pub struct StrCursor<'a> {
    input: &'a str,
    byte_offset: usize,
    position: Position,
    handle: CloseHandle,
}

impl<'a> StrCursor<'a> {
    /// Create a cursor positioned at the start of `input`.
    #[must_use]
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            byte_offset: 0,
            position: Position::START,
            handle: CloseHandle::default(),
        }
    }

    /// A handle that can close this cursor from another thread.
    #[must_use]
    pub fn close_handle(&self) -> CloseHandle {
        self.handle.clone()
    }

    /// The unconsumed rest of the input.
    #[must_use]
    pub fn remaining(&self) -> &'a str {
        &self.input[self.byte_offset..]
    }

    /// The next normalized character and how many bytes it spans.
    fn next_char(&self) -> Option<(char, usize)> {
        if self.handle.is_closed() {
            return None;
        }
        let rest = self.remaining();
        let c = rest.chars().next()?;
        if c == '\r' {
            let width = if rest[1..].starts_with('\n') { 2 } else { 1 };
            return Some(('\n', width));
        }
        Some((c, c.len_utf8()))
    }
}

impl CharacterCursor for StrCursor<'_> {
    fn peek(&mut self) -> Result<Option<char>, CursorError> {
        Ok(self.next_char().map(|(c, _)| c))
    }

    fn consume(&mut self) -> Result<Option<char>, CursorError> {
        let Some((c, width)) = self.next_char() else {
            return Ok(None);
        };
        self.byte_offset += width;
        self.position = self.position.advanced_by(c);
        Ok(Some(c))
    }

    fn mark(&self) -> Mark {
        Mark {
            position: self.position,
            byte_offset: self.byte_offset,
        }
    }

    fn rewind(&mut self, mark: Mark) -> Result<(), CursorError> {
        self.byte_offset = mark.byte_offset;
        self.position = mark.position;
        Ok(())
    }

    fn position(&self) -> Position {
        self.position
    }

    fn close(&mut self) {
        self.handle.close();
    }
}
