//! Character cursors: the tokenizer's view of the input.
//!
//! A cursor hands out one character at a time with newlines already
//! normalized (CR and CRLF become LF, per
//! [§ 13.2.3.5 Preprocessing the input stream](https://html.spec.whatwg.org/multipage/parsing.html#preprocessing-the-input-stream)),
//! tracks the position of the next character, and can rewind to an earlier
//! [`Mark`] for the short lookaheads the tokenizer needs (`--`, `DOCTYPE`,
//! `[CDATA[`, entity names).

mod reader_cursor;
mod str_cursor;

use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use thiserror::Error;
use wombat_common::Position;

pub use reader_cursor::ReaderCursor;
pub use str_cursor::StrCursor;

/// A failure to read input.
#[derive(Debug, Error)]
pub enum CursorError {
    /// The underlying reader failed.
    #[error("failed to read input: {0}")]
    Io(#[from] io::Error),
    /// A rewind target has already been discarded from the buffer.
    #[error("cannot rewind to offset {mark}, oldest buffered offset is {oldest}")]
    MarkInvalidated {
        /// Character offset of the requested mark.
        mark: usize,
        /// Character offset of the oldest character still buffered.
        oldest: usize,
    },
}

/// A saved cursor position that can be rewound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mark {
    position: Position,
    byte_offset: usize,
}

impl Mark {
    /// The position the mark was taken at.
    #[must_use]
    pub const fn position(&self) -> Position {
        self.position
    }
}

/// A positioned, peekable source of characters.
pub trait CharacterCursor {
    /// The next character without consuming it. `None` at end of input.
    ///
    /// # Errors
    ///
    /// Fails if more input has to be read and reading fails.
    fn peek(&mut self) -> Result<Option<char>, CursorError>;

    /// Consume and return the next character. `None` at end of input.
    ///
    /// # Errors
    ///
    /// Fails if more input has to be read and reading fails.
    fn consume(&mut self) -> Result<Option<char>, CursorError>;

    /// Remember the current position.
    fn mark(&self) -> Mark;

    /// Return to a position saved by [`CharacterCursor::mark`].
    ///
    /// # Errors
    ///
    /// Fails with [`CursorError::MarkInvalidated`] if the mark is older than
    /// the cursor's rewind window.
    fn rewind(&mut self, mark: Mark) -> Result<(), CursorError>;

    /// Position of the next character.
    fn position(&self) -> Position;

    /// Whether the input has been fully consumed (or the cursor closed).
    ///
    /// # Errors
    ///
    /// Fails if more input has to be read to decide and reading fails.
    fn is_exhausted(&mut self) -> Result<bool, CursorError> {
        Ok(self.peek()?.is_none())
    }

    /// Release the input. Later reads report end of input. Calling this more
    /// than once has no further effect.
    fn close(&mut self);
}

impl<C: CharacterCursor + ?Sized> CharacterCursor for &mut C {
    fn peek(&mut self) -> Result<Option<char>, CursorError> {
        (**self).peek()
    }

    fn consume(&mut self) -> Result<Option<char>, CursorError> {
        (**self).consume()
    }

    fn mark(&self) -> Mark {
        (**self).mark()
    }

    fn rewind(&mut self, mark: Mark) -> Result<(), CursorError> {
        (**self).rewind(mark)
    }

    fn position(&self) -> Position {
        (**self).position()
    }

    fn is_exhausted(&mut self) -> Result<bool, CursorError> {
        (**self).is_exhausted()
    }

    fn close(&mut self) {
        (**self).close();
    }
}

/// A cloneable handle that ends a parse early from any thread.
///
/// Closing the handle makes the cursor report end of input at its next read,
/// which the tokenizer treats like a normal EOF. The tree built so far is
/// completed and returned.
#[derive(Debug, Clone, Default)]
pub struct CloseHandle(Arc<AtomicBool>);

impl CloseHandle {
    /// Request that the cursor stop producing characters.
    pub fn close(&self) {
        self.0.store(true, Ordering::Release);
    }

    /// Whether [`CloseHandle::close`] has been called.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}
