use std::collections::VecDeque;
use std::io::{ErrorKind, Read};

use wombat_common::Position;
use wombat_common::warning::warn_once;

use super::{CharacterCursor, CloseHandle, CursorError, Mark};

/// Bytes requested from the reader per fill.
const READ_CHUNK: usize = 8 * 1024;

/// Smallest rewind window the tokenizer can work with: the longest named
/// character reference plus the `&`.
pub(crate) const MIN_LOOKBACK: usize = 64;

/// A cursor that decodes UTF-8 from a byte stream as it is consumed.
///
/// Decoded characters are kept for `max_lookback` characters behind the
/// read position so marks inside that window can be rewound to. Invalid
/// UTF-8 decodes to U+FFFD, and a leading byte order mark is skipped.
#[derive(Debug)]
pub struct ReaderCursor<R> {
    reader: Option<R>,
    /// Decoded, newline-normalized characters starting at `base_offset`.
    buffer: VecDeque<char>,
    base_offset: usize,
    /// Index into `buffer` of the next character.
    index: usize,
    position: Position,
    /// Undecoded bytes left over from the previous read.
    pending: Vec<u8>,
    last_was_cr: bool,
    at_start: bool,
    reader_done: bool,
    max_lookback: usize,
    handle: CloseHandle,
}

impl<R: Read> ReaderCursor<R> {
    /// Create a cursor over `reader` that can rewind at least
    /// `max_lookback` characters.
    pub fn new(reader: R, max_lookback: usize) -> Self {
        let max_lookback = if max_lookback < MIN_LOOKBACK {
            let _ = warn_once(
                "Input",
                &format!("lookback of {max_lookback} is too small, using {MIN_LOOKBACK}"),
            );
            MIN_LOOKBACK
        } else {
            max_lookback
        };
        Self {
            reader: Some(reader),
            buffer: VecDeque::new(),
            base_offset: 0,
            index: 0,
            position: Position::START,
            pending: Vec::new(),
            last_was_cr: false,
            at_start: true,
            reader_done: false,
            max_lookback,
            handle: CloseHandle::default(),
        }
    }

    /// A handle that can close this cursor from another thread.
    #[must_use]
    pub fn close_handle(&self) -> CloseHandle {
        self.handle.clone()
    }

    /// Make sure `buffer[index]` exists, unless the input is exhausted.
    fn fill(&mut self) -> Result<(), CursorError> {
        let mut chunk = [0_u8; READ_CHUNK];
        while self.index >= self.buffer.len() && !self.reader_done {
            let Some(reader) = self.reader.as_mut() else {
                self.reader_done = true;
                break;
            };
            let read = match reader.read(&mut chunk) {
                Ok(read) => read,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(CursorError::Io(err)),
            };
            if read == 0 {
                self.reader_done = true;
                if !self.pending.is_empty() {
                    self.pending.clear();
                    self.push_char('\u{FFFD}');
                }
            } else {
                self.pending.extend_from_slice(&chunk[..read]);
                self.decode_pending();
            }
        }
        Ok(())
    }

    fn decode_pending(&mut self) {
        let bytes = std::mem::take(&mut self.pending);
        let mut rest = bytes.as_slice();
        loop {
            match std::str::from_utf8(rest) {
                Ok(valid) => {
                    valid.chars().for_each(|c| self.push_char(c));
                    return;
                }
                Err(err) => {
                    let (valid, after) = rest.split_at(err.valid_up_to());
                    String::from_utf8_lossy(valid)
                        .chars()
                        .for_each(|c| self.push_char(c));
                    match err.error_len() {
                        Some(len) => {
                            self.push_char('\u{FFFD}');
                            rest = &after[len..];
                        }
                        None => {
                            self.pending = after.to_vec();
                            return;
                        }
                    }
                }
            }
        }
    }

    fn push_char(&mut self, c: char) {
        if self.at_start {
            self.at_start = false;
            if c == '\u{FEFF}' {
                return;
            }
        }
        if self.last_was_cr && c == '\n' {
            self.last_was_cr = false;
            return;
        }
        self.last_was_cr = c == '\r';
        self.buffer.push_back(if c == '\r' { '\n' } else { c });
    }

    /// Drop characters that fell out of the rewind window. Runs in batches
    /// so each character is moved at most once.
    fn trim(&mut self) {
        if self.index > self.max_lookback * 2 {
            let drop = self.index - self.max_lookback;
            let _ = self.buffer.drain(..drop);
            self.base_offset += drop;
            self.index -= drop;
        }
    }
}

impl<R: Read> CharacterCursor for ReaderCursor<R> {
    fn peek(&mut self) -> Result<Option<char>, CursorError> {
        if self.handle.is_closed() {
            return Ok(None);
        }
        self.fill()?;
        Ok(self.buffer.get(self.index).copied())
    }

    fn consume(&mut self) -> Result<Option<char>, CursorError> {
        let Some(c) = self.peek()? else {
            return Ok(None);
        };
        self.index += 1;
        self.position = self.position.advanced_by(c);
        self.trim();
        Ok(Some(c))
    }

    fn mark(&self) -> Mark {
        Mark {
            position: self.position,
            byte_offset: 0,
        }
    }

    fn rewind(&mut self, mark: Mark) -> Result<(), CursorError> {
        let offset = mark.position.offset;
        if offset < self.base_offset {
            return Err(CursorError::MarkInvalidated {
                mark: offset,
                oldest: self.base_offset,
            });
        }
        self.index = offset - self.base_offset;
        self.position = mark.position;
        Ok(())
    }

    fn position(&self) -> Position {
        self.position
    }

    fn close(&mut self) {
        self.handle.close();
        self.reader = None;
        self.buffer.clear();
        self.pending.clear();
        self.index = 0;
        self.reader_done = true;
    }
}
