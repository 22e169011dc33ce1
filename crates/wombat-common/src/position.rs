//! Source positions and ranges.
//!
//! Offsets count characters (after newline normalization), not bytes. Lines
//! and columns are 1-based, matching what editors display.

use std::fmt;

/// A point in the input stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    /// Number of characters consumed before this point.
    pub offset: usize,
    /// 1-based line number.
    pub line: usize,
    /// 1-based column number.
    pub column: usize,
}

impl Position {
    /// The position of the first character of any input.
    pub const START: Self = Self {
        offset: 0,
        line: 1,
        column: 1,
    };

    /// Create a position from its parts.
    #[must_use]
    pub const fn new(offset: usize, line: usize, column: usize) -> Self {
        Self {
            offset,
            line,
            column,
        }
    }

    /// The position just after `c`, assuming `c` starts at `self`.
    #[must_use]
    pub const fn advanced_by(self, c: char) -> Self {
        if c == '\n' {
            Self {
                offset: self.offset + 1,
                line: self.line + 1,
                column: 1,
            }
        } else {
            Self {
                offset: self.offset + 1,
                line: self.line,
                column: self.column + 1,
            }
        }
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::START
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A half-open span `[start, end)` of the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SourceRange {
    /// First character of the span.
    pub start: Position,
    /// Position just past the last character of the span.
    pub end: Position,
}

impl SourceRange {
    /// Create a range from two positions.
    #[must_use]
    pub const fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// A zero-width range at `at`.
    ///
    /// Used for elements that were opened or closed implicitly and so have
    /// no markup of their own.
    #[must_use]
    pub const fn empty_at(at: Position) -> Self {
        Self { start: at, end: at }
    }

    /// Whether the range covers no characters.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.start.offset == self.end.offset
    }

    /// Number of characters covered.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.end.offset.saturating_sub(self.start.offset)
    }
}

impl fmt::Display for SourceRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newline_starts_next_line() {
        let p = Position::START.advanced_by('a').advanced_by('\n');
        assert_eq!(p, Position::new(2, 2, 1));
        assert_eq!(p.to_string(), "2:1");
    }

    #[test]
    fn empty_range_has_no_length() {
        let at = Position::new(5, 1, 6);
        let range = SourceRange::empty_at(at);
        assert!(range.is_empty());
        assert_eq!(range.len(), 0);
        assert_eq!(SourceRange::new(Position::START, at).len(), 5);
    }
}
