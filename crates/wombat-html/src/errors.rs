//! Parse diagnostics and hard failures.
//!
//! Markup problems never stop a parse. They are recorded in a [`ParseErrors`]
//! sink shared by the tokenizer and the tree builders, and the state machines
//! apply their recovery rules. Only the input or the tree itself failing
//! ends a parse early, as a [`ParseFailure`].

use std::fmt;

use strum_macros::Display;
use thiserror::Error;
use wombat_common::Position;
use wombat_common::warning::warn_once;
use wombat_dom::TreeError;

use crate::input::CursorError;

/// Which stage noticed a problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum ParseErrorKind {
    /// Malformed tags, attributes, references, doctypes, comments or CDATA.
    #[strum(serialize = "lexical")]
    Lexical,
    /// Tokens that arrive where the tree builder does not expect them.
    #[strum(serialize = "structural")]
    Structural,
}

/// One recorded parse error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    /// Where in the input the problem was noticed.
    pub position: Position,
    /// Lexical or structural.
    pub kind: ParseErrorKind,
    /// Human readable description.
    pub message: String,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}): {}", self.position, self.kind, self.message)
    }
}

/// Append-only, capacity-bounded list of parse errors.
///
/// A capacity of zero disables tracking entirely. Once the capacity is
/// reached further records are dropped silently.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseErrors {
    capacity: usize,
    errors: Vec<ParseError>,
}

impl ParseErrors {
    /// A sink that keeps at most `capacity` errors.
    #[must_use]
    pub const fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            errors: Vec::new(),
        }
    }

    /// A sink that keeps nothing.
    #[must_use]
    pub const fn disabled() -> Self {
        Self::with_capacity(0)
    }

    /// Whether any error would currently be kept.
    #[must_use]
    pub fn can_record(&self) -> bool {
        self.errors.len() < self.capacity
    }

    /// How many more errors would be kept.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.capacity.saturating_sub(self.errors.len())
    }

    /// Record an error, unless the sink is full or disabled.
    pub fn record(&mut self, position: Position, kind: ParseErrorKind, message: impl Into<String>) {
        if !self.can_record() {
            return;
        }
        let error = ParseError {
            position,
            kind,
            message: message.into(),
        };
        log::debug!(target: "wombat_html", "parse error: {error}");
        self.errors.push(error);
        if self.errors.len() == self.capacity {
            let _ = warn_once(
                "Parser",
                &format!(
                    "error limit of {} reached, further errors dropped",
                    self.capacity
                ),
            );
        }
    }

    /// Maximum number of errors kept.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of errors recorded.
    #[must_use]
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Whether nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Iterate over the recorded errors in the order they were found.
    pub fn iter(&self) -> std::slice::Iter<'_, ParseError> {
        self.errors.iter()
    }

    /// The recorded errors as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[ParseError] {
        &self.errors
    }

    /// Take ownership of the recorded errors.
    #[must_use]
    pub fn into_vec(self) -> Vec<ParseError> {
        self.errors
    }
}

impl<'a> IntoIterator for &'a ParseErrors {
    type Item = &'a ParseError;
    type IntoIter = std::slice::Iter<'a, ParseError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}

/// A failure that aborts the parse. No partial tree is returned.
#[derive(Debug, Error)]
pub enum ParseFailure {
    /// The character cursor could not be read.
    #[error("input error: {0}")]
    Input(#[from] CursorError),
    /// The node factory refused a node.
    #[error("tree error: {0}")]
    Tree(#[from] TreeError),
}
