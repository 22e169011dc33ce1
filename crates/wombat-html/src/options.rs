//! Parser configuration.
//!
//! [`ParseOptions`] is what callers set. It deserializes from JSON with every
//! field optional, so hosts can keep parser settings in their own config files:
//!
//! ```json
//! { "mode": "xml", "namespace_aware": true, "max_errors": 50 }
//! ```

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// Default cursor rewind window, in characters.
pub const DEFAULT_MAX_LOOKBACK: usize = 4096;

/// Which tree builder runs over the token stream.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ParserMode {
    /// WHATWG HTML tree construction.
    #[default]
    Html,
    /// Stack-discipline XML tree construction.
    Xml,
}

/// Options for one parse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseOptions {
    /// HTML or XML tree construction.
    pub mode: ParserMode,
    /// Attach start and end tag source ranges to elements.
    pub track_position: bool,
    /// Maximum number of parse errors kept; 0 disables tracking.
    pub max_errors: usize,
    /// Keep tag names as written instead of lowercasing them (HTML only;
    /// XML always preserves case).
    pub preserve_tag_case: bool,
    /// Keep attribute names as written instead of lowercasing them (HTML
    /// only; XML always preserves case).
    pub preserve_attribute_case: bool,
    /// Resolve `xmlns` declarations into element namespaces (XML only).
    pub namespace_aware: bool,
    /// How far back, in characters, the cursor must be able to rewind.
    pub max_lookback: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            mode: ParserMode::Html,
            track_position: false,
            max_errors: 0,
            preserve_tag_case: false,
            preserve_attribute_case: false,
            namespace_aware: false,
            max_lookback: DEFAULT_MAX_LOOKBACK,
        }
    }
}

impl ParseOptions {
    /// Default options for HTML.
    #[must_use]
    pub fn html() -> Self {
        Self::default()
    }

    /// Default options for XML.
    #[must_use]
    pub fn xml() -> Self {
        Self {
            mode: ParserMode::Xml,
            ..Self::default()
        }
    }

    /// Set the tree construction mode.
    #[must_use]
    pub const fn with_mode(mut self, mode: ParserMode) -> Self {
        self.mode = mode;
        self
    }

    /// Turn source range tracking on or off.
    #[must_use]
    pub const fn with_track_position(mut self, track: bool) -> Self {
        self.track_position = track;
        self
    }

    /// Keep at most `max` parse errors.
    #[must_use]
    pub const fn with_max_errors(mut self, max: usize) -> Self {
        self.max_errors = max;
        self
    }

    /// Preserve the case of tag names.
    #[must_use]
    pub const fn with_preserve_tag_case(mut self, preserve: bool) -> Self {
        self.preserve_tag_case = preserve;
        self
    }

    /// Preserve the case of attribute names.
    #[must_use]
    pub const fn with_preserve_attribute_case(mut self, preserve: bool) -> Self {
        self.preserve_attribute_case = preserve;
        self
    }

    /// Resolve XML namespace declarations.
    #[must_use]
    pub const fn with_namespace_aware(mut self, aware: bool) -> Self {
        self.namespace_aware = aware;
        self
    }

    /// Set the cursor rewind window.
    #[must_use]
    pub const fn with_max_lookback(mut self, max_lookback: usize) -> Self {
        self.max_lookback = max_lookback;
        self
    }

    /// The name-normalization rules these options imply.
    #[must_use]
    pub const fn settings(&self) -> ParseSettings {
        match self.mode {
            ParserMode::Html => ParseSettings {
                preserve_tag_case: self.preserve_tag_case,
                preserve_attribute_case: self.preserve_attribute_case,
            },
            ParserMode::Xml => ParseSettings::PRESERVE_CASE,
        }
    }
}

/// How tag and attribute names are normalized before they reach the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ParseSettings {
    /// Keep tag names as written.
    pub preserve_tag_case: bool,
    /// Keep attribute names as written.
    pub preserve_attribute_case: bool,
}

impl ParseSettings {
    /// HTML defaults: everything lowercased.
    pub const HTML_DEFAULT: Self = Self {
        preserve_tag_case: false,
        preserve_attribute_case: false,
    };

    /// XML: names kept exactly as written.
    pub const PRESERVE_CASE: Self = Self {
        preserve_tag_case: true,
        preserve_attribute_case: true,
    };

    /// The tag name to give the created element.
    #[must_use]
    pub fn normalize_tag(&self, name: &str) -> String {
        if self.preserve_tag_case {
            name.to_string()
        } else {
            name.to_ascii_lowercase()
        }
    }

    /// The attribute name to store.
    #[must_use]
    pub fn normalize_attribute(&self, name: &str) -> String {
        if self.preserve_attribute_case {
            name.to_string()
        } else {
            name.to_ascii_lowercase()
        }
    }
}
