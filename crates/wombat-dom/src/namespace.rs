//! Element namespaces and document modes.

use serde::{Deserialize, Serialize};
use strum_macros::Display;

/// [§ 2.1.3 Namespaces](https://infra.spec.whatwg.org/#namespaces)
///
/// The namespace an element was created in. Tree construction switches
/// between the first three; XML documents use [`Namespace::Xml`] for
/// anything that is not one of the well-known vocabularies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
pub enum Namespace {
    /// "The HTML namespace is `http://www.w3.org/1999/xhtml`."
    #[strum(serialize = "html")]
    Html,
    /// "The SVG namespace is `http://www.w3.org/2000/svg`."
    #[strum(serialize = "svg")]
    Svg,
    /// "The MathML namespace is `http://www.w3.org/1998/Math/MathML`."
    #[strum(serialize = "math")]
    MathMl,
    /// Generic XML content.
    #[strum(serialize = "xml")]
    Xml,
}

impl Namespace {
    /// The namespace URI.
    #[must_use]
    pub const fn url(self) -> &'static str {
        match self {
            Self::Html => "http://www.w3.org/1999/xhtml",
            Self::Svg => "http://www.w3.org/2000/svg",
            Self::MathMl => "http://www.w3.org/1998/Math/MathML",
            Self::Xml => "http://www.w3.org/XML/1998/namespace",
        }
    }

    /// Map a namespace URI to a known namespace, falling back to
    /// [`Namespace::Xml`].
    #[must_use]
    pub fn from_url(url: &str) -> Self {
        match url {
            "http://www.w3.org/1999/xhtml" => Self::Html,
            "http://www.w3.org/2000/svg" => Self::Svg,
            "http://www.w3.org/1998/Math/MathML" => Self::MathMl,
            _ => Self::Xml,
        }
    }
}

/// [§ 4.5 Interface Document](https://dom.spec.whatwg.org/#concept-document-mode)
///
/// "Each document has an associated mode (a string): "no-quirks",
/// "quirks", or "limited-quirks"."
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, Serialize, Deserialize)]
pub enum QuirksMode {
    /// Standards mode.
    #[default]
    #[strum(serialize = "no-quirks")]
    NoQuirks,
    /// Almost-standards mode.
    #[strum(serialize = "limited-quirks")]
    LimitedQuirks,
    /// Quirks mode.
    #[strum(serialize = "quirks")]
    Quirks,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_uses_serialized_names() {
        assert_eq!(Namespace::MathMl.to_string(), "math");
        assert_eq!(Namespace::Svg.to_string(), "svg");
        assert_eq!(QuirksMode::LimitedQuirks.to_string(), "limited-quirks");
        assert_eq!(QuirksMode::default().to_string(), "no-quirks");
    }

    #[test]
    fn namespace_urls_round_trip() {
        for ns in [Namespace::Html, Namespace::Svg, Namespace::MathMl] {
            assert_eq!(Namespace::from_url(ns.url()), ns);
        }
        assert_eq!(Namespace::from_url("urn:example"), Namespace::Xml);
    }
}
