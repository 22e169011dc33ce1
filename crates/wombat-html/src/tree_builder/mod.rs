//! HTML tree construction.
//!
//! [§ 13.2.6 Tree construction](https://html.spec.whatwg.org/multipage/parsing.html#tree-construction)
//!
//! [`HtmlTreeBuilder`] consumes tokens one at a time and builds a tree
//! through a [`NodeFactory`](wombat_dom::NodeFactory). The insertion mode
//! rules live in `modes`, one file per family of modes; the shared
//! algorithms (scopes, the list of active formatting elements, the adoption
//! agency algorithm, foreign content) each have their own module.

/// The adoption agency algorithm.
mod adoption;
/// Builder state, token conversion and the insertion primitives.
mod core;
/// SVG and MathML content.
mod foreign_content;
/// The list of active formatting elements.
mod formatting;
/// The insertion mode rules.
mod modes;
/// Element scopes and the stack-clearing helpers built on them.
mod scope;
/// Element categories used by the insertion mode rules.
mod tag_sets;

pub use self::core::{HtmlTreeBuilder, InsertionMode};
