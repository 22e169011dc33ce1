//! Common utilities for the Wombat parser.
//!
//! This crate provides shared infrastructure used by the DOM and parser crates:
//! - **Positions** - character offsets, line/column pairs and source ranges
//! - **Warning System** - colored, deduplicated terminal notices

pub mod position;
pub mod warning;

pub use position::{Position, SourceRange};
