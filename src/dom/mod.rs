//! DOM-like document layer.
//!
//! This module handles:
//! - The arena-backed node tree owned by the editing surface
//! - Parsing initial content with html5ever
//! - Serializing the tree back to an HTML fragment
//! - Inline style declarations and computed style resolution
//! - Ranges and the range primitives formatting is built on

mod parser;
mod range;
mod serialize;
pub mod style;
mod tree;

pub use indextree::NodeId;
pub use range::{Boundary, Range};
pub use tree::{Document, ElementData, NodeKind, ROOT_TAG};

/// Errors raised by tree edits and range primitives.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomError {
    /// The range partially selects a non-text node, so it cannot be wrapped.
    #[error("range partially selects a non-text node")]
    InvalidRange,
    #[error("offset {offset} is out of bounds for a node of length {len}")]
    IndexSize { offset: usize, len: usize },
    #[error("invalid tree edit: {0}")]
    Hierarchy(String),
}

impl From<indextree::NodeError> for DomError {
    fn from(err: indextree::NodeError) -> Self {
        Self::Hierarchy(format!("{err:?}"))
    }
}
