//! Page content tree for the highlight engine.
//!
//! [`Document`] is an arena of element, text and comment nodes rooted at a
//! document node with an `<html>` document element, `<head>` and `<body>`.
//! It provides the subset of DOM behavior the anchoring engine relies on:
//!
//! - structural navigation (parents, children, element-sibling indices)
//! - document-order traversal of text nodes
//! - [`TextRange`] boundary validation, ordering and text extraction
//! - [`MutationRecord`]s for child-list, attribute and text changes inside
//!   `<body>`, collected while observation is enabled
//!
//! Offsets inside text nodes are measured in chars.

pub mod builder;
pub mod document;
pub mod error;
pub mod mutation;
pub mod node;
pub mod range;

pub use builder::{Markup, comment, el, text};
pub use document::{Descendants, Document};
pub use error::{DomError, Result};
pub use mutation::{MutationKind, MutationRecord};
pub use node::{ElementData, Node, NodeId, NodeKind};
pub use range::{BoundaryPoint, TextRange};

#[cfg(test)]
mod tests;
