//! Error types for tree and range operations.

use thiserror::Error;

use crate::node::NodeId;

/// Errors raised by [`Document`](crate::Document) operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomError {
	/// The id does not name a live node.
	#[error("unknown node {0}")]
	UnknownNode(NodeId),

	/// The operation requires an element node.
	#[error("node {0} is not an element")]
	NotAnElement(NodeId),

	/// The operation requires a text node.
	#[error("node {0} is not a text node")]
	NotText(NodeId),

	/// Text and comment nodes cannot have children.
	#[error("node {0} cannot contain children")]
	NotAContainer(NodeId),

	/// Insertion would create a cycle or re-parent an attached node.
	#[error("hierarchy request error inserting {child} into {parent}")]
	HierarchyRequest {
		/// Intended parent.
		parent: NodeId,
		/// Node being inserted.
		child: NodeId,
	},

	/// The node is not a child of the given parent.
	#[error("node {child} is not a child of {parent}")]
	NotAChild {
		/// Expected parent.
		parent: NodeId,
		/// Node that was looked up.
		child: NodeId,
	},

	/// A boundary offset exceeds the node's length.
	#[error("offset {offset} out of bounds for node {node} (length {len})")]
	IndexSize {
		/// Boundary container.
		node: NodeId,
		/// Requested offset.
		offset: usize,
		/// Char length or child count of the container.
		len: usize,
	},

	/// A boundary container is not attached to the document.
	#[error("node {0} is not connected to the document")]
	Disconnected(NodeId),

	/// The range end precedes its start.
	#[error("range end precedes range start")]
	InvertedRange,
}

/// Result type for tree operations.
pub type Result<T> = std::result::Result<T, DomError>;
