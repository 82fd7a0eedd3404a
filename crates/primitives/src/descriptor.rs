use serde::{Deserialize, Serialize};

/// Node type marker stored with each boundary.
///
/// Values follow the DOM `nodeType` numbering so descriptors written by other
/// implementations stay readable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub enum NodeTypeMarker {
	Element,
	Text,
}

impl NodeTypeMarker {
	pub const ELEMENT_NODE: u16 = 1;
	pub const TEXT_NODE: u16 = 3;
}

impl From<NodeTypeMarker> for u16 {
	fn from(marker: NodeTypeMarker) -> Self {
		match marker {
			NodeTypeMarker::Element => NodeTypeMarker::ELEMENT_NODE,
			NodeTypeMarker::Text => NodeTypeMarker::TEXT_NODE,
		}
	}
}

impl TryFrom<u16> for NodeTypeMarker {
	type Error = String;

	fn try_from(value: u16) -> Result<Self, Self::Error> {
		match value {
			Self::ELEMENT_NODE => Ok(Self::Element),
			Self::TEXT_NODE => Ok(Self::Text),
			other => Err(format!("unsupported node type marker {other}")),
		}
	}
}

/// Structural address of one range boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundaryDescriptor {
	/// Element-sibling indices from the document element down to the boundary
	/// element. `None` when the boundary was disconnected at serialization.
	pub path: Option<Vec<usize>>,
	/// Character offset (text boundary) or child offset (element boundary).
	pub offset: usize,
	pub node_type: NodeTypeMarker,
	/// Index of the text node among its parent's direct children.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub child_index: Option<usize>,
}

impl BoundaryDescriptor {
	/// Returns true when the boundary carries a replayable path.
	pub fn is_usable(&self) -> bool {
		self.path.is_some() && (self.node_type == NodeTypeMarker::Element || self.child_index.is_some())
	}
}

/// Serialized, storable representation of an anchor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnchorDescriptor {
	pub start: BoundaryDescriptor,
	pub end: BoundaryDescriptor,
}

impl AnchorDescriptor {
	/// Returns true when both boundaries can be replayed structurally.
	pub fn is_usable(&self) -> bool {
		self.start.is_usable() && self.end.is_usable()
	}
}
