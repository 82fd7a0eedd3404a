use std::fmt;

use smallvec::SmallVec;

/// Arena key of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
	/// Raw arena index.
	pub const fn index(self) -> usize {
		self.0
	}
}

impl fmt::Display for NodeId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "#{}", self.0)
	}
}

/// Element payload: tag name and ordered attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementData {
	/// Lowercase tag name.
	pub tag: String,
	/// Attributes in insertion order.
	pub attributes: SmallVec<[(String, String); 4]>,
}

impl ElementData {
	pub fn new(tag: impl Into<String>) -> Self {
		Self {
			tag: tag.into().to_ascii_lowercase(),
			attributes: SmallVec::new(),
		}
	}

	pub fn attribute(&self, name: &str) -> Option<&str> {
		self.attributes.iter().find(|(k, _)| k == name).map(|(_, v)| v.as_str())
	}

	pub(crate) fn set_attribute(&mut self, name: &str, value: String) {
		match self.attributes.iter_mut().find(|(k, _)| k == name) {
			Some((_, existing)) => *existing = value,
			None => self.attributes.push((name.to_string(), value)),
		}
	}

	/// Iterates the whitespace-separated entries of the `class` attribute.
	pub fn classes(&self) -> impl Iterator<Item = &str> {
		self.attribute("class").unwrap_or_default().split_whitespace()
	}

	pub fn has_class(&self, class: &str) -> bool {
		self.classes().any(|c| c == class)
	}
}

/// Node payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
	/// The tree root. Its only element child is the document element.
	Document,
	Element(ElementData),
	Text(String),
	Comment(String),
}

/// One arena slot.
#[derive(Debug, Clone)]
pub struct Node {
	pub(crate) kind: NodeKind,
	pub(crate) parent: Option<NodeId>,
	pub(crate) children: Vec<NodeId>,
}

impl Node {
	pub(crate) fn new(kind: NodeKind) -> Self {
		Self {
			kind,
			parent: None,
			children: Vec::new(),
		}
	}

	pub fn kind(&self) -> &NodeKind {
		&self.kind
	}

	pub fn parent(&self) -> Option<NodeId> {
		self.parent
	}

	pub fn children(&self) -> &[NodeId] {
		&self.children
	}

	pub fn is_element(&self) -> bool {
		matches!(self.kind, NodeKind::Element(_))
	}

	pub fn is_text(&self) -> bool {
		matches!(self.kind, NodeKind::Text(_))
	}

	/// Returns true for nodes that may hold children.
	pub fn is_container(&self) -> bool {
		matches!(self.kind, NodeKind::Document | NodeKind::Element(_))
	}

	pub fn as_element(&self) -> Option<&ElementData> {
		match &self.kind {
			NodeKind::Element(data) => Some(data),
			_ => None,
		}
	}

	pub fn as_text(&self) -> Option<&str> {
		match &self.kind {
			NodeKind::Text(text) => Some(text),
			_ => None,
		}
	}

	/// Boundary length: chars for character data, child count otherwise.
	pub fn boundary_len(&self) -> usize {
		match &self.kind {
			NodeKind::Text(text) | NodeKind::Comment(text) => text.chars().count(),
			NodeKind::Document | NodeKind::Element(_) => self.children.len(),
		}
	}
}
