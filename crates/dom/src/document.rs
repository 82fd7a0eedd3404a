use slab::Slab;

use crate::error::{DomError, Result};
use crate::mutation::{MutationKind, MutationRecord};
use crate::node::{ElementData, Node, NodeId, NodeKind};
use crate::range::TextRange;

/// Arena-backed page content tree.
///
/// Removed nodes stay allocated but detached; ranges that still point at
/// them fail validation with [`DomError::Disconnected`].
#[derive(Debug, Clone)]
pub struct Document {
	nodes: Slab<Node>,
	root: NodeId,
	html: NodeId,
	head: NodeId,
	body: NodeId,
	title: String,
	selection: Option<TextRange>,
	observing: bool,
	pending: Vec<MutationRecord>,
}

impl Default for Document {
	fn default() -> Self {
		Self::new()
	}
}

impl Document {
	/// Creates `#document > html > (head, body)`.
	pub fn new() -> Self {
		let mut nodes = Slab::new();
		let root = NodeId(nodes.insert(Node::new(NodeKind::Document)));
		let html = NodeId(nodes.insert(Node::new(NodeKind::Element(ElementData::new("html")))));
		let head = NodeId(nodes.insert(Node::new(NodeKind::Element(ElementData::new("head")))));
		let body = NodeId(nodes.insert(Node::new(NodeKind::Element(ElementData::new("body")))));
		let mut doc = Self {
			nodes,
			root,
			html,
			head,
			body,
			title: String::new(),
			selection: None,
			observing: false,
			pending: Vec::new(),
		};
		doc.link(root, html, None);
		doc.link(html, head, None);
		doc.link(html, body, None);
		doc
	}

	pub fn root(&self) -> NodeId {
		self.root
	}

	/// The `<html>` element.
	pub fn document_element(&self) -> NodeId {
		self.html
	}

	pub fn head(&self) -> NodeId {
		self.head
	}

	pub fn body(&self) -> NodeId {
		self.body
	}

	pub fn title(&self) -> &str {
		&self.title
	}

	pub fn set_title(&mut self, title: impl Into<String>) {
		self.title = title.into();
	}

	pub fn node(&self, id: NodeId) -> Option<&Node> {
		self.nodes.get(id.0)
	}

	fn get(&self, id: NodeId) -> Result<&Node> {
		self.nodes.get(id.0).ok_or(DomError::UnknownNode(id))
	}

	fn get_mut(&mut self, id: NodeId) -> Result<&mut Node> {
		self.nodes.get_mut(id.0).ok_or(DomError::UnknownNode(id))
	}

	pub fn create_element(&mut self, tag: &str) -> NodeId {
		NodeId(self.nodes.insert(Node::new(NodeKind::Element(ElementData::new(tag)))))
	}

	pub fn create_text(&mut self, data: impl Into<String>) -> NodeId {
		NodeId(self.nodes.insert(Node::new(NodeKind::Text(data.into()))))
	}

	pub fn create_comment(&mut self, data: impl Into<String>) -> NodeId {
		NodeId(self.nodes.insert(Node::new(NodeKind::Comment(data.into()))))
	}

	/// Appends `child` as the last child of `parent`.
	pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
		self.insert_before(parent, child, None)
	}

	/// Inserts `child` before `reference`, or last when `reference` is `None`.
	pub fn insert_before(&mut self, parent: NodeId, child: NodeId, reference: Option<NodeId>) -> Result<()> {
		if !self.get(parent)?.is_container() {
			return Err(DomError::NotAContainer(parent));
		}
		let child_node = self.get(child)?;
		if child_node.parent.is_some() || child == parent || self.is_inclusive_ancestor(child, parent) {
			return Err(DomError::HierarchyRequest { parent, child });
		}
		let position = match reference {
			Some(reference) => Some(self.index_in(parent, reference)?),
			None => None,
		};
		self.link(parent, child, position);
		self.record(MutationRecord::added(parent, child));
		Ok(())
	}

	/// Detaches `child` from `parent`. The subtree stays allocated.
	pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
		let index = self.index_in(parent, child)?;
		self.record(MutationRecord::removed(parent, child));
		self.get_mut(parent)?.children.remove(index);
		self.get_mut(child)?.parent = None;
		if let Some(selection) = self.selection
			&& (!self.is_connected(selection.start.node) || !self.is_connected(selection.end.node))
		{
			self.selection = None;
		}
		Ok(())
	}

	/// Detaches `old` and inserts `new` at its position.
	pub fn replace_child(&mut self, parent: NodeId, new: NodeId, old: NodeId) -> Result<()> {
		let next = {
			let index = self.index_in(parent, old)?;
			self.get(parent)?.children.get(index + 1).copied()
		};
		self.remove_child(parent, old)?;
		self.insert_before(parent, new, next)
	}

	fn link(&mut self, parent: NodeId, child: NodeId, position: Option<usize>) {
		if let Some(node) = self.nodes.get_mut(parent.0) {
			match position {
				Some(index) => node.children.insert(index, child),
				None => node.children.push(child),
			}
		}
		if let Some(node) = self.nodes.get_mut(child.0) {
			node.parent = Some(parent);
		}
	}

	fn index_in(&self, parent: NodeId, child: NodeId) -> Result<usize> {
		self.get(parent)?
			.children
			.iter()
			.position(|&c| c == child)
			.ok_or(DomError::NotAChild { parent, child })
	}

	pub fn set_attribute(&mut self, element: NodeId, name: &str, value: impl Into<String>) -> Result<()> {
		let value = value.into();
		match &mut self.get_mut(element)?.kind {
			NodeKind::Element(data) => data.set_attribute(name, value),
			_ => return Err(DomError::NotAnElement(element)),
		}
		self.record(MutationRecord {
			target: element,
			kind: MutationKind::Attributes { name: name.to_string() },
		});
		Ok(())
	}

	pub fn attribute(&self, element: NodeId, name: &str) -> Option<&str> {
		self.node(element)?.as_element()?.attribute(name)
	}

	/// Adds `class` to the element's class list if missing.
	pub fn add_class(&mut self, element: NodeId, class: &str) -> Result<()> {
		let data = self.get(element)?.as_element().ok_or(DomError::NotAnElement(element))?;
		if data.has_class(class) {
			return Ok(());
		}
		let value = match data.attribute("class") {
			Some(existing) if !existing.trim().is_empty() => format!("{} {class}", existing.trim()),
			_ => class.to_string(),
		};
		self.set_attribute(element, "class", value)
	}

	/// Returns false for non-elements and unknown ids.
	pub fn has_class(&self, node: NodeId, class: &str) -> bool {
		self.node(node).and_then(Node::as_element).is_some_and(|data| data.has_class(class))
	}

	/// Replaces a text node's data.
	pub fn set_text(&mut self, node: NodeId, data: impl Into<String>) -> Result<()> {
		match &mut self.get_mut(node)?.kind {
			NodeKind::Text(text) => *text = data.into(),
			_ => return Err(DomError::NotText(node)),
		}
		self.record(MutationRecord {
			target: node,
			kind: MutationKind::CharacterData,
		});
		Ok(())
	}

	pub fn parent(&self, node: NodeId) -> Option<NodeId> {
		self.node(node)?.parent
	}

	pub fn children(&self, node: NodeId) -> &[NodeId] {
		self.node(node).map(Node::children).unwrap_or_default()
	}

	/// Element children of `node`, in order.
	pub fn element_children(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
		self.children(node)
			.iter()
			.copied()
			.filter(|&child| self.node(child).is_some_and(Node::is_element))
	}

	/// Index of `node` among all children of its parent.
	pub fn child_index(&self, node: NodeId) -> Option<usize> {
		let parent = self.parent(node)?;
		self.children(parent).iter().position(|&c| c == node)
	}

	/// Index of `node` among the element children of its parent.
	pub fn element_index(&self, node: NodeId) -> Option<usize> {
		let parent = self.parent(node)?;
		self.element_children(parent).position(|c| c == node)
	}

	/// Returns true when `node` is attached under the document root.
	pub fn is_connected(&self, node: NodeId) -> bool {
		self.ancestors(node).last() == Some(self.root)
	}

	/// `node` followed by each of its ancestors up to the topmost one.
	pub fn ancestors(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
		let start = self.node(node).map(|_| node);
		std::iter::successors(start, move |&current| self.parent(current))
	}

	fn is_inclusive_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
		self.ancestors(node).any(|n| n == ancestor)
	}

	/// Returns true when `node` is `ancestor` or lies inside it.
	pub fn is_within(&self, node: NodeId, ancestor: NodeId) -> bool {
		self.is_inclusive_ancestor(ancestor, node)
	}

	/// Nearest inclusive ancestor element satisfying `pred`.
	pub fn closest(&self, node: NodeId, mut pred: impl FnMut(&ElementData) -> bool) -> Option<NodeId> {
		self.ancestors(node)
			.find(|&n| self.node(n).and_then(Node::as_element).is_some_and(&mut pred))
	}

	/// Nearest inclusive ancestor element, skipping text and comment nodes.
	pub fn element_of(&self, node: NodeId) -> Option<NodeId> {
		self.closest(node, |_| true)
	}

	/// Pre-order traversal of the nodes under `root`, excluding `root`.
	pub fn descendants(&self, root: NodeId) -> Descendants<'_> {
		let mut stack: Vec<NodeId> = self.children(root).to_vec();
		stack.reverse();
		Descendants { doc: self, stack }
	}

	/// Text nodes under `root` in document order.
	pub fn text_nodes(&self, root: NodeId) -> impl Iterator<Item = NodeId> + '_ {
		self.descendants(root).filter(|&n| self.node(n).is_some_and(Node::is_text))
	}

	/// Data of a text node.
	pub fn text(&self, node: NodeId) -> Option<&str> {
		self.node(node)?.as_text()
	}

	/// Concatenated data of every text node under `node` (inclusive).
	pub fn text_content(&self, node: NodeId) -> String {
		if let Some(text) = self.text(node) {
			return text.to_string();
		}
		self.text_nodes(node).filter_map(|n| self.text(n)).collect()
	}

	/// Selection the user made, if any.
	pub fn selection(&self) -> Option<TextRange> {
		self.selection
	}

	/// Sets the selection after validating it.
	pub fn set_selection(&mut self, range: Option<TextRange>) -> Result<()> {
		if let Some(range) = &range {
			self.validate_range(range)?;
		}
		self.selection = range;
		Ok(())
	}

	/// Starts collecting mutation records for changes inside `<body>`.
	pub fn observe(&mut self) {
		self.observing = true;
	}

	/// Stops collecting and drops pending records.
	pub fn disconnect_observer(&mut self) {
		self.observing = false;
		self.pending.clear();
	}

	/// Drains the records collected since the last call.
	pub fn take_mutations(&mut self) -> Vec<MutationRecord> {
		std::mem::take(&mut self.pending)
	}

	fn record(&mut self, record: MutationRecord) {
		if self.observing && self.is_within(record.target, self.body) {
			self.pending.push(record);
		}
	}
}

/// Pre-order iterator returned by [`Document::descendants`].
pub struct Descendants<'a> {
	doc: &'a Document,
	stack: Vec<NodeId>,
}

impl Iterator for Descendants<'_> {
	type Item = NodeId;

	fn next(&mut self) -> Option<NodeId> {
		let next = self.stack.pop()?;
		self.stack.extend(self.doc.children(next).iter().rev().copied());
		Some(next)
	}
}
