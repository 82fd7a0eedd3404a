use horizon_dom::{BoundaryPoint, Document, Node, NodeId, TextRange};
use horizon_primitives::{AnchorDescriptor, BoundaryDescriptor, NodeTypeMarker};

/// Serializes both boundaries of `range` into a descriptor.
///
/// A boundary whose container is disconnected, or is neither an element nor
/// a text node, gets a `None` path. The descriptor is still returned; callers
/// check [`AnchorDescriptor::is_usable`].
pub fn serialize(doc: &Document, range: &TextRange) -> AnchorDescriptor {
	AnchorDescriptor {
		start: serialize_boundary(doc, range.start),
		end: serialize_boundary(doc, range.end),
	}
}

fn serialize_boundary(doc: &Document, point: BoundaryPoint) -> BoundaryDescriptor {
	let is_text = doc.node(point.node).is_some_and(Node::is_text);
	let node_type = if is_text { NodeTypeMarker::Text } else { NodeTypeMarker::Element };
	let (container, child_index) = if is_text {
		(doc.parent(point.node), doc.child_index(point.node))
	} else {
		(Some(point.node), None)
	};

	let path = container.and_then(|container| element_path(doc, container));
	if path.is_none() {
		tracing::debug!(node = %point.node, "anchor.serialize.disconnected");
	}

	BoundaryDescriptor {
		path,
		offset: point.offset,
		node_type,
		child_index,
	}
}

/// Element-sibling indices from the document element down to `element`.
fn element_path(doc: &Document, element: NodeId) -> Option<Vec<usize>> {
	if !doc.is_connected(element) || !doc.node(element)?.is_element() {
		return None;
	}
	let html = doc.document_element();
	let mut path = Vec::new();
	let mut current = element;
	while current != html {
		path.push(doc.element_index(current)?);
		current = doc.parent(current)?;
	}
	path.reverse();
	Some(path)
}

/// Replays a descriptor against the current tree.
///
/// Returns `None` on any mismatch: a missing child at a recorded index, a
/// text child that is no longer text, an offset past the node's length, a
/// `None` path, or boundaries that now resolve out of order.
pub fn deserialize(doc: &Document, descriptor: &AnchorDescriptor) -> Option<TextRange> {
	let start = locate(doc, &descriptor.start)?;
	let end = locate(doc, &descriptor.end)?;
	match doc.create_range(start, end) {
		Ok(range) => Some(range),
		Err(err) => {
			tracing::debug!(error = %err, "anchor.deserialize.rejected");
			None
		}
	}
}

fn locate(doc: &Document, boundary: &BoundaryDescriptor) -> Option<BoundaryPoint> {
	let path = boundary.path.as_ref()?;
	let mut node = doc.document_element();
	for &index in path {
		node = doc.element_children(node).nth(index)?;
	}
	if boundary.node_type == NodeTypeMarker::Text {
		let child = *doc.children(node).get(boundary.child_index?)?;
		if !doc.node(child)?.is_text() {
			return None;
		}
		node = child;
	}
	Some(BoundaryPoint::new(node, boundary.offset))
}
