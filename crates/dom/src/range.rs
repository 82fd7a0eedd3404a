use std::cmp::Ordering;

use crate::document::Document;
use crate::error::{DomError, Result};
use crate::node::NodeId;

/// A position inside the tree: a container plus an offset.
///
/// For text nodes the offset counts chars; for elements it counts children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BoundaryPoint {
	pub node: NodeId,
	pub offset: usize,
}

impl BoundaryPoint {
	pub const fn new(node: NodeId, offset: usize) -> Self {
		Self { node, offset }
	}
}

/// A start/end pair of boundary points.
///
/// Ranges are plain values: they do not follow later tree edits. Call
/// [`Document::validate_range`] before trusting a range kept across edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextRange {
	pub start: BoundaryPoint,
	pub end: BoundaryPoint,
}

impl TextRange {
	pub fn is_collapsed(&self) -> bool {
		self.start == self.end
	}
}

impl Document {
	/// Builds a range after checking both boundaries and their order.
	pub fn create_range(&self, start: BoundaryPoint, end: BoundaryPoint) -> Result<TextRange> {
		let range = TextRange { start, end };
		self.validate_range(&range)?;
		Ok(range)
	}

	/// Checks that both boundaries are connected, in bounds and ordered.
	pub fn validate_range(&self, range: &TextRange) -> Result<()> {
		self.validate_point(range.start)?;
		self.validate_point(range.end)?;
		if self.compare_points(range.start, range.end)? == Ordering::Greater {
			return Err(DomError::InvertedRange);
		}
		Ok(())
	}

	fn validate_point(&self, point: BoundaryPoint) -> Result<()> {
		let node = self.node(point.node).ok_or(DomError::UnknownNode(point.node))?;
		if !self.is_connected(point.node) {
			return Err(DomError::Disconnected(point.node));
		}
		let len = node.boundary_len();
		if point.offset > len {
			return Err(DomError::IndexSize {
				node: point.node,
				offset: point.offset,
				len,
			});
		}
		Ok(())
	}

	/// Child indices from the root down to `node`.
	fn index_path(&self, node: NodeId) -> Result<Vec<usize>> {
		let mut path = Vec::new();
		let mut current = node;
		while let Some(parent) = self.parent(current) {
			let index = self.child_index(current).ok_or(DomError::NotAChild { parent, child: current })?;
			path.push(index);
			current = parent;
		}
		if current != self.root() {
			return Err(DomError::Disconnected(node));
		}
		path.reverse();
		Ok(path)
	}

	/// Tree-order key of a boundary point: the container's index path followed
	/// by the offset. Lexicographic order on keys is document order.
	fn point_key(&self, point: BoundaryPoint) -> Result<Vec<usize>> {
		let mut key = self.index_path(point.node)?;
		key.push(point.offset);
		Ok(key)
	}

	/// Orders two boundary points in document order.
	pub fn compare_points(&self, a: BoundaryPoint, b: BoundaryPoint) -> Result<Ordering> {
		if a.node == b.node {
			return Ok(a.offset.cmp(&b.offset));
		}
		Ok(self.point_key(a)?.cmp(&self.point_key(b)?))
	}

	/// Number of text chars that precede `point` in document order.
	fn text_position(&self, point: BoundaryPoint) -> Result<usize> {
		let point_key = self.point_key(point)?;
		let mut position = 0;
		for node in self.text_nodes(self.root()) {
			let len = self.text(node).map_or(0, |t| t.chars().count());
			if node == point.node {
				return Ok(position + point.offset.min(len));
			}
			if self.point_key(BoundaryPoint::new(node, 0))? >= point_key {
				return Ok(position);
			}
			position += len;
		}
		Ok(position)
	}

	/// Text covered by the range: the concatenated text node data between
	/// its boundaries.
	pub fn range_text(&self, range: &TextRange) -> Result<String> {
		self.validate_range(range)?;
		let from = self.text_position(range.start)?;
		let to = self.text_position(range.end)?;
		let mut out = String::new();
		let mut position = 0;
		for node in self.text_nodes(self.root()) {
			let Some(text) = self.text(node) else { continue };
			let len = text.chars().count();
			let (lo, hi) = (from.max(position), to.min(position + len));
			if lo < hi {
				out.extend(text.chars().skip(lo - position).take(hi - lo));
			}
			position += len;
			if position >= to {
				break;
			}
		}
		Ok(out)
	}

	/// Deepest node containing both boundaries.
	pub fn common_ancestor(&self, range: &TextRange) -> Option<NodeId> {
		let end_chain: Vec<NodeId> = self.ancestors(range.end.node).collect();
		self.ancestors(range.start.node).find(|n| end_chain.contains(n))
	}
}
