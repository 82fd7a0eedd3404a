use std::collections::VecDeque;

use horizon_dom::{BoundaryPoint, Document, NodeId, TextRange};
use horizon_primitives::{normalize_text, normalize_with_map};

/// Class carried by elements that belong to the highlighter itself. Text
/// directly inside such an element is never matched.
pub const HIGHLIGHT_CLASS: &str = "horizon-highlight";

/// Window of consecutive text nodes scanned as one string.
struct Window {
	nodes: VecDeque<(NodeId, usize)>,
	text: String,
	chars: usize,
}

impl Window {
	fn new() -> Self {
		Self {
			nodes: VecDeque::new(),
			text: String::new(),
			chars: 0,
		}
	}

	fn push(&mut self, node: NodeId, data: &str) {
		let len = data.chars().count();
		self.nodes.push_back((node, len));
		self.text.push_str(data);
		self.chars += len;
	}

	/// Drops the oldest node and its text.
	fn shift(&mut self) {
		let Some((_, len)) = self.nodes.pop_front() else { return };
		let cut = self.text.char_indices().nth(len).map_or(self.text.len(), |(i, _)| i);
		self.text.drain(..cut);
		self.chars -= len;
	}

	/// Maps a char offset into the window text to a boundary point. `end`
	/// selects the earlier node when the offset falls exactly between two.
	fn point_at(&self, offset: usize, end: bool) -> Option<BoundaryPoint> {
		let mut acc = 0;
		for &(node, len) in &self.nodes {
			let inside = if end { offset <= acc + len } else { offset < acc + len };
			if inside {
				return Some(BoundaryPoint::new(node, offset - acc));
			}
			acc += len;
		}
		None
	}
}

/// Locates `text` in the body of `doc` by content.
///
/// Text nodes under `<body>` are scanned in document order, skipping
/// whitespace-only nodes and nodes directly inside a [`HIGHLIGHT_CLASS`]
/// element. The scanned text is kept in a window of whole nodes: once it
/// exceeds three times the search length the oldest node is dropped, so a
/// match that straddles a dropped node is not found. A hit in the
/// normalized window is mapped back to exact node offsets, and the
/// resulting range is accepted only if its own normalized text equals the
/// normalized search text.
pub fn find_by_text(doc: &Document, text: &str) -> Option<TextRange> {
	let needle = normalize_text(text);
	if needle.is_empty() {
		return None;
	}
	let needle_chars = needle.chars().count();
	let mut window = Window::new();

	for node in doc.text_nodes(doc.body()) {
		let Some(data) = doc.text(node) else { continue };
		if data.trim().is_empty() || inside_highlight(doc, node) {
			continue;
		}
		window.push(node, data);

		if let Some(range) = match_in_window(doc, &window, &needle, needle_chars) {
			return Some(range);
		}

		if window.chars > needle_chars * 3 {
			window.shift();
		}
	}

	tracing::debug!(len = needle_chars, "anchor.search.miss");
	None
}

fn inside_highlight(doc: &Document, node: NodeId) -> bool {
	doc.parent(node).is_some_and(|parent| doc.has_class(parent, HIGHLIGHT_CLASS))
}

fn match_in_window(doc: &Document, window: &Window, needle: &str, needle_chars: usize) -> Option<TextRange> {
	let (normalized, map) = normalize_with_map(&window.text);
	let byte_pos = normalized.find(needle)?;
	let first = normalized[..byte_pos].chars().count();
	let last = first + needle_chars - 1;

	let start = window.point_at(*map.get(first)?, false)?;
	let end = window.point_at(*map.get(last)? + 1, true)?;
	let range = doc.create_range(start, end).ok()?;

	let found = normalize_text(&doc.range_text(&range).ok()?);
	if found != needle {
		tracing::debug!(found = %found, "anchor.search.verify_failed");
		return None;
	}
	Some(range)
}
