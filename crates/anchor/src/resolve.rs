use horizon_dom::{Document, TextRange};
use horizon_primitives::{AnchorDescriptor, HighlightRecord, normalize_text};

use crate::codec::deserialize;
use crate::search::find_by_text;

/// Which strategy produced an [`Anchor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
	Structural,
	TextSearch,
}

/// A resolved anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Anchor {
	pub range: TextRange,
	pub strategy: Strategy,
}

/// Resolves an anchor: structural replay first, text search second.
pub fn resolve(doc: &Document, descriptor: Option<&AnchorDescriptor>, body: Option<&str>) -> Option<Anchor> {
	if let Some(range) = descriptor.and_then(|d| deserialize(doc, d)) {
		return Some(Anchor {
			range,
			strategy: Strategy::Structural,
		});
	}
	let range = find_by_text(doc, body.filter(|b| !b.is_empty())?)?;
	Some(Anchor {
		range,
		strategy: Strategy::TextSearch,
	})
}

/// Resolves the anchor of a stored record.
///
/// A `rangeInfo` value that does not parse as a descriptor is treated as
/// absent, so legacy records still get the text search.
pub fn resolve_record(doc: &Document, record: &HighlightRecord) -> Option<Anchor> {
	let descriptor = record.descriptor();
	let anchor = resolve(doc, descriptor.as_ref(), record.body.as_deref());
	if anchor.is_none() {
		tracing::debug!(id = %record.effective_id(), "anchor.unresolved");
	}
	anchor
}

/// Lenient content check: true when the normalized range text equals
/// `expected`, or either contains the other. An empty range never matches.
pub fn validate_range_content(doc: &Document, range: &TextRange, expected: &str) -> bool {
	let Ok(text) = doc.range_text(range) else {
		return false;
	};
	let actual = normalize_text(&text);
	let expected = normalize_text(expected);
	if actual.is_empty() || expected.is_empty() {
		return false;
	}
	actual == expected || actual.contains(&expected) || expected.contains(&actual)
}
