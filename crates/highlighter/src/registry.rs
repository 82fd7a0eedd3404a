//! Live highlights of one page view.
//!
//! [`HighlightRegistry`] is the only component that adds ranges to or
//! removes ranges from the appearance groups of a [`DecorationSurface`]. It
//! holds exactly one entry per anchored highlight id, and every entry's range
//! sits in exactly one group: the one named after the entry's appearance.

use std::sync::Arc;

use horizon_anchor::{Strategy, resolve_record};
use horizon_dom::{Document, TextRange};
use horizon_primitives::{Appearance, HighlightRecord, HighlightStyle, Theme, effective_id};
use rustc_hash::FxHashMap;

use crate::surface::{DecorationSurface, GroupId, group_name};

/// Registry entry for one anchored highlight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryEntry {
	pub id: String,
	pub range: TextRange,
	pub appearance: Appearance,
	group: GroupId,
}

/// Outcome of [`HighlightRegistry::restore_all`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RestoreReport {
	/// Ids anchored by replaying their stored path.
	pub structural: Vec<String>,
	/// Ids anchored by searching for their text.
	pub text_search: Vec<String>,
	/// Ids that could not be anchored. Their records are left untouched.
	pub skipped: Vec<String>,
}

impl RestoreReport {
	pub fn restored(&self) -> usize {
		self.structural.len() + self.text_search.len()
	}
}

/// Exclusive owner of the id to range mapping of one page view.
pub struct HighlightRegistry {
	surface: Arc<dyn DecorationSurface>,
	entries: FxHashMap<String, RegistryEntry>,
	groups: FxHashMap<Appearance, GroupId>,
}

impl HighlightRegistry {
	pub fn new(surface: Arc<dyn DecorationSurface>) -> Self {
		Self {
			surface,
			entries: FxHashMap::default(),
			groups: FxHashMap::default(),
		}
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	pub fn contains(&self, id: &str) -> bool {
		self.entries.contains_key(id)
	}

	pub fn get(&self, id: &str) -> Option<&RegistryEntry> {
		self.entries.get(id)
	}

	/// Anchored ids, sorted.
	pub fn ids(&self) -> Vec<String> {
		let mut ids: Vec<_> = self.entries.keys().cloned().collect();
		ids.sort();
		ids
	}

	fn group(&mut self, appearance: Appearance) -> GroupId {
		let surface = &self.surface;
		*self
			.groups
			.entry(appearance)
			.or_insert_with(|| surface.ensure_group(&group_name(appearance)))
	}

	/// Decorates `range` as highlight `id`, replacing any previous entry
	/// for that id.
	///
	/// There is no separate per-id decoration: the range joins its
	/// appearance group and the entry keeps the range, which is what
	/// [`Overlay::scroll_to`](crate::Overlay::scroll_to) flashes.
	pub fn add(&mut self, id: &str, range: TextRange, appearance: Appearance) {
		self.remove(id);
		let group = self.group(appearance);
		self.surface.add(group, range);
		self.entries.insert(
			id.to_string(),
			RegistryEntry {
				id: id.to_string(),
				range,
				appearance,
				group,
			},
		);
		tracing::trace!(id, %appearance, "registry.add");
	}

	/// Drops the entry for `id` and its decoration. Returns false when absent.
	pub fn remove(&mut self, id: &str) -> bool {
		let Some(entry) = self.entries.remove(id) else {
			return false;
		};
		self.surface.remove(entry.group, &entry.range);
		tracing::trace!(id, "registry.remove");
		true
	}

	/// Removes every entry and empties every group this registry owns.
	pub fn clear(&mut self) {
		for group in self.groups.values() {
			self.surface.clear(*group);
		}
		self.entries.clear();
	}

	/// Resolves `record` against `doc` and adds it. Records without a theme
	/// or style use `defaults` for the missing part.
	pub fn anchor(&mut self, doc: &Document, record: &HighlightRecord, defaults: Appearance) -> Option<Strategy> {
		if record.is_video() {
			return None;
		}
		let anchor = resolve_record(doc, record)?;
		self.add(&effective_id(record), anchor.range, record.appearance_or(defaults));
		Some(anchor.strategy)
	}

	/// Rebuilds the registry from `records`: every owned decoration is
	/// cleared, then each record is resolved and added. Records that cannot
	/// be resolved are reported and skipped.
	pub fn restore_all<'a>(
		&mut self,
		doc: &Document,
		records: impl IntoIterator<Item = &'a HighlightRecord>,
		defaults: Appearance,
	) -> RestoreReport {
		self.clear();
		let mut report = RestoreReport::default();
		for record in records {
			let id = effective_id(record);
			match self.anchor(doc, record, defaults) {
				Some(Strategy::Structural) => report.structural.push(id),
				Some(Strategy::TextSearch) => report.text_search.push(id),
				None => report.skipped.push(id),
			}
		}
		tracing::debug!(
			structural = report.structural.len(),
			text_search = report.text_search.len(),
			skipped = report.skipped.len(),
			"registry.restore"
		);
		report
	}

	pub fn change_theme(&mut self, id: &str, theme: Theme) -> bool {
		self.change_appearance(id, |appearance| appearance.theme = theme)
	}

	pub fn change_style(&mut self, id: &str, style: HighlightStyle) -> bool {
		self.change_appearance(id, |appearance| appearance.style = style)
	}

	fn change_appearance(&mut self, id: &str, edit: impl FnOnce(&mut Appearance)) -> bool {
		let Some(entry) = self.entries.get_mut(id) else {
			tracing::debug!(id, "registry.change.unknown");
			return false;
		};
		edit(&mut entry.appearance);
		self.rebuild_groups();
		true
	}

	/// Recomputes every group's membership from the entries.
	fn rebuild_groups(&mut self) {
		for group in self.groups.values() {
			self.surface.clear(*group);
		}
		let mut entries: Vec<_> = self.entries.values().map(|e| (e.id.clone(), e.range, e.appearance)).collect();
		entries.sort_by(|a, b| a.0.cmp(&b.0));
		for (id, range, appearance) in entries {
			let group = self.group(appearance);
			self.surface.add(group, range);
			if let Some(entry) = self.entries.get_mut(&id) {
				entry.group = group;
			}
		}
	}
}

#[cfg(test)]
mod tests;
