//! Decoration surface: the page's named text-decoration groups.
//!
//! A group is a named set of ranges drawn with one visual style. Highlights
//! sharing an [`Appearance`] share the group [`group_name`] returns; the
//! scroll-to flash uses [`ATTENTION_GROUP`].

use horizon_dom::TextRange;
use horizon_primitives::Appearance;
use parking_lot::Mutex;
use rustc_hash::FxHashMap;

/// Group briefly flashed on the highlight scrolled to.
pub const ATTENTION_GROUP: &str = "horizon-attention";

/// Prefix of every group the highlighter owns.
pub const GROUP_PREFIX: &str = "horizon-";

/// Name of the group decorating ranges with `appearance`:
/// `horizon-{theme}-{style}`.
pub fn group_name(appearance: Appearance) -> String {
	format!("{GROUP_PREFIX}{appearance}")
}

/// Handle of a group returned by [`DecorationSurface::ensure_group`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupId(pub u32);

/// Host capability that draws text decorations.
///
/// Implementations use interior mutability; a surface is shared between the
/// registry and the overlay of one page view.
pub trait DecorationSurface: Send + Sync {
	/// False when the host cannot draw decorations at all.
	fn is_supported(&self) -> bool {
		true
	}

	/// Returns the group called `name`, creating it empty if needed.
	fn ensure_group(&self, name: &str) -> GroupId;

	/// Adds `range` to `group`.
	fn add(&self, group: GroupId, range: TextRange);

	/// Removes one occurrence of `range` from `group`.
	fn remove(&self, group: GroupId, range: &TextRange) -> bool;

	/// Removes every range from `group`.
	fn clear(&self, group: GroupId);

	/// Starts scrolling `range` into view.
	fn scroll_into_view(&self, range: &TextRange);
}

#[derive(Debug, Default)]
struct MemoryState {
	names: FxHashMap<String, GroupId>,
	groups: Vec<Vec<TextRange>>,
	scrolls: Vec<TextRange>,
}

/// In-memory surface for tests and headless use.
#[derive(Debug)]
pub struct MemorySurface {
	supported: bool,
	state: Mutex<MemoryState>,
}

impl Default for MemorySurface {
	fn default() -> Self {
		Self::new()
	}
}

impl MemorySurface {
	pub fn new() -> Self {
		Self {
			supported: true,
			state: Mutex::default(),
		}
	}

	/// A surface that reports no decoration support.
	pub fn unsupported() -> Self {
		Self {
			supported: false,
			state: Mutex::default(),
		}
	}

	/// Ranges currently in the group called `name`, in insertion order.
	pub fn ranges(&self, name: &str) -> Vec<TextRange> {
		let state = self.state.lock();
		state
			.names
			.get(name)
			.map(|id| state.groups[id.0 as usize].clone())
			.unwrap_or_default()
	}

	/// Names of groups holding at least one range.
	pub fn active_groups(&self) -> Vec<String> {
		let state = self.state.lock();
		let mut names: Vec<_> = state
			.names
			.iter()
			.filter(|(_, id)| !state.groups[id.0 as usize].is_empty())
			.map(|(name, _)| name.clone())
			.collect();
		names.sort();
		names
	}

	/// Every range passed to [`DecorationSurface::scroll_into_view`].
	pub fn scrolls(&self) -> Vec<TextRange> {
		self.state.lock().scrolls.clone()
	}
}

impl DecorationSurface for MemorySurface {
	fn is_supported(&self) -> bool {
		self.supported
	}

	fn ensure_group(&self, name: &str) -> GroupId {
		let mut state = self.state.lock();
		if let Some(&id) = state.names.get(name) {
			return id;
		}
		let id = GroupId(state.groups.len() as u32);
		state.groups.push(Vec::new());
		state.names.insert(name.to_string(), id);
		id
	}

	fn add(&self, group: GroupId, range: TextRange) {
		if let Some(ranges) = self.state.lock().groups.get_mut(group.0 as usize) {
			ranges.push(range);
		}
	}

	fn remove(&self, group: GroupId, range: &TextRange) -> bool {
		let mut state = self.state.lock();
		let Some(ranges) = state.groups.get_mut(group.0 as usize) else {
			return false;
		};
		match ranges.iter().position(|r| r == range) {
			Some(pos) => {
				ranges.remove(pos);
				true
			}
			None => false,
		}
	}

	fn clear(&self, group: GroupId) {
		if let Some(ranges) = self.state.lock().groups.get_mut(group.0 as usize) {
			ranges.clear();
		}
	}

	fn scroll_into_view(&self, range: &TextRange) {
		self.state.lock().scrolls.push(*range);
	}
}
