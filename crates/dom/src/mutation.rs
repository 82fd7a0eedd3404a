use smallvec::SmallVec;

use crate::node::NodeId;

/// What changed in a [`MutationRecord`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationKind {
	/// Children were added to or removed from the target.
	ChildList {
		added: SmallVec<[NodeId; 2]>,
		removed: SmallVec<[NodeId; 2]>,
	},
	/// An attribute of the target element changed.
	Attributes { name: String },
	/// The target text node's data changed.
	CharacterData,
}

/// One observed change inside `<body>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationRecord {
	pub target: NodeId,
	pub kind: MutationKind,
}

impl MutationRecord {
	pub(crate) fn added(target: NodeId, child: NodeId) -> Self {
		let mut added = SmallVec::new();
		added.push(child);
		Self {
			target,
			kind: MutationKind::ChildList {
				added,
				removed: SmallVec::new(),
			},
		}
	}

	pub(crate) fn removed(target: NodeId, child: NodeId) -> Self {
		let mut removed = SmallVec::new();
		removed.push(child);
		Self {
			target,
			kind: MutationKind::ChildList {
				added: SmallVec::new(),
				removed,
			},
		}
	}

	/// Nodes added by this record; empty for non child-list records.
	pub fn added_nodes(&self) -> &[NodeId] {
		match &self.kind {
			MutationKind::ChildList { added, .. } => added,
			_ => &[],
		}
	}
}
