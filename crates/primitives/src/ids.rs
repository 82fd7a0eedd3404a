use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};

use crate::record::HighlightKind;

/// Counter-based highlight id generator.
///
/// Ids have the form `{prefix}-{epoch_ms}-{counter}`; the counter keeps ids
/// created within the same millisecond distinct.
#[derive(Debug, Default)]
pub struct IdGenerator {
	counter: AtomicU64,
}

impl IdGenerator {
	/// Creates a generator starting at counter 0.
	pub const fn new() -> Self {
		Self { counter: AtomicU64::new(0) }
	}

	/// Generates the next id for a record of `kind` created at `now`.
	pub fn next_at(&self, kind: HighlightKind, now: DateTime<Utc>) -> String {
		let n = self.counter.fetch_add(1, Ordering::Relaxed);
		format!("{}-{}-{}", kind.id_prefix(), now.timestamp_millis(), n)
	}

	/// Generates the next id using the current time.
	pub fn next(&self, kind: HighlightKind) -> String {
		self.next_at(kind, Utc::now())
	}
}

/// Generates a note id of the form `note-{epoch_ms}-{9 random chars}`.
pub fn new_note_id(now: DateTime<Utc>) -> String {
	let random = uuid::Uuid::new_v4().simple().to_string();
	format!("note-{}-{}", now.timestamp_millis(), &random[..9])
}
