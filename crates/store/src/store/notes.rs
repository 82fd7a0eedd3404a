use horizon_primitives::{Note, new_note_id};

use super::HighlightStore;

impl HighlightStore {
	/// Appends a note to the highlight `id`. Notes are addressed by their
	/// position afterwards.
	pub async fn add_note(&self, id: &str, text: &str) -> Option<Note> {
		let result = self
			.mutate("add_note", |collection, now| {
				let record = collection.find_mut(id)?;
				let note = Note {
					id: new_note_id(now),
					text: text.to_string(),
					created_at: now,
					updated_at: None,
				};
				record.notes.push(note.clone());
				record.updated_at = Some(now);
				Some(note)
			})
			.await;
		match result {
			Ok(note) => note,
			Err(err) => {
				tracing::warn!(id, error = %err, "store.add_note.failed");
				None
			}
		}
	}

	/// Replaces the text of the note at `index` and stamps its `updatedAt`.
	pub async fn edit_note(&self, id: &str, index: usize, text: &str) -> bool {
		let result = self
			.mutate("edit_note", |collection, now| {
				let record = collection.find_mut(id)?;
				let note = record.notes.get_mut(index)?;
				note.text = text.to_string();
				note.updated_at = Some(now);
				record.updated_at = Some(now);
				Some(())
			})
			.await;
		self.report("edit_note", id, result)
	}

	/// Removes the note at `index`; later notes shift down by one.
	pub async fn delete_note(&self, id: &str, index: usize) -> bool {
		let result = self
			.mutate("delete_note", |collection, now| {
				let record = collection.find_mut(id)?;
				if index >= record.notes.len() {
					return None;
				}
				record.notes.remove(index);
				record.updated_at = Some(now);
				Some(())
			})
			.await;
		self.report("delete_note", id, result)
	}
}
