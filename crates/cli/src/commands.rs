use std::io::Write;

use anyhow::{Context, bail};
use horizon_primitives::{Appearance, HighlightRecord, effective_id};
use horizon_store::HighlightStore;

use crate::cli::{Command, NoteAction};

/// Longest body excerpt printed by `list`, in chars.
const EXCERPT_CHARS: usize = 60;

/// Executes `command` against `store`, writing human output to `out`.
pub async fn execute(store: &HighlightStore, command: Command, out: &mut impl Write) -> anyhow::Result<()> {
	match command {
		Command::List { url } => {
			let mut records = match url {
				Some(url) => store.list_for_url(&url).await,
				None => store.all().await,
			};
			records.sort_by_key(|r| std::cmp::Reverse(r.timestamp));
			let defaults = store.options().fallback_appearance;
			for record in &records {
				writeln!(out, "{}", summary(record, defaults))?;
			}
			tracing::debug!(count = records.len(), "cli.list");
		}
		Command::Show { id } => {
			let record = store.get(&id).await.with_context(|| format!("no highlight {id}"))?;
			writeln!(out, "{}", serde_json::to_string_pretty(&record)?)?;
		}
		Command::Delete { id } => {
			if store.get(&id).await.is_none() {
				bail!("no highlight {id}");
			}
			if !store.delete(&id).await {
				bail!("failed to delete {id}");
			}
			writeln!(out, "deleted {id}")?;
		}
		Command::Note { action } => note(store, action, out).await?,
		Command::Cleanup => {
			if store.cleanup_pending_scrolls().await {
				writeln!(out, "removed stale pending scroll")?;
			} else {
				writeln!(out, "nothing to clean up")?;
			}
		}
		Command::Defaults { theme, style } => {
			if let Some(theme) = theme
				&& !store.set_default_theme(theme).await
			{
				bail!("failed to save default theme");
			}
			if let Some(style) = style
				&& !store.set_default_style(style).await
			{
				bail!("failed to save default style");
			}
			let current = store.default_appearance().await;
			writeln!(out, "theme = {}\nstyle = {}", current.theme, current.style)?;
		}
	}
	Ok(())
}

async fn note(store: &HighlightStore, action: NoteAction, out: &mut impl Write) -> anyhow::Result<()> {
	match action {
		NoteAction::Add { id, text } => {
			let note = store.add_note(&id, &text).await.with_context(|| format!("no highlight {id}"))?;
			writeln!(out, "added {}", note.id)?;
		}
		NoteAction::Edit { id, index, text } => {
			if !store.edit_note(&id, index, &text).await {
				bail!("no note {index} on highlight {id}");
			}
			writeln!(out, "edited note {index} of {id}")?;
		}
		NoteAction::Rm { id, index } => {
			if !store.delete_note(&id, index).await {
				bail!("no note {index} on highlight {id}");
			}
			writeln!(out, "removed note {index} of {id}")?;
		}
	}
	Ok(())
}

/// One `list` line: id, appearance, note count, URL and a body excerpt.
fn summary(record: &HighlightRecord, defaults: Appearance) -> String {
	let text = record
		.body
		.as_deref()
		.or(record.title.as_deref())
		.unwrap_or_default();
	let mut excerpt: String = text.chars().take(EXCERPT_CHARS).collect();
	if text.chars().count() > EXCERPT_CHARS {
		excerpt.push('…');
	}
	format!(
		"{}\t{}\t{}\t{}\t{}",
		effective_id(record),
		record.appearance_or(defaults),
		record.notes.len(),
		record.url,
		excerpt
	)
}
