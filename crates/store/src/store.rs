//! Durable highlight collection.
//!
//! All records live under the `highlights` key as one JSON array. Every
//! mutation is a read-modify-write of that array followed by a
//! `highlightsUpdated` broadcast. Within one [`HighlightStore`] the
//! read-modify-write windows are serialized, so cooperative tasks of one
//! context never lose each other's updates. Across contexts sharing the same
//! storage there is no isolation: the last write of the whole array wins.
//!
//! Public operations never return errors. Storage failures are logged and
//! surface as `false`, `None` or an empty list.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use horizon_messaging::{Message, Messenger};
use horizon_primitives::{Appearance, HighlightKind, HighlightRecord, HighlightStyle, IdGenerator, Theme, effective_id};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tokio::sync::Mutex;

use crate::error::{Result, StorageError};
use crate::keys;
use crate::patch::HighlightPatch;
use crate::storage::StorageAdapter;

mod notes;
mod pending;
mod video;

/// Source of the current time.
pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// Tunables of a [`HighlightStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreOptions {
	/// Pending scroll intents older than this are discarded.
	pub pending_max_age: Duration,
	/// Appearance used when no default theme or style is persisted.
	pub fallback_appearance: Appearance,
}

impl Default for StoreOptions {
	fn default() -> Self {
		Self {
			pending_max_age: Duration::from_secs(15 * 60),
			fallback_appearance: Appearance::default(),
		}
	}
}

/// One element of the stored array. Elements that do not parse as a record
/// are carried through writes untouched.
#[derive(Debug, Clone)]
enum Entry {
	Record(Box<HighlightRecord>),
	Opaque(Value),
}

/// The stored array, decoded.
#[derive(Debug, Default)]
pub(crate) struct Collection {
	entries: Vec<Entry>,
}

impl Collection {
	fn decode(value: Option<Value>) -> Self {
		let items = match value {
			None | Some(Value::Null) => Vec::new(),
			Some(Value::Array(items)) => items,
			Some(other) => {
				tracing::warn!(kind = json_kind(&other), "store.highlights.not_an_array");
				Vec::new()
			}
		};
		let entries = items
			.into_iter()
			.map(|item| match serde_json::from_value::<HighlightRecord>(item.clone()) {
				Ok(record) => Entry::Record(Box::new(record)),
				Err(err) => {
					tracing::debug!(error = %err, "store.entry.opaque");
					Entry::Opaque(item)
				}
			})
			.collect();
		Self { entries }
	}

	fn encode(&self) -> Result<Value> {
		let items = self
			.entries
			.iter()
			.map(|entry| match entry {
				Entry::Record(record) => serde_json::to_value(record).map_err(|source| StorageError::Encode {
					key: effective_id(record),
					source,
				}),
				Entry::Opaque(value) => Ok(value.clone()),
			})
			.collect::<Result<Vec<_>>>()?;
		Ok(Value::Array(items))
	}

	pub(crate) fn records(&self) -> impl Iterator<Item = &HighlightRecord> {
		self.entries.iter().filter_map(|entry| match entry {
			Entry::Record(record) => Some(record.as_ref()),
			Entry::Opaque(_) => None,
		})
	}

	pub(crate) fn find_mut(&mut self, id: &str) -> Option<&mut HighlightRecord> {
		self.entries.iter_mut().find_map(|entry| match entry {
			Entry::Record(record) if effective_id(record) == id => Some(record.as_mut()),
			_ => None,
		})
	}

	pub(crate) fn push(&mut self, record: HighlightRecord) {
		self.entries.push(Entry::Record(Box::new(record)));
	}

	/// Removes every record whose effective id is `id`.
	fn remove(&mut self, id: &str) -> usize {
		let before = self.entries.len();
		self.entries
			.retain(|entry| !matches!(entry, Entry::Record(record) if effective_id(record) == id));
		before - self.entries.len()
	}

	fn snapshot(&self) -> Vec<HighlightRecord> {
		self.records().cloned().collect()
	}
}

/// Reads a stored setting, ignoring values of the wrong shape.
fn setting<T: DeserializeOwned>(settings: &Map<String, Value>, key: &str) -> Option<T> {
	settings.get(key).cloned().and_then(|v| serde_json::from_value(v).ok())
}

fn json_kind(value: &Value) -> &'static str {
	match value {
		Value::Null => "null",
		Value::Bool(_) => "bool",
		Value::Number(_) => "number",
		Value::String(_) => "string",
		Value::Array(_) => "array",
		Value::Object(_) => "object",
	}
}

/// Durable CRUD over highlight records with change broadcasts.
pub struct HighlightStore {
	storage: Arc<dyn StorageAdapter>,
	messenger: Arc<dyn Messenger>,
	ids: IdGenerator,
	clock: Clock,
	options: StoreOptions,
	gate: Mutex<()>,
}

impl HighlightStore {
	pub fn new(storage: Arc<dyn StorageAdapter>, messenger: Arc<dyn Messenger>) -> Self {
		Self {
			storage,
			messenger,
			ids: IdGenerator::new(),
			clock: Arc::new(Utc::now),
			options: StoreOptions::default(),
			gate: Mutex::new(()),
		}
	}

	pub fn with_options(mut self, options: StoreOptions) -> Self {
		self.options = options;
		self
	}

	/// Replaces the time source, for deterministic stamps.
	pub fn with_clock(mut self, clock: Clock) -> Self {
		self.clock = clock;
		self
	}

	pub fn storage(&self) -> &Arc<dyn StorageAdapter> {
		&self.storage
	}

	pub fn options(&self) -> StoreOptions {
		self.options
	}

	/// Current time of the store clock.
	pub fn now(&self) -> DateTime<Utc> {
		(self.clock)()
	}

	/// Generates an id for a new record of `kind`.
	pub fn generate_id(&self, kind: HighlightKind) -> String {
		self.ids.next_at(kind, self.now())
	}

	async fn load(&self) -> Result<Collection> {
		Ok(Collection::decode(self.storage.get(keys::HIGHLIGHTS).await?))
	}

	async fn persist(&self, collection: &Collection) -> Result<()> {
		self.storage.set(keys::HIGHLIGHTS, collection.encode()?).await
	}

	/// Runs one read-modify-write cycle. `edit` returns `None` to abort
	/// without writing. On success the new collection is broadcast.
	pub(crate) async fn mutate<R>(&self, op: &'static str, edit: impl FnOnce(&mut Collection, DateTime<Utc>) -> Option<R>) -> Result<Option<R>> {
		let (out, snapshot) = {
			let _gate = self.gate.lock().await;
			let mut collection = self.load().await?;
			let Some(out) = edit(&mut collection, self.now()) else {
				tracing::debug!(op, "store.mutate.skipped");
				return Ok(None);
			};
			self.persist(&collection).await?;
			(out, collection.snapshot())
		};
		tracing::debug!(op, count = snapshot.len(), "store.mutate");
		self.broadcast_update(snapshot).await;
		Ok(Some(out))
	}

	async fn broadcast_update(&self, highlights: Vec<HighlightRecord>) {
		self.messenger.broadcast(Message::HighlightsUpdated { highlights }).await;
	}

	/// Appearance applied to records created without one: the persisted
	/// defaults, falling back to [`StoreOptions::fallback_appearance`].
	pub async fn default_appearance(&self) -> Appearance {
		match self.try_default_appearance().await {
			Ok(appearance) => appearance,
			Err(err) => {
				tracing::warn!(error = %err, "store.defaults.read_failed");
				self.options.fallback_appearance
			}
		}
	}

	async fn try_default_appearance(&self) -> Result<Appearance> {
		let settings = self.storage.get_multiple(&[keys::DEFAULT_THEME, keys::DEFAULT_STYLE]).await?;
		let fallback = self.options.fallback_appearance;
		Ok(Appearance {
			theme: setting(&settings, keys::DEFAULT_THEME).unwrap_or(fallback.theme),
			style: setting(&settings, keys::DEFAULT_STYLE).unwrap_or(fallback.style),
		})
	}

	/// Persists the theme applied to new highlights.
	pub async fn set_default_theme(&self, theme: Theme) -> bool {
		self.set_setting(keys::DEFAULT_THEME, theme.as_str()).await
	}

	/// Persists the style applied to new highlights.
	pub async fn set_default_style(&self, style: HighlightStyle) -> bool {
		self.set_setting(keys::DEFAULT_STYLE, style.as_str()).await
	}

	async fn set_setting(&self, key: &str, value: &str) -> bool {
		match self.storage.set(key, Value::String(value.to_string())).await {
			Ok(()) => true,
			Err(err) => {
				tracing::warn!(key, error = %err, "store.settings.write_failed");
				false
			}
		}
	}

	/// Appends a record. Unset theme and style are taken from the persisted
	/// defaults. Broadcasts `highlightsUpdated`, then asks for the side panel.
	pub async fn create(&self, record: HighlightRecord) -> Option<HighlightRecord> {
		match self.try_create(record).await {
			Ok(record) => {
				self.messenger.broadcast(Message::OpenSidebar).await;
				Some(record)
			}
			Err(err) => {
				tracing::warn!(error = %err, "store.create.failed");
				None
			}
		}
	}

	async fn try_create(&self, mut record: HighlightRecord) -> Result<HighlightRecord> {
		if record.theme.is_none() || record.style.is_none() {
			let defaults = self.try_default_appearance().await?;
			let appearance = record.appearance_or(defaults);
			record.theme = Some(appearance.theme);
			record.style = Some(appearance.style);
		}
		let stored = record.clone();
		self.mutate("create", |collection, _| {
			collection.push(stored);
			Some(())
		})
		.await?;
		tracing::info!(id = %effective_id(&record), "store.create");
		Ok(record)
	}

	/// Merges `patch` into the record with effective id `id` and stamps
	/// `updated_at`. Returns `false` when no such record exists.
	pub async fn update(&self, id: &str, patch: HighlightPatch) -> bool {
		let result = self
			.mutate("update", |collection, now| {
				let record = collection.find_mut(id)?;
				patch.apply(record);
				record.updated_at = Some(now);
				Some(())
			})
			.await;
		self.report("update", id, result)
	}

	/// Removes the record with effective id `id`. Returns `true` when a
	/// record was removed. An unknown id rewrites the unchanged collection
	/// and broadcasts nothing.
	pub async fn delete(&self, id: &str) -> bool {
		match self.try_delete(id).await {
			Ok(removed) => removed,
			Err(err) => {
				tracing::warn!(id, error = %err, "store.delete.failed");
				false
			}
		}
	}

	async fn try_delete(&self, id: &str) -> Result<bool> {
		let snapshot = {
			let _gate = self.gate.lock().await;
			let mut collection = self.load().await?;
			let removed = collection.remove(id);
			self.persist(&collection).await?;
			if removed == 0 {
				tracing::debug!(id, "store.delete.unknown");
				return Ok(false);
			}
			collection.snapshot()
		};
		tracing::info!(id, "store.delete");
		self.broadcast_update(snapshot).await;
		Ok(true)
	}

	/// Records whose `url` equals `url` exactly.
	pub async fn list_for_url(&self, url: &str) -> Vec<HighlightRecord> {
		self.filtered("list_for_url", |record| record.url == url).await
	}

	/// The record with effective id `id`.
	pub async fn get(&self, id: &str) -> Option<HighlightRecord> {
		self.filtered("get", |record| effective_id(record) == id).await.into_iter().next()
	}

	/// Every parseable record, in storage order.
	pub async fn all(&self) -> Vec<HighlightRecord> {
		self.filtered("all", |_| true).await
	}

	pub(crate) async fn filtered(&self, op: &'static str, keep: impl Fn(&HighlightRecord) -> bool) -> Vec<HighlightRecord> {
		match self.load().await {
			Ok(collection) => collection.records().filter(|r| keep(r)).cloned().collect(),
			Err(err) => {
				tracing::warn!(op, error = %err, "store.read_failed");
				Vec::new()
			}
		}
	}

	pub(crate) fn report(&self, op: &'static str, id: &str, result: Result<Option<()>>) -> bool {
		match result {
			Ok(Some(())) => true,
			Ok(None) => {
				tracing::debug!(op, id, "store.not_found");
				false
			}
			Err(err) => {
				tracing::warn!(op, id, error = %err, "store.write_failed");
				false
			}
		}
	}
}
