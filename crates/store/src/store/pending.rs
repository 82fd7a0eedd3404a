use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use horizon_messaging::Message;
use horizon_primitives::{HighlightRecord, effective_id};
use horizon_worker::{CancellationToken, spawn_periodic};
use serde_json::{Map, Value};
use tokio::task::JoinHandle;

use super::HighlightStore;
use crate::error::Result;
use crate::keys::{PENDING_SCROLL_HIGHLIGHT, PENDING_SCROLL_TIMESTAMP};

const PENDING_KEYS: [&str; 2] = [PENDING_SCROLL_HIGHLIGHT, PENDING_SCROLL_TIMESTAMP];

/// Stored navigation intent: scroll to `id` once its page has loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
struct PendingScroll {
	id: Option<String>,
	stamped_ms: Option<i64>,
}

impl PendingScroll {
	fn from_map(map: &Map<String, Value>) -> Self {
		let id = map.get(PENDING_SCROLL_HIGHLIGHT).and_then(Value::as_str).map(str::to_string);
		let stamped_ms = map
			.get(PENDING_SCROLL_TIMESTAMP)
			.and_then(|v| v.as_i64().or_else(|| v.as_f64().map(|f| f as i64)));
		Self { id, stamped_ms }
	}

	fn is_stale(&self, now: DateTime<Utc>, max_age: Duration) -> bool {
		let Some(stamped) = self.stamped_ms else {
			return false;
		};
		let max_age_ms = i64::try_from(max_age.as_millis()).unwrap_or(i64::MAX);
		now.timestamp_millis().saturating_sub(stamped) > max_age_ms
	}
}

impl HighlightStore {
	/// Creates `record` and records a pending scroll to it.
	pub async fn save_with_pending_scroll(&self, record: HighlightRecord) -> Option<HighlightRecord> {
		let saved = self.create(record).await?;
		self.set_pending_scroll(&effective_id(&saved)).await;
		Some(saved)
	}

	/// Records a pending scroll to `id`, stamped with the current time.
	pub async fn set_pending_scroll(&self, id: &str) -> bool {
		let result = self.try_set_pending(id).await;
		match result {
			Ok(()) => {
				tracing::debug!(id, "store.pending.set");
				true
			}
			Err(err) => {
				tracing::warn!(id, error = %err, "store.pending.set_failed");
				false
			}
		}
	}

	async fn try_set_pending(&self, id: &str) -> Result<()> {
		self.storage
			.set(PENDING_SCROLL_HIGHLIGHT, Value::String(id.to_string()))
			.await?;
		self.storage
			.set(PENDING_SCROLL_TIMESTAMP, Value::from(self.now().timestamp_millis()))
			.await
	}

	/// The pending scroll target, unless absent or stale. A stale intent is
	/// cleaned up on the way.
	pub async fn check_pending_scroll(&self) -> Option<String> {
		let pending = match self.storage.get_multiple(&PENDING_KEYS).await {
			Ok(map) => PendingScroll::from_map(&map),
			Err(err) => {
				tracing::warn!(error = %err, "store.pending.read_failed");
				return None;
			}
		};
		let (Some(id), Some(_)) = (&pending.id, pending.stamped_ms) else {
			return None;
		};
		if pending.is_stale(self.now(), self.options.pending_max_age) {
			self.cleanup_pending_scrolls().await;
			return None;
		}
		Some(id.clone())
	}

	/// Like [`check_pending_scroll`](Self::check_pending_scroll), but clears
	/// the intent so it is applied once.
	pub async fn take_pending_scroll(&self) -> Option<String> {
		let id = self.check_pending_scroll().await?;
		if let Err(err) = self.storage.remove_multiple(&PENDING_KEYS).await {
			tracing::warn!(error = %err, "store.pending.clear_failed");
		}
		Some(id)
	}

	/// Removes a pending scroll older than the configured maximum age.
	pub async fn cleanup_pending_scrolls(&self) -> bool {
		self.cleanup_pending_scrolls_at(self.now()).await
	}

	/// Sweep evaluated at `now`. Returns `true` when an intent was removed,
	/// in which case `pendingScrollsCleanup` is broadcast.
	pub async fn cleanup_pending_scrolls_at(&self, now: DateTime<Utc>) -> bool {
		match self.try_cleanup(now).await {
			Ok(removed) => removed,
			Err(err) => {
				tracing::warn!(error = %err, "store.pending.cleanup_failed");
				false
			}
		}
	}

	async fn try_cleanup(&self, now: DateTime<Utc>) -> Result<bool> {
		let pending = PendingScroll::from_map(&self.storage.get_multiple(&PENDING_KEYS).await?);
		if !pending.is_stale(now, self.options.pending_max_age) {
			return Ok(false);
		}
		self.storage.remove_multiple(&PENDING_KEYS).await?;
		tracing::info!(id = ?pending.id, "store.pending.cleaned");
		self.messenger
			.broadcast(Message::PendingScrollsCleanup {
				timestamp: now.timestamp_millis(),
			})
			.await;
		Ok(true)
	}

	/// Sweeps once now, then every `period` until `cancel` fires.
	pub async fn start_pending_sweep(self: &Arc<Self>, period: Duration, cancel: CancellationToken) -> JoinHandle<()> {
		self.cleanup_pending_scrolls().await;
		let store = Arc::clone(self);
		spawn_periodic("pending-scroll-sweep", period, cancel, move || {
			let store = Arc::clone(&store);
			async move {
				store.cleanup_pending_scrolls().await;
			}
		})
	}
}
