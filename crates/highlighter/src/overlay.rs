//! Asynchronous side of decoration: restoration, scrolling and the
//! attention flash.
//!
//! [`Overlay`] wraps the page, the registry and the surface of one content
//! view. Locks are only held across synchronous sections; every wait happens
//! with no lock held.

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use horizon_config::RestoreConfig;
use horizon_dom::{Document, TextRange};
use horizon_primitives::{Appearance, HighlightRecord, HighlightStyle, Theme, effective_id};
use horizon_worker::{TaskClass, spawn};
use parking_lot::Mutex;

use crate::registry::{HighlightRegistry, RestoreReport};
use crate::surface::{ATTENTION_GROUP, DecorationSurface};

/// Page content shared between the host and the highlighter.
pub type Page = Arc<Mutex<Document>>;

/// Pause between the end of scrolling and the attention flash.
const FLASH_DELAY: Duration = Duration::from_millis(100);

/// Timings of an [`Overlay`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverlayTimings {
	/// Upper bound on waiting for a scroll to settle.
	pub scroll_settle: Duration,
	/// How long the attention flash stays visible.
	pub attention: Duration,
}

impl Default for OverlayTimings {
	fn default() -> Self {
		Self::from(&RestoreConfig::default())
	}
}

impl From<&RestoreConfig> for OverlayTimings {
	fn from(config: &RestoreConfig) -> Self {
		Self {
			scroll_settle: config.scroll_settle(),
			attention: config.attention(),
		}
	}
}

/// Clears the restoring flag when a restoration ends, even on cancellation.
struct RestoreGuard<'a>(&'a AtomicBool);

impl Drop for RestoreGuard<'_> {
	fn drop(&mut self) {
		self.0.store(false, Ordering::Release);
	}
}

/// Decoration renderer of one page view.
pub struct Overlay {
	page: Page,
	surface: Arc<dyn DecorationSurface>,
	registry: Mutex<HighlightRegistry>,
	timings: OverlayTimings,
	restoring: AtomicBool,
	flash_generation: Arc<AtomicU64>,
}

impl Overlay {
	pub fn new(page: Page, surface: Arc<dyn DecorationSurface>, timings: OverlayTimings) -> Self {
		let registry = HighlightRegistry::new(Arc::clone(&surface));
		Self {
			page,
			surface,
			registry: Mutex::new(registry),
			timings,
			restoring: AtomicBool::new(false),
			flash_generation: Arc::new(AtomicU64::new(0)),
		}
	}

	pub fn page(&self) -> &Page {
		&self.page
	}

	/// Runs `f` with the registry locked.
	pub fn with_registry<R>(&self, f: impl FnOnce(&HighlightRegistry) -> R) -> R {
		f(&self.registry.lock())
	}

	pub fn is_restoring(&self) -> bool {
		self.restoring.load(Ordering::Acquire)
	}

	/// Decorates `range` as highlight `id`.
	pub fn add(&self, id: &str, range: TextRange, appearance: Appearance) {
		self.registry.lock().add(id, range, appearance);
	}

	pub fn remove(&self, id: &str) -> bool {
		self.registry.lock().remove(id)
	}

	pub fn change_theme(&self, id: &str, theme: Theme) -> bool {
		self.registry.lock().change_theme(id, theme)
	}

	pub fn change_style(&self, id: &str, style: HighlightStyle) -> bool {
		self.registry.lock().change_style(id, style)
	}

	/// Restores every record `records` yields.
	///
	/// Single-flight: returns `None` without doing anything when another
	/// restoration is in progress. The flag covers the whole operation,
	/// including the wait on `records`.
	pub async fn restore_all<F>(&self, records: F, defaults: Appearance) -> Option<RestoreReport>
	where
		F: Future<Output = Vec<HighlightRecord>>,
	{
		if self
			.restoring
			.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
			.is_err()
		{
			tracing::debug!("overlay.restore.suppressed");
			return None;
		}
		let _guard = RestoreGuard(&self.restoring);
		let records = records.await;
		let doc = self.page.lock();
		let report = self.registry.lock().restore_all(&doc, &records, defaults);
		Some(report)
	}

	/// Scrolls to `record` and flashes it.
	///
	/// A record missing from the registry is resolved on demand first.
	/// Returns false when it cannot be anchored.
	pub async fn scroll_to(&self, record: &HighlightRecord, defaults: Appearance) -> bool {
		let id = effective_id(record);
		let Some(range) = self.live_range(&id, record, defaults) else {
			tracing::debug!(id = %id, "overlay.scroll.unresolved");
			return false;
		};

		self.surface.scroll_into_view(&range);
		tokio::time::sleep(self.timings.scroll_settle).await;
		tokio::time::sleep(FLASH_DELAY).await;
		self.flash(range);
		tracing::debug!(id = %id, "overlay.scroll");
		true
	}

	/// Range of `id` in the registry, anchoring `record` when absent or when
	/// the stored range no longer fits the page.
	fn live_range(&self, id: &str, record: &HighlightRecord, defaults: Appearance) -> Option<TextRange> {
		let doc = self.page.lock();
		let mut registry = self.registry.lock();
		if let Some(entry) = registry.get(id)
			&& doc.validate_range(&entry.range).is_ok()
		{
			return Some(entry.range);
		}
		registry.anchor(&doc, record, defaults)?;
		registry.get(id).map(|entry| entry.range)
	}

	/// Shows `range` in the attention group, replacing any previous flash,
	/// and clears it after the attention period unless a newer flash started.
	fn flash(&self, range: TextRange) {
		let group = self.surface.ensure_group(ATTENTION_GROUP);
		self.surface.clear(group);
		self.surface.add(group, range);

		let generation = self.flash_generation.fetch_add(1, Ordering::AcqRel) + 1;
		let current = Arc::clone(&self.flash_generation);
		let surface = Arc::clone(&self.surface);
		let period = self.timings.attention;
		spawn(TaskClass::Interactive, "attention-flash", async move {
			tokio::time::sleep(period).await;
			if current.load(Ordering::Acquire) == generation {
				surface.clear(group);
			}
		});
	}
}
