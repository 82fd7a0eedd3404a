//! Highlighter context of one page view.

use std::sync::Arc;

use async_trait::async_trait;
use horizon_anchor::{find_by_text, normalize_text, serialize};
use horizon_config::RestoreConfig;
use horizon_dom::TextRange;
use horizon_messaging::{ActionResponse, Message, MessageHandler, Reply};
use horizon_primitives::{Appearance, HighlightKind, HighlightRecord, effective_id};
use horizon_store::HighlightStore;
use horizon_worker::CancellationToken;
use parking_lot::Mutex;

use crate::error::{HighlighterError, Result};
use crate::overlay::{Overlay, OverlayTimings, Page};
use crate::registry::RestoreReport;
use crate::surface::DecorationSurface;
use crate::theme::ThemeContext;
use crate::watcher::{BatchClass, PageWatcher};

/// Wires a page, its decorations and the shared store together.
///
/// Created with [`ContentContext::new`], then [`start`](Self::start)ed. The
/// host feeds page changes through [`notify_mutations`](Self::notify_mutations)
/// and routes tab messages to the [`MessageHandler`] impl.
pub struct ContentContext {
	url: String,
	overlay: Overlay,
	store: Arc<HighlightStore>,
	theme: Arc<ThemeContext>,
	config: RestoreConfig,
	watcher: Mutex<Option<PageWatcher>>,
	cancel: CancellationToken,
}

impl ContentContext {
	/// Fails with [`HighlighterError::CapabilityUnavailable`] when `surface`
	/// cannot draw decorations. Nothing is set up in that case.
	pub fn new(
		url: impl Into<String>,
		page: Page,
		surface: Arc<dyn DecorationSurface>,
		store: Arc<HighlightStore>,
		theme: Arc<ThemeContext>,
		config: RestoreConfig,
	) -> Result<Arc<Self>> {
		if !surface.is_supported() {
			tracing::warn!("content.capability_unavailable");
			return Err(HighlighterError::CapabilityUnavailable);
		}
		Ok(Arc::new(Self {
			url: url.into(),
			overlay: Overlay::new(page, surface, OverlayTimings::from(&config)),
			store,
			theme,
			config,
			watcher: Mutex::new(None),
			cancel: CancellationToken::new(),
		}))
	}

	pub fn url(&self) -> &str {
		&self.url
	}

	pub fn overlay(&self) -> &Overlay {
		&self.overlay
	}

	/// Starts observing the page, restores this URL's highlights and applies
	/// a pending scroll intent left by the side panel.
	pub async fn start(self: &Arc<Self>) -> Option<RestoreReport> {
		self.overlay.page().lock().observe();

		let weak = Arc::downgrade(self);
		let watcher = PageWatcher::spawn(self.config.debounce(), self.cancel.child_token(), move || {
			let weak = weak.clone();
			async move {
				if let Some(ctx) = weak.upgrade() {
					ctx.restore().await;
				}
			}
		});
		*self.watcher.lock() = Some(watcher);

		let report = self.restore().await;
		self.apply_pending_scroll().await;
		report
	}

	/// Re-anchors every highlight of this URL. `None` when a restoration is
	/// already running.
	pub async fn restore(&self) -> Option<RestoreReport> {
		let report = self
			.overlay
			.restore_all(self.store.list_for_url(&self.url), self.stored_fallback())
			.await?;
		for id in &report.skipped {
			tracing::debug!(id = %id, url = %self.url, "content.restore.unresolved");
		}
		Some(report)
	}

	/// Appearance for stored records missing a theme or style. The user's
	/// defaults only apply when a highlight is created.
	fn stored_fallback(&self) -> Appearance {
		self.store.options().fallback_appearance
	}

	async fn apply_pending_scroll(&self) {
		let Some(id) = self.store.take_pending_scroll().await else {
			return;
		};
		let Some(record) = self.store.get(&id).await else {
			tracing::debug!(id = %id, "content.pending_scroll.missing");
			return;
		};
		if !self.overlay.scroll_to(&record, self.stored_fallback()).await {
			tracing::debug!(id = %id, "content.pending_scroll.failed");
		}
	}

	/// Drains the page's mutation records and schedules a restoration when
	/// they add page content.
	pub fn notify_mutations(&self) -> BatchClass {
		let mut doc = self.overlay.page().lock();
		let batch = doc.take_mutations();
		match self.watcher.lock().as_ref() {
			Some(watcher) => watcher.notify(&doc, &batch),
			None => BatchClass::Irrelevant,
		}
	}

	/// Highlights the current selection, or the first occurrence of `text`
	/// when nothing is selected.
	pub async fn highlight_selection(&self, text: Option<&str>) -> Option<HighlightRecord> {
		let (range, record) = self.capture(text)?;
		let id = effective_id(&record);
		self.overlay.add(&id, range, self.theme.appearance());

		let Some(stored) = self.store.create(record).await else {
			self.overlay.remove(&id);
			return None;
		};
		tracing::debug!(id = %id, "content.highlight");
		Some(stored)
	}

	/// Builds the record for the selection without touching the store.
	fn capture(&self, text: Option<&str>) -> Option<(TextRange, HighlightRecord)> {
		let mut doc = self.overlay.page().lock();
		let range = match doc.selection().filter(|range| !range.is_collapsed()) {
			Some(range) => range,
			None => find_by_text(&doc, text?)?,
		};
		let body = normalize_text(&doc.range_text(&range).ok()?);
		if body.is_empty() {
			return None;
		}

		let appearance = self.theme.appearance();
		let mut record = HighlightRecord::text(
			self.store.generate_id(HighlightKind::Text),
			self.url.as_str(),
			body,
			self.store.now(),
		)
		.with_descriptor(&serialize(&doc, &range));
		record.title = Some(doc.title().to_string());
		record.theme = Some(appearance.theme);
		record.style = Some(appearance.style);

		if let Err(err) = doc.set_selection(None) {
			tracing::debug!(error = %err, "content.selection.clear_failed");
		}
		Some((range, record))
	}

	/// Stops the watcher. The decorations stay in place.
	pub async fn shutdown(&self) {
		self.cancel.cancel();
		let watcher = self.watcher.lock().take();
		if let Some(watcher) = watcher {
			watcher.shutdown().await;
		}
	}
}

#[async_trait]
impl MessageHandler for ContentContext {
	async fn handle(&self, message: Message) -> Reply {
		let action = message.action();
		tracing::trace!(action, url = %self.url, "content.message");
		match message {
			Message::Ping => Reply::alive(),
			Message::UpdateHighlightTheme { highlight_id, theme } => {
				let changed = self.overlay.change_theme(&highlight_id, theme);
				ActionResponse::from_outcome(changed, "Highlight not found").into()
			}
			Message::UpdateHighlightStyle { highlight_id, style, .. } => {
				let changed = self.overlay.change_style(&highlight_id, style);
				ActionResponse::from_outcome(changed, "Highlight not found").into()
			}
			Message::AddHorizonHighlight { text } => {
				let created = self.highlight_selection(text.as_deref()).await.is_some();
				ActionResponse::from_outcome(created, "No text selected").into()
			}
			Message::ScrollToHighlightGroup { highlight_group } => {
				let scrolled = self.overlay.scroll_to(&highlight_group, self.stored_fallback()).await;
				ActionResponse::from_outcome(scrolled, "Failed to scroll to highlight").into()
			}
			Message::HighlightsUpdated { .. } | Message::OpenSidebar | Message::PendingScrollsCleanup { .. } => {
				ActionResponse::failed(format!("Unknown action: {action}")).into()
			}
		}
	}
}
