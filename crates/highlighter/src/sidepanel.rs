//! Side panel model: the highlight list, its filters and the actions the
//! panel sends to tabs.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use chrono::{DateTime, Duration, Local, TimeZone, Utc};
use horizon_messaging::{Message, Messenger, TabId};
use horizon_primitives::{HighlightRecord, HighlightStyle, Note, Theme, UnknownVariant, effective_id};
use horizon_store::{HighlightPatch, HighlightStore};
use horizon_worker::{CancellationToken, TaskClass, spawn};
use parking_lot::RwLock;
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;

/// Which highlights the list shows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Scope {
	/// Highlights of the current URL.
	#[default]
	Page,
	All,
}

/// Time window or note filter of the list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TimeFilter {
	#[default]
	AllTime,
	/// Since local midnight.
	Today,
	LastWeek,
	LastMonth,
	WithNotes,
	NoNotes,
}

impl TimeFilter {
	pub const ALL: [TimeFilter; 6] = [
		Self::AllTime,
		Self::Today,
		Self::LastWeek,
		Self::LastMonth,
		Self::WithNotes,
		Self::NoNotes,
	];

	pub const fn as_str(self) -> &'static str {
		match self {
			Self::AllTime => "all-time",
			Self::Today => "today",
			Self::LastWeek => "last-week",
			Self::LastMonth => "last-month",
			Self::WithNotes => "with-notes",
			Self::NoNotes => "no-notes",
		}
	}

	/// Returns true when `record` passes this filter at `now`.
	pub fn matches<Tz: TimeZone>(self, record: &HighlightRecord, now: &DateTime<Tz>) -> bool {
		let since = match self {
			Self::AllTime => return true,
			Self::WithNotes => return !record.notes.is_empty(),
			Self::NoNotes => return record.notes.is_empty(),
			Self::Today => now
				.date_naive()
				.and_hms_opt(0, 0, 0)
				.and_then(|midnight| now.timezone().from_local_datetime(&midnight).earliest())
				.map(|midnight| midnight.with_timezone(&Utc)),
			Self::LastWeek => Some(now.with_timezone(&Utc) - Duration::days(7)),
			Self::LastMonth => Some(now.with_timezone(&Utc) - Duration::days(30)),
		};
		match (since, created_ms(record)) {
			(Some(since), Some(created)) => created >= since.timestamp_millis(),
			_ => false,
		}
	}
}

impl fmt::Display for TimeFilter {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for TimeFilter {
	type Err = UnknownVariant;

	/// Accepts kebab-case (`last-week`) and camelCase (`lastWeek`) names.
	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let folded: String = s.chars().filter(|c| *c != '-').collect::<String>().to_ascii_lowercase();
		Self::ALL
			.into_iter()
			.find(|filter| filter.as_str().replace('-', "") == folded)
			.ok_or_else(|| UnknownVariant(s.to_string()))
	}
}

/// Creation time of `record` in epoch milliseconds.
fn created_ms(record: &HighlightRecord) -> Option<i64> {
	record
		.timestamp
		.or_else(|| record.created_at.map(|at| at.timestamp_millis()))
}

fn matches_query(record: &HighlightRecord, query: &str) -> bool {
	if query.is_empty() {
		return true;
	}
	let contains = |text: &str| text.to_lowercase().contains(query);
	record.body.as_deref().is_some_and(contains) || record.notes.iter().any(|note: &Note| contains(&note.text))
}

/// Highlight counts shown on the panel tabs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Counts {
	pub page: usize,
	pub all: usize,
}

/// Tab the panel is attached to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveTab {
	pub id: TabId,
	pub url: String,
}

/// Result of [`SidePanel::open_highlight`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScrollOutcome {
	/// The tab scrolled to the highlight.
	Scrolled,
	/// The tab is on the right page but could not anchor the highlight.
	Failed,
	/// A pending scroll intent was saved; the host should load `url` in the
	/// tab, whose content context applies the intent at start-up.
	NavigationRequired { url: String },
	/// No highlight with that id.
	NotFound,
}

#[derive(Default)]
struct PanelState {
	url: String,
	scope: Scope,
	query: String,
	filter: TimeFilter,
	highlights: Vec<HighlightRecord>,
}

/// List model and actions of the side panel.
pub struct SidePanel {
	store: Arc<HighlightStore>,
	messenger: Arc<dyn Messenger>,
	state: RwLock<PanelState>,
}

impl SidePanel {
	pub fn new(store: Arc<HighlightStore>, messenger: Arc<dyn Messenger>) -> Arc<Self> {
		Arc::new(Self {
			store,
			messenger,
			state: RwLock::new(PanelState::default()),
		})
	}

	/// Reloads the full collection from the store.
	pub async fn refresh(&self) {
		let highlights = self.store.all().await;
		self.state.write().highlights = highlights;
	}

	/// Follows `highlightsUpdated` broadcasts until `cancel` fires or the
	/// channel closes. A lagging receiver falls back to a full refresh.
	pub fn listen(self: &Arc<Self>, mut events: broadcast::Receiver<Message>, cancel: CancellationToken) -> JoinHandle<()> {
		let panel = Arc::clone(self);
		spawn(TaskClass::Interactive, "sidepanel-listen", async move {
			loop {
				let event = tokio::select! {
					_ = cancel.cancelled() => break,
					event = events.recv() => event,
				};
				match event {
					Ok(Message::HighlightsUpdated { highlights }) => {
						tracing::trace!(count = highlights.len(), "sidepanel.updated");
						panel.state.write().highlights = highlights;
					}
					Ok(_) => {}
					Err(RecvError::Lagged(skipped)) => {
						tracing::debug!(skipped, "sidepanel.lagged");
						panel.refresh().await;
					}
					Err(RecvError::Closed) => break,
				}
			}
			tracing::debug!("sidepanel.listen.stopped");
		})
	}

	pub fn set_url(&self, url: impl Into<String>) {
		self.state.write().url = url.into();
	}

	pub fn set_scope(&self, scope: Scope) {
		self.state.write().scope = scope;
	}

	/// Case-insensitive search over highlight text and notes.
	pub fn set_query(&self, query: &str) {
		self.state.write().query = query.trim().to_lowercase();
	}

	pub fn set_filter(&self, filter: TimeFilter) {
		self.state.write().filter = filter;
	}

	pub fn counts(&self) -> Counts {
		let state = self.state.read();
		Counts {
			page: state.highlights.iter().filter(|r| r.url == state.url).count(),
			all: state.highlights.len(),
		}
	}

	/// Records the list shows at `now`, newest first.
	pub fn visible_at<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> Vec<HighlightRecord> {
		let state = self.state.read();
		let mut visible: Vec<_> = state
			.highlights
			.iter()
			.filter(|r| state.scope == Scope::All || r.url == state.url)
			.filter(|r| state.filter.matches(r, now))
			.filter(|r| matches_query(r, &state.query))
			.cloned()
			.collect();
		visible.sort_by(|a, b| created_ms(b).cmp(&created_ms(a)));
		visible
	}

	pub fn visible(&self) -> Vec<HighlightRecord> {
		self.visible_at(&Local::now())
	}

	fn cached(&self, id: &str) -> Option<HighlightRecord> {
		self.state
			.read()
			.highlights
			.iter()
			.find(|r| effective_id(r) == id)
			.cloned()
	}

	pub async fn rename(&self, id: &str, title: &str) -> bool {
		self.store.update(id, HighlightPatch::title(title)).await
	}

	pub async fn delete(&self, id: &str) -> bool {
		self.store.delete(id).await
	}

	pub async fn add_note(&self, id: &str, text: &str) -> Option<Note> {
		self.store.add_note(id, text).await
	}

	pub async fn edit_note(&self, id: &str, index: usize, text: &str) -> bool {
		self.store.edit_note(id, index, text).await
	}

	pub async fn delete_note(&self, id: &str, index: usize) -> bool {
		self.store.delete_note(id, index).await
	}

	/// Changes a highlight's theme and tells `tab` to redraw it.
	pub async fn set_theme(&self, tab: Option<TabId>, id: &str, theme: Theme) -> bool {
		if !self.store.update(id, HighlightPatch::theme(theme)).await {
			return false;
		}
		if let Some(tab) = tab {
			self.notify_tab(
				tab,
				Message::UpdateHighlightTheme {
					highlight_id: id.to_string(),
					theme,
				},
			)
			.await;
		}
		true
	}

	/// Changes a highlight's style and tells `tab` to redraw it.
	pub async fn set_style(&self, tab: Option<TabId>, id: &str, style: HighlightStyle) -> bool {
		let old_style = self.cached(id).and_then(|r| r.style);
		if !self.store.update(id, HighlightPatch::style(style)).await {
			return false;
		}
		if let Some(tab) = tab {
			self.notify_tab(
				tab,
				Message::UpdateHighlightStyle {
					highlight_id: id.to_string(),
					old_style,
					style,
				},
			)
			.await;
		}
		true
	}

	/// Sends a redraw request. A tab without a content context is skipped.
	async fn notify_tab(&self, tab: TabId, message: Message) {
		let action = message.action();
		if let Err(err) = self.messenger.send_to_tab(tab, message).await {
			tracing::debug!(tab = %tab, action, error = %err, "sidepanel.notify.unreachable");
		}
	}

	/// Shows highlight `id` in `tab`.
	///
	/// When the tab already displays the highlight's page and answers a
	/// ping, it is asked to scroll. Otherwise a pending scroll intent is
	/// saved and the caller must navigate.
	pub async fn open_highlight(&self, tab: &ActiveTab, id: &str) -> ScrollOutcome {
		let record = match self.cached(id) {
			Some(record) => record,
			None => match self.store.get(id).await {
				Some(record) => record,
				None => return ScrollOutcome::NotFound,
			},
		};

		if record.url == tab.url && self.is_alive(tab.id).await {
			let message = Message::ScrollToHighlightGroup {
				highlight_group: record,
			};
			return match self.messenger.send_to_tab(tab.id, message).await {
				Ok(reply) if reply.is_success() => ScrollOutcome::Scrolled,
				Ok(_) => ScrollOutcome::Failed,
				Err(err) => {
					tracing::debug!(tab = %tab.id, error = %err, "sidepanel.scroll.unreachable");
					ScrollOutcome::Failed
				}
			};
		}

		if !self.store.set_pending_scroll(id).await {
			tracing::warn!(id, "sidepanel.pending_scroll.failed");
		}
		ScrollOutcome::NavigationRequired { url: record.url }
	}

	async fn is_alive(&self, tab: TabId) -> bool {
		match self.messenger.send_to_tab(tab, Message::Ping).await {
			Ok(reply) => reply.is_success(),
			Err(err) => {
				tracing::debug!(tab = %tab, error = %err, "sidepanel.ping.unreachable");
				false
			}
		}
	}
}
