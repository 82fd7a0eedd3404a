//! Background coordinator: context-menu relay, tab liveness and
//! pending-scroll housekeeping.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use horizon_config::PendingConfig;
use horizon_messaging::{Message, Messenger, Reply, TabId};
use horizon_store::HighlightStore;
use horizon_worker::{CancellationToken, TaskClass, spawn};
use parking_lot::Mutex;
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;

/// Context-menu item that highlights the selection.
pub const MENU_ADD_HIGHLIGHT: &str = "addHorizonHighlight";

pub struct Background {
	store: Arc<HighlightStore>,
	messenger: Arc<dyn Messenger>,
	pending: PendingConfig,
	cancel: CancellationToken,
	tasks: Mutex<Vec<JoinHandle<()>>>,
	sidebar_requests: AtomicU64,
}

impl Background {
	pub fn new(store: Arc<HighlightStore>, messenger: Arc<dyn Messenger>, pending: PendingConfig) -> Arc<Self> {
		Arc::new(Self {
			store,
			messenger,
			pending,
			cancel: CancellationToken::new(),
			tasks: Mutex::new(Vec::new()),
			sidebar_requests: AtomicU64::new(0),
		})
	}

	/// Runs one pending-scroll cleanup now, then repeats it every sweep
	/// interval until [`shutdown`](Self::shutdown).
	pub async fn start(self: &Arc<Self>) {
		let sweep = self
			.store
			.start_pending_sweep(self.pending.sweep_interval(), self.cancel.child_token())
			.await;
		self.tasks.lock().push(sweep);
		tracing::debug!(interval_secs = self.pending.sweep_interval_secs, "background.start");
	}

	/// Follows broadcasts for side panel requests until shutdown.
	pub fn listen(self: &Arc<Self>, mut events: broadcast::Receiver<Message>) {
		let this = Arc::clone(self);
		let cancel = self.cancel.child_token();
		let task = spawn(TaskClass::Interactive, "background-listen", async move {
			loop {
				let event = tokio::select! {
					_ = cancel.cancelled() => break,
					event = events.recv() => event,
				};
				match event {
					Ok(Message::OpenSidebar) => {
						this.sidebar_requests.fetch_add(1, Ordering::Relaxed);
						tracing::debug!("background.open_sidebar");
					}
					Ok(Message::PendingScrollsCleanup { timestamp }) => {
						tracing::debug!(timestamp, "background.pending_cleanup");
					}
					Ok(_) => {}
					Err(RecvError::Lagged(skipped)) => tracing::debug!(skipped, "background.lagged"),
					Err(RecvError::Closed) => break,
				}
			}
		});
		self.tasks.lock().push(task);
	}

	/// Number of `openSidebar` requests seen by [`listen`](Self::listen).
	pub fn sidebar_requests(&self) -> u64 {
		self.sidebar_requests.load(Ordering::Relaxed)
	}

	/// Forwards a context-menu click to the content context of `tab`.
	///
	/// Returns `None` for menu items without a content action and for tabs
	/// with no content context.
	pub async fn relay_menu_action(&self, tab: TabId, menu_item_id: &str, selection: Option<String>) -> Option<Reply> {
		let message = match menu_item_id {
			MENU_ADD_HIGHLIGHT => Message::AddHorizonHighlight { text: selection },
			other => {
				tracing::debug!(menu_item_id = other, "background.menu.unhandled");
				return None;
			}
		};
		match self.messenger.send_to_tab(tab, message).await {
			Ok(reply) => Some(reply),
			Err(err) => {
				tracing::debug!(tab = %tab, error = %err, "background.menu.unreachable");
				None
			}
		}
	}

	/// Returns true when `tab` hosts a responsive content context.
	pub async fn is_alive(&self, tab: TabId) -> bool {
		match self.messenger.send_to_tab(tab, Message::Ping).await {
			Ok(reply) => reply.is_success(),
			Err(err) => {
				tracing::trace!(tab = %tab, error = %err, "background.ping.unreachable");
				false
			}
		}
	}

	/// Stops the sweep and the listener.
	pub async fn shutdown(&self) {
		self.cancel.cancel();
		let tasks = std::mem::take(&mut *self.tasks.lock());
		for task in tasks {
			if let Err(err) = task.await
				&& err.is_panic()
			{
				tracing::warn!(error = %err, "background.task.panicked");
			}
		}
	}
}
