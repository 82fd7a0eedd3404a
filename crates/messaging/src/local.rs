use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use tokio::sync::broadcast;

use crate::error::{MessagingError, Result};
use crate::message::{Message, Reply, TabId};
use crate::messenger::{MessageHandler, Messenger};

/// In-process message bus connecting contexts that share a runtime.
///
/// Broadcasts fan out over a bounded [`broadcast`] channel: a subscriber
/// that falls more than `capacity` messages behind skips the oldest ones.
/// Tab messages are delivered to the handler registered for that tab.
pub struct LocalBus {
	events: broadcast::Sender<Message>,
	tabs: RwLock<FxHashMap<TabId, Arc<dyn MessageHandler>>>,
}

impl LocalBus {
	pub fn new(capacity: usize) -> Self {
		let (events, _) = broadcast::channel(capacity.max(1));
		Self {
			events,
			tabs: RwLock::new(FxHashMap::default()),
		}
	}

	/// Receives every broadcast sent after this call.
	pub fn subscribe(&self) -> broadcast::Receiver<Message> {
		self.events.subscribe()
	}

	/// Registers the content context of `tab`, replacing any previous one.
	pub fn register_tab(&self, tab: TabId, handler: Arc<dyn MessageHandler>) {
		tracing::debug!(tab = %tab, "messaging.tab.register");
		self.tabs.write().insert(tab, handler);
	}

	/// Removes the content context of `tab`, as when the page unloads.
	pub fn unregister_tab(&self, tab: TabId) -> bool {
		tracing::debug!(tab = %tab, "messaging.tab.unregister");
		self.tabs.write().remove(&tab).is_some()
	}
}

impl Default for LocalBus {
	fn default() -> Self {
		Self::new(64)
	}
}

#[async_trait]
impl Messenger for LocalBus {
	async fn broadcast(&self, message: Message) {
		let action = message.action();
		match self.events.send(message) {
			Ok(receivers) => tracing::trace!(action, receivers, "messaging.broadcast"),
			Err(_) => tracing::debug!(action, "messaging.broadcast.no_listener"),
		}
	}

	async fn send_to_tab(&self, tab: TabId, message: Message) -> Result<Reply> {
		let handler = self.tabs.read().get(&tab).cloned();
		let Some(handler) = handler else {
			tracing::debug!(tab = %tab, action = message.action(), "messaging.tab.unreachable");
			return Err(MessagingError::TargetUnreachable(tab));
		};
		Ok(handler.handle(message).await)
	}
}
