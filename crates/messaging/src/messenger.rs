use std::sync::Arc;

use async_trait::async_trait;

use crate::error::Result;
use crate::message::{Message, Reply, TabId};

/// Outbound side of cross-context messaging.
///
/// Implementations decide transport. Both operations are suspension points;
/// neither may block the calling context.
#[async_trait]
pub trait Messenger: Send + Sync {
	/// Sends `message` to every listening context. Best effort: with no
	/// listener the message is dropped without error.
	async fn broadcast(&self, message: Message);

	/// Sends `message` to the content context of `tab` and waits for its
	/// reply. Fails with [`TargetUnreachable`](crate::MessagingError::TargetUnreachable)
	/// when no context is loaded there.
	async fn send_to_tab(&self, tab: TabId, message: Message) -> Result<Reply>;
}

/// Inbound side: a context that answers messages addressed to its tab.
#[async_trait]
pub trait MessageHandler: Send + Sync {
	async fn handle(&self, message: Message) -> Reply;
}

#[async_trait]
impl<T: Messenger + ?Sized> Messenger for Arc<T> {
	async fn broadcast(&self, message: Message) {
		(**self).broadcast(message).await;
	}

	async fn send_to_tab(&self, tab: TabId, message: Message) -> Result<Reply> {
		(**self).send_to_tab(tab, message).await
	}
}

/// Messenger that drops everything. Tabs are never reachable.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullMessenger;

#[async_trait]
impl Messenger for NullMessenger {
	async fn broadcast(&self, message: Message) {
		tracing::trace!(action = message.action(), "messaging.null.drop");
	}

	async fn send_to_tab(&self, tab: TabId, _message: Message) -> Result<Reply> {
		Err(crate::MessagingError::TargetUnreachable(tab))
	}
}
