use thiserror::Error;

use crate::TabId;

/// Errors raised while exchanging messages between contexts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessagingError {
	/// No context is listening at the target. Callers log and carry on.
	#[error("no receiving context in tab {0}")]
	TargetUnreachable(TabId),

	/// The `action` field names no known verb.
	#[error("Unknown action: {0}")]
	UnknownAction(String),

	/// A known verb whose payload does not match its shape.
	#[error("malformed {action} message: {reason}")]
	Malformed {
		/// Verb of the rejected message.
		action: String,
		/// Decoder error.
		reason: String,
	},
}

/// Result type for messaging operations.
pub type Result<T> = std::result::Result<T, MessagingError>;
