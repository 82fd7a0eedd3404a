use std::fmt;

use horizon_primitives::{HighlightRecord, HighlightStyle, Theme};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{MessagingError, Result};

/// Identifier of a browser tab hosting a content context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TabId(pub u32);

impl fmt::Display for TabId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		self.0.fmt(f)
	}
}

/// An action exchanged between contexts. The wire form is a JSON object
/// whose `action` field names the verb.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Message {
	/// Broadcast after every store write with the full collection.
	HighlightsUpdated { highlights: Vec<HighlightRecord> },
	/// Sent to a tab after the side panel changed a highlight's theme.
	UpdateHighlightTheme { highlight_id: String, theme: Theme },
	/// Sent to a tab after the side panel changed a highlight's style.
	UpdateHighlightStyle {
		highlight_id: String,
		#[serde(default, skip_serializing_if = "Option::is_none")]
		old_style: Option<HighlightStyle>,
		style: HighlightStyle,
	},
	/// Highlight the tab's current selection.
	AddHorizonHighlight {
		#[serde(default, skip_serializing_if = "Option::is_none")]
		text: Option<String>,
	},
	/// Scroll the tab to a highlight and flash it.
	ScrollToHighlightGroup { highlight_group: HighlightRecord },
	/// Liveness probe.
	Ping,
	/// Ask the host to show the side panel.
	OpenSidebar,
	/// Stale pending scroll intents were removed at `timestamp` (epoch ms).
	PendingScrollsCleanup { timestamp: i64 },
}

impl Message {
	/// Every verb, as it appears in the `action` field.
	pub const ACTIONS: [&'static str; 8] = [
		"highlightsUpdated",
		"updateHighlightTheme",
		"updateHighlightStyle",
		"addHorizonHighlight",
		"scrollToHighlightGroup",
		"ping",
		"openSidebar",
		"pendingScrollsCleanup",
	];

	/// The verb of this message.
	pub const fn action(&self) -> &'static str {
		match self {
			Self::HighlightsUpdated { .. } => "highlightsUpdated",
			Self::UpdateHighlightTheme { .. } => "updateHighlightTheme",
			Self::UpdateHighlightStyle { .. } => "updateHighlightStyle",
			Self::AddHorizonHighlight { .. } => "addHorizonHighlight",
			Self::ScrollToHighlightGroup { .. } => "scrollToHighlightGroup",
			Self::Ping => "ping",
			Self::OpenSidebar => "openSidebar",
			Self::PendingScrollsCleanup { .. } => "pendingScrollsCleanup",
		}
	}

	/// Decodes a wire message, telling unknown verbs apart from bad payloads.
	pub fn from_value(value: Value) -> Result<Self> {
		let action = value
			.get("action")
			.and_then(Value::as_str)
			.unwrap_or_default()
			.to_string();
		if !Self::ACTIONS.contains(&action.as_str()) {
			return Err(MessagingError::UnknownAction(action));
		}
		serde_json::from_value(value).map_err(|err| MessagingError::Malformed {
			action,
			reason: err.to_string(),
		})
	}
}

/// Acknowledgement returned for an action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionResponse {
	pub success: bool,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub error: Option<String>,
}

impl ActionResponse {
	pub fn ok() -> Self {
		Self {
			success: true,
			error: None,
		}
	}

	pub fn failed(error: impl Into<String>) -> Self {
		Self {
			success: false,
			error: Some(error.into()),
		}
	}

	/// `ok()` when `success`, otherwise `failed(error)`.
	pub fn from_outcome(success: bool, error: &str) -> Self {
		if success { Self::ok() } else { Self::failed(error) }
	}
}

/// Reply to a message sent to a tab.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Reply {
	/// Answer to [`Message::Ping`]: `{"status": "alive"}`.
	Status { status: String },
	Action(ActionResponse),
}

impl Reply {
	pub fn alive() -> Self {
		Self::Status {
			status: "alive".to_string(),
		}
	}

	/// True for a live status or a successful action.
	pub fn is_success(&self) -> bool {
		match self {
			Self::Status { status } => status == "alive",
			Self::Action(response) => response.success,
		}
	}
}

impl From<ActionResponse> for Reply {
	fn from(response: ActionResponse) -> Self {
		Self::Action(response)
	}
}
