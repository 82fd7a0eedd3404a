use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::appearance::{Appearance, HighlightStyle, Theme};
use crate::descriptor::AnchorDescriptor;

/// Record discriminator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HighlightKind {
	#[default]
	Text,
	Video,
}

impl HighlightKind {
	/// Prefix used when generating ids for this kind.
	pub const fn id_prefix(self) -> &'static str {
		match self {
			Self::Text => "highlight",
			Self::Video => "video",
		}
	}
}

/// Stored identifier of a record.
///
/// Old records may carry a non-string id; use [`effective_id`] for every
/// comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
	Text(String),
	Legacy(Value),
}

impl From<String> for RecordId {
	fn from(id: String) -> Self {
		Self::Text(id)
	}
}

impl From<&str> for RecordId {
	fn from(id: &str) -> Self {
		Self::Text(id.to_string())
	}
}

/// A note attached to a highlight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
	#[serde(default)]
	pub id: String,
	pub text: String,
	#[serde(rename = "timestamp", with = "chrono::serde::ts_milliseconds")]
	pub created_at: DateTime<Utc>,
	#[serde(
		rename = "updatedAt",
		default,
		with = "chrono::serde::ts_milliseconds_option",
		skip_serializing_if = "Option::is_none"
	)]
	pub updated_at: Option<DateTime<Utc>>,
}

/// Segment of a video captured as a highlight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoData {
	pub video_id: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub title: Option<String>,
	/// Start of the segment in seconds.
	pub start_time: f64,
	/// End of the segment in seconds.
	pub end_time: f64,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub thumbnail_url: Option<String>,
}

/// Durable highlight record.
///
/// Fields the engine does not know about are kept in `extra` so that records
/// written by other versions survive a read-modify-write cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighlightRecord {
	pub id: RecordId,
	#[serde(rename = "type", default)]
	pub kind: HighlightKind,
	#[serde(default)]
	pub url: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub title: Option<String>,
	/// Whitespace-collapsed selected text.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub body: Option<String>,
	/// Raw anchor descriptor, parsed lazily by [`HighlightRecord::descriptor`].
	#[serde(rename = "rangeInfo", default, skip_serializing_if = "Option::is_none")]
	pub range_info: Option<Value>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub theme: Option<Theme>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub style: Option<HighlightStyle>,
	#[serde(default)]
	pub notes: Vec<Note>,
	#[serde(rename = "created_at", alias = "createdAt", default, skip_serializing_if = "Option::is_none")]
	pub created_at: Option<DateTime<Utc>>,
	#[serde(rename = "updated_at", alias = "updatedAt", default, skip_serializing_if = "Option::is_none")]
	pub updated_at: Option<DateTime<Utc>>,
	/// Legacy creation stamp in epoch milliseconds.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub timestamp: Option<i64>,
	#[serde(rename = "videoData", default, skip_serializing_if = "Option::is_none")]
	pub video_data: Option<VideoData>,
	#[serde(flatten)]
	pub extra: Map<String, Value>,
}

impl HighlightRecord {
	/// Creates a text record. Theme and style are left unset so the store can
	/// apply the persisted defaults.
	pub fn text(id: impl Into<String>, url: impl Into<String>, body: impl Into<String>, now: DateTime<Utc>) -> Self {
		Self {
			id: RecordId::Text(id.into()),
			kind: HighlightKind::Text,
			url: url.into(),
			title: None,
			body: Some(body.into()),
			range_info: None,
			theme: None,
			style: None,
			notes: Vec::new(),
			created_at: Some(now),
			updated_at: Some(now),
			timestamp: Some(now.timestamp_millis()),
			video_data: None,
			extra: Map::new(),
		}
	}

	/// Creates a video record.
	pub fn video(id: impl Into<String>, url: impl Into<String>, data: VideoData, now: DateTime<Utc>) -> Self {
		Self {
			id: RecordId::Text(id.into()),
			kind: HighlightKind::Video,
			url: url.into(),
			title: data.title.clone(),
			body: None,
			range_info: None,
			theme: Some(Theme::Light),
			style: None,
			notes: Vec::new(),
			created_at: Some(now),
			updated_at: Some(now),
			timestamp: Some(now.timestamp_millis()),
			video_data: Some(data),
			extra: Map::new(),
		}
	}

	/// Attaches a serialized anchor.
	pub fn with_descriptor(mut self, descriptor: &AnchorDescriptor) -> Self {
		self.set_descriptor(descriptor);
		self
	}

	pub fn set_descriptor(&mut self, descriptor: &AnchorDescriptor) {
		self.range_info = serde_json::to_value(descriptor).ok();
	}

	/// Parses the stored anchor descriptor. Legacy shapes yield `None`.
	pub fn descriptor(&self) -> Option<AnchorDescriptor> {
		let raw = self.range_info.as_ref()?;
		serde_json::from_value(raw.clone()).ok()
	}

	pub fn effective_id(&self) -> String {
		effective_id(self)
	}

	/// Appearance with unset fields taken from `fallback`.
	pub fn appearance_or(&self, fallback: Appearance) -> Appearance {
		Appearance {
			theme: self.theme.unwrap_or(fallback.theme),
			style: self.style.unwrap_or(fallback.style),
		}
	}

	pub fn is_video(&self) -> bool {
		self.kind == HighlightKind::Video
	}
}

/// Identity used for every lookup by id.
///
/// String ids are used as-is; any other stored id maps to
/// `highlight-{timestamp}` where a missing timestamp renders as `undefined`.
pub fn effective_id(record: &HighlightRecord) -> String {
	match &record.id {
		RecordId::Text(id) => id.clone(),
		RecordId::Legacy(_) => match record.timestamp {
			Some(ts) => format!("highlight-{ts}"),
			None => "highlight-undefined".to_string(),
		},
	}
}

#[cfg(test)]
mod tests;
