use horizon_primitives::{HighlightRecord, HighlightStyle, Note, Theme, VideoData};
use serde_json::Value;

/// Partial update merged into a stored record. `None` fields are left as
/// they are.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HighlightPatch {
	pub title: Option<String>,
	pub body: Option<String>,
	pub range_info: Option<Value>,
	pub theme: Option<Theme>,
	pub style: Option<HighlightStyle>,
	pub notes: Option<Vec<Note>>,
}

impl HighlightPatch {
	pub fn theme(theme: Theme) -> Self {
		Self {
			theme: Some(theme),
			..Self::default()
		}
	}

	pub fn style(style: HighlightStyle) -> Self {
		Self {
			style: Some(style),
			..Self::default()
		}
	}

	pub fn title(title: impl Into<String>) -> Self {
		Self {
			title: Some(title.into()),
			..Self::default()
		}
	}

	pub(crate) fn apply(self, record: &mut HighlightRecord) {
		if let Some(title) = self.title {
			record.title = Some(title);
		}
		if let Some(body) = self.body {
			record.body = Some(body);
		}
		if let Some(range_info) = self.range_info {
			record.range_info = Some(range_info);
		}
		if let Some(theme) = self.theme {
			record.theme = Some(theme);
		}
		if let Some(style) = self.style {
			record.style = Some(style);
		}
		if let Some(notes) = self.notes {
			record.notes = notes;
		}
	}
}

/// Partial update of a video segment.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VideoPatch {
	pub title: Option<String>,
	pub start_time: Option<f64>,
	pub end_time: Option<f64>,
	pub thumbnail_url: Option<String>,
}

impl VideoPatch {
	pub(crate) fn apply(self, data: &mut VideoData) {
		if let Some(title) = self.title {
			data.title = Some(title);
		}
		if let Some(start) = self.start_time {
			data.start_time = start;
		}
		if let Some(end) = self.end_time {
			data.end_time = end;
		}
		if let Some(url) = self.thumbnail_url {
			data.thumbnail_url = Some(url);
		}
	}
}
