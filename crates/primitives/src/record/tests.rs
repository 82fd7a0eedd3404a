use chrono::TimeZone;
use pretty_assertions::assert_eq;
use serde_json::json;

use super::*;
use crate::descriptor::{BoundaryDescriptor, NodeTypeMarker};

fn at(ms: i64) -> DateTime<Utc> {
	Utc.timestamp_millis_opt(ms).unwrap()
}

#[test]
fn string_ids_are_used_verbatim() {
	let record = HighlightRecord::text("highlight-1-0", "https://a.test/", "fox", at(1));
	assert_eq!(effective_id(&record), "highlight-1-0");
}

#[test]
fn object_ids_reconcile_through_timestamp() {
	let value = json!({
		"id": { "legacy": true },
		"url": "https://a.test/",
		"body": "fox",
		"timestamp": 1234
	});
	let record: HighlightRecord = serde_json::from_value(value).unwrap();
	assert!(matches!(record.id, RecordId::Legacy(_)));
	assert_eq!(record.effective_id(), "highlight-1234");
}

#[test]
fn object_id_without_timestamp_renders_undefined() {
	let record: HighlightRecord = serde_json::from_value(json!({ "id": 7, "url": "u" })).unwrap();
	assert_eq!(record.effective_id(), "highlight-undefined");
}

#[test]
fn unknown_fields_survive_round_trip() {
	let value = json!({
		"id": "highlight-9-1",
		"url": "https://a.test/",
		"body": "fox",
		"favicon": "https://a.test/icon.png",
		"notes": []
	});
	let record: HighlightRecord = serde_json::from_value(value).unwrap();
	assert_eq!(record.extra.get("favicon"), Some(&json!("https://a.test/icon.png")));
	let back = serde_json::to_value(&record).unwrap();
	assert_eq!(back["favicon"], json!("https://a.test/icon.png"));
	assert_eq!(back["type"], json!("text"));
}

#[test]
fn legacy_range_info_is_kept_but_not_parsed() {
	let record: HighlightRecord = serde_json::from_value(json!({
		"id": "h",
		"url": "u",
		"rangeInfo": { "text": "fox", "containerHTML": "<p>fox</p>", "textOffset": 0, "textLength": 3 }
	}))
	.unwrap();
	assert!(record.range_info.is_some());
	assert_eq!(record.descriptor(), None);
}

#[test]
fn descriptor_round_trips_through_record() {
	let boundary = BoundaryDescriptor {
		path: Some(vec![1, 0]),
		offset: 3,
		node_type: NodeTypeMarker::Text,
		child_index: Some(0),
	};
	let descriptor = AnchorDescriptor {
		start: boundary.clone(),
		end: BoundaryDescriptor { offset: 9, ..boundary },
	};
	let record = HighlightRecord::text("h", "u", "fox", at(0)).with_descriptor(&descriptor);
	assert_eq!(record.descriptor(), Some(descriptor));
}

#[test]
fn notes_use_millisecond_stamps() {
	let note: Note = serde_json::from_value(json!({
		"id": "note-1-abcdefghi",
		"text": "remember",
		"timestamp": 1000,
		"updatedAt": 2000
	}))
	.unwrap();
	assert_eq!(note.created_at, at(1000));
	assert_eq!(note.updated_at, Some(at(2000)));
}

#[test]
fn appearance_falls_back_per_field() {
	let mut record = HighlightRecord::text("h", "u", "fox", at(0));
	record.theme = Some(Theme::Dark);
	let appearance = record.appearance_or(Appearance::new(Theme::Light, HighlightStyle::Background));
	assert_eq!(appearance, Appearance::new(Theme::Dark, HighlightStyle::Background));
}

#[test]
fn video_records_carry_segment_data() {
	let data = VideoData {
		video_id: "abc".into(),
		title: Some("Talk".into()),
		start_time: 12.5,
		end_time: 30.0,
		thumbnail_url: None,
	};
	let record = HighlightRecord::video("video-1-0", "https://www.youtube.com/watch?v=abc", data, at(1));
	let value = serde_json::to_value(&record).unwrap();
	assert_eq!(value["type"], json!("video"));
	assert_eq!(value["videoData"]["videoId"], json!("abc"));
	assert_eq!(value["videoData"]["startTime"], json!(12.5));
	assert!(record.is_video());
}
