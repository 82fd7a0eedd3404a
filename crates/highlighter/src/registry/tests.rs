use chrono::Utc;
use horizon_anchor::serialize;
use horizon_dom::{BoundaryPoint, NodeId, el, text};
use pretty_assertions::assert_eq;

use super::*;
use crate::surface::MemorySurface;

const LIGHT_UNDERLINE: &str = "horizon-light-underline";
const DARK_UNDERLINE: &str = "horizon-dark-underline";
const DARK_BACKGROUND: &str = "horizon-dark-background";

struct Fixture {
	doc: Document,
	paragraphs: Vec<NodeId>,
	surface: Arc<MemorySurface>,
	registry: HighlightRegistry,
}

fn fixture() -> Fixture {
	let mut doc = Document::new();
	let body = doc.body();
	let article = doc
		.append_markup(
			body,
			&el(
				"article",
				[
					el("p", [text("The quick brown fox")]),
					el("p", [text("jumps over the lazy dog")]),
					el("p", [text("while the cat sleeps")]),
				],
			),
		)
		.unwrap();
	let paragraphs = doc.element_children(article).collect();
	let surface = Arc::new(MemorySurface::new());
	let registry = HighlightRegistry::new(surface.clone());
	Fixture {
		doc,
		paragraphs,
		surface,
		registry,
	}
}

impl Fixture {
	fn range(&self, paragraph: usize) -> TextRange {
		let t = self.doc.children(self.paragraphs[paragraph])[0];
		let len = self.doc.text(t).unwrap().chars().count();
		self.doc.create_range(BoundaryPoint::new(t, 0), BoundaryPoint::new(t, len)).unwrap()
	}

	fn record(&self, id: &str, paragraph: usize) -> HighlightRecord {
		let range = self.range(paragraph);
		let body = horizon_anchor::normalize_text(&self.doc.range_text(&range).unwrap());
		HighlightRecord::text(id, "https://a.test/", body, Utc::now()).with_descriptor(&serialize(&self.doc, &range))
	}
}

fn dark(style: HighlightStyle) -> Appearance {
	Appearance::new(Theme::Dark, style)
}

#[test]
fn add_decorates_entry_and_group() {
	let mut f = fixture();
	let range = f.range(0);
	f.registry.add("a", range, Appearance::default());

	assert_eq!(f.registry.len(), 1);
	assert_eq!(f.registry.get("a").unwrap().range, range);
	assert_eq!(f.surface.ranges(LIGHT_UNDERLINE), vec![range]);
}

#[test]
fn add_is_an_idempotent_replace() {
	let mut f = fixture();
	f.registry.add("a", f.range(0), Appearance::default());
	f.registry.add("a", f.range(1), dark(HighlightStyle::Underline));

	assert_eq!(f.registry.len(), 1);
	assert!(f.surface.ranges(LIGHT_UNDERLINE).is_empty());
	assert_eq!(f.surface.ranges(DARK_UNDERLINE), vec![f.range(1)]);
}

#[test]
fn add_then_remove_leaves_siblings_alone() {
	let mut f = fixture();
	f.registry.add("a", f.range(0), Appearance::default());
	f.registry.add("b", f.range(1), Appearance::default());
	f.registry.add("c", f.range(2), dark(HighlightStyle::Underline));

	assert!(f.registry.remove("a"));
	assert_eq!(f.surface.ranges(LIGHT_UNDERLINE), vec![f.range(1)]);
	assert_eq!(f.surface.ranges(DARK_UNDERLINE), vec![f.range(2)]);
	assert!(!f.registry.remove("a"));
	assert_eq!(f.registry.ids(), vec!["b".to_string(), "c".to_string()]);
}

#[test]
fn change_style_moves_only_the_target() {
	let mut f = fixture();
	f.registry.add("a", f.range(0), dark(HighlightStyle::Underline));
	f.registry.add("b", f.range(1), dark(HighlightStyle::Underline));
	f.registry.add("c", f.range(2), Appearance::default());

	assert!(f.registry.change_style("a", HighlightStyle::Background));

	assert_eq!(f.surface.ranges(DARK_UNDERLINE), vec![f.range(1)]);
	assert_eq!(f.surface.ranges(DARK_BACKGROUND), vec![f.range(0)]);
	assert_eq!(f.surface.ranges(LIGHT_UNDERLINE), vec![f.range(2)]);
	assert_eq!(f.registry.get("a").unwrap().appearance, dark(HighlightStyle::Background));
}

#[test]
fn change_theme_rebuilds_groups() {
	let mut f = fixture();
	f.registry.add("a", f.range(0), Appearance::default());
	f.registry.add("b", f.range(1), Appearance::default());

	assert!(f.registry.change_theme("b", Theme::Dark));
	assert_eq!(f.surface.ranges(LIGHT_UNDERLINE), vec![f.range(0)]);
	assert_eq!(f.surface.ranges(DARK_UNDERLINE), vec![f.range(1)]);

	assert!(f.registry.remove("b"));
	assert!(f.surface.ranges(DARK_UNDERLINE).is_empty());
	assert!(!f.registry.change_theme("missing", Theme::Dark));
}

#[test]
fn restore_all_resolves_and_skips() {
	let mut f = fixture();
	let first = f.record("highlight-1-0", 0);
	let mut lost = f.record("highlight-1-1", 1);
	lost.range_info = None;
	lost.body = Some("text that is not on the page".into());
	let mut styled = f.record("highlight-1-2", 2);
	styled.theme = Some(Theme::Dark);

	f.registry.add("stale", f.range(1), Appearance::default());
	let report = f.registry.restore_all(&f.doc, [&first, &lost, &styled], Appearance::default());

	assert_eq!(report.structural, vec!["highlight-1-0".to_string(), "highlight-1-2".to_string()]);
	assert_eq!(report.skipped, vec!["highlight-1-1".to_string()]);
	assert_eq!(report.restored(), 2);
	assert!(!f.registry.contains("stale"));
	assert_eq!(f.surface.ranges(LIGHT_UNDERLINE), vec![f.range(0)]);
	assert_eq!(f.surface.ranges(DARK_UNDERLINE), vec![f.range(2)]);
}

#[test]
fn restore_all_falls_back_to_text_search() {
	let mut f = fixture();
	let mut record = f.record("highlight-1-0", 1);
	record.range_info = Some(serde_json::json!({ "xpath": "/html/body/p[2]" }));

	let report = f.registry.restore_all(&f.doc, [&record], Appearance::default());
	assert_eq!(report.text_search, vec!["highlight-1-0".to_string()]);
	assert_eq!(f.registry.get("highlight-1-0").unwrap().range, f.range(1));
}

#[test]
fn video_records_are_not_anchored() {
	let mut f = fixture();
	let video = HighlightRecord::video(
		"video-1-0",
		"https://a.test/",
		horizon_primitives::VideoData {
			video_id: "abc".into(),
			title: None,
			start_time: 0.0,
			end_time: 1.0,
			thumbnail_url: None,
		},
		Utc::now(),
	);
	assert_eq!(f.registry.anchor(&f.doc, &video, Appearance::default()), None);
	assert!(f.registry.is_empty());
}
