use horizon_highlighter::{HighlighterError, MemorySurface};
use horizon_messaging::{ActionResponse, Message, MessageHandler, Reply};
use horizon_primitives::{Appearance, HighlightRecord, HighlightStyle, Theme, effective_id};
use horizon_store::keys;
use pretty_assertions::assert_eq;
use serde_json::json;
use tokio::sync::oneshot;

use crate::common::*;

const LIGHT_UNDERLINE: &str = "horizon-light-underline";
const DARK_UNDERLINE: &str = "horizon-dark-underline";
const DARK_BACKGROUND: &str = "horizon-dark-background";

#[tokio::test]
async fn reload_restores_structurally_with_default_appearance() {
	let h = Harness::new().await;
	let first_page = article(&PARAGRAPHS);
	let (first, _) = h.context(&first_page);
	first.start().await;
	select_paragraph(&first_page, 1);
	let record = first.highlight_selection(None).await.unwrap();
	let id = effective_id(&record);
	assert_eq!(record.body.as_deref(), Some("jumps over the lazy dog"));
	assert_eq!(record.title.as_deref(), Some("Story"));
	assert_eq!(first_page.lock().selection(), None);
	first.shutdown().await;

	let reloaded = article(&PARAGRAPHS);
	let (ctx, surface) = h.context(&reloaded);
	let report = ctx.start().await.unwrap();

	assert_eq!(report.structural, vec![id.clone()]);
	assert!(report.skipped.is_empty());
	assert_eq!(surface.ranges(LIGHT_UNDERLINE), vec![paragraph_range(&reloaded, 1)]);
	assert!(ctx.overlay().with_registry(|r| r.contains(&id)));
	ctx.shutdown().await;
}

#[tokio::test]
async fn rerendered_page_falls_back_to_text_search() {
	let h = Harness::new().await;
	let original = article(&PARAGRAPHS);
	let (first, _) = h.context(&original);
	select_paragraph(&original, 1);
	let id = effective_id(&first.highlight_selection(None).await.unwrap());

	let page = rerendered(&PARAGRAPHS);
	let (ctx, surface) = h.context(&page);
	let report = ctx.start().await.unwrap();

	assert_eq!(report.text_search, vec![id]);
	assert!(report.structural.is_empty());
	assert_eq!(surface.ranges(LIGHT_UNDERLINE), vec![paragraph_range(&page, 1)]);
	ctx.shutdown().await;
}

#[tokio::test]
async fn unresolvable_records_are_kept() {
	let h = Harness::new().await;
	let original = article(&PARAGRAPHS);
	let (first, _) = h.context(&original);
	select_paragraph(&original, 2);
	let id = effective_id(&first.highlight_selection(None).await.unwrap());

	let page = article(&["Entirely different content"]);
	let (ctx, surface) = h.context(&page);
	let report = ctx.start().await.unwrap();

	assert_eq!(report.skipped, vec![id.clone()]);
	assert!(surface.active_groups().is_empty());
	assert!(h.store.get(&id).await.is_some());
	ctx.shutdown().await;
}

#[tokio::test]
async fn style_change_moves_only_the_target() {
	let h = Harness::new().await;
	h.theme.set_default_theme(Theme::Dark).await.unwrap();
	let page = article(&PARAGRAPHS);
	let (ctx, surface) = h.context(&page);
	ctx.start().await;

	let first = select_paragraph(&page, 0);
	let a = effective_id(&ctx.highlight_selection(None).await.unwrap());
	let second = select_paragraph(&page, 1);
	ctx.highlight_selection(None).await.unwrap();
	assert_eq!(surface.ranges(DARK_UNDERLINE), vec![first, second]);

	let reply = ctx
		.handle(Message::UpdateHighlightStyle {
			highlight_id: a,
			old_style: Some(HighlightStyle::Underline),
			style: HighlightStyle::Background,
		})
		.await;

	assert!(reply.is_success());
	assert_eq!(surface.ranges(DARK_UNDERLINE), vec![second]);
	assert_eq!(surface.ranges(DARK_BACKGROUND), vec![first]);
	ctx.shutdown().await;
}

#[tokio::test]
async fn theme_change_regroups_the_target() {
	let h = Harness::new().await;
	let page = article(&PARAGRAPHS);
	let (ctx, surface) = h.context(&page);
	ctx.start().await;

	let range = select_paragraph(&page, 2);
	let id = effective_id(&ctx.highlight_selection(None).await.unwrap());
	let reply = ctx
		.handle(Message::UpdateHighlightTheme {
			highlight_id: id,
			theme: Theme::Dark,
		})
		.await;

	assert!(reply.is_success());
	assert!(surface.ranges(LIGHT_UNDERLINE).is_empty());
	assert_eq!(surface.ranges(DARK_UNDERLINE), vec![range]);
	ctx.shutdown().await;
}

#[tokio::test]
async fn unsupported_surface_refuses_to_start() {
	let h = Harness::new().await;
	let page = article(&PARAGRAPHS);
	let result = horizon_highlighter::ContentContext::new(
		PAGE_URL,
		page,
		std::sync::Arc::new(MemorySurface::unsupported()),
		h.store.clone(),
		h.theme.clone(),
		horizon_config::RestoreConfig::default(),
	);
	assert!(matches!(result, Err(HighlighterError::CapabilityUnavailable)));
}

#[tokio::test]
async fn concurrent_restore_is_suppressed() {
	let h = Harness::new().await;
	let page = article(&PARAGRAPHS);
	let (ctx, _surface) = h.context(&page);
	let overlay = ctx.overlay();
	let (release, held) = oneshot::channel::<Vec<HighlightRecord>>();

	let (first, second) = tokio::join!(
		overlay.restore_all(async { held.await.unwrap_or_default() }, Appearance::default()),
		async {
			let second = overlay.restore_all(async { Vec::new() }, Appearance::default()).await;
			assert!(overlay.is_restoring());
			release.send(Vec::new()).unwrap();
			second
		},
	);

	assert!(second.is_none());
	assert!(first.is_some());
	assert!(!overlay.is_restoring());
}

#[tokio::test]
async fn records_without_appearance_ignore_later_defaults() {
	let h = Harness::new().await;
	let raw = json!([{
		"id": "highlight-raw",
		"type": "text",
		"url": PAGE_URL,
		"body": "while the cat sleeps",
		"timestamp": 1000
	}]);
	h.store.storage().set(keys::HIGHLIGHTS, raw).await.unwrap();
	h.theme.set_default_theme(Theme::Dark).await.unwrap();

	let page = article(&PARAGRAPHS);
	let (ctx, surface) = h.context(&page);
	ctx.start().await.unwrap();

	assert_eq!(surface.active_groups(), vec![LIGHT_UNDERLINE.to_string()]);
	assert_eq!(surface.ranges(LIGHT_UNDERLINE), vec![paragraph_range(&page, 2)]);
	ctx.shutdown().await;
}

#[tokio::test]
async fn appearance_change_for_unknown_id_fails() {
	let h = Harness::new().await;
	let page = article(&PARAGRAPHS);
	let (ctx, _surface) = h.context(&page);
	ctx.start().await;

	let theme = ctx
		.handle(Message::UpdateHighlightTheme {
			highlight_id: "highlight-missing".into(),
			theme: Theme::Dark,
		})
		.await;
	let style = ctx
		.handle(Message::UpdateHighlightStyle {
			highlight_id: "highlight-missing".into(),
			old_style: None,
			style: HighlightStyle::Background,
		})
		.await;

	assert_eq!(theme, Reply::from(ActionResponse::failed("Highlight not found")));
	assert_eq!(style, Reply::from(ActionResponse::failed("Highlight not found")));
	ctx.shutdown().await;
}
