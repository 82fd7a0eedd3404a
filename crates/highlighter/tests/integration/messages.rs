use std::time::Duration;

use chrono::Utc;
use horizon_highlighter::ATTENTION_GROUP;
use horizon_messaging::{ActionResponse, Message, MessageHandler, Messenger, Reply, TabId};
use horizon_primitives::{HighlightRecord, effective_id};
use pretty_assertions::assert_eq;

use crate::common::*;

#[tokio::test(start_paused = true)]
async fn scroll_flashes_the_attention_group() {
	let h = Harness::new().await;
	let page = article(&PARAGRAPHS);
	let (ctx, surface) = h.context(&page);
	ctx.start().await;
	let range = select_paragraph(&page, 0);
	let record = ctx.highlight_selection(None).await.unwrap();

	let reply = ctx
		.handle(Message::ScrollToHighlightGroup {
			highlight_group: record,
		})
		.await;

	assert_eq!(reply, Reply::from(ActionResponse::ok()));
	assert_eq!(surface.scrolls(), vec![range]);
	assert_eq!(surface.ranges(ATTENTION_GROUP), vec![range]);

	tokio::time::sleep(Duration::from_millis(999)).await;
	assert_eq!(surface.ranges(ATTENTION_GROUP), vec![range]);
	tokio::time::sleep(Duration::from_millis(2)).await;
	assert!(surface.ranges(ATTENTION_GROUP).is_empty());
	ctx.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn scroll_resolves_missing_highlights_on_demand() {
	let h = Harness::new().await;
	let page = article(&PARAGRAPHS);
	let (ctx, surface) = h.context(&page);
	let record = HighlightRecord::text("highlight-9", PAGE_URL, "lazy dog", Utc::now());

	let reply = ctx
		.handle(Message::ScrollToHighlightGroup {
			highlight_group: record,
		})
		.await;

	assert!(reply.is_success());
	assert!(ctx.overlay().with_registry(|r| r.contains("highlight-9")));
	assert_eq!(surface.scrolls().len(), 1);
}

#[tokio::test]
async fn scroll_to_an_absent_text_fails() {
	let h = Harness::new().await;
	let page = article(&PARAGRAPHS);
	let (ctx, surface) = h.context(&page);
	let record = HighlightRecord::text("highlight-9", PAGE_URL, "not on this page", Utc::now());

	let reply = ctx
		.handle(Message::ScrollToHighlightGroup {
			highlight_group: record,
		})
		.await;

	assert_eq!(reply, Reply::from(ActionResponse::failed("Failed to scroll to highlight")));
	assert!(surface.scrolls().is_empty());
}

#[tokio::test(start_paused = true)]
async fn pending_scroll_is_applied_once_on_start() {
	let h = Harness::new().await;
	let first_page = article(&PARAGRAPHS);
	let (first, _) = h.context(&first_page);
	select_paragraph(&first_page, 2);
	let id = effective_id(&first.highlight_selection(None).await.unwrap());
	assert!(h.store.set_pending_scroll(&id).await);

	let page = article(&PARAGRAPHS);
	let (ctx, surface) = h.context(&page);
	ctx.start().await;

	assert_eq!(surface.scrolls(), vec![paragraph_range(&page, 2)]);
	assert_eq!(h.store.check_pending_scroll().await, None);
	ctx.shutdown().await;
}

#[tokio::test]
async fn bus_routes_tab_messages_to_the_content_context() {
	let h = Harness::new().await;
	let page = article(&PARAGRAPHS);
	let (ctx, surface) = h.context(&page);
	ctx.start().await;
	h.bus.register_tab(TabId(7), ctx.clone());
	let mut events = h.bus.subscribe();

	let ping = h.bus.send_to_tab(TabId(7), Message::Ping).await.unwrap();
	assert_eq!(ping, Reply::alive());

	let added = h
		.bus
		.send_to_tab(
			TabId(7),
			Message::AddHorizonHighlight {
				text: Some("the lazy dog".into()),
			},
		)
		.await
		.unwrap();
	assert!(added.is_success());
	assert_eq!(surface.ranges("horizon-light-underline").len(), 1);
	assert!(matches!(events.recv().await.unwrap(), Message::HighlightsUpdated { highlights } if highlights.len() == 1));
	assert_eq!(events.recv().await.unwrap(), Message::OpenSidebar);

	let unknown = h.bus.send_to_tab(TabId(7), Message::OpenSidebar).await.unwrap();
	assert_eq!(unknown, Reply::from(ActionResponse::failed("Unknown action: openSidebar")));

	let nothing = h
		.bus
		.send_to_tab(TabId(7), Message::AddHorizonHighlight { text: None })
		.await
		.unwrap();
	assert!(!nothing.is_success());

	assert!(h.bus.unregister_tab(TabId(7)));
	assert!(h.bus.send_to_tab(TabId(7), Message::Ping).await.is_err());
	ctx.shutdown().await;
}
