use std::time::Duration;

use chrono::Utc;
use horizon_highlighter::BatchClass;
use horizon_primitives::HighlightRecord;
use pretty_assertions::assert_eq;

use crate::common::*;

const LATE: &str = "Comments loaded after the article";

async fn seed_late_record(h: &Harness) -> String {
	let record = HighlightRecord::text("highlight-late", PAGE_URL, LATE, Utc::now());
	h.store.create(record).await.unwrap();
	"highlight-late".to_string()
}

#[tokio::test(start_paused = true)]
async fn late_content_is_restored_after_the_quiet_window() {
	let h = Harness::new().await;
	let id = seed_late_record(&h).await;
	let page = article(&PARAGRAPHS);
	let (ctx, surface) = h.context(&page);

	let report = ctx.start().await.unwrap();
	assert_eq!(report.skipped, vec![id.clone()]);

	append_paragraph(&page, "Loading comments");
	assert_eq!(ctx.notify_mutations(), BatchClass::Relevant);
	tokio::time::sleep(Duration::from_millis(300)).await;

	append_paragraph(&page, LATE);
	assert_eq!(ctx.notify_mutations(), BatchClass::Relevant);
	tokio::time::sleep(Duration::from_millis(300)).await;
	assert!(!ctx.overlay().with_registry(|r| r.contains(&id)));

	tokio::time::sleep(Duration::from_millis(250)).await;
	assert!(ctx.overlay().with_registry(|r| r.contains(&id)));
	assert_eq!(surface.active_groups(), vec!["horizon-light-underline".to_string()]);
	ctx.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn own_decoration_changes_do_not_restore() {
	let h = Harness::new().await;
	let id = seed_late_record(&h).await;
	let page = article(&PARAGRAPHS);
	let (ctx, _surface) = h.context(&page);
	ctx.start().await;

	{
		let mut doc = page.lock();
		let article = article_node(&doc);
		let indicator = doc
			.append_markup(article, &horizon_dom::el("span", []).class("note-indicator"))
			.unwrap();
		doc.take_mutations();
		doc.append_markup(indicator, &horizon_dom::text(LATE)).unwrap();
	}
	assert_eq!(ctx.notify_mutations(), BatchClass::Ignorable);
	tokio::time::sleep(Duration::from_secs(2)).await;
	assert!(!ctx.overlay().with_registry(|r| r.contains(&id)));
	ctx.shutdown().await;
}

#[tokio::test]
async fn notifications_before_start_are_dropped() {
	let h = Harness::new().await;
	let page = article(&PARAGRAPHS);
	let (ctx, _surface) = h.context(&page);
	append_paragraph(&page, LATE);
	assert_eq!(ctx.notify_mutations(), BatchClass::Irrelevant);
}
