use std::sync::Arc;

use horizon_config::RestoreConfig;
use horizon_dom::{BoundaryPoint, Document, Markup, Node, NodeId, TextRange, el, text};
use horizon_highlighter::{ContentContext, MemorySurface, Page, ThemeContext};
use horizon_messaging::LocalBus;
use horizon_store::{HighlightStore, MemoryStorage};
use parking_lot::Mutex;

pub const PAGE_URL: &str = "https://news.example/story";

pub const PARAGRAPHS: [&str; 3] = [
	"The quick brown fox",
	"jumps over the lazy dog",
	"while the cat sleeps",
];

pub struct Harness {
	pub bus: Arc<LocalBus>,
	pub store: Arc<HighlightStore>,
	pub theme: Arc<ThemeContext>,
}

impl Harness {
	pub async fn new() -> Self {
		let _ = tracing_subscriber::fmt::try_init();
		let bus = Arc::new(LocalBus::new(64));
		let store = Arc::new(HighlightStore::new(Arc::new(MemoryStorage::new()), bus.clone()));
		let theme = ThemeContext::start(Arc::clone(&store)).await;
		Self { bus, store, theme }
	}

	/// Content context for `page` at [`PAGE_URL`], not yet started.
	pub fn context(&self, page: &Page) -> (Arc<ContentContext>, Arc<MemorySurface>) {
		let surface = Arc::new(MemorySurface::new());
		let ctx = ContentContext::new(
			PAGE_URL,
			Arc::clone(page),
			surface.clone(),
			Arc::clone(&self.store),
			Arc::clone(&self.theme),
			RestoreConfig::default(),
		)
		.unwrap();
		(ctx, surface)
	}
}

fn paragraphs(texts: &[&str]) -> Vec<Markup> {
	texts.iter().map(|t| el("p", [text(t)])).collect()
}

fn page_of(markup: Markup) -> Page {
	let mut doc = Document::new();
	doc.set_title("Story");
	let body = doc.body();
	doc.append_markup(body, &markup).unwrap();
	Arc::new(Mutex::new(doc))
}

/// `<body><article><p>…</p>…</article></body>`.
pub fn article(texts: &[&str]) -> Page {
	page_of(el("article", paragraphs(texts)))
}

/// The same paragraphs after a re-render moved them under new wrappers.
pub fn rerendered(texts: &[&str]) -> Page {
	page_of(el(
		"div",
		[el("header", [text("Site header")]), el("article", paragraphs(texts))],
	))
}

/// Container of the article's paragraphs.
pub fn article_node(doc: &Document) -> NodeId {
	let body = doc.body();
	doc.descendants(body)
		.find(|&n| doc.node(n).and_then(Node::as_element).is_some_and(|e| e.tag == "article"))
		.unwrap()
}

/// Range covering the whole `index`-th paragraph.
pub fn paragraph_range(page: &Page, index: usize) -> TextRange {
	let doc = page.lock();
	let p = doc.element_children(article_node(&doc)).nth(index).unwrap();
	let t = doc.children(p)[0];
	let len = doc.text(t).unwrap().chars().count();
	doc.create_range(BoundaryPoint::new(t, 0), BoundaryPoint::new(t, len)).unwrap()
}

/// Selects the whole `index`-th paragraph and returns the range.
pub fn select_paragraph(page: &Page, index: usize) -> TextRange {
	let range = paragraph_range(page, index);
	page.lock().set_selection(Some(range)).unwrap();
	range
}

/// Appends a paragraph to the article, as late-loading content would.
pub fn append_paragraph(page: &Page, content: &str) {
	let mut doc = page.lock();
	let article = article_node(&doc);
	doc.append_markup(article, &el("p", [text(content)])).unwrap();
}
