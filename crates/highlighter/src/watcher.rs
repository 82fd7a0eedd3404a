//! Mutation-driven restoration.
//!
//! The host drains the page's [`MutationRecord`]s and passes each batch to
//! [`PageWatcher::notify`]. Batches caused by the highlighter's own UI are
//! ignored; batches that add page content schedule one debounced
//! restoration.

use std::future::Future;
use std::time::Duration;

use horizon_anchor::HIGHLIGHT_CLASS;
use horizon_dom::{Document, ElementData, MutationRecord};
use horizon_worker::{CancellationToken, Debouncer, SignalOutcome};

/// Classes of elements the highlighter inserts into the page.
pub const OWN_CLASSES: [&str; 3] = [HIGHLIGHT_CLASS, "note-dialog", "note-indicator"];

fn is_own(element: &ElementData) -> bool {
	OWN_CLASSES.iter().any(|class| element.has_class(class))
}

/// How a mutation batch affects restoration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchClass {
	/// Every change happened in highlighter-owned elements.
	Ignorable,
	/// Page content was added; restoration should run.
	Relevant,
	/// Nothing that needs restoration.
	Irrelevant,
}

/// Classifies one batch of mutation records.
pub fn classify(doc: &Document, batch: &[MutationRecord]) -> BatchClass {
	if batch.is_empty() {
		return BatchClass::Irrelevant;
	}
	if batch.iter().all(|record| doc.closest(record.target, is_own).is_some()) {
		return BatchClass::Ignorable;
	}
	let adds_content = batch
		.iter()
		.flat_map(|record| record.added_nodes())
		.filter_map(|node| doc.node(*node))
		.filter_map(|node| node.as_element())
		.any(|element| !is_own(element));
	if adds_content { BatchClass::Relevant } else { BatchClass::Irrelevant }
}

/// Debounces restoration requests of one page view.
pub struct PageWatcher {
	debouncer: Debouncer,
}

impl PageWatcher {
	/// Spawns the debounced worker; `restore` runs once per quiet `window`.
	pub fn spawn<F, Fut>(window: Duration, cancel: CancellationToken, restore: F) -> Self
	where
		F: FnMut() -> Fut + Send + 'static,
		Fut: Future<Output = ()> + Send + 'static,
	{
		Self {
			debouncer: Debouncer::spawn("page-restore", window, cancel, restore),
		}
	}

	/// Classifies `batch` and schedules a restoration when it is relevant.
	pub fn notify(&self, doc: &Document, batch: &[MutationRecord]) -> BatchClass {
		let class = classify(doc, batch);
		if class == BatchClass::Relevant {
			let outcome = self.debouncer.trigger();
			if outcome == SignalOutcome::Closed {
				tracing::debug!("watcher.closed");
			} else {
				tracing::trace!(?outcome, records = batch.len(), "watcher.schedule");
			}
		}
		class
	}

	pub async fn shutdown(self) {
		self.debouncer.shutdown().await;
	}
}
