use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::signal::{Signal, SignalOutcome};
use crate::{TaskClass, spawn};

/// Single-concurrency debounced worker.
///
/// Triggers are coalesced through a [`Signal`]. After the first trigger of a
/// burst the worker waits for `quiet` to pass without another trigger, then
/// runs the action once. Triggers that arrive while the action runs leave one
/// pending signal, which starts the next cycle after the action returns, so
/// the action never overlaps itself.
pub struct Debouncer {
	signal: Signal,
	cancel: CancellationToken,
	task: JoinHandle<()>,
}

impl Debouncer {
	/// Spawns the worker on the current runtime.
	pub fn spawn<F, Fut>(name: &'static str, quiet: Duration, cancel: CancellationToken, mut action: F) -> Self
	where
		F: FnMut() -> Fut + Send + 'static,
		Fut: Future<Output = ()> + Send + 'static,
	{
		let (signal, mut rx) = Signal::channel();
		let token = cancel.clone();
		let task = spawn(TaskClass::Background, name, async move {
			loop {
				let woke = tokio::select! {
					_ = token.cancelled() => false,
					woke = rx.recv() => woke,
				};
				if !woke {
					break;
				}

				loop {
					tokio::select! {
						_ = token.cancelled() => return,
						_ = tokio::time::sleep(quiet) => break,
						more = rx.recv() => {
							if !more {
								break;
							}
							tracing::trace!(task = name, "worker.debounce.extend");
						}
					}
				}

				tracing::debug!(task = name, "worker.debounce.fire");
				action().await;
			}
			tracing::debug!(task = name, "worker.debounce.stopped");
		});

		Self { signal, cancel, task }
	}

	/// Requests a run.
	pub fn trigger(&self) -> SignalOutcome {
		self.signal.raise()
	}

	/// Stops the worker. A run in progress is dropped at its next await.
	pub async fn shutdown(self) {
		self.cancel.cancel();
		self.signal.close();
		if let Err(err) = self.task.await
			&& err.is_panic()
		{
			tracing::warn!(error = %err, "worker.debounce.panicked");
		}
	}
}

#[cfg(test)]
mod tests {
	use std::sync::Arc;
	use std::sync::atomic::{AtomicUsize, Ordering};

	use super::*;

	fn counting(quiet_ms: u64) -> (Debouncer, Arc<AtomicUsize>) {
		let runs = Arc::new(AtomicUsize::new(0));
		let counter = Arc::clone(&runs);
		let debouncer = Debouncer::spawn("test", Duration::from_millis(quiet_ms), CancellationToken::new(), move || {
			let counter = Arc::clone(&counter);
			async move {
				counter.fetch_add(1, Ordering::SeqCst);
			}
		});
		(debouncer, runs)
	}

	#[tokio::test(start_paused = true)]
	async fn burst_runs_once_after_quiet_window() {
		let (debouncer, runs) = counting(500);
		for _ in 0..5 {
			debouncer.trigger();
			tokio::time::sleep(Duration::from_millis(100)).await;
		}
		assert_eq!(runs.load(Ordering::SeqCst), 0);
		tokio::time::sleep(Duration::from_millis(600)).await;
		assert_eq!(runs.load(Ordering::SeqCst), 1);
		debouncer.shutdown().await;
	}

	#[tokio::test(start_paused = true)]
	async fn separated_triggers_run_separately() {
		let (debouncer, runs) = counting(500);
		debouncer.trigger();
		tokio::time::sleep(Duration::from_millis(700)).await;
		debouncer.trigger();
		tokio::time::sleep(Duration::from_millis(700)).await;
		assert_eq!(runs.load(Ordering::SeqCst), 2);
		debouncer.shutdown().await;
	}

	#[tokio::test(start_paused = true)]
	async fn runs_never_overlap() {
		let active = Arc::new(AtomicUsize::new(0));
		let max = Arc::new(AtomicUsize::new(0));
		let (a, m) = (Arc::clone(&active), Arc::clone(&max));
		let debouncer = Debouncer::spawn("overlap", Duration::from_millis(10), CancellationToken::new(), move || {
			let (a, m) = (Arc::clone(&a), Arc::clone(&m));
			async move {
				let now = a.fetch_add(1, Ordering::SeqCst) + 1;
				m.fetch_max(now, Ordering::SeqCst);
				tokio::time::sleep(Duration::from_millis(100)).await;
				a.fetch_sub(1, Ordering::SeqCst);
			}
		});
		for _ in 0..10 {
			debouncer.trigger();
			tokio::time::sleep(Duration::from_millis(30)).await;
		}
		tokio::time::sleep(Duration::from_millis(500)).await;
		assert_eq!(max.load(Ordering::SeqCst), 1);
		debouncer.shutdown().await;
	}

	#[tokio::test(start_paused = true)]
	async fn shutdown_drops_pending_trigger() {
		let (debouncer, runs) = counting(500);
		debouncer.trigger();
		tokio::time::sleep(Duration::from_millis(100)).await;
		debouncer.shutdown().await;
		tokio::time::sleep(Duration::from_millis(1000)).await;
		assert_eq!(runs.load(Ordering::SeqCst), 0);
	}
}
