use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::{TaskClass, spawn};

/// Runs `tick` every `period` until `cancel` fires.
///
/// The first run happens one full period after spawning. Ticks missed while
/// a run is slow are not replayed.
pub fn spawn_periodic<F, Fut>(name: &'static str, period: Duration, cancel: CancellationToken, mut tick: F) -> JoinHandle<()>
where
	F: FnMut() -> Fut + Send + 'static,
	Fut: Future<Output = ()> + Send + 'static,
{
	spawn(TaskClass::Maintenance, name, async move {
		let start = tokio::time::Instant::now() + period;
		let mut interval = tokio::time::interval_at(start, period);
		interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
		loop {
			tokio::select! {
				_ = cancel.cancelled() => break,
				_ = interval.tick() => {
					tracing::trace!(task = name, "worker.periodic.tick");
					tick().await;
				}
			}
		}
		tracing::debug!(task = name, "worker.periodic.stopped");
	})
}
