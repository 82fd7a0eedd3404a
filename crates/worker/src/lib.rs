//! Worker primitives shared by the highlight engine contexts.
//!
//! - [`TaskClass`] and [`spawn`]: classified task spawning with tracing.
//! - [`Signal`]: a bounded, coalescing wakeup channel.
//! - [`Debouncer`]: a single-concurrency worker that collapses trigger bursts
//!   into one run after a quiet window.
//! - [`spawn_periodic`]: a cancellable fixed-period housekeeping task.

mod class;
mod debounce;
mod periodic;
mod signal;
mod spawn;

pub use class::TaskClass;
pub use debounce::Debouncer;
pub use periodic::spawn_periodic;
pub use signal::{Signal, SignalOutcome, SignalReceiver};
pub use spawn::spawn;
pub use tokio_util::sync::CancellationToken;
