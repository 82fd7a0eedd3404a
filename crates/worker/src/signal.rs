use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::Notify;

/// Outcome of raising a [`Signal`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalOutcome {
	/// No signal was pending; the receiver will wake.
	Raised,
	/// A signal was already pending and absorbed this one.
	Coalesced,
	/// The receiving side is gone.
	Closed,
}

#[derive(Default)]
struct SignalState {
	pending: bool,
	closed: bool,
}

#[derive(Default)]
struct SignalInner {
	state: Mutex<SignalState>,
	notify: Notify,
}

/// Bounded coalescing channel of payload-free wakeups.
///
/// Holds at most one pending signal: raising while one is pending folds
/// the two together. The receiver therefore sees one wakeup per burst.
#[derive(Clone, Default)]
pub struct Signal {
	inner: Arc<SignalInner>,
}

/// Receiving half of a [`Signal`].
pub struct SignalReceiver {
	inner: Arc<SignalInner>,
}

impl Signal {
	/// Creates a signal and its receiver.
	pub fn channel() -> (Self, SignalReceiver) {
		let signal = Self::default();
		let receiver = SignalReceiver {
			inner: Arc::clone(&signal.inner),
		};
		(signal, receiver)
	}

	/// Raises the signal.
	pub fn raise(&self) -> SignalOutcome {
		let mut state = self.inner.state.lock();
		if state.closed {
			return SignalOutcome::Closed;
		}
		if state.pending {
			return SignalOutcome::Coalesced;
		}
		state.pending = true;
		drop(state);
		self.inner.notify.notify_one();
		SignalOutcome::Raised
	}

	/// Closes the channel. A pending signal is still delivered once.
	pub fn close(&self) {
		self.inner.state.lock().closed = true;
		self.inner.notify.notify_one();
	}

	/// Returns true when a raised signal has not been received yet.
	pub fn is_pending(&self) -> bool {
		self.inner.state.lock().pending
	}
}

impl SignalReceiver {
	/// Waits for the next signal. Returns `false` once closed and drained.
	pub async fn recv(&mut self) -> bool {
		loop {
			let notified = self.inner.notify.notified();
			{
				let mut state = self.inner.state.lock();
				if state.pending {
					state.pending = false;
					return true;
				}
				if state.closed {
					return false;
				}
			}
			notified.await;
		}
	}

	/// Consumes a pending signal without waiting.
	pub fn try_recv(&mut self) -> bool {
		std::mem::take(&mut self.inner.state.lock().pending)
	}
}

impl Drop for SignalReceiver {
	fn drop(&mut self) {
		self.inner.state.lock().closed = true;
	}
}
