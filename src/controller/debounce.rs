//! Trailing-edge debouncer driven by the UI tick.

use std::time::Duration;
use tokio::time::Instant;

/// Holds the latest value until `delay` passes without a newer one.
///
/// Nothing here spawns or sleeps; the event loop calls [`Debouncer::poll`]
/// on every tick.
#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    delay: Duration,
    pending: Option<(T, Instant)>,
}

impl<T> Debouncer<T> {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    /// Replace the pending value and restart the quiet period.
    pub fn push(&mut self, value: T) {
        self.pending = Some((value, Instant::now()));
    }

    /// Take the pending value once the quiet period has elapsed.
    pub fn poll(&mut self) -> Option<T> {
        let (_, at) = self.pending.as_ref()?;
        if at.elapsed() < self.delay {
            return None;
        }
        self.pending.take().map(|(value, _)| value)
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}
