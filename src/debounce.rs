//! Trailing-edge call debouncing.
//!
//! Every call replaces the pending one; the callback runs once the calls pause
//! for the full delay, with the arguments of the last call.

use crate::config::DEFAULT_DEBOUNCE_MS;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::task::JoinHandle;

/// Default delay between the last call and the callback.
pub const DEFAULT_DELAY: Duration = Duration::from_millis(DEFAULT_DEBOUNCE_MS);

type Callback<A> = Arc<dyn Fn(A) + Send + Sync>;

/// Collapses bursts of calls into one trailing callback.
///
/// Scheduling uses [`tokio::spawn`], so [`Debouncer::call`] must run inside a
/// tokio runtime. Dropping the debouncer cancels a pending callback.
pub struct Debouncer<A> {
    delay: Duration,
    callback: Callback<A>,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl<A> std::fmt::Debug for Debouncer<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Debouncer")
            .field("delay", &self.delay)
            .field("pending", &self.is_pending())
            .finish()
    }
}

impl<A: Send + 'static> Debouncer<A> {
    pub fn new(delay: Duration, callback: impl Fn(A) + Send + Sync + 'static) -> Self {
        Self {
            delay,
            callback: Arc::new(callback),
            pending: Mutex::new(None),
        }
    }

    /// Schedules the callback with `args`, superseding any pending call.
    pub fn call(&self, args: A) {
        let callback = Arc::clone(&self.callback);
        let delay = self.delay;

        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = pending.take() {
            previous.abort();
        }
        *pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            callback(args);
        }));
    }
}

impl<A> Debouncer<A> {
    /// Whether a scheduled callback has not run yet.
    pub fn is_pending(&self) -> bool {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}

impl<A> Drop for Debouncer<A> {
    fn drop(&mut self) {
        let pending = self
            .pending
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(handle) = pending.take() {
            handle.abort();
        }
    }
}

/// Wraps `callback` so that bursts of calls invoke it once, `delay` after the last.
pub fn debounce<A: Send + 'static>(
    callback: impl Fn(A) + Send + Sync + 'static,
    delay: Duration,
) -> impl Fn(A) + Send + Sync {
    let debouncer = Debouncer::new(delay, callback);
    move |args: A| debouncer.call(args)
}
