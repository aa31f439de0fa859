//! Tokio timer driver for the debouncer
//!
//! Runs the trailing and max-wait timers on a spawned task so edges
//! fire on their own; `call`/`cancel`/`flush` stay synchronous. One
//! task per handle, cancelled when the handle is dropped.
//!
//! The source pattern of one timeout handle per edge (armed and cleared
//! independently) becomes a single task that sleeps until the earliest
//! armed deadline and is nudged to recompute whenever state changes.

use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio::sync::Notify;
use tokio_util::sync::CancellationToken;

use crate::debounce::debouncer::Debouncer;
use crate::debounce::options::DebounceOptions;
use crate::error::DebounceError;

/// Controller for a debounced operation whose timers run on tokio.
///
/// Created with [`spawn`](Self::spawn), which must be called inside a
/// tokio runtime. All three operations are synchronous: a leading-edge
/// or flushed execution runs on the caller's thread before the method
/// returns; trailing-edge executions triggered by elapsed time run on
/// the timer task.
///
/// Dropping the handle cancels the timer task and with it any pending
/// invocation.
pub struct DebounceHandle<A, R> {
    shared: Arc<Mutex<Debouncer<A, R>>>,
    /// Nudges the timer task to recompute its sleep after a state change
    rearm: Arc<Notify>,
    shutdown: CancellationToken,
}

impl<A, R> DebounceHandle<A, R>
where
    A: Send + 'static,
    R: Clone + Send + 'static,
{
    /// Wrap `op` and spawn the timer task.
    ///
    /// Fails like [`Debouncer::new`] when the configured ceiling is
    /// shorter than the quiet period.
    pub fn spawn(
        op: impl FnMut(A) -> R + Send + 'static,
        wait: Duration,
        options: DebounceOptions,
    ) -> Result<Self, DebounceError> {
        let shared = Arc::new(Mutex::new(Debouncer::new(op, wait, options)?));
        let rearm = Arc::new(Notify::new());
        let shutdown = CancellationToken::new();

        tokio::spawn(timer_loop(
            Arc::clone(&shared),
            Arc::clone(&rearm),
            shutdown.clone(),
        ));

        Ok(Self {
            shared,
            rearm,
            shutdown,
        })
    }

    /// Record an invocation attempt; executes immediately on a leading
    /// edge, otherwise returns the retained result.
    ///
    /// A panic from a leading-edge execution propagates to the caller.
    pub fn call(&self, args: A) -> Option<R> {
        let now = tokio::time::Instant::now().into_std();
        let result = lock(&self.shared).call_at(args, now);
        self.rearm.notify_one();
        result
    }

    /// Discard any pending invocation without running it. Idempotent.
    pub fn cancel(&self) {
        lock(&self.shared).cancel();
        self.rearm.notify_one();
    }

    /// Run any pending invocation now, on the calling thread.
    ///
    /// The deadlines armed for the burst are disarmed, so the timer task
    /// will not fire a second time for it.
    pub fn flush(&self) -> Option<R> {
        let now = tokio::time::Instant::now().into_std();
        let result = lock(&self.shared).flush_at(now);
        self.rearm.notify_one();
        result
    }

    /// Whether a call is waiting for a trailing execution.
    pub fn is_pending(&self) -> bool {
        lock(&self.shared).is_pending()
    }

    /// Result of the most recent execution, if the operation ever ran.
    pub fn last_result(&self) -> Option<R> {
        lock(&self.shared).last_result().cloned()
    }
}

impl<A, R> Drop for DebounceHandle<A, R> {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

/// Lock the shared debouncer, recovering from poisoning.
///
/// The state machine resets itself before invoking the operation, so a
/// panicking operation leaves it idle and consistent; refusing to serve
/// further calls would turn one bad execution into a wedged debouncer.
fn lock<A, R>(shared: &Mutex<Debouncer<A, R>>) -> MutexGuard<'_, Debouncer<A, R>> {
    shared.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Sleep until the earliest armed deadline, fire the trailing edge, and
/// re-arm; park while the debouncer is idle.
async fn timer_loop<A, R>(
    shared: Arc<Mutex<Debouncer<A, R>>>,
    rearm: Arc<Notify>,
    shutdown: CancellationToken,
) where
    A: Send + 'static,
    R: Clone + Send + 'static,
{
    loop {
        let deadline = lock(&shared).next_deadline();

        tokio::select! {
            _ = shutdown.cancelled() => break,
            _ = rearm.notified() => {
                // State changed under us; recompute the sleep
            }
            _ = sleep_until_deadline(deadline) => {
                fire(&shared);
            }
        }
    }
}

async fn sleep_until_deadline(deadline: Option<std::time::Instant>) {
    match deadline {
        Some(deadline) => {
            tokio::time::sleep_until(tokio::time::Instant::from_std(deadline)).await;
        }
        // Idle: wait for a rearm nudge instead
        None => std::future::pending::<()>().await,
    }
}

/// Run the trailing edge for an elapsed deadline.
///
/// No caller is waiting on a timer turn, so a panicking operation is
/// reported through the log rather than dropped silently, and the task
/// keeps serving later bursts.
fn fire<A, R: Clone>(shared: &Mutex<Debouncer<A, R>>) {
    let now = tokio::time::Instant::now().into_std();
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
        lock(shared).poll_at(now);
    }));

    if let Err(payload) = outcome {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "unknown panic in debounced operation".to_string()
        };
        log::error!("debounced operation panicked on trailing edge: {}", message);
    }
}

#[cfg(test)]
#[path = "handle_tests.rs"]
mod handle_tests;
