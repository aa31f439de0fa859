//! Core debounce state machine
//!
//! Collapses bursts of calls into a bounded number of executions of the
//! wrapped operation. Every transition can take an explicit `Instant`,
//! so host loops (and tests) control time; the plain variants use
//! `Instant::now()`.

use std::time::{Duration, Instant};

use crate::debounce::options::DebounceOptions;
use crate::error::DebounceError;

/// Debounces an operation `FnMut(A) -> R`.
///
/// A burst starts with the first call seen while idle and ends when the
/// quiet period elapses without further calls, when the max-wait ceiling
/// expires, or on `flush`/`cancel`. Depending on [`DebounceOptions`],
/// the operation runs on the leading edge (first call, its arguments),
/// the trailing edge (latest arguments), or both.
///
/// Operations with several parameters take them as a tuple. The result
/// of the most recent execution is retained: calls that only reschedule
/// return it unchanged, which is why `R: Clone`.
///
/// The debouncer never fires on its own; the owner either drives it
/// from an event loop via [`poll`](Self::poll) and
/// [`next_deadline`](Self::next_deadline), or wraps it in a
/// [`DebounceHandle`](crate::debounce::handle::DebounceHandle) which
/// runs the timers on tokio.
pub struct Debouncer<A, R> {
    op: Box<dyn FnMut(A) -> R + Send>,
    wait: Duration,
    options: DebounceOptions,
    /// Latest arguments not yet executed; present iff a trailing
    /// invocation is still owed
    pending: Option<A>,
    /// First call time of the current burst
    burst_started_at: Option<Instant>,
    /// Quiet-period deadline; re-armed on every call of the burst
    trailing_deadline: Option<Instant>,
    /// Ceiling deadline; anchored to burst start, never re-armed
    max_deadline: Option<Instant>,
    /// Result of the most recent execution, retained across bursts
    last_result: Option<R>,
}

impl<A, R> std::fmt::Debug for Debouncer<A, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Debouncer")
            .field("wait", &self.wait)
            .field("options", &self.options)
            .field("pending", &self.pending.is_some())
            .field("burst_started_at", &self.burst_started_at)
            .field("trailing_deadline", &self.trailing_deadline)
            .field("max_deadline", &self.max_deadline)
            .finish()
    }
}

impl<A, R: Clone> Debouncer<A, R> {
    /// Create a debouncer around `op` with the given quiet period.
    ///
    /// A `wait` of zero is allowed: the trailing edge becomes due on the
    /// next timer turn. Fails with [`DebounceError::MaxWaitTooShort`]
    /// when a configured ceiling is shorter than the quiet period, since
    /// such a ceiling could never take effect deterministically.
    pub fn new(
        op: impl FnMut(A) -> R + Send + 'static,
        wait: Duration,
        options: DebounceOptions,
    ) -> Result<Self, DebounceError> {
        if let Some(max_wait) = options.max_wait {
            if max_wait < wait {
                return Err(DebounceError::MaxWaitTooShort { max_wait, wait });
            }
        }

        Ok(Self {
            op: Box::new(op),
            wait,
            options,
            pending: None,
            burst_started_at: None,
            trailing_deadline: None,
            max_deadline: None,
            last_result: None,
        })
    }

    /// Record an invocation attempt at the current time.
    ///
    /// See [`call_at`](Self::call_at).
    pub fn call(&mut self, args: A) -> Option<R> {
        self.call_at(args, Instant::now())
    }

    /// Record an invocation attempt at `now`.
    ///
    /// The arguments overwrite any previously pending ones. The first
    /// call while idle starts a burst: it arms the quiet-period deadline
    /// (and the ceiling, if configured) and executes immediately when
    /// `leading` is set. Calls during a burst only re-arm the
    /// quiet-period deadline; the ceiling keeps measuring from burst
    /// start. Returns the result of the execution this call triggered,
    /// or the retained result of the most recent one (`None` if the
    /// operation has never run).
    pub fn call_at(&mut self, args: A, now: Instant) -> Option<R> {
        self.pending = Some(args);

        if self.burst_started_at.is_none() {
            // Leading edge: open the burst and arm the timers
            self.burst_started_at = Some(now);
            self.trailing_deadline = Some(now + self.wait);
            self.max_deadline = self.options.max_wait.map(|max_wait| now + max_wait);

            if self.options.leading {
                if let Some(args) = self.pending.take() {
                    return Some(self.execute(args));
                }
            }
            return self.last_result.clone();
        }

        // Subsequent call in the burst: restart the quiet period only
        self.trailing_deadline = Some(now + self.wait);
        self.last_result.clone()
    }

    /// Discard any pending invocation without running it.
    ///
    /// Disarms both deadlines and ends the burst; the retained result is
    /// left at the last executed value. No-op when nothing is pending.
    pub fn cancel(&mut self) {
        self.trailing_deadline = None;
        self.max_deadline = None;
        self.pending = None;
        self.burst_started_at = None;
    }

    /// Run a pending invocation immediately, collapsing the wait.
    ///
    /// See [`flush_at`](Self::flush_at).
    pub fn flush(&mut self) -> Option<R> {
        self.flush_at(Instant::now())
    }

    /// Perform trailing-edge handling now instead of at the deadline.
    ///
    /// When no burst is active this is a no-op returning the retained
    /// result. Otherwise the pending call executes synchronously (if
    /// `trailing` is set and one exists) and the burst ends, so the
    /// deadline originally armed for it will not fire a second time.
    pub fn flush_at(&mut self, now: Instant) -> Option<R> {
        if self.burst_started_at.is_none() && self.pending.is_none() {
            return self.last_result.clone();
        }
        self.fire_trailing_edge(now)
    }

    /// Fire the trailing edge if a deadline has been reached.
    ///
    /// See [`poll_at`](Self::poll_at).
    pub fn poll(&mut self) -> Option<R> {
        self.poll_at(Instant::now())
    }

    /// Fire the trailing edge iff `now` has reached the earliest armed
    /// deadline; otherwise return the retained result unchanged.
    ///
    /// This is the timer-expiry entry point: a host loop sleeps until
    /// [`next_deadline`](Self::next_deadline) and then polls.
    pub fn poll_at(&mut self, now: Instant) -> Option<R> {
        match self.next_deadline() {
            Some(deadline) if now >= deadline => self.fire_trailing_edge(now),
            _ => self.last_result.clone(),
        }
    }

    /// The earliest armed deadline, or `None` when idle.
    pub fn next_deadline(&self) -> Option<Instant> {
        match (self.trailing_deadline, self.max_deadline) {
            (Some(trailing), Some(max)) => Some(trailing.min(max)),
            (Some(trailing), None) => Some(trailing),
            (None, Some(max)) => Some(max),
            (None, None) => None,
        }
    }

    /// Whether a call is waiting for a trailing execution.
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Result of the most recent execution, if the operation ever ran.
    pub fn last_result(&self) -> Option<&R> {
        self.last_result.as_ref()
    }

    /// End the burst: disarm both deadlines, then execute the pending
    /// call iff the trailing edge is enabled.
    ///
    /// State is fully reset before the operation runs, so a panicking
    /// operation leaves the debouncer idle with the previous result.
    fn fire_trailing_edge(&mut self, _now: Instant) -> Option<R> {
        self.trailing_deadline = None;
        self.max_deadline = None;
        self.burst_started_at = None;

        if self.options.trailing {
            if let Some(args) = self.pending.take() {
                return Some(self.execute(args));
            }
        }

        self.pending = None;
        self.last_result.clone()
    }

    fn execute(&mut self, args: A) -> R {
        let result = (self.op)(args);
        self.last_result = Some(result.clone());
        result
    }
}

#[cfg(test)]
#[path = "debouncer_tests.rs"]
mod debouncer_tests;
