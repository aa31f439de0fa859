//! settle - debounce controller for bursty event streams
//!
//! Wraps an operation so that repeated calls within a short interval
//! collapse into a bounded number of executions: optionally the first
//! call of a burst (leading edge), the end of the burst with the latest
//! arguments (trailing edge), or both, with an optional max-wait
//! ceiling so sustained activity cannot starve execution forever.
//!
//! [`Debouncer`] is the synchronous state machine for callers that own
//! an event loop; [`DebounceHandle`] runs its timers on tokio so edges
//! fire without polling.

pub mod debounce;
pub mod error;

// Re-export commonly used types for convenience
pub use debounce::{DebounceHandle, DebounceOptions, Debouncer};
pub use error::DebounceError;
