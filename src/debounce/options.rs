//! Debounce configuration
//!
//! Controls which edges of a burst execute the wrapped operation and
//! whether total delay is bounded by a max-wait ceiling.

use std::time::Duration;

/// Edge and ceiling configuration for a debouncer.
///
/// The default is trailing-only: the operation runs once, after the
/// quiet period elapses, with the arguments from the most recent call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DebounceOptions {
    /// Execute on the first call of a burst
    pub leading: bool,
    /// Execute when the burst goes quiet, with the latest arguments
    pub trailing: bool,
    /// Maximum time since burst start before execution is forced,
    /// regardless of continued activity. `None` disables the ceiling.
    pub max_wait: Option<Duration>,
}

impl Default for DebounceOptions {
    fn default() -> Self {
        Self {
            leading: false,
            trailing: true,
            max_wait: None,
        }
    }
}

impl DebounceOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether the first call of a burst executes immediately.
    pub fn leading(mut self, leading: bool) -> Self {
        self.leading = leading;
        self
    }

    /// Set whether the end of a burst executes with the latest arguments.
    pub fn trailing(mut self, trailing: bool) -> Self {
        self.trailing = trailing;
        self
    }

    /// Bound the total delay since burst start.
    ///
    /// Must be at least the quiet-period duration; validated when the
    /// debouncer is constructed.
    pub fn max_wait(mut self, max_wait: Duration) -> Self {
        self.max_wait = Some(max_wait);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_trailing_only() {
        let options = DebounceOptions::default();
        assert!(!options.leading);
        assert!(options.trailing);
        assert!(options.max_wait.is_none());
    }

    #[test]
    fn test_builder_chain() {
        let options = DebounceOptions::new()
            .leading(true)
            .trailing(false)
            .max_wait(Duration::from_secs(2));
        assert!(options.leading);
        assert!(!options.trailing);
        assert_eq!(options.max_wait, Some(Duration::from_secs(2)));
    }
}
