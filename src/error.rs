use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DebounceError {
    #[error(
        "max_wait ({max_wait:?}) is shorter than the quiet period ({wait:?}); \
         the ceiling must be at least the quiet period"
    )]
    MaxWaitTooShort { max_wait: Duration, wait: Duration },
}
