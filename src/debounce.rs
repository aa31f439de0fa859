pub mod debouncer;
pub mod handle;
pub mod options;

// Re-export public types
pub use debouncer::Debouncer;
pub use handle::DebounceHandle;
pub use options::DebounceOptions;
