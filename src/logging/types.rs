//! The [`Log`] trait shared by every logging backend.

/// Abstraction over logging backends.
///
/// [`Logger`](super::logger::Logger) emits through `tracing`;
/// [`MemoryLog`](super::memory::MemoryLog) keeps entries in memory. Engine
/// code logs through `Arc<dyn Log>` without knowing which one it has.
///
/// Narration of individual link decisions goes to [`debug`](Log::debug)
/// (shown on the console only when verbose) or, in a dry run, to
/// [`dry_run`](Log::dry_run).
pub trait Log: Send + Sync {
    /// Log a stage header (major section).
    fn stage(&self, msg: &str);
    /// Log an informational message.
    fn info(&self, msg: &str);
    /// Log a debug message (may be suppressed on console).
    fn debug(&self, msg: &str);
    /// Log a warning message.
    fn warn(&self, msg: &str);
    /// Log an error message.
    fn error(&self, msg: &str);
    /// Log a dry-run action message.
    fn dry_run(&self, msg: &str);
}
