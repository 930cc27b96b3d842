//! In-memory logger that records every message it receives.
use std::sync::Mutex;

use super::types::Log;

/// A single captured log entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogEntry {
    /// A stage header entry.
    Stage(String),
    /// An informational entry.
    Info(String),
    /// A debug entry.
    Debug(String),
    /// A warning entry.
    Warn(String),
    /// An error entry.
    Error(String),
    /// A dry-run entry.
    DryRun(String),
}

impl LogEntry {
    /// The message text, regardless of level.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Stage(msg)
            | Self::Info(msg)
            | Self::Debug(msg)
            | Self::Warn(msg)
            | Self::Error(msg)
            | Self::DryRun(msg) => msg,
        }
    }
}

/// Implement the methods of [`Log`] by pushing each message into
/// `self.entries` as the corresponding [`LogEntry`] variant.
macro_rules! record_log_methods {
    ($($method:ident => $variant:ident),+ $(,)?) => {
        $(
            fn $method(&self, msg: &str) {
                if let Ok(mut guard) = self.entries.lock() {
                    guard.push(LogEntry::$variant(msg.to_string()));
                }
            }
        )+
    };
}

/// Logger that keeps every entry in memory instead of emitting it.
///
/// Useful for embedding the engine in another program, or for asserting on
/// the exact narration produced by a run.
#[derive(Debug, Default)]
pub struct MemoryLog {
    entries: Mutex<Vec<LogEntry>>,
}

impl MemoryLog {
    /// Create an empty memory log.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Mutex::new(Vec::new()),
        }
    }

    /// Snapshot of all entries recorded so far, in order.
    #[must_use]
    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }

    /// Message text of all entries recorded so far, in order.
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.entries()
            .iter()
            .map(|e| e.message().to_string())
            .collect()
    }
}

impl Log for MemoryLog {
    record_log_methods! {
        stage   => Stage,
        info    => Info,
        debug   => Debug,
        warn    => Warn,
        error   => Error,
        dry_run => DryRun,
    }
}
