//! Structured logger backed by `tracing`.
use std::path::PathBuf;

use super::subscriber::{DRY_RUN_TARGET, STAGE_TARGET};
use super::types::Log;
use super::utils::log_file_path;

/// Implement the methods of [`Log`] by delegating to inherent methods of the
/// same name on the implementing type.
macro_rules! forward_log_methods {
    ($($method:ident),+ $(,)?) => {
        $(
            fn $method(&self, msg: &str) {
                self.$method(msg);
            }
        )+
    };
}

/// Structured logger with dry-run awareness.
///
/// Messages are emitted as `tracing` events; the subscriber installed by
/// [`init_subscriber`](super::subscriber::init_subscriber) renders them on the
/// console and appends them to `$XDG_CACHE_HOME/linker/<command>.log`.
#[derive(Debug)]
pub struct Logger {
    log_file: Option<PathBuf>,
}

impl Logger {
    /// Create a new logger for `command`.
    ///
    /// Stores the log file path for display at the end of a run; the file
    /// itself is created by the subscriber's file layer.
    #[must_use]
    pub fn new(command: &str) -> Self {
        Self::with_log_file(log_file_path(command))
    }

    /// Create a logger that reports `log_file` as its persistent log.
    #[must_use]
    pub const fn with_log_file(log_file: Option<PathBuf>) -> Self {
        Self { log_file }
    }

    /// Return the log file path, if available.
    #[must_use]
    pub const fn log_path(&self) -> Option<&PathBuf> {
        self.log_file.as_ref()
    }

    /// Log an error message.
    pub fn error(&self, msg: &str) {
        tracing::error!("{msg}");
    }

    /// Log a warning message.
    pub fn warn(&self, msg: &str) {
        tracing::warn!("{msg}");
    }

    /// Log a stage header (major section).
    pub fn stage(&self, msg: &str) {
        tracing::info!(target: STAGE_TARGET, "{msg}");
    }

    /// Log an informational message.
    pub fn info(&self, msg: &str) {
        tracing::info!("{msg}");
    }

    /// Log a debug message (suppressed on console unless verbose; always
    /// written to the log file).
    pub fn debug(&self, msg: &str) {
        tracing::debug!("{msg}");
    }

    /// Log a dry-run action message.
    pub fn dry_run(&self, msg: &str) {
        tracing::info!(target: DRY_RUN_TARGET, "{msg}");
    }
}

impl Log for Logger {
    forward_log_methods!(stage, info, debug, warn, error, dry_run);
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::logging::isolated_logger;
    use std::fs;

    fn contents(log: &Logger) -> String {
        let path = log.log_path().expect("log path");
        fs::read_to_string(path).unwrap()
    }

    #[test]
    fn log_file_is_created() {
        let (log, _tmp, _guard) = isolated_logger();
        let path = log.log_path().expect("log path should exist");
        assert!(path.exists(), "log file should be created by the file layer");
    }

    /// The file line that carries `marker`.
    fn line_with(log: &Logger, marker: &str) -> String {
        contents(log)
            .lines()
            .find(|line| line.contains(marker))
            .unwrap_or_else(|| panic!("no line with {marker}"))
            .to_string()
    }

    #[test]
    fn debug_always_written_to_file() {
        let (log, _tmp, _guard) = isolated_logger();
        let marker = format!("debug-marker-{}", std::process::id());
        log.debug(&marker);
        assert!(line_with(&log, &marker).contains(&format!(" debug  {marker}")));
    }

    #[test]
    fn warn_and_error_are_tagged() {
        let (log, _tmp, _guard) = isolated_logger();
        log.warn("warn-marker");
        log.error("error-marker");
        assert!(line_with(&log, "warn-marker").contains(" warn   warn-marker"));
        assert!(line_with(&log, "error-marker").contains(" error  error-marker"));
    }

    #[test]
    fn link_failure_warning_is_tagged_failed() {
        let (log, _tmp, _guard) = isolated_logger();
        log.warn("linking /etc/hosts failed: permission denied");
        assert!(line_with(&log, "/etc/hosts").contains(" failed linking /etc/hosts"));
    }

    #[test]
    fn stage_is_tagged() {
        let (log, _tmp, _guard) = isolated_logger();
        log.stage("stage-marker");
        assert!(line_with(&log, "stage-marker").contains(" stage  stage-marker"));
    }

    #[test]
    fn dry_run_narration_keeps_action_tag() {
        let (log, _tmp, _guard) = isolated_logger();
        log.dry_run("linking /s/a to /h/a");
        assert!(line_with(&log, "/h/a").contains(" link   (dry run) linking /s/a to /h/a"));
    }

    #[test]
    fn log_trait_delegates_to_logger() {
        let (log, _tmp, _guard) = isolated_logger();
        let log_ref: &dyn Log = &log;
        log_ref.info("via-trait");
        assert!(contents(&log).contains("via-trait"));
    }
}
