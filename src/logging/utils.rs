//! Where log files live and how their timestamps look.
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{SecondsFormat, Utc};

/// Directory under the cache root that holds one log per command.
const LOG_DIR: &str = "linker";

/// `$XDG_CACHE_HOME`, else `$HOME/.cache`. Empty variables count as unset.
fn cache_root() -> Option<PathBuf> {
    let non_empty = |var| std::env::var_os(var).filter(|v| !v.is_empty());
    non_empty("XDG_CACHE_HOME")
        .map(PathBuf::from)
        .or_else(|| non_empty("HOME").map(|home| PathBuf::from(home).join(".cache")))
}

/// `<cache_root>/linker/<command>.log`, creating the directory if needed.
pub(super) fn log_file_in(cache_root: &Path, command: &str) -> Option<PathBuf> {
    let dir = cache_root.join(LOG_DIR);
    fs::create_dir_all(&dir).ok()?;
    Some(dir.join(command).with_extension("log"))
}

/// Log file for `command` under the user's cache directory.
pub(super) fn log_file_path(command: &str) -> Option<PathBuf> {
    log_file_in(&cache_root()?, command)
}

/// Wall-clock prefix for each log line.
pub(super) fn clock() -> String {
    Utc::now().format("%H:%M:%S").to_string()
}

/// RFC 3339 timestamp for the run header.
pub(super) fn run_started() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}
