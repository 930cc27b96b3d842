//! Domain-specific error types for the linking engine.
//!
//! Library code returns [`LinkerError`]; the command handlers at the CLI
//! boundary convert it to [`anyhow::Error`] via the standard `?` operator.
//!
//! # Error hierarchy
//!
//! ```text
//! LinkerError
//! ├── InteractiveNotImplemented : rejected before any filesystem work
//! ├── Config(ConfigError)       : settings file, host name, root paths
//! ├── Discovery                 : a bucket exists but cannot be listed
//! ├── CreateDir                 : ancestor directory creation (aborts the run)
//! ├── Adopt                     : moving a live file into the source tree
//! └── LinksFailed(LinkFailures) : per-target failures, raised after the pass
//! ```

use std::fmt;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for a linking run.
#[derive(Error, Debug)]
pub enum LinkerError {
    /// Interactive confirmation was requested; it is not supported.
    #[error("interactive mode is not implemented")]
    InteractiveNotImplemented,

    /// Settings could not be resolved.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A bucket directory exists but could not be listed.
    #[error("reading {path} failed: {source}")]
    Discovery {
        /// Bucket directory that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// An ancestor directory of a link path could not be created.
    #[error("creating directory {path} failed: {source}")]
    CreateDir {
        /// Directory that could not be created.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// A live file could not be moved into the source tree.
    #[error("moving {from} to {to} failed: {source}")]
    Adopt {
        /// Original location of the file.
        from: PathBuf,
        /// Storage location inside the source tree.
        to: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// One or more targets failed to link; the pass ran to completion.
    #[error("{0}")]
    LinksFailed(LinkFailures),
}

impl LinkerError {
    /// `true` when the run completed and only individual targets failed.
    #[must_use]
    pub const fn is_partial(&self) -> bool {
        matches!(self, Self::LinksFailed(_))
    }
}

/// Errors that arise while resolving settings.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The settings file exists but could not be read.
    #[error("IO error reading settings file {path}: {source}")]
    Io {
        /// Path to the settings file.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// The settings file is not valid TOML or has unexpected keys.
    #[error("Invalid settings in {path}: {source}")]
    Parse {
        /// Path to the settings file.
        path: PathBuf,
        /// Underlying parse error.
        source: toml::de::Error,
    },

    /// No host name could be determined.
    #[error("cannot determine host name: {0}")]
    Hostname(String),

    /// A root path could not be made absolute.
    #[error("cannot resolve path {path}: {source}")]
    Path {
        /// Path as supplied by the caller.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },
}

/// A single failed link attempt.
#[derive(Error, Debug)]
#[error("linking {} failed", link.display())]
pub struct LinkFailure {
    /// Link path that could not be reconciled.
    pub link: PathBuf,
    /// Underlying I/O error.
    #[source]
    pub source: io::Error,
}

impl LinkFailure {
    /// Create a failure record for `link`.
    #[must_use]
    pub fn new(link: impl Into<PathBuf>, source: io::Error) -> Self {
        Self {
            link: link.into(),
            source,
        }
    }
}

/// Every failure of one run, reported together.
#[derive(Debug, Default)]
pub struct LinkFailures(pub Vec<LinkFailure>);

impl LinkFailures {
    /// Number of failed targets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// `true` if no target failed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over the individual failures.
    pub fn iter(&self) -> impl Iterator<Item = &LinkFailure> {
        self.0.iter()
    }
}

impl fmt::Display for LinkFailures {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "failed to make some links")?;
        for failure in &self.0 {
            writeln!(f, "{failure}")?;
        }
        write!(f, "maybe you need `sudo !!`")
    }
}
