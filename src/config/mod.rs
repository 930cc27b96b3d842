//! Run settings: command-line overrides merged with `linker.toml`.
pub mod toml_loader;

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::platform::Host;

/// Name of the optional settings file at the top of the source root.
pub const SETTINGS_FILE: &str = "linker.toml";

/// Behaviour switches for a linking run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)]
pub struct LinkOptions {
    /// Skip the `common` bucket and link only this host's files.
    pub exclude_common: bool,
    /// Delete colliding entries instead of moving them to `<link>.back`.
    pub delete_existing: bool,
    /// Narrate every action without touching the filesystem.
    pub dry_run: bool,
    /// Narrate every decision.
    pub verbose: bool,
    /// Ask before each change. Recognised, but rejected when a run starts.
    pub interactive: bool,
}

/// Contents of `linker.toml`. Every key is optional.
#[derive(Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct FileSettings {
    /// Bucket name to use instead of the detected host name.
    #[serde(default)]
    pub hostname: Option<String>,
    /// Default for [`LinkOptions::exclude_common`].
    #[serde(default)]
    pub exclude_common: bool,
    /// Default for [`LinkOptions::delete_existing`].
    #[serde(default)]
    pub delete_existing: bool,
}

impl FileSettings {
    /// Load `<source_root>/linker.toml`, or defaults if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(source_root: &Path) -> Result<Self, ConfigError> {
        toml_loader::load_config(&source_root.join(SETTINGS_FILE))
    }
}

/// Immutable configuration for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Directory holding the `common/` and `<hostname>/` buckets.
    pub source_root: PathBuf,
    /// Host whose bucket is linked alongside `common`.
    pub host: Host,
    /// Behaviour switches.
    pub options: LinkOptions,
}

impl Settings {
    /// Build settings from already-resolved values.
    #[must_use]
    pub fn new(source_root: impl Into<PathBuf>, host: Host, options: LinkOptions) -> Self {
        Self {
            source_root: source_root.into(),
            host,
            options,
        }
    }

    /// Resolve settings for `source_root`, layering the settings file under
    /// the command-line values.
    ///
    /// The host name comes from `hostname`, else the settings file, else the
    /// OS. Boolean options from the command line can only switch an option on.
    ///
    /// # Errors
    ///
    /// Returns an error if the source root cannot be made absolute, the
    /// settings file is invalid, or no usable host name is found.
    pub fn resolve(
        source_root: &Path,
        hostname: Option<&str>,
        mut options: LinkOptions,
    ) -> Result<Self, ConfigError> {
        let source_root = absolute_path(source_root)?;
        let file = FileSettings::load(&source_root)?;

        let host = Host::resolve(hostname.or(file.hostname.as_deref()))?;
        options.exclude_common |= file.exclude_common;
        options.delete_existing |= file.delete_existing;

        Ok(Self::new(source_root, host, options))
    }
}

/// Make `path` absolute, resolving symlinks when it exists.
///
/// Paths that do not exist yet are made absolute lexically against the
/// current directory.
///
/// # Errors
///
/// Returns an error if the current directory cannot be determined.
pub fn absolute_path(path: &Path) -> Result<PathBuf, ConfigError> {
    dunce::canonicalize(path)
        .or_else(|_| std::path::absolute(path))
        .map_err(|source| ConfigError::Path {
            path: path.to_path_buf(),
            source,
        })
}
