//! Host detection: which bucket holds this machine's files.
use std::fmt;

use crate::error::ConfigError;

/// Name of the bucket shared by every host.
pub const COMMON_BUCKET: &str = "common";

/// The machine the linker is running for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Host {
    name: String,
}

impl Host {
    /// Use an explicit host name (from the command line or settings file).
    ///
    /// # Errors
    ///
    /// Returns an error if the name is empty or contains a path separator.
    pub fn named(name: impl Into<String>) -> Result<Self, ConfigError> {
        let name = name.into();
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(ConfigError::Hostname("host name is empty".to_string()));
        }
        if trimmed.contains(['/', '\\']) {
            return Err(ConfigError::Hostname(format!(
                "host name '{trimmed}' contains a path separator"
            )));
        }
        Ok(Self {
            name: trimmed.to_string(),
        })
    }

    /// Detect the current machine's network host name.
    ///
    /// # Errors
    ///
    /// Returns an error if the OS host name is not valid UTF-8 or is unusable
    /// as a bucket name.
    pub fn detect() -> Result<Self, ConfigError> {
        let raw = gethostname::gethostname();
        let name = raw.into_string().map_err(|raw| {
            ConfigError::Hostname(format!("host name {raw:?} is not valid UTF-8"))
        })?;
        Self::named(name)
    }

    /// Resolve from an optional override, detecting when absent.
    ///
    /// # Errors
    ///
    /// Propagates errors from [`Host::named`] and [`Host::detect`].
    pub fn resolve(explicit: Option<&str>) -> Result<Self, ConfigError> {
        explicit.map_or_else(Self::detect, Self::named)
    }

    /// The host name, used verbatim as the bucket directory name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for Host {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
