use std::path::Path;
use std::sync::Arc;

use crate::config::{LinkOptions, Settings, absolute_path};
use crate::error::LinkerError;
use crate::logging::Log;
use crate::operations::{FileSystemOps, SystemFileSystemOps};
use crate::platform::Host;

/// Shared, immutable context for a linking run.
pub struct Context {
    /// Resolved settings. `options.verbose` is always set when `dry_run` is.
    pub settings: Settings,
    /// Logger for narration and the run summary.
    pub log: Arc<dyn Log>,
    /// Filesystem operation abstraction (injectable for testing).
    pub fs_ops: Arc<dyn FileSystemOps>,
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("settings", &self.settings)
            .field("log", &"<dyn Log>")
            .field("fs_ops", &"<dyn FileSystemOps>")
            .finish()
    }
}

impl Context {
    /// Creates a context backed by the real filesystem.
    ///
    /// A dry run implies verbose narration. The source root is made absolute
    /// so link targets never depend on the directory a link lives in.
    ///
    /// # Errors
    ///
    /// Returns [`LinkerError::InteractiveNotImplemented`] if
    /// `settings.options.interactive` is set, and [`LinkerError::Config`] if
    /// the source root cannot be made absolute.
    pub fn new(mut settings: Settings, log: Arc<dyn Log>) -> Result<Self, LinkerError> {
        if settings.options.interactive {
            return Err(LinkerError::InteractiveNotImplemented);
        }
        settings.options.verbose |= settings.options.dry_run;
        settings.source_root = absolute_path(&settings.source_root)?;

        Ok(Self {
            settings,
            log,
            fs_ops: Arc::new(SystemFileSystemOps),
        })
    }

    /// Create a copy of this context with a different [`FileSystemOps`] implementation.
    #[must_use]
    pub fn with_fs_ops(self, fs_ops: Arc<dyn FileSystemOps>) -> Self {
        Self { fs_ops, ..self }
    }

    /// Root of the tracked source tree.
    #[must_use]
    pub fn source_root(&self) -> &Path {
        &self.settings.source_root
    }

    /// Host whose bucket is linked.
    #[must_use]
    pub const fn host(&self) -> &Host {
        &self.settings.host
    }

    /// Behaviour switches for this run.
    #[must_use]
    pub const fn options(&self) -> &LinkOptions {
        &self.settings.options
    }

    /// Whether to narrate instead of mutate.
    #[must_use]
    pub const fn dry_run(&self) -> bool {
        self.settings.options.dry_run
    }

    /// Report one decision: on the dry-run channel during a dry run, on the
    /// debug channel otherwise. Silent unless verbose.
    pub fn narrate(&self, msg: &str) {
        if self.dry_run() {
            self.log.dry_run(msg);
        } else if self.settings.options.verbose {
            self.log.debug(msg);
        }
    }
}
