//! Subcommand orchestration.
pub mod adopt;
pub mod link;
pub mod version;

use anyhow::{Context as _, Result};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::cli::GlobalOpts;
use crate::config::Settings;
use crate::engine::Context;
use crate::logging::Log;

/// Environment variable naming the source tree when `--source` is absent.
pub const SOURCE_ENV: &str = "LINKER_SOURCE";

/// Shared state produced by the common command setup sequence.
#[derive(Debug)]
pub struct CommandSetup {
    /// Validated context for the run.
    pub ctx: Context,
}

impl CommandSetup {
    /// Resolve the source root and settings, then build the run context.
    ///
    /// Prints the dry-run banner once the context is known to be valid.
    ///
    /// # Errors
    ///
    /// Returns an error if interactive mode was requested (checked before
    /// anything is read), the source root cannot be determined, the settings
    /// file is invalid, or no host name can be found.
    pub fn init(global: &GlobalOpts, verbose: bool, log: Arc<dyn Log>) -> Result<Self> {
        global.check_supported()?;
        let source_root = resolve_source_root(global)?;

        log.stage("Resolving settings");
        let settings = Settings::resolve(
            &source_root,
            global.hostname.as_deref(),
            global.link_options(verbose),
        )
        .with_context(|| format!("loading settings for {}", source_root.display()))?;
        log.info(&format!("source: {}", settings.source_root.display()));
        log.info(&format!("host: {}", settings.host));

        let ctx = Context::new(settings, Arc::clone(&log))?;
        if ctx.dry_run() {
            log.warn("THIS IS A DRY RUN");
            log.warn("NOTHING WILL ACTUALLY BE CREATED / DESTROYED / MOVED");
        }
        Ok(Self { ctx })
    }
}

/// Resolve the source tree from `--source`, `$LINKER_SOURCE`, or the
/// current directory, in that order.
///
/// # Errors
///
/// Returns an error if the current directory cannot be determined.
pub fn resolve_source_root(global: &GlobalOpts) -> Result<PathBuf> {
    source_root_from(global.source.as_deref(), std::env::var_os(SOURCE_ENV))
}

fn source_root_from(explicit: Option<&Path>, env: Option<OsString>) -> Result<PathBuf> {
    if let Some(root) = explicit {
        return Ok(root.to_path_buf());
    }
    if let Some(root) = env.filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(root));
    }
    std::env::current_dir().context("cannot determine source tree. Use --source or set LINKER_SOURCE")
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::logging::{LogEntry, MemoryLog};

    #[test]
    fn explicit_source_wins() {
        let root = source_root_from(Some(Path::new("/explicit")), Some("/env".into())).unwrap();
        assert_eq!(root, PathBuf::from("/explicit"));
    }

    #[test]
    fn env_source_used_when_no_flag() {
        let root = source_root_from(None, Some("/env".into())).unwrap();
        assert_eq!(root, PathBuf::from("/env"));
    }

    #[test]
    fn empty_env_falls_back_to_cwd() {
        let root = source_root_from(None, Some(OsString::new())).unwrap();
        assert_eq!(root, std::env::current_dir().unwrap());
    }

    #[test]
    fn init_prints_dry_run_banner() {
        let dir = tempfile::tempdir().unwrap();
        let global = GlobalOpts {
            source: Some(dir.path().to_path_buf()),
            hostname: Some("laptop".to_string()),
            dry_run: true,
            ..GlobalOpts::default()
        };
        let log = Arc::new(MemoryLog::new());
        let setup = CommandSetup::init(&global, false, log.clone()).unwrap();
        assert!(setup.ctx.options().verbose);
        assert!(log.entries().contains(&LogEntry::Warn("THIS IS A DRY RUN".to_string())));
    }

    #[test]
    fn init_rejects_interactive_before_banner() {
        let dir = tempfile::tempdir().unwrap();
        let global = GlobalOpts {
            source: Some(dir.path().to_path_buf()),
            hostname: Some("laptop".to_string()),
            dry_run: true,
            interactive: true,
            ..GlobalOpts::default()
        };
        let log = Arc::new(MemoryLog::new());
        let err = CommandSetup::init(&global, false, log.clone()).unwrap_err();
        assert!(err.to_string().contains("not implemented"));
        assert!(!log.messages().iter().any(|m| m.contains("DRY RUN")));
    }

    #[test]
    fn init_rejects_interactive_before_reading_settings() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("linker.toml"), "hostname = [").unwrap();
        let global = GlobalOpts {
            source: Some(dir.path().to_path_buf()),
            interactive: true,
            ..GlobalOpts::default()
        };
        let log = Arc::new(MemoryLog::new());
        let err = CommandSetup::init(&global, false, log.clone()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<crate::error::LinkerError>(),
            Some(crate::error::LinkerError::InteractiveNotImplemented)
        ));
        assert!(log.entries().is_empty());
    }

    #[test]
    fn init_reports_invalid_settings_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("linker.toml"), "hostname = [").unwrap();
        let global = GlobalOpts {
            source: Some(dir.path().to_path_buf()),
            ..GlobalOpts::default()
        };
        let err = CommandSetup::init(&global, false, Arc::new(MemoryLog::new())).unwrap_err();
        assert!(format!("{err:#}").contains("linker.toml"));
    }
}
