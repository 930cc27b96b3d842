//! File-system resource helpers.
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use super::Planned;
use crate::engine::Context;
use crate::error::LinkerError;

/// Suffix appended to a colliding entry when it is moved aside.
pub const BACKUP_SUFFIX: &str = ".back";

/// `<path>.back`, with the suffix appended verbatim to the final component.
#[must_use]
pub fn backup_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(BACKUP_SUFFIX);
    PathBuf::from(name)
}

/// Ensure every ancestor directory of `link` exists.
///
/// Narrates the creation. A dry run only narrates, and records the directory
/// in `planned` so it is narrated once per pass.
///
/// # Errors
///
/// Returns [`LinkerError::CreateDir`] if the directory cannot be created.
/// Callers treat this as fatal for the whole run.
pub fn ensure_parent_dirs(
    ctx: &Context,
    link: &Path,
    planned: &mut Planned,
) -> Result<(), LinkerError> {
    let Some(parent) = link.parent().filter(|p| !p.as_os_str().is_empty()) else {
        return Ok(());
    };
    if ctx.fs_ops.entry_exists(parent) || (ctx.dry_run() && planned.has_dir(parent)) {
        return Ok(());
    }

    ctx.narrate(&format!(
        "directory {} doesn't exist... creating it",
        parent.display()
    ));
    if ctx.dry_run() {
        planned.add_dir(parent);
        return Ok(());
    }
    ctx.fs_ops
        .create_dir_all(parent)
        .map_err(|source| LinkerError::CreateDir {
            path: parent.to_path_buf(),
            source,
        })
}
