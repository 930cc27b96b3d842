//! Idempotent link primitive (check + apply pattern).
pub mod fs;
pub mod link;

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

pub use link::{LinkResource, reconcile};

/// State of a link path relative to the source it should point at.
///
/// # Examples
///
/// ```
/// use dotfile_linker::resources::ResourceState;
///
/// let missing = ResourceState::Missing;
///
/// assert_ne!(missing, ResourceState::Correct);
/// assert_ne!(ResourceState::Incorrect, ResourceState::Correct);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceState {
    /// Nothing occupies the link path.
    Missing,
    /// The link path resolves to the source.
    Correct,
    /// Something else occupies the link path, or a symlink there dangles.
    Incorrect,
}

/// Result of reconciling one link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkOutcome {
    /// The path was empty and the link was created.
    Linked,
    /// The link already resolved to the source; nothing changed.
    AlreadyCorrect,
    /// The previous occupant was moved aside and the link was created.
    BackedUp {
        /// Where the previous occupant now lives.
        backup: PathBuf,
    },
    /// The previous occupant was deleted and the link was created.
    Replaced,
}

impl LinkOutcome {
    /// `true` if a link was (or, in a dry run, would be) created.
    #[must_use]
    pub const fn created_link(&self) -> bool {
        !matches!(self, Self::AlreadyCorrect)
    }
}

/// What earlier targets of a dry run would already have put in place.
///
/// A dry run leaves the filesystem alone, so a later target that shares a
/// link path or parent directory with an earlier one consults this instead
/// of seeing the untouched disk.
#[derive(Debug, Default)]
pub struct Planned {
    links: HashMap<PathBuf, PathBuf>,
    backups: HashSet<PathBuf>,
    dirs: Vec<PathBuf>,
}

impl Planned {
    /// The source a planned link at `link` would point to.
    #[must_use]
    pub fn link_target(&self, link: &Path) -> Option<&Path> {
        self.links.get(link).map(PathBuf::as_path)
    }

    /// Whether `dir` would exist once planned directories are created.
    #[must_use]
    pub fn has_dir(&self, dir: &Path) -> bool {
        self.dirs.iter().any(|planned| planned.starts_with(dir))
    }

    /// Whether something would have been moved to `backup`.
    #[must_use]
    pub fn has_backup(&self, backup: &Path) -> bool {
        self.backups.contains(backup)
    }

    pub(crate) fn add_link(&mut self, link: &Path, source: &Path) {
        self.links.insert(link.to_path_buf(), source.to_path_buf());
    }

    pub(crate) fn add_backup(&mut self, backup: &Path) {
        self.backups.insert(backup.to_path_buf());
    }

    pub(crate) fn add_dir(&mut self, dir: &Path) {
        self.dirs.push(dir.to_path_buf());
    }
}
