//! Filesystem operation abstractions for dependency injection.
//!
//! Every query and mutation made by discovery, the link resource and the
//! engine goes through [`FileSystemOps`], so the decision logic can be
//! unit-tested without touching the real filesystem.  Production code uses
//! [`SystemFileSystemOps`]; unit tests use the `mockall`-generated
//! `MockFileSystemOps`.

use std::io;
use std::path::{Path, PathBuf};

/// Abstraction over the filesystem calls made while linking.
#[cfg_attr(test, mockall::automock)]
pub trait FileSystemOps: Send + Sync {
    /// Returns `true` if anything occupies `path`, including a broken symlink.
    fn entry_exists(&self, path: &Path) -> bool;

    /// Returns `true` if `path` is a directory (following symlinks).
    fn is_dir(&self, path: &Path) -> bool;

    /// Returns the immediate child paths inside `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if `path` cannot be opened or read as a directory.
    fn read_dir(&self, path: &Path) -> io::Result<Vec<PathBuf>>;

    /// Resolve every symlink in `path` to an absolute, canonical path.
    ///
    /// # Errors
    ///
    /// Returns an error if `path` (or a link along it) does not resolve.
    fn canonicalize(&self, path: &Path) -> io::Result<PathBuf>;

    /// Create `path` and all of its missing ancestors.
    ///
    /// # Errors
    ///
    /// Returns an error if a component cannot be created; an existing
    /// directory is not an error.
    fn create_dir_all(&self, path: &Path) -> io::Result<()>;

    /// Rename `from` to `to` on the same filesystem.
    ///
    /// # Errors
    ///
    /// Returns an error if the rename fails.
    fn rename(&self, from: &Path, to: &Path) -> io::Result<()>;

    /// Move a regular file, copying across filesystem boundaries.
    ///
    /// # Errors
    ///
    /// Returns an error if neither a rename nor a copy + delete succeeds.
    fn move_file(&self, from: &Path, to: &Path) -> io::Result<()>;

    /// Remove the file, symlink or empty directory at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if removal fails (including non-empty directories).
    fn remove(&self, path: &Path) -> io::Result<()>;

    /// Create a symlink at `link` pointing to `source`.
    ///
    /// # Errors
    ///
    /// Returns an error if `link` is occupied or cannot be created.
    fn symlink(&self, source: &Path, link: &Path) -> io::Result<()>;
}

/// Production [`FileSystemOps`] implementation that delegates to [`std::fs`].
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemFileSystemOps;

impl FileSystemOps for SystemFileSystemOps {
    fn entry_exists(&self, path: &Path) -> bool {
        path.symlink_metadata().is_ok()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn read_dir(&self, path: &Path) -> io::Result<Vec<PathBuf>> {
        std::fs::read_dir(path)?
            .map(|e| e.map(|entry| entry.path()))
            .collect()
    }

    fn canonicalize(&self, path: &Path) -> io::Result<PathBuf> {
        dunce::canonicalize(path)
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        std::fs::create_dir_all(path)
    }

    fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        std::fs::rename(from, to)
    }

    fn move_file(&self, from: &Path, to: &Path) -> io::Result<()> {
        match std::fs::rename(from, to) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::CrossesDevices => {
                std::fs::copy(from, to)?;
                if let Err(e) = std::fs::remove_file(from) {
                    let _ = std::fs::remove_file(to);
                    return Err(e);
                }
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    fn remove(&self, path: &Path) -> io::Result<()> {
        let meta = std::fs::symlink_metadata(path)?;
        if meta.is_dir() {
            std::fs::remove_dir(path)
        } else {
            std::fs::remove_file(path)
        }
    }

    fn symlink(&self, source: &Path, link: &Path) -> io::Result<()> {
        #[cfg(unix)]
        {
            std::os::unix::fs::symlink(source, link)
        }

        #[cfg(windows)]
        {
            if source.is_dir() {
                std::os::windows::fs::symlink_dir(source, link)
            } else {
                std::os::windows::fs::symlink_file(source, link)
            }
        }
    }
}
