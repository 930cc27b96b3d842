//! Finding the stored files that should be linked.
//!
//! A source root holds one flat directory per bucket: `common/` for files
//! shared by every machine and `<hostname>/` for one machine's files. Every
//! non-directory entry in a bucket is a candidate, except names ending in
//! [`EXCLUDE_SUFFIX`].
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::LinkerError;
use crate::operations::FileSystemOps;
use crate::platform::{COMMON_BUCKET, Host};

/// Files whose name ends with this suffix are never linked.
pub const EXCLUDE_SUFFIX: &str = ".dontlink";

/// A directory of stored files inside the source root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Bucket {
    /// Files shared by every host.
    Common,
    /// Files for one host only.
    Host(String),
}

impl Bucket {
    /// The bucket for `host`.
    #[must_use]
    pub fn for_host(host: &Host) -> Self {
        Self::Host(host.name().to_string())
    }

    /// Directory name of the bucket under the source root.
    #[must_use]
    pub fn dir_name(&self) -> &str {
        match self {
            Self::Common => COMMON_BUCKET,
            Self::Host(name) => name,
        }
    }

    /// Full path of the bucket under `source_root`.
    #[must_use]
    pub fn path(&self, source_root: &Path) -> PathBuf {
        source_root.join(self.dir_name())
    }
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

/// List the linkable files directly inside `directory`, sorted by name.
///
/// A missing directory yields an empty list.
///
/// # Errors
///
/// Returns [`LinkerError::Discovery`] if the directory exists but cannot be
/// read.
pub fn list_sources(fs: &dyn FileSystemOps, directory: &Path) -> Result<Vec<PathBuf>, LinkerError> {
    let entries = match fs.read_dir(directory) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(source) => {
            return Err(LinkerError::Discovery {
                path: directory.to_path_buf(),
                source,
            });
        }
    };

    let mut sources: Vec<PathBuf> = entries
        .into_iter()
        .filter(|path| !is_excluded(path) && !fs.is_dir(path))
        .collect();
    sources.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(sources)
}

/// Every file to link for `host`: the common bucket first (unless
/// `exclude_common`), then the host bucket.
///
/// # Errors
///
/// Propagates [`list_sources`] errors.
pub fn find_targets(
    fs: &dyn FileSystemOps,
    source_root: &Path,
    host: &Host,
    exclude_common: bool,
) -> Result<Vec<PathBuf>, LinkerError> {
    let mut buckets = Vec::with_capacity(2);
    if !exclude_common {
        buckets.push(Bucket::Common);
    }
    buckets.push(Bucket::for_host(host));

    let mut targets = Vec::new();
    for bucket in &buckets {
        targets.extend(list_sources(fs, &bucket.path(source_root))?);
    }
    Ok(targets)
}

fn is_excluded(path: &Path) -> bool {
    path.file_name()
        .is_some_and(|name| name.to_string_lossy().ends_with(EXCLUDE_SUFFIX))
}
