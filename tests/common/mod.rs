// Shared helpers for integration tests.
//
// Provides a temporary source tree and destination directory plus a fluent
// builder, so each integration test can set up an isolated environment
// without repeating filesystem boilerplate.
//
// Used by all integration test binaries that declare `mod common;`.
#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use dotfile_linker::config::{LinkOptions, Settings};
use dotfile_linker::engine::Context;
use dotfile_linker::logging::{LogEntry, MemoryLog};
use dotfile_linker::platform::Host;

/// Host name every test tree is built for.
pub const HOST: &str = "testhost";

/// A source tree and destination directory inside one [`tempfile::TempDir`].
///
/// The directory is automatically deleted when dropped.
pub struct SourceTree {
    /// Temporary directory holding `src/` and `dest/`.
    pub tmp: tempfile::TempDir,
    /// Source root with the `common/` and `testhost/` buckets.
    pub source_root: PathBuf,
    /// Destination directory links are created in.
    pub destination: PathBuf,
}

impl SourceTree {
    /// Build a context for [`HOST`] with `options`, logging to memory.
    pub fn context(&self, options: LinkOptions) -> (Context, Arc<MemoryLog>) {
        let log = Arc::new(MemoryLog::new());
        let host = Host::named(HOST).expect("valid host name");
        let settings = Settings::new(&self.source_root, host, options);
        let ctx = Context::new(settings, log.clone()).expect("create context");
        (ctx, log)
    }

    /// Path of a stored file in the common bucket.
    pub fn common(&self, name: &str) -> PathBuf {
        self.source_root.join("common").join(name)
    }

    /// Path of a stored file in the host bucket.
    pub fn host(&self, name: &str) -> PathBuf {
        self.source_root.join(HOST).join(name)
    }

    /// Path under the destination directory.
    pub fn dest(&self, relative: &str) -> PathBuf {
        self.destination.join(relative)
    }

    /// Every entry under the destination directory, recursively, relative to it.
    pub fn destination_entries(&self) -> Vec<PathBuf> {
        let mut entries = Vec::new();
        collect(&self.destination, &self.destination, &mut entries);
        entries.sort();
        entries
    }
}

fn collect(root: &Path, dir: &Path, out: &mut Vec<PathBuf>) {
    for entry in std::fs::read_dir(dir).expect("read dir") {
        let path = entry.expect("dir entry").path();
        out.push(path.strip_prefix(root).expect("under root").to_path_buf());
        if path.is_dir() && !path.is_symlink() {
            collect(root, &path, out);
        }
    }
}

/// Fluent builder for [`SourceTree`].
pub struct SourceTreeBuilder {
    tree: SourceTree,
}

impl SourceTreeBuilder {
    /// Begin with empty `src/` and `dest/` directories.
    pub fn new() -> Self {
        let tmp = tempfile::tempdir().expect("create temp dir");
        let root = std::fs::canonicalize(tmp.path()).expect("canonical temp dir");
        let source_root = root.join("src");
        let destination = root.join("dest");
        std::fs::create_dir_all(&source_root).expect("create src dir");
        std::fs::create_dir_all(&destination).expect("create dest dir");
        Self {
            tree: SourceTree {
                tmp,
                source_root,
                destination,
            },
        }
    }

    /// Store `name` in the common bucket.
    pub fn common(self, name: &str) -> Self {
        self.stored("common", name)
    }

    /// Store `name` in the host bucket.
    pub fn host(self, name: &str) -> Self {
        self.stored(HOST, name)
    }

    /// Store `name` in an arbitrary bucket; the content is the bucket and name.
    pub fn stored(self, bucket: &str, name: &str) -> Self {
        let dir = self.tree.source_root.join(bucket);
        std::fs::create_dir_all(&dir).expect("create bucket dir");
        std::fs::write(dir.join(name), format!("{bucket}/{name}")).expect("write stored file");
        self
    }

    /// Put a regular file at `relative` under the destination.
    pub fn existing(self, relative: &str, content: &str) -> Self {
        let path = self.tree.destination.join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create parent dir");
        }
        std::fs::write(path, content).expect("write existing file");
        self
    }

    /// Write `linker.toml` at the top of the source tree.
    pub fn settings(self, content: &str) -> Self {
        std::fs::write(self.tree.source_root.join("linker.toml"), content)
            .expect("write linker.toml");
        self
    }

    /// Finish building.
    pub fn build(self) -> SourceTree {
        self.tree
    }
}

/// Messages of all dry-run entries, in order.
pub fn dry_run_messages(log: &MemoryLog) -> Vec<String> {
    log.entries()
        .into_iter()
        .filter_map(|e| match e {
            LogEntry::DryRun(msg) => Some(msg),
            _ => None,
        })
        .collect()
}

/// Removes an absolute path on drop, for tests that link outside the tree.
pub struct RemoveOnDrop(pub PathBuf);

impl Drop for RemoveOnDrop {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.0);
        let mut backup = self.0.clone().into_os_string();
        backup.push(".back");
        let _ = std::fs::remove_file(PathBuf::from(backup));
    }
}

/// A file name under `/tmp` no other test process will use.
pub fn unique_tmp_name(label: &str) -> String {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map_or(0, |d| d.subsec_nanos());
    format!("linker-{label}-{}-{nanos}", std::process::id())
}
