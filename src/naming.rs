//! Source basename ↔ link path transformation.
//!
//! Files in a bucket are stored flat. A `_` in the basename stands for a path
//! separator and a doubled `__` for a literal underscore. A basename that
//! starts with `_` names an absolute path on the system:
//!
//! | stored basename      | link path              |
//! |----------------------|------------------------|
//! | `bashrc`             | `<dest>/bashrc`        |
//! | `config_git_config`  | `<dest>/config/git/config` |
//! | `my__file`           | `<dest>/my_file`       |
//! | `_etc_hosts`         | `/etc/hosts`           |
use std::path::{MAIN_SEPARATOR_STR, Path, PathBuf};

/// Leading character marking a basename as an absolute system path.
pub const ABSOLUTE_MARKER: char = '_';

const SEPARATOR: &str = "_";
const ESCAPED_UNDERSCORE: &str = "__";

/// Compute where the link for a stored file should live.
///
/// # Examples
///
/// ```
/// use dotfile_linker::naming::link_path_for;
/// use std::path::{Path, PathBuf};
///
/// let dest = Path::new("/home/me");
/// assert_eq!(link_path_for(".vimrc", dest), PathBuf::from("/home/me/.vimrc"));
/// assert_eq!(link_path_for("common_file5", dest), PathBuf::from("/home/me/common/file5"));
/// assert_eq!(link_path_for("_tmp_commonfile4", dest), PathBuf::from("/tmp/commonfile4"));
/// ```
#[must_use]
pub fn link_path_for(source_basename: &str, destination_root: &Path) -> PathBuf {
    let decoded = decode(source_basename);
    if source_basename.starts_with(ABSOLUTE_MARKER) {
        Path::new(MAIN_SEPARATOR_STR).join(decoded.trim_start_matches('/'))
    } else {
        destination_root.join(decoded)
    }
}

/// Compute the flat basename under which a live file is stored in a bucket.
///
/// `source_root` is stripped first when `destination_path` lies inside it.
///
/// # Examples
///
/// ```
/// use dotfile_linker::naming::storage_name_for;
/// use std::path::Path;
///
/// let root = Path::new("/home/me/dotfiles");
/// assert_eq!(storage_name_for(Path::new("/etc/hosts"), root), "_etc_hosts");
/// assert_eq!(storage_name_for(Path::new("/tmp/test_file"), root), "_tmp_test__file");
/// ```
#[must_use]
pub fn storage_name_for(destination_path: &Path, source_root: &Path) -> String {
    let relative = destination_path
        .strip_prefix(source_root)
        .unwrap_or(destination_path);
    encode(&relative.to_string_lossy())
}

fn decode(name: &str) -> String {
    name.replace(SEPARATOR, "/").replace("//", SEPARATOR)
}

fn encode(path: &str) -> String {
    path.replace(SEPARATOR, ESCAPED_UNDERSCORE)
        .replace(['/', std::path::MAIN_SEPARATOR], SEPARATOR)
}
