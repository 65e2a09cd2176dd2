//! Filesystem path utilities.

use std::path::{Component, Path, PathBuf};

/// Join `path` onto `root` if it is relative, then drop `.` components and
/// fold `..` where a parent is available. Purely lexical; the filesystem is
/// never consulted.
pub fn absolutize(root: &Path, path: &Path) -> PathBuf {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    };

    let mut out = PathBuf::new();
    for component in joined.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push(component.as_os_str());
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}
