//! Lexical path helpers.
//!
//! Nothing in here touches the filesystem: paths are treated as plain
//! sequences of components.

use std::path::{Component, Path, PathBuf};

/// Normalize a path lexically (e.g., "src/./lib/../index.js" -> "src/index.js").
///
/// `.` segments are dropped and `name/..` pairs are folded. Leading `..`
/// segments that cannot be folded are kept, so a path climbing above its
/// starting point stays recognizable. An empty result is returned as `.`.
pub fn normalize(path: impl AsRef<Path>) -> PathBuf {
    let mut out = PathBuf::new();

    for component in path.as_ref().components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                // "/.." is still "/"
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
            other => out.push(other.as_os_str()),
        }
    }

    if out.as_os_str().is_empty() {
        out.push(".");
    }
    out
}

/// Check whether a path, once normalized, leaves the directory it is relative to.
///
/// Absolute paths always escape.
pub fn escapes_root(path: impl AsRef<Path>) -> bool {
    let path = path.as_ref();
    if path.has_root() || path.is_absolute() {
        return true;
    }
    matches!(
        normalize(path).components().next(),
        Some(Component::ParentDir) | Some(Component::Prefix(_))
    )
}

/// Render a relative path with `/` separators regardless of platform.
pub fn to_slash(path: impl AsRef<Path>) -> String {
    path.as_ref()
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
