//! Path containment checks.

use std::path::{Path, PathBuf};

use packing_core::{escapes_root, normalize, to_slash};

use crate::{BuildError, Result};

/// Normalize `path` and make sure it stays inside the directory it is relative to.
///
/// Returns the normalized path. A path that climbs out (`../x`) or is absolute
/// fails with [`BuildError::PathEscape`], using `message` when given.
pub fn ensure_within(path: impl AsRef<Path>, message: Option<&str>) -> Result<PathBuf> {
    let path = path.as_ref();
    if escapes_root(path) {
        let message = match message {
            Some(message) => message.to_string(),
            None => format!(
                "encountered a file which does not belong to the project: {}",
                to_slash(normalize(path))
            ),
        };
        return Err(BuildError::PathEscape {
            path: path.to_path_buf(),
            message,
        });
    }
    Ok(normalize(path))
}
