//! Access to the project's source files.

use std::{
    fs,
    path::{Path, PathBuf},
};

use packing_core::normalize;
use tracing::warn;

use crate::{BuildError, Result};

/// Read-only view of the project tree.
///
/// All paths are relative to the project root.
pub trait SourceTree {
    /// Read a file as text. Invalid UTF-8 is replaced rather than rejected,
    /// since only the ASCII import specifiers matter.
    fn read(&self, path: &Path) -> Result<String>;

    /// Check whether a regular file exists.
    fn is_file(&self, path: &Path) -> bool;

    /// Expand a glob pattern into matching files, sorted.
    ///
    /// A pattern without glob metacharacters is returned as-is (normalized),
    /// so a missing literal entry fails later when it is read.
    fn glob(&self, pattern: &str) -> Result<Vec<PathBuf>>;
}

/// Check whether a pattern contains glob metacharacters.
pub fn is_glob(pattern: &str) -> bool {
    pattern.contains(['*', '?', '['])
}

/// The project tree on disk.
#[derive(Debug, Clone)]
pub struct DiskTree {
    root: PathBuf,
}

impl DiskTree {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl SourceTree for DiskTree {
    fn read(&self, path: &Path) -> Result<String> {
        let bytes = fs::read(self.root.join(path)).map_err(|e| BuildError::io(path, e))?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    fn is_file(&self, path: &Path) -> bool {
        self.root.join(path).is_file()
    }

    fn glob(&self, pattern: &str) -> Result<Vec<PathBuf>> {
        if !is_glob(pattern) {
            return Ok(vec![normalize(pattern)]);
        }

        let root = glob::Pattern::escape(&self.root.to_string_lossy());
        let full = if root.is_empty() {
            pattern.to_string()
        } else {
            format!("{}/{}", root.trim_end_matches('/'), pattern)
        };

        let entries = glob::glob(&full).map_err(|e| BuildError::InvalidPattern {
            pattern: pattern.to_string(),
            message: e.msg.to_string(),
        })?;

        let mut files = Vec::new();
        for entry in entries {
            let path = entry.map_err(|e| {
                let path = e.path().to_path_buf();
                BuildError::io(path, e.into_error())
            })?;
            if !path.is_file() {
                continue;
            }
            let relative = path.strip_prefix(&self.root).unwrap_or(&path);
            files.push(normalize(relative));
        }
        files.sort();

        if files.is_empty() {
            warn!(pattern, "pattern matched no files");
        }
        Ok(files)
    }
}
