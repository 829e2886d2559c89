//! Test utilities for the build engine.
//!
//! This module is only available when the `testing` feature is enabled
//! or during tests.

use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use packing_core::normalize;

use crate::{BuildError, Result, SourceTree, source::is_glob};

/// An in-memory project tree.
///
/// # Example
///
/// ```ignore
/// let tree = MemoryTree::new()
///     .file("src/index.js", "require('./a')")
///     .file("src/a.js", "");
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryTree {
    files: BTreeMap<PathBuf, String>,
}

impl MemoryTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file.
    pub fn file(mut self, path: impl AsRef<Path>, content: impl Into<String>) -> Self {
        self.files.insert(normalize(path), content.into());
        self
    }
}

impl SourceTree for MemoryTree {
    fn read(&self, path: &Path) -> Result<String> {
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| BuildError::NotFound {
                path: path.to_path_buf(),
            })
    }

    fn is_file(&self, path: &Path) -> bool {
        self.files.contains_key(path)
    }

    fn glob(&self, pattern: &str) -> Result<Vec<PathBuf>> {
        if !is_glob(pattern) {
            return Ok(vec![normalize(pattern)]);
        }
        let matcher = glob::Pattern::new(pattern).map_err(|e| BuildError::InvalidPattern {
            pattern: pattern.to_string(),
            message: e.msg.to_string(),
        })?;
        // BTreeMap keys are already sorted
        Ok(self
            .files
            .keys()
            .filter(|path| matcher.matches_path(path))
            .cloned()
            .collect())
    }
}
