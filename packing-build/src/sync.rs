//! Output synchronization.
//!
//! Reconciles a package output directory with a planned [`Build`]: stale
//! entries are deleted first, then the manifest is rewritten and every
//! planned file is copied unless the destination is already up to date.

use std::{
    collections::HashSet,
    fs,
    path::{Path, PathBuf},
};

use packing_core::{CopyResult, File, WriteResult, copy_file, modified, to_slash};
use packing_manifest::MANIFEST_FILE;
use tracing::debug;

use crate::{BuildError, Result, manifest::render_manifest, plan::Build};

/// What a synchronization changed (or would change, for a dry run).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncSummary {
    /// Files and emptied directories removed, relative to the output directory
    pub removed: Vec<PathBuf>,
    /// Destinations that were copied
    pub copied: Vec<PathBuf>,
    /// Destinations that were already up to date
    pub up_to_date: Vec<PathBuf>,
    /// Outcome of the manifest write
    pub manifest: Option<WriteResult>,
}

/// Writes builds into their output directories.
#[derive(Debug, Clone)]
pub struct Synchronizer {
    root: PathBuf,
    dry_run: bool,
}

impl Synchronizer {
    /// Create a synchronizer resolving sources against the project `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            dry_run: false,
        }
    }

    /// Only report what would change.
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Make `build.out_dir` match the build exactly.
    pub fn sync(&self, build: &Build) -> Result<SyncSummary> {
        let mut summary = SyncSummary::default();
        let preserve = build.preserve_set();

        self.prune(&build.out_dir, Path::new(""), &preserve, &mut summary)?;

        let manifest = File::new(
            build.out_dir.join(MANIFEST_FILE),
            render_manifest(&build.manifest)?,
        );
        let written = manifest
            .write(self.dry_run)
            .map_err(|e| BuildError::io(manifest.path(), e))?;
        summary.manifest = Some(written);

        for entry in &build.files {
            let src = self.root.join(entry.src());
            let dest = build.out_dir.join(entry.name());

            let Some(src_modified) = modified(&src).map_err(|e| BuildError::io(&src, e))? else {
                return Err(BuildError::NotFound {
                    path: entry.src().to_path_buf(),
                });
            };

            let result = if self.dry_run {
                match modified(&dest).map_err(|e| BuildError::io(&dest, e))? {
                    Some(dest_modified) if dest_modified >= src_modified => CopyResult::UpToDate,
                    _ => CopyResult::Copied,
                }
            } else {
                copy_file(&src, &dest).map_err(|e| BuildError::io(&dest, e))?
            };

            match result {
                CopyResult::Copied => {
                    debug!(file = %to_slash(entry.name()), "copied");
                    summary.copied.push(entry.name().to_path_buf());
                }
                CopyResult::UpToDate => {
                    debug!(file = %to_slash(entry.name()), "up to date");
                    summary.up_to_date.push(entry.name().to_path_buf());
                }
            }
        }

        Ok(summary)
    }

    /// Post-order deletion pass over `dir`.
    ///
    /// Returns whether `dir` is (or would be) empty afterwards.
    fn prune(
        &self,
        dir: &Path,
        relative: &Path,
        preserve: &HashSet<PathBuf>,
        summary: &mut SyncSummary,
    ) -> Result<bool> {
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(true),
            Err(e) => return Err(BuildError::io(dir, e)),
        };

        let mut children = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| BuildError::io(dir, e))?;
            children.push(entry.path());
        }
        children.sort();

        let mut empty = true;
        for path in children {
            let Some(name) = path.file_name() else {
                continue;
            };
            let child = relative.join(name);

            let meta = match fs::symlink_metadata(&path) {
                Ok(meta) => meta,
                // Removed while we were walking
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => continue,
                Err(e) => return Err(BuildError::io(&path, e)),
            };

            if meta.is_file() {
                if preserve.contains(&child) {
                    empty = false;
                    continue;
                }
                if !self.dry_run {
                    fs::remove_file(&path).map_err(|e| BuildError::io(&path, e))?;
                }
                debug!(file = %to_slash(&child), "removed stale file");
                summary.removed.push(child);
            } else if meta.is_dir() {
                if !self.prune(&path, &child, preserve, summary)? {
                    empty = false;
                    continue;
                }
                if !self.dry_run {
                    fs::remove_dir(&path).map_err(|e| BuildError::io(&path, e))?;
                }
                debug!(dir = %to_slash(&child), "removed empty directory");
                summary.removed.push(child);
            } else {
                return Err(BuildError::NotFileOrDirectory { path });
            }
        }

        Ok(empty)
    }
}

/// Compute what [`Synchronizer::sync`] would do without touching disk.
pub fn preview(root: impl Into<PathBuf>, build: &Build) -> Result<SyncSummary> {
    Synchronizer::new(root).dry_run(true).sync(build)
}
