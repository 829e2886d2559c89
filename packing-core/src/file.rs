use std::{
    fs, io,
    path::{Path, PathBuf},
    time::SystemTime,
};

/// Write a file, creating its parent directories first.
pub fn write_file(path: &Path, content: &str) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)
}

/// Modification time of a path, or `None` if it does not exist.
pub fn modified(path: &Path) -> io::Result<Option<SystemTime>> {
    match fs::metadata(path) {
        Ok(meta) => Ok(Some(meta.modified()?)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e),
    }
}

/// Copy `src` to `dest` unless `dest` is already up to date.
///
/// The destination counts as up to date when it exists and its modification
/// time is not older than the source's. After copying, the destination is
/// stamped with the source's modification time so that a later run with an
/// unchanged source skips the copy.
///
/// A missing source surfaces as an [`io::ErrorKind::NotFound`] error.
pub fn copy_file(src: &Path, dest: &Path) -> io::Result<CopyResult> {
    let src_modified = fs::metadata(src)?.modified()?;

    if matches!(modified(dest)?, Some(dest_modified) if dest_modified >= src_modified) {
        return Ok(CopyResult::UpToDate);
    }

    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::copy(src, dest)?;
    stamp(dest, src_modified)?;

    Ok(CopyResult::Copied)
}

fn stamp(path: &Path, time: SystemTime) -> io::Result<()> {
    // Read-only sources produce read-only copies; fall back to a read handle.
    let file = fs::File::options()
        .write(true)
        .open(path)
        .or_else(|_| fs::File::open(path))?;
    file.set_modified(time)
}

/// Result of a copy operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyResult {
    /// Bytes were copied to the destination
    Copied,
    /// Destination was already up to date
    UpToDate,
}

/// Result of a write operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteResult {
    /// File was written
    Written,
    /// File was not written (preview only)
    Skipped,
}

/// A generated file, always rewritten in full
#[derive(Debug, Clone)]
pub struct File {
    path: PathBuf,
    content: String,
}

impl File {
    /// Create a new file with the given path and content
    pub fn new(path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }

    /// Get the file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the file, or only report what would happen when `dry_run` is set
    pub fn write(&self, dry_run: bool) -> io::Result<WriteResult> {
        if dry_run {
            return Ok(WriteResult::Skipped);
        }
        write_file(&self.path, &self.content)?;
        Ok(WriteResult::Written)
    }
}
