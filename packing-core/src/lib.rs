//! Core utilities for the packing build tool.
//!
//! This crate provides the filesystem and path primitives shared by the
//! manifest loader and the build engine.

mod file;
mod path;

// File operations
pub use file::{CopyResult, File, WriteResult, copy_file, modified, write_file};
// Path utilities
pub use path::{escapes_root, normalize, to_slash};
