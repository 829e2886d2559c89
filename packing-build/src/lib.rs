//! Package build engine for the packing tool.
//!
//! Given a package declared in `packing.json`, the engine walks the import
//! graph of its entry scripts, synthesizes a `package.json` for it and keeps
//! its output directory in sync with the result.
//!
//! # Module Organization
//!
//! - [`walker`] - Module graph traversal from entry patterns
//! - [`manifest`] - Manifest synthesis and canonical serialization
//! - [`plan`] - Per-package build planning (walker, extra files, manifest)
//! - [`sync`] - Output directory synchronization
//! - [`orchestrate`] - Building every package of a workspace
//! - [`safety`] - Containment checks for project-relative paths
//! - [`testing`] - Test utilities (feature-gated)

mod builtins;
mod error;
mod imports;
mod source;
mod specifier;

pub mod manifest;
pub mod orchestrate;
pub mod plan;
pub mod safety;
pub mod sync;
pub mod walker;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use builtins::is_builtin_module;
pub use error::{BuildError, Result};
pub use imports::{ImportExtractor, JsImportScanner};
pub use manifest::{render_manifest, synthesize};
pub use orchestrate::{BuildOptions, PackageOutcome, build_package, build_workspace};
pub use plan::{Build, FileEntry, plan, plan_with};
pub use source::{DiskTree, SourceTree};
pub use specifier::{Specifier, package_root};
pub use sync::{SyncSummary, Synchronizer, preview};
pub use walker::{ModuleGraph, Walker};
