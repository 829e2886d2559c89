//! Input model for the packing build tool.
//!
//! Three JSON resources describe a project:
//!
//! - [`PackingConfig`] - `packing.json`, the output directory and the packages to extract
//! - [`RootManifest`] - the project's own `package.json`
//! - [`Lockfile`] - `package-lock.json`, carried along but not interpreted
//!
//! [`Workspace`] loads all three from a project root.

mod config;
mod error;
mod json;
mod lockfile;
mod root_manifest;
mod workspace;

pub use config::{PackageFile, PackageSpec, PackingConfig};
pub use error::{Error, Result, SourceContext};
pub use lockfile::Lockfile;
pub use root_manifest::RootManifest;
pub use workspace::{CONFIG_FILE, LOCKFILE, MANIFEST_FILE, Workspace};
