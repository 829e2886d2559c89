//! Check command report data structures.

use std::path::PathBuf;

use super::output::{Output, Report};

/// Resolved contents of one package.
#[derive(Debug)]
pub struct PackageSummary {
    /// Package name.
    pub name: String,
    /// Number of files, excluding the generated manifest.
    pub files: usize,
    /// Dependencies as `name@version`.
    pub dependencies: Vec<String>,
}

/// Report data from workspace validation.
#[derive(Debug)]
pub struct CheckReport {
    /// Path to the config file.
    pub config_path: PathBuf,
    /// `lockfileVersion` of the project's lockfile; `None` when there is no
    /// lockfile at all.
    pub lockfile: Option<Option<u64>>,
    /// Every declared package, in build order.
    pub packages: Vec<PackageSummary>,
}

impl Report for CheckReport {
    fn render(&self, out: &mut dyn Output) {
        out.preformatted(&format!("✓ {} is valid", self.config_path.display()));
        match self.lockfile {
            None => out.warning("no package-lock.json found"),
            Some(Some(version)) => out.key_value_indented("lockfile", &format!("v{version}")),
            Some(None) => out.key_value_indented("lockfile", "unversioned"),
        }

        for package in &self.packages {
            out.newline();
            out.section(&package.name);
            out.key_value_indented("files", &package.files.to_string());
            if package.dependencies.is_empty() {
                out.key_value_indented("dependencies", "none");
            } else {
                out.key_value_indented("dependencies", &package.dependencies.len().to_string());
                for dep in &package.dependencies {
                    out.list_item(dep);
                }
            }
        }
    }
}
