//! `packing.json` workspace configuration.

use std::path::{Path, PathBuf};

use packing_core::{escapes_root, normalize};
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::{Result, SourceContext};

/// Root of `packing.json`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackingConfig {
    /// Directory receiving one subdirectory per package, relative to the project root
    pub out_dir: PathBuf,

    /// Packages to extract, built in declaration order
    #[serde(default)]
    pub packages: Vec<PackageSpec>,
}

/// One output package
#[derive(Debug, Clone, Deserialize)]
pub struct PackageSpec {
    /// Package name, also the subdirectory of `outDir` it is written to
    pub name: String,

    /// Entry script glob patterns
    #[serde(default)]
    pub js: Vec<String>,

    /// Extra non-script files
    #[serde(default)]
    pub files: Vec<PackageFile>,

    /// Fields overriding the generated package.json
    #[serde(default)]
    pub package_json: Option<Map<String, Value>>,
}

/// An extra file: either a path (or glob) copied to the same relative
/// location, or an explicit source renamed to `name` in the output.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum PackageFile {
    Path(String),
    Renamed { name: String, src: String },
}

impl PackingConfig {
    /// Look up a package by name.
    pub fn package(&self, name: &str) -> Option<&PackageSpec> {
        self.packages.iter().find(|p| p.name == name)
    }

    /// Validate the configuration after parsing.
    pub(crate) fn validate(&self, ctx: &SourceContext) -> Result<()> {
        if self.out_dir.as_os_str().is_empty() {
            return Err(ctx.validation_error("outDir must not be empty", Some("outDir")));
        }

        // Output directories must be distinct and must not nest
        let mut seen: Vec<(PathBuf, &str)> = Vec::with_capacity(self.packages.len());
        for package in &self.packages {
            let dir = package.validate(ctx)?;
            for (other_dir, other) in &seen {
                if *other_dir == dir {
                    return Err(ctx.validation_error(
                        format!("package '{}' is declared more than once", package.name),
                        Some(&package.name),
                    ));
                }
                if dir.starts_with(other_dir) || other_dir.starts_with(&dir) {
                    return Err(ctx.validation_error(
                        format!(
                            "package '{}' overlaps the output of package '{}'",
                            package.name, other
                        ),
                        Some(&package.name),
                    ));
                }
            }
            seen.push((dir, &package.name));
        }
        Ok(())
    }
}

impl PackageSpec {
    /// Returns the normalized output subdirectory of the package.
    fn validate(&self, ctx: &SourceContext) -> Result<PathBuf> {
        let dir = normalize(self.name.trim());
        if dir == Path::new(".") {
            return Err(ctx.validation_error("package name must not be empty", Some(&self.name)));
        }

        if escapes_root(&dir) {
            return Err(ctx.validation_error(
                format!("package '{}' would be written outside of outDir", self.name),
                Some(&self.name),
            ));
        }

        if self.js.is_empty() && self.files.is_empty() {
            return Err(ctx.validation_error(
                format!("package '{}' has neither js entries nor files", self.name),
                Some(&self.name),
            ));
        }

        Ok(dir)
    }
}
