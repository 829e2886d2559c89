//! Check operation - resolve every package without writing.

use packing_build::{Result, plan};
use packing_manifest::{CONFIG_FILE, Lockfile, Workspace};

use crate::reports::{CheckReport, PackageSummary};

/// Execute the check operation.
///
/// Plans every package so that undeclared dependencies, missing files and
/// escaping paths are reported exactly as a build would report them.
pub fn check(workspace: &Workspace) -> Result<CheckReport> {
    let mut packages = Vec::with_capacity(workspace.packages().len());

    for spec in workspace.packages() {
        let build = plan(workspace, spec)?;
        packages.push(PackageSummary {
            name: build.package.clone(),
            files: build.files.len(),
            dependencies: build
                .dependencies()
                .into_iter()
                .map(|(name, version)| format!("{name}@{version}"))
                .collect(),
        });
    }

    Ok(CheckReport {
        config_path: workspace.root().join(CONFIG_FILE),
        lockfile: workspace.lockfile().map(Lockfile::lockfile_version),
        packages,
    })
}
