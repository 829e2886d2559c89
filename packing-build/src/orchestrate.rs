//! Build every package of a workspace in declaration order.

use std::path::PathBuf;

use packing_manifest::{PackageSpec, Workspace};
use tracing::info;

use crate::{
    BuildError, Result,
    plan::plan,
    sync::{SyncSummary, Synchronizer},
};

/// Options for a workspace build.
#[derive(Debug, Clone, Default)]
pub struct BuildOptions {
    /// Preview synchronization without writing
    pub dry_run: bool,
    /// Restrict the run to these packages; empty means all
    pub only: Vec<String>,
}

/// Result of building one package.
#[derive(Debug, Clone)]
pub struct PackageOutcome {
    pub name: String,
    pub out_dir: PathBuf,
    /// Dependencies written into the package manifest
    pub dependencies: Vec<(String, String)>,
    /// Number of files in the package, excluding the manifest
    pub files: usize,
    pub sync: SyncSummary,
}

/// Plan and synchronize a single package.
pub fn build_package(
    workspace: &Workspace,
    spec: &PackageSpec,
    dry_run: bool,
) -> Result<PackageOutcome> {
    let build = plan(workspace, spec)?;
    let sync = Synchronizer::new(workspace.root())
        .dry_run(dry_run)
        .sync(&build)?;

    Ok(PackageOutcome {
        name: build.package.clone(),
        out_dir: build.out_dir.clone(),
        dependencies: build
            .dependencies()
            .into_iter()
            .map(|(name, version)| (name.to_string(), version.to_string()))
            .collect(),
        files: build.files.len(),
        sync,
    })
}

/// Build the selected packages, calling `on_built` after each one.
///
/// Stops at the first failure; packages already written stay on disk.
pub fn build_workspace(
    workspace: &Workspace,
    options: &BuildOptions,
    mut on_built: impl FnMut(&PackageOutcome),
) -> Result<Vec<PackageOutcome>> {
    let selected = select(workspace, &options.only)?;

    let mut outcomes = Vec::with_capacity(selected.len());
    for spec in selected {
        info!(package = %spec.name, "building package");
        let outcome = build_package(workspace, spec, options.dry_run)?;
        on_built(&outcome);
        outcomes.push(outcome);
    }
    Ok(outcomes)
}

/// Packages to build, in declaration order.
fn select<'a>(workspace: &'a Workspace, only: &[String]) -> Result<Vec<&'a PackageSpec>> {
    for name in only {
        if workspace.config().package(name).is_none() {
            return Err(BuildError::UnknownPackage { name: name.clone() });
        }
    }

    Ok(workspace
        .packages()
        .iter()
        .filter(|spec| only.is_empty() || only.contains(&spec.name))
        .collect())
}
