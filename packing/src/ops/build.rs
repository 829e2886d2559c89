//! Build operation - extract every selected package.

use packing_build::{BuildOptions, Result, build_workspace};
use packing_core::to_slash;
use packing_manifest::Workspace;

use crate::reports::{BuildReport, Output, PackageReport, Report};

/// Execute the build operation.
///
/// Each package is reported to `out` as soon as it is built, so packages
/// finished before a failure are still listed.
pub fn build(
    workspace: &Workspace,
    options: &BuildOptions,
    out: &mut dyn Output,
) -> Result<BuildReport> {
    let outcomes = build_workspace(workspace, options, |outcome| {
        PackageReport::from_outcome(outcome, options.dry_run).render(&mut *out);
    })?;

    Ok(BuildReport {
        dry_run: options.dry_run,
        out_dir: to_slash(&workspace.config().out_dir),
        packages: outcomes.len(),
        copied: outcomes.iter().map(|o| o.sync.copied.len()).sum(),
        removed: outcomes.iter().map(|o| o.sync.removed.len()).sum(),
    })
}
