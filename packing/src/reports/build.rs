//! Build command report data structures.

use packing_build::PackageOutcome;
use packing_core::to_slash;

use super::output::{Output, Report};

/// One package, rendered as soon as it is built.
#[derive(Debug)]
pub struct PackageReport {
    /// Package name.
    pub name: String,
    /// Whether this was a dry run.
    pub dry_run: bool,
    /// Files that were (or would be) copied.
    pub copied: Vec<String>,
    /// Entries that were (or would be) removed.
    pub removed: Vec<String>,
}

impl PackageReport {
    pub fn from_outcome(outcome: &PackageOutcome, dry_run: bool) -> Self {
        Self {
            name: outcome.name.clone(),
            dry_run,
            copied: outcome.sync.copied.iter().map(to_slash).collect(),
            removed: outcome.sync.removed.iter().map(to_slash).collect(),
        }
    }
}

impl Report for PackageReport {
    fn render(&self, out: &mut dyn Output) {
        if !self.dry_run {
            out.preformatted(&format!("built {}", self.name));
            return;
        }

        out.preformatted(&format!("would build {}", self.name));
        for path in &self.removed {
            out.removed_item(path);
        }
        for path in &self.copied {
            out.added_item(path);
        }
    }
}

/// Summary of a whole build run.
#[derive(Debug)]
pub struct BuildReport {
    /// Whether this was a dry run.
    pub dry_run: bool,
    /// Configured output directory.
    pub out_dir: String,
    /// Number of packages built.
    pub packages: usize,
    /// Total files copied.
    pub copied: usize,
    /// Total entries removed.
    pub removed: usize,
}

impl Report for BuildReport {
    fn render(&self, out: &mut dyn Output) {
        if self.packages == 0 {
            out.warning("no packages selected");
            return;
        }

        out.newline();
        let verb = if self.dry_run { "would write" } else { "wrote" };
        out.preformatted(&format!(
            "{} {} package{} into {} ({} copied, {} removed)",
            verb,
            self.packages,
            if self.packages == 1 { "" } else { "s" },
            self.out_dir,
            self.copied,
            self.removed
        ));
    }
}
