use std::path::PathBuf;

use clap::Args;
use eyre::Result;
use packing_build::BuildOptions;
use packing_manifest::Workspace;
use tracing::debug;

use super::{ExitOnKnown, UnwrapOrExit};
use crate::{
    ops,
    reports::{Report, TerminalOutput},
};

#[derive(Args)]
pub struct BuildCommand {
    /// Project root containing packing.json and package.json
    #[arg(short, long, default_value = ".")]
    pub root: PathBuf,

    /// Only build the named package (repeatable)
    #[arg(short, long = "package", value_name = "NAME")]
    pub packages: Vec<String>,

    /// Show what would change without writing to disk
    #[arg(long)]
    pub dry_run: bool,
}

impl BuildCommand {
    /// Run the build command
    pub fn run(&self) -> Result<()> {
        let workspace = Workspace::open(&self.root).unwrap_or_exit();
        debug!(
            root = %self.root.display(),
            packages = workspace.packages().len(),
            "loaded workspace"
        );
        let options = BuildOptions {
            dry_run: self.dry_run,
            only: self.packages.clone(),
        };

        let mut out = TerminalOutput::new();
        let report = ops::build(&workspace, &options, &mut out).exit_on_known()?;
        report.render(&mut out);

        Ok(())
    }
}
