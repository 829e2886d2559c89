use std::path::PathBuf;

use clap::Args;
use eyre::Result;
use packing_manifest::Workspace;

use super::{ExitOnKnown, UnwrapOrExit};
use crate::{
    ops,
    reports::{Report, TerminalOutput},
};

#[derive(Args)]
pub struct CheckCommand {
    /// Project root containing packing.json and package.json
    #[arg(short, long, default_value = ".")]
    pub root: PathBuf,
}

impl CheckCommand {
    /// Run the check command
    pub fn run(&self) -> Result<()> {
        let workspace = Workspace::open(&self.root).unwrap_or_exit();
        let report = ops::check(&workspace).exit_on_known()?;
        report.render(&mut TerminalOutput::new());
        Ok(())
    }
}
