mod build;
mod check;
mod completions;

use build::BuildCommand;
use check::CheckCommand;
use clap::{ArgAction, Parser, Subcommand};
use completions::CompletionsCommand;
use eyre::Result;

/// Extension trait for exiting on manifest errors with pretty formatting
pub(crate) trait UnwrapOrExit<T> {
    fn unwrap_or_exit(self) -> T;
}

impl<T> UnwrapOrExit<T> for packing_manifest::Result<T> {
    fn unwrap_or_exit(self) -> T {
        match self {
            Ok(v) => v,
            Err(e) => {
                eprintln!("{:?}", miette::Report::new(*e));
                std::process::exit(1);
            }
        }
    }
}

/// Extension trait for build failures.
///
/// Known build errors print their message and exit; anything else is handed
/// to eyre so the full error chain is reported.
pub(crate) trait ExitOnKnown<T> {
    fn exit_on_known(self) -> Result<T>;
}

impl<T> ExitOnKnown<T> for packing_build::Result<T> {
    fn exit_on_known(self) -> Result<T> {
        match self {
            Ok(v) => Ok(v),
            Err(e) if e.is_known() => {
                eprintln!("error: {e}");
                std::process::exit(1);
            }
            Err(e) => Err(eyre::Report::new(e)),
        }
    }
}

#[derive(Parser)]
#[command(name = "packing")]
#[command(version)]
#[command(about = "Extract minimal, self-contained npm packages from a source tree")]
pub(crate) struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,
}

impl Cli {
    pub fn run(&self) -> Result<()> {
        match &self.command {
            Commands::Build(cmd) => cmd.run(),
            Commands::Check(cmd) => cmd.run(),
            Commands::Completions(cmd) => cmd.run(),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Build the packages declared in packing.json
    Build(BuildCommand),

    /// Validate packing.json and resolve every package without writing
    Check(CheckCommand),

    /// Generate shell completions
    Completions(CompletionsCommand),
}
