//! Report data structures for commands.
//!
//! This module provides data structures that separate data collection from rendering.
//! Commands build reports, then render them to an Output target.

mod build;
mod check;
mod output;

pub use build::{BuildReport, PackageReport};
pub use check::{CheckReport, PackageSummary};
pub use output::{Output, Report, TerminalOutput};
