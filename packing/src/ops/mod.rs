//! Core operations.
//!
//! This module contains the business logic for packing commands,
//! separated from CLI argument parsing and output rendering.

pub mod build;
pub mod check;

pub use build::build;
pub use check::check;
