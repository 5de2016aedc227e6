//! Reporting utilities: human-readable output for the CLI.

pub mod format;

pub use format::*;
