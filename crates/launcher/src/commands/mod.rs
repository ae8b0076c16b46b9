//! Commands module - CLI command implementations.
//!
//! Each command returns the process exit code on success.

pub mod locate;
pub mod migrate;
pub mod run;
