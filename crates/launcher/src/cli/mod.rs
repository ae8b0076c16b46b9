//! CLI module - Command-line interface for the launcher.
//!
//! Provides commands for:
//! - `run` - Migrate and start the application (default)
//! - `locate` - Report where the database was found
//! - `migrate` - Run migrations only

pub mod args;

pub use args::{Cli, Commands, MigrateArgs, RunArgs};
