//! Launcher - pre-flight migrations and handoff for the application.
//!
//! Finds the application's SQLite database, runs the migration scripts
//! against it on a best-effort basis, then replaces itself with the
//! application process.
//!
//! # Modules
//!
//! - **cli**: Command-line interface
//! - **commands**: CLI command implementations
//! - **config**: Environment loading and constants
//! - **database**: Database file discovery
//! - **migrations**: Timeout-bounded migration runner
//! - **handoff**: Process replacement with child-process fallback
//!
//! # CLI Usage
//!
//! ```bash
//! # Migrate and start the application
//! launcher
//!
//! # Only run migrations, printing a JSON report
//! launcher migrate --json
//!
//! # Use a custom migration list
//! launcher --manifest launcher.json run
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod database;
pub mod handoff;
pub mod migrations;

// Re-export commonly used types at crate root
pub use common::{LauncherConfig, LauncherError, LauncherResult, MigrationEntry};
pub use config::Settings;
