//! Launcher-wide constants
//!
//! Path lists and migration defaults live in `common::config`; this module
//! holds the environment contract and console formatting.

// =============================================================================
// Environment
// =============================================================================

/// Connection string the application itself reads.
pub const ENV_DATABASE_URI: &str = "SQLALCHEMY_DATABASE_URI";

/// Only connection strings with this scheme point at a local file.
pub const SQLITE_URI_PREFIX: &str = "sqlite:///";

// =============================================================================
// Exit codes
// =============================================================================

/// Clean completion or user interruption
pub const EXIT_OK: i32 = 0;

/// Missing entry point or uncaught fault
pub const EXIT_FAILURE: i32 = 1;

// =============================================================================
// Console
// =============================================================================

/// Width of the `=` rule printed around the startup banner
pub const BANNER_WIDTH: usize = 60;

/// Application name shown in the banner
pub const APP_DISPLAY_NAME: &str = "StealthNET API";
