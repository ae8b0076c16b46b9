//! Declarative launcher configuration.
//!
//! Everything the launch sequence checks or runs is listed here rather than in
//! the logic that walks it. A JSON manifest may replace any of the lists;
//! fields it omits keep their defaults.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{LauncherError, LauncherResult};

/// Database files checked in order when no usable URI is configured.
pub const DEFAULT_DATABASE_CANDIDATES: &[&str] = &[
    "instance/stealthnet.db",
    "stealthnet.db",
    "/var/www/stealthnet-api/instance/stealthnet.db",
    "/var/www/stealthnet-api/stealthnet.db",
];

/// Migration scripts in run order, with whether each takes the database path.
pub const DEFAULT_MIGRATIONS: &[(&str, bool)] = &[
    ("migration/migrate_all.py", true),
    ("migration/migrate_add_active_languages_currencies.py", false),
    ("migration/migrate_add_bonus_days.py", false),
    ("migration/migrate_add_bot_config.py", false),
    ("migration/migrate_add_hwid_device_limit.py", false),
    ("migration/migrate_add_quick_download.py", false),
    ("migration/migrate_add_theme_colors.py", false),
];

/// Application entry points, relative first.
pub const DEFAULT_TARGET_CANDIDATES: &[&str] = &["app.py", "/app/app.py"];

/// Interpreter used for both migrations and the target application.
pub const DEFAULT_INTERPRETER: &str = "python3";

/// Per-migration wall-clock limit.
pub const DEFAULT_MIGRATION_TIMEOUT_SECS: u64 = 300;

/// One migration script and whether it receives the database path.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct MigrationEntry {
    pub script: PathBuf,
    #[serde(default)]
    pub needs_db_path: bool,
}

impl MigrationEntry {
    pub fn new(script: impl Into<PathBuf>, needs_db_path: bool) -> Self {
        Self {
            script: script.into(),
            needs_db_path,
        }
    }

    /// Arguments passed after the script path.
    pub fn args(&self, db_path: &Path) -> Vec<PathBuf> {
        if self.needs_db_path {
            vec![db_path.to_path_buf()]
        } else {
            Vec::new()
        }
    }
}

/// Full launcher configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct LauncherConfig {
    /// Program that runs migration scripts and the target
    pub interpreter: String,
    pub database_candidates: Vec<PathBuf>,
    pub migrations: Vec<MigrationEntry>,
    pub migration_timeout_secs: u64,
    pub target_candidates: Vec<PathBuf>,
}

impl Default for LauncherConfig {
    fn default() -> Self {
        Self {
            interpreter: DEFAULT_INTERPRETER.to_string(),
            database_candidates: DEFAULT_DATABASE_CANDIDATES
                .iter()
                .map(PathBuf::from)
                .collect(),
            migrations: DEFAULT_MIGRATIONS
                .iter()
                .map(|(script, needs_db_path)| MigrationEntry::new(*script, *needs_db_path))
                .collect(),
            migration_timeout_secs: DEFAULT_MIGRATION_TIMEOUT_SECS,
            target_candidates: DEFAULT_TARGET_CANDIDATES
                .iter()
                .map(PathBuf::from)
                .collect(),
        }
    }
}

impl LauncherConfig {
    /// Parse a JSON manifest. Missing fields fall back to the defaults.
    pub fn from_json_str(raw: &str, origin: impl AsRef<Path>) -> LauncherResult<Self> {
        serde_json::from_str(raw).map_err(|e| LauncherError::manifest(origin, e))
    }

    /// Read and parse a JSON manifest from disk.
    pub fn from_json_file(path: impl AsRef<Path>) -> LauncherResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| LauncherError::manifest_read(path, e))?;
        let config = Self::from_json_str(&raw, path)?;
        tracing::debug!(manifest = %path.display(), "Loaded launcher manifest");
        Ok(config)
    }

    pub fn migration_timeout(&self) -> Duration {
        Duration::from_secs(self.migration_timeout_secs)
    }
}
