//! Launcher settings assembled from `.env`, the environment, the optional
//! manifest and CLI flags, in increasing order of precedence.

use std::env;
use std::path::{Path, PathBuf};

use common::{LauncherConfig, LauncherResult};

use super::constants::ENV_DATABASE_URI;
use crate::cli::Cli;

/// Outcome of loading the `.env` file.
#[derive(Debug)]
pub enum EnvFile {
    Loaded(PathBuf),
    Absent,
    Unreadable(String),
}

/// Load `.env` into the process environment without overriding variables
/// that are already set.
pub fn load_env_file() -> EnvFile {
    match dotenvy::dotenv() {
        Ok(path) => EnvFile::Loaded(path),
        Err(e) if e.not_found() => EnvFile::Absent,
        Err(e) => EnvFile::Unreadable(e.to_string()),
    }
}

impl EnvFile {
    /// Called once tracing is up, since `.env` is read before the subscriber exists.
    pub fn log(&self) {
        match self {
            EnvFile::Loaded(path) => tracing::debug!(path = %path.display(), "Loaded .env"),
            EnvFile::Absent => tracing::debug!("No .env file found"),
            EnvFile::Unreadable(reason) => {
                tracing::warn!("Ignoring unreadable .env file: {}", reason)
            }
        }
    }
}

/// Resolved launcher settings
#[derive(Clone)]
pub struct Settings {
    database_uri: Option<String>,
    pub config: LauncherConfig,
}

impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings")
            .field(
                "database_uri",
                &self.database_uri.as_ref().map(|_| "[REDACTED]"),
            )
            .field("config", &self.config)
            .finish()
    }
}

impl Settings {
    /// Build settings from the current environment and parsed CLI flags.
    ///
    /// Expects `.env` to have been loaded already (see [`load_env_file`]).
    pub fn from_env(cli: &Cli) -> LauncherResult<Self> {
        let database_uri = env::var(ENV_DATABASE_URI)
            .ok()
            .filter(|uri| !uri.trim().is_empty());

        Self::from_parts(
            database_uri,
            cli.manifest.as_deref(),
            cli.interpreter.clone(),
            cli.timeout_secs,
        )
    }

    pub fn from_parts(
        database_uri: Option<String>,
        manifest: Option<&Path>,
        interpreter: Option<String>,
        timeout_secs: Option<u64>,
    ) -> LauncherResult<Self> {
        let mut config = match manifest {
            Some(path) => LauncherConfig::from_json_file(path)?,
            None => LauncherConfig::default(),
        };

        if let Some(interpreter) = interpreter {
            config.interpreter = interpreter;
        }
        if let Some(secs) = timeout_secs {
            config.migration_timeout_secs = secs;
        }

        Ok(Self {
            database_uri,
            config,
        })
    }

    /// Raw connection string, if one was configured.
    pub fn database_uri(&self) -> Option<&str> {
        self.database_uri.as_deref()
    }
}
