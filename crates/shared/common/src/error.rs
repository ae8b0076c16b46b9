//! Unified error handling for the launcher.
//!
//! Only faults that stop the launch sequence are represented here. Migration
//! failures are outcomes, not errors, and never surface through this type.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Launcher error types.
#[derive(Error, Debug)]
pub enum LauncherError {
    // Handoff
    #[error("target entry point not found (checked: {})", join_paths(.checked))]
    TargetNotFound { cwd: PathBuf, checked: Vec<PathBuf> },

    #[error("failed to spawn {program}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    // Configuration
    #[error("invalid manifest {}", .path.display())]
    Manifest {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("cannot read manifest {}", .path.display())]
    ManifestRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // Internal
    #[error("internal error: {0}")]
    Internal(String),
}

impl LauncherError {
    /// Short machine-readable code, used as a structured log field.
    pub fn code(&self) -> &'static str {
        match self {
            LauncherError::TargetNotFound { .. } => "TARGET_NOT_FOUND",
            LauncherError::Spawn { .. } => "SPAWN_FAILED",
            LauncherError::Manifest { .. } => "INVALID_MANIFEST",
            LauncherError::ManifestRead { .. } => "MANIFEST_UNREADABLE",
            LauncherError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Process exit status for this error.
    pub fn exit_code(&self) -> i32 {
        1
    }

    /// Multi-line, operator-facing description.
    pub fn diagnostic(&self) -> String {
        match self {
            LauncherError::TargetNotFound { cwd, checked } => format!(
                "Error: target entry point not found\n   Current directory: {}\n   Checked paths: {}",
                cwd.display(),
                join_paths(checked),
            ),
            other => format!("Error: {}", other),
        }
    }
}

/// Convenience constructors
impl LauncherError {
    pub fn internal(msg: impl Into<String>) -> Self {
        LauncherError::Internal(msg.into())
    }

    pub fn spawn(program: impl Into<String>, source: std::io::Error) -> Self {
        LauncherError::Spawn {
            program: program.into(),
            source,
        }
    }

    pub fn manifest(path: impl AsRef<Path>, source: serde_json::Error) -> Self {
        LauncherError::Manifest {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    pub fn manifest_read(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        LauncherError::ManifestRead {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }
}

/// Result type alias
pub type LauncherResult<T> = Result<T, LauncherError>;

fn join_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_not_found_lists_checked_paths() {
        let err = LauncherError::TargetNotFound {
            cwd: PathBuf::from("/srv"),
            checked: vec![PathBuf::from("app.py"), PathBuf::from("/app/app.py")],
        };
        assert_eq!(
            err.to_string(),
            "target entry point not found (checked: app.py, /app/app.py)"
        );
        let diag = err.diagnostic();
        assert!(diag.contains("Current directory: /srv"));
        assert!(diag.contains("app.py, /app/app.py"));
        assert_eq!(err.code(), "TARGET_NOT_FOUND");
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn spawn_error_keeps_source() {
        use std::error::Error as _;

        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let err = LauncherError::spawn("python3", io);
        assert_eq!(err.to_string(), "failed to spawn python3");
        assert_eq!(err.source().map(|s| s.to_string()).as_deref(), Some("no such file"));
    }
}
