//! Handoff to the target application.
//!
//! On Unix the launcher `exec`s the interpreter so the application takes over
//! this process. If that fails, or the platform has no such primitive, the
//! application runs as a supervised child and its exit code becomes ours.

use std::io;
use std::path::{Path, PathBuf};

use common::{LauncherError, LauncherResult};
use tokio::process::Command;

use crate::config::EXIT_FAILURE;

/// Replaces the current process image.
#[cfg_attr(test, mockall::automock)]
pub trait ProcessReplacer {
    /// Only returns if the replacement failed.
    fn replace(&self, program: &str, args: &[PathBuf]) -> io::Error;
}

/// `execvp`-based replacement.
#[derive(Debug, Default, Clone, Copy)]
pub struct ExecReplacer;

impl ProcessReplacer for ExecReplacer {
    #[cfg(unix)]
    fn replace(&self, program: &str, args: &[PathBuf]) -> io::Error {
        use std::os::unix::process::CommandExt;

        std::process::Command::new(program).args(args).exec()
    }

    #[cfg(not(unix))]
    fn replace(&self, _program: &str, _args: &[PathBuf]) -> io::Error {
        io::Error::new(
            io::ErrorKind::Unsupported,
            "process replacement is not available on this platform",
        )
    }
}

/// First existing entry point among `candidates`.
pub fn resolve_target(candidates: &[PathBuf]) -> LauncherResult<PathBuf> {
    if let Some(found) = candidates.iter().find(|path| path.is_file()) {
        return Ok(found.clone());
    }

    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    Err(LauncherError::TargetNotFound {
        cwd,
        checked: candidates.to_vec(),
    })
}

/// Start `interpreter target`, replacing this process when possible.
///
/// Returns only when replacement failed, with the exit code of the fallback
/// child.
pub async fn hand_off(
    interpreter: &str,
    target: &Path,
    replacer: &dyn ProcessReplacer,
) -> LauncherResult<i32> {
    let args = [target.to_path_buf()];

    tracing::info!(interpreter, target = %target.display(), "Handing off to application");
    let err = replacer.replace(interpreter, &args);

    tracing::error!(error = %err, "Process replacement failed, starting application as a child");
    eprintln!("Error starting application: {}", err);
    eprintln!("   Retrying as a child process...");

    let status = Command::new(interpreter)
        .args(&args)
        .status()
        .await
        .map_err(|e| LauncherError::spawn(interpreter, e))?;

    // A child killed by a signal has no exit code.
    let code = status.code().unwrap_or(EXIT_FAILURE);
    tracing::info!(exit_code = code, "Application exited");
    Ok(code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_candidate_wins() {
        let dir = tempfile::tempdir().unwrap();
        let local = dir.path().join("app.py");
        let fallback = dir.path().join("fallback").join("app.py");
        std::fs::create_dir_all(fallback.parent().unwrap()).unwrap();
        std::fs::write(&local, b"").unwrap();
        std::fs::write(&fallback, b"").unwrap();

        assert_eq!(resolve_target(&[local.clone(), fallback]).unwrap(), local);
    }

    #[test]
    fn falls_back_to_second_candidate() {
        let dir = tempfile::tempdir().unwrap();
        let fallback = dir.path().join("app.py");
        std::fs::write(&fallback, b"").unwrap();

        let candidates = [dir.path().join("missing.py"), fallback.clone()];
        assert_eq!(resolve_target(&candidates).unwrap(), fallback);
    }

    #[test]
    fn missing_target_reports_every_checked_path() {
        let dir = tempfile::tempdir().unwrap();
        let candidates = vec![dir.path().join("app.py"), dir.path().join("app/app.py")];

        match resolve_target(&candidates) {
            Err(LauncherError::TargetNotFound { checked, .. }) => assert_eq!(checked, candidates),
            other => panic!("expected TargetNotFound, got {:?}", other),
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn failed_replacement_mirrors_child_exit_code() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("app.sh");
        std::fs::write(&target, "exit 7\n").unwrap();

        let expected = vec![target.clone()];
        let mut replacer = MockProcessReplacer::new();
        replacer
            .expect_replace()
            .withf(move |program, args| program == "sh" && args == expected.as_slice())
            .times(1)
            .returning(|_, _| io::Error::new(io::ErrorKind::PermissionDenied, "exec denied"));

        let code = hand_off("sh", &target, &replacer).await.unwrap();
        assert_eq!(code, 7);
    }

    #[tokio::test]
    async fn fallback_spawn_failure_is_an_error() {
        let mut replacer = MockProcessReplacer::new();
        replacer
            .expect_replace()
            .times(1)
            .returning(|_, _| io::Error::new(io::ErrorKind::NotFound, "no interpreter"));

        let err = hand_off("/nonexistent/interpreter", Path::new("app.py"), &replacer)
            .await
            .unwrap_err();
        assert_eq!(err.code(), "SPAWN_FAILED");
    }
}
