//! Tests for the built `launcher` binary.
//!
//! Each test runs the binary inside a scratch directory with a manifest that
//! points every path list into that directory and uses `sh` as interpreter.
#![cfg(unix)]

use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};
use std::time::{Duration, Instant};

use serde_json::{json, Value};

// =============================================================================
// Fixtures
// =============================================================================

struct Workspace {
    root: tempfile::TempDir,
}

impl Workspace {
    fn new() -> Self {
        Self {
            root: tempfile::tempdir().unwrap(),
        }
    }

    fn path(&self, rel: &str) -> PathBuf {
        self.root.path().join(rel)
    }

    fn write(&self, rel: &str, body: &str) -> PathBuf {
        let path = self.path(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, body).unwrap();
        path
    }

    /// Manifest with two database candidates, the given migrations and a
    /// single target, all inside the workspace.
    fn manifest(&self, migrations: &[(&str, bool)], timeout_secs: u64) -> PathBuf {
        let migrations: Vec<Value> = migrations
            .iter()
            .map(|(script, needs_db_path)| {
                json!({ "script": self.path(script), "needs_db_path": needs_db_path })
            })
            .collect();
        let manifest = json!({
            "interpreter": "sh",
            "database_candidates": [self.path("instance/app.db"), self.path("app.db")],
            "migrations": migrations,
            "migration_timeout_secs": timeout_secs,
            "target_candidates": [self.path("app.sh")],
        });
        self.write("launcher.json", &manifest.to_string())
    }

    /// Launcher command with a clean environment rooted in the workspace.
    fn launcher(&self, manifest: &Path, args: &[&str]) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_launcher"));
        cmd.current_dir(self.root.path())
            .arg("--manifest")
            .arg(manifest)
            .args(args)
            .env_remove("SQLALCHEMY_DATABASE_URI")
            .env_remove("LAUNCHER_MANIFEST")
            .env_remove("LAUNCHER_INTERPRETER")
            .env_remove("LAUNCHER_MIGRATION_TIMEOUT_SECS")
            .env_remove("RUST_BACKTRACE")
            .env_remove("RUST_LIB_BACKTRACE")
            .env_remove("RUST_LOG")
            .stdin(Stdio::null());
        cmd
    }
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

// =============================================================================
// locate
// =============================================================================

#[test]
fn locate_prints_found_database() {
    let ws = Workspace::new();
    let db = ws.write("app.db", "");
    let manifest = ws.manifest(&[], 5);

    let output = ws.launcher(&manifest, &["locate"]).output().unwrap();

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(stdout(&output).trim(), db.display().to_string());
}

#[test]
fn locate_reports_missing_database() {
    let ws = Workspace::new();
    let manifest = ws.manifest(&[], 5);

    let output = ws.launcher(&manifest, &["locate"]).output().unwrap();

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(stdout(&output).trim(), "not found");
}

// =============================================================================
// migrate
// =============================================================================

#[test]
fn migrate_lists_each_outcome() {
    let ws = Workspace::new();
    ws.write("instance/app.db", "");
    ws.write("migration/ok.sh", "exit 0\n");
    ws.write("migration/applied.sh", "exit 3\n");
    let manifest = ws.manifest(
        &[
            ("migration/ok.sh", true),
            ("migration/applied.sh", false),
            ("migration/absent.sh", false),
        ],
        5,
    );

    let output = ws.launcher(&manifest, &["migrate"]).output().unwrap();
    let out = stdout(&output);

    assert_eq!(output.status.code(), Some(0));
    assert!(out.contains("ok.sh: ok"), "{out}");
    assert!(out.contains("applied.sh: exit code 3"), "{out}");
    assert!(out.contains("absent.sh: skipped (script not found)"), "{out}");
}

#[test]
fn migrate_json_keeps_script_output_off_stdout() {
    let ws = Workspace::new();
    ws.write("app.db", "");
    ws.write("migration/noisy.sh", "echo 'Applying column...'\nexit 0\n");
    let manifest = ws.manifest(&[("migration/noisy.sh", true)], 5);

    let output = ws.launcher(&manifest, &["migrate", "--json"]).output().unwrap();

    assert_eq!(output.status.code(), Some(0));
    let report: Value = serde_json::from_str(&stdout(&output)).expect("stdout is JSON");
    let entries = report.as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["status"], "succeeded");
    assert!(stderr(&output).contains("Applying column..."));
}

#[test]
fn migrate_json_without_database_is_empty_array() {
    let ws = Workspace::new();
    let manifest = ws.manifest(&[("migration/never.sh", true)], 5);

    let output = ws.launcher(&manifest, &["migrate", "--json"]).output().unwrap();

    assert_eq!(output.status.code(), Some(0));
    let report: Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(report, json!([]));
}

// =============================================================================
// run and failure handling
// =============================================================================

#[test]
fn run_replaces_itself_with_target() {
    let ws = Workspace::new();
    ws.write("app.sh", "echo started\nexit 7\n");
    let manifest = ws.manifest(&[], 5);

    let output = ws.launcher(&manifest, &["run"]).output().unwrap();

    assert_eq!(output.status.code(), Some(7));
    assert!(stdout(&output).contains("started"));
}

#[test]
fn run_without_target_exits_one_with_diagnostic() {
    let ws = Workspace::new();
    let manifest = ws.manifest(&[], 5);

    let output = ws.launcher(&manifest, &[]).output().unwrap();
    let err = stderr(&output);

    assert_eq!(output.status.code(), Some(1));
    assert!(err.contains("Checked paths"), "{err}");
    assert!(err.contains(&ws.path("app.sh").display().to_string()), "{err}");
}

#[test]
fn unreadable_manifest_is_fatal_with_path_and_backtrace() {
    let ws = Workspace::new();
    let missing = ws.path("missing.json");

    let output = ws.launcher(&missing, &["locate"]).output().unwrap();
    let err = stderr(&output);

    assert_eq!(output.status.code(), Some(1));
    assert!(err.contains("Fatal error in launcher"), "{err}");
    assert!(err.contains(&missing.display().to_string()), "{err}");
    assert!(err.contains("Stack backtrace"), "{err}");
}

#[test]
fn interrupt_during_migration_exits_zero() {
    let ws = Workspace::new();
    ws.write("app.db", "");
    let started = ws.path("started");
    ws.write(
        "migration/slow.sh",
        &format!("touch '{}'\nexec sleep 30\n", started.display()),
    );
    let manifest = ws.manifest(&[("migration/slow.sh", false)], 60);

    let child = ws
        .launcher(&manifest, &["migrate"])
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();

    let deadline = Instant::now() + Duration::from_secs(10);
    while !started.exists() {
        assert!(Instant::now() < deadline, "migration never started");
        std::thread::sleep(Duration::from_millis(20));
    }
    // Give the signal listener a moment past the migration spawn
    std::thread::sleep(Duration::from_millis(200));

    let status = Command::new("kill")
        .arg("-INT")
        .arg(child.id().to_string())
        .status()
        .unwrap();
    assert!(status.success());

    let begun = Instant::now();
    let output = child.wait_with_output().unwrap();

    assert_eq!(output.status.code(), Some(0));
    assert!(stderr(&output).contains("Interrupted by user"));
    // The 30s migration was killed rather than waited out
    assert!(begun.elapsed() < Duration::from_secs(20));
}
