//! Best-effort migration runner.
//!
//! Each script runs as `<interpreter> <script> [db_path]`. Its stderr is
//! inherited; its stdout is inherited too unless the runner was told to keep
//! stdout free for a report (see [`ChildOutput`]). Every
//! entry is attempted regardless of how earlier ones ended: scripts are
//! expected to be idempotent, and a non-zero exit usually means the change
//! is already applied.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::{Duration, Instant};

use common::MigrationEntry;
use serde::Serialize;
use tokio::process::Command;

/// How a single migration ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum MigrationOutcome {
    Succeeded,
    /// Exit code is `-1` when the script was killed by a signal.
    NonZeroExit { exit_code: i32 },
    TimedOut,
    /// The script could not be started or waited on.
    Failed { detail: String },
    /// Script file does not exist.
    Skipped,
}

/// Result of one migration attempt.
#[derive(Debug, Clone, Serialize)]
pub struct MigrationReport {
    pub script: PathBuf,
    #[serde(flatten)]
    pub outcome: MigrationOutcome,
    pub duration_ms: u64,
}

/// Tally of a completed migration phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MigrationSummary {
    pub succeeded: usize,
    pub non_zero_exit: usize,
    pub timed_out: usize,
    pub failed: usize,
    pub skipped: usize,
}

impl MigrationSummary {
    pub fn from_reports(reports: &[MigrationReport]) -> Self {
        reports
            .iter()
            .fold(Self::default(), |mut summary, report| {
                match report.outcome {
                    MigrationOutcome::Succeeded => summary.succeeded += 1,
                    MigrationOutcome::NonZeroExit { .. } => summary.non_zero_exit += 1,
                    MigrationOutcome::TimedOut => summary.timed_out += 1,
                    MigrationOutcome::Failed { .. } => summary.failed += 1,
                    MigrationOutcome::Skipped => summary.skipped += 1,
                }
                summary
            })
    }

    pub fn total(&self) -> usize {
        self.succeeded + self.non_zero_exit + self.timed_out + self.failed + self.skipped
    }
}

/// Where a migration script's stdout goes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ChildOutput {
    /// Share the launcher's stdout.
    #[default]
    Inherit,
    /// Redirect to the launcher's stderr.
    Stderr,
}

impl ChildOutput {
    fn stdio(self) -> Stdio {
        match self {
            ChildOutput::Inherit => Stdio::inherit(),
            ChildOutput::Stderr => Stdio::from(std::io::stderr()),
        }
    }
}

/// Runs migration scripts one at a time under a fixed timeout.
pub struct MigrationRunner {
    interpreter: String,
    timeout: Duration,
    output: ChildOutput,
}

impl MigrationRunner {
    pub fn new(interpreter: impl Into<String>, timeout: Duration) -> Self {
        Self {
            interpreter: interpreter.into(),
            timeout,
            output: ChildOutput::default(),
        }
    }

    pub fn with_output(mut self, output: ChildOutput) -> Self {
        self.output = output;
        self
    }

    /// Run every entry in order and return one report per entry.
    pub async fn run_all(
        &self,
        entries: &[MigrationEntry],
        db_path: &Path,
    ) -> Vec<MigrationReport> {
        let mut reports = Vec::with_capacity(entries.len());
        for entry in entries {
            reports.push(self.run_one(entry, db_path).await);
        }

        let summary = MigrationSummary::from_reports(&reports);
        tracing::info!(
            total = summary.total(),
            succeeded = summary.succeeded,
            non_zero_exit = summary.non_zero_exit,
            timed_out = summary.timed_out,
            failed = summary.failed,
            skipped = summary.skipped,
            "Migrations finished",
        );

        reports
    }

    /// Run a single entry. Never fails; problems are reported in the outcome.
    pub async fn run_one(&self, entry: &MigrationEntry, db_path: &Path) -> MigrationReport {
        let script = entry.script.clone();
        let start = Instant::now();

        if !script.is_file() {
            tracing::warn!(script = %script.display(), "Migration script not found, skipping");
            return MigrationReport {
                script,
                outcome: MigrationOutcome::Skipped,
                duration_ms: 0,
            };
        }

        tracing::info!(
            script = %script.display(),
            with_db_path = entry.needs_db_path,
            "Running migration",
        );

        // `kill_on_drop(true)` kills the child when the wait below times out
        // or the whole launch is interrupted.
        let mut cmd = Command::new(&self.interpreter);
        cmd.arg(&script)
            .args(entry.args(db_path))
            .stdin(Stdio::null())
            .stdout(self.output.stdio())
            .kill_on_drop(true);

        let outcome = match cmd.spawn() {
            Ok(mut child) => match tokio::time::timeout(self.timeout, child.wait()).await {
                Ok(Ok(status)) if status.success() => MigrationOutcome::Succeeded,
                Ok(Ok(status)) => MigrationOutcome::NonZeroExit {
                    exit_code: status.code().unwrap_or(-1),
                },
                Ok(Err(e)) => MigrationOutcome::Failed {
                    detail: format!("failed to wait for migration: {e}"),
                },
                Err(_elapsed) => {
                    // Reap explicitly so no zombie outlives the timeout.
                    if let Err(e) = child.kill().await {
                        tracing::debug!(
                            script = %script.display(),
                            error = %e,
                            "Failed to kill timed-out migration",
                        );
                    }
                    MigrationOutcome::TimedOut
                }
            },
            Err(e) => MigrationOutcome::Failed {
                detail: format!("failed to start {}: {e}", self.interpreter),
            },
        };

        let duration_ms = start.elapsed().as_millis() as u64;
        log_outcome(&script, &outcome, duration_ms, self.timeout);

        MigrationReport {
            script,
            outcome,
            duration_ms,
        }
    }
}

fn log_outcome(script: &Path, outcome: &MigrationOutcome, elapsed_ms: u64, timeout: Duration) {
    let script = script.display();
    match outcome {
        MigrationOutcome::Succeeded => {
            tracing::info!(%script, elapsed_ms, "Migration completed successfully")
        }
        MigrationOutcome::NonZeroExit { exit_code } => tracing::warn!(
            %script,
            exit_code,
            elapsed_ms,
            "Migration exited with non-zero status (possibly already applied)",
        ),
        MigrationOutcome::TimedOut => tracing::error!(
            %script,
            timeout_secs = timeout.as_secs(),
            "Migration timed out and was abandoned",
        ),
        MigrationOutcome::Failed { detail } => {
            tracing::warn!(%script, error = %detail, "Migration could not be run")
        }
        MigrationOutcome::Skipped => {}
    }
}
