//! Migrate command - Apply migrations without starting the application.

use std::path::Path;

use common::{LauncherConfig, LauncherError, LauncherResult};

use crate::cli::args::MigrateArgs;
use crate::config::{Settings, EXIT_OK};
use crate::database::locate_database;
use crate::migrations::{
    ChildOutput, MigrationOutcome, MigrationReport, MigrationRunner, MigrationSummary,
};

/// Execute the migrate command
pub async fn execute(args: MigrateArgs, settings: Settings) -> LauncherResult<i32> {
    tracing::info!("Running migration command...");

    let config = &settings.config;
    let Some(db_path) = locate_database(settings.database_uri(), &config.database_candidates)
    else {
        tracing::info!("No existing database found, nothing to migrate");
        if args.json {
            println!("[]");
        } else {
            println!("Database not found, nothing to migrate");
        }
        return Ok(EXIT_OK);
    };

    // Keep stdout clean for the JSON report
    if args.json {
        let reports = run_migrations(config, &db_path, ChildOutput::Stderr).await;
        let rendered = serde_json::to_string_pretty(&reports)
            .map_err(|e| LauncherError::internal(format!("Failed to render report: {}", e)))?;
        println!("{}", rendered);
    } else {
        let reports = migrate_located(config, &db_path).await;
        for report in &reports {
            println!("{}: {}", report.script.display(), describe(&report.outcome));
        }
    }

    Ok(EXIT_OK)
}

/// Run every configured migration against an already located database,
/// printing progress to the console.
pub async fn migrate_located(config: &LauncherConfig, db_path: &Path) -> Vec<MigrationReport> {
    println!("Database found: {}", db_path.display());
    println!("Running migrations...");
    println!();

    let reports = run_migrations(config, db_path, ChildOutput::Inherit).await;

    let summary = MigrationSummary::from_reports(&reports);
    println!(
        "Migrations finished ({} ok, {} non-zero, {} timed out, {} failed, {} skipped)",
        summary.succeeded, summary.non_zero_exit, summary.timed_out, summary.failed, summary.skipped,
    );
    println!();

    reports
}

async fn run_migrations(
    config: &LauncherConfig,
    db_path: &Path,
    output: ChildOutput,
) -> Vec<MigrationReport> {
    MigrationRunner::new(config.interpreter.clone(), config.migration_timeout())
        .with_output(output)
        .run_all(&config.migrations, db_path)
        .await
}

fn describe(outcome: &MigrationOutcome) -> String {
    match outcome {
        MigrationOutcome::Succeeded => "ok".to_string(),
        MigrationOutcome::NonZeroExit { exit_code } => {
            format!("exit code {} (possibly already applied)", exit_code)
        }
        MigrationOutcome::TimedOut => "timed out".to_string(),
        MigrationOutcome::Failed { detail } => format!("failed: {}", detail),
        MigrationOutcome::Skipped => "skipped (script not found)".to_string(),
    }
}
