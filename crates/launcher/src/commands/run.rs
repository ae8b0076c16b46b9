//! Run command - Migrate the database, then start the application.

use common::LauncherResult;

use crate::cli::args::RunArgs;
use crate::commands::migrate::migrate_located;
use crate::config::{Settings, APP_DISPLAY_NAME, BANNER_WIDTH};
use crate::database::locate_database;
use crate::handoff::{hand_off, resolve_target, ExecReplacer, ProcessReplacer};

/// Execute the run command
pub async fn execute(args: RunArgs, settings: Settings) -> LauncherResult<i32> {
    launch(&args, &settings, &ExecReplacer).await
}

/// Full launch sequence with an injectable process replacer.
///
/// Returns the exit code of the application when it had to run as a child.
/// On a successful replacement this never returns.
pub async fn launch(
    args: &RunArgs,
    settings: &Settings,
    replacer: &dyn ProcessReplacer,
) -> LauncherResult<i32> {
    let config = &settings.config;
    print_banner();

    let db_path = locate_database(settings.database_uri(), &config.database_candidates);
    match db_path {
        Some(ref path) if args.skip_migrations => {
            println!("Database found: {}", path.display());
            println!("Skipping migrations (--skip-migrations)");
            println!();
        }
        Some(ref path) => {
            migrate_located(config, path).await;
        }
        None => {
            tracing::info!("No existing database found, skipping migrations");
            println!("Database not found");
            println!("It will be created on the application's first start");
            println!();
        }
    }

    let target = resolve_target(&config.target_candidates)?;

    println!("Starting application...");
    println!("{}", "=".repeat(BANNER_WIDTH));
    println!();
    println!("Running: {} {}", config.interpreter, target.display());
    println!();

    hand_off(&config.interpreter, &target, replacer).await
}

fn print_banner() {
    println!("{}", "=".repeat(BANNER_WIDTH));
    println!("  Starting {}", APP_DISPLAY_NAME);
    println!("{}", "=".repeat(BANNER_WIDTH));
    println!();
}
