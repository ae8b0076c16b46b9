//! Launcher - application entry point
//!
//! Loads `.env`, parses the CLI and runs the selected command inside a single
//! failure boundary: Ctrl+C exits 0, any fault exits 1.

use std::backtrace::Backtrace;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use launcher_lib::{
    cli::{Cli, Commands},
    commands,
    config::{self, Settings, EXIT_FAILURE, EXIT_OK},
    LauncherError,
};

fn main() {
    enable_error_backtraces();
    launch();
}

/// Have anyhow capture a backtrace for every fault unless the operator
/// already chose a setting. Must run before the runtime starts its threads.
fn enable_error_backtraces() {
    if std::env::var_os("RUST_LIB_BACKTRACE").is_none() {
        std::env::set_var("RUST_LIB_BACKTRACE", "1");
    }
}

#[tokio::main]
async fn launch() {
    // Load .env before parsing so clap's `env` attributes see its values
    let env_file = config::load_env_file();

    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize tracing (verbose mode sets debug level)
    init_tracing(cli.verbose);
    install_panic_hook();
    env_file.log();

    let code = tokio::select! {
        result = run(cli) => match result {
            Ok(code) => code,
            Err(e) => report_failure(e),
        },
        _ = interrupted() => {
            eprintln!();
            eprintln!("Interrupted by user");
            EXIT_OK
        }
    };

    std::process::exit(code);
}

async fn run(cli: Cli) -> anyhow::Result<i32> {
    let settings = Settings::from_env(&cli).context("failed to load launcher settings")?;
    tracing::debug!(?settings, "Configuration loaded");

    let code = match cli.resolved_command() {
        Commands::Run(args) => commands::run::execute(args, settings).await?,
        Commands::Locate => commands::locate::execute(settings).await?,
        Commands::Migrate(args) => commands::migrate::execute(args, settings).await?,
    };
    Ok(code)
}

/// Resolves on Ctrl+C. Never resolves if the handler cannot be installed.
async fn interrupted() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Unable to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
}

fn report_failure(err: anyhow::Error) -> i32 {
    // A missing entry point is an expected outcome with its own diagnostic.
    if let Some(launcher_err @ LauncherError::TargetNotFound { .. }) =
        err.downcast_ref::<LauncherError>()
    {
        tracing::error!(code = launcher_err.code(), "{}", launcher_err);
        eprintln!("{}", launcher_err.diagnostic());
        return launcher_err.exit_code();
    }

    tracing::error!("Launcher failed: {:#}", err);
    eprintln!("Fatal error in launcher: {:#}", err);
    // Debug output carries the cause chain and the captured backtrace
    eprintln!("{:?}", err);
    EXIT_FAILURE
}

fn install_panic_hook() {
    std::panic::set_hook(Box::new(|info| {
        eprintln!("Fatal error in launcher: {}", info);
        eprintln!("{}", Backtrace::force_capture());
        std::process::exit(EXIT_FAILURE);
    }));
}

/// Initialize tracing subscriber
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        "debug".to_string()
    } else {
        std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string())
    };

    // stdout is reserved for command output such as `migrate --json`
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::EnvFilter::new(filter))
        .init();
}
