//! CLI argument definitions.
//!
//! Uses clap derive macros for type-safe argument parsing. Every option also
//! reads an environment variable, so `.env` must be loaded before parsing.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Locate the database, apply pending migrations and start the application
#[derive(Parser, Debug)]
#[command(name = "launcher")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// JSON manifest overriding the built-in path and migration lists
    #[arg(short, long, global = true, env = "LAUNCHER_MANIFEST")]
    pub manifest: Option<PathBuf>,

    /// Interpreter for migration scripts and the application
    #[arg(long, global = true, env = "LAUNCHER_INTERPRETER")]
    pub interpreter: Option<String>,

    /// Per-migration timeout in seconds
    #[arg(long, global = true, env = "LAUNCHER_MIGRATION_TIMEOUT_SECS")]
    pub timeout_secs: Option<u64>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// The requested command, `run` when none was given.
    pub fn resolved_command(&self) -> Commands {
        self.command
            .clone()
            .unwrap_or(Commands::Run(RunArgs::default()))
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Locate the database, migrate it and hand off to the application (default)
    Run(RunArgs),

    /// Print the located database path
    Locate,

    /// Locate the database and run migrations without starting the application
    Migrate(MigrateArgs),
}

/// Arguments for the run command
#[derive(Parser, Debug, Clone, Default)]
pub struct RunArgs {
    /// Start the application without running migrations
    #[arg(long)]
    pub skip_migrations: bool,
}

/// Arguments for the migrate command
#[derive(Parser, Debug, Clone, Default)]
pub struct MigrateArgs {
    /// Print the per-migration report as JSON
    #[arg(long)]
    pub json: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn no_subcommand_means_run() {
        let cli = Cli::try_parse_from(["launcher"]).unwrap();
        assert!(matches!(
            cli.resolved_command(),
            Commands::Run(RunArgs {
                skip_migrations: false
            })
        ));
    }

    #[test]
    fn global_flags_follow_subcommand() {
        let cli = Cli::try_parse_from([
            "launcher",
            "migrate",
            "--json",
            "--interpreter",
            "/usr/bin/python3",
            "--timeout-secs",
            "30",
        ])
        .unwrap();
        assert_eq!(cli.interpreter.as_deref(), Some("/usr/bin/python3"));
        assert_eq!(cli.timeout_secs, Some(30));
        assert!(matches!(cli.resolved_command(), Commands::Migrate(MigrateArgs { json: true })));
    }
}
