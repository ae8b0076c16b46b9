//! Locate command - Report which database file the launcher would use.

use common::LauncherResult;

use crate::config::{Settings, EXIT_OK};
use crate::database::locate_database;

/// Execute the locate command
pub async fn execute(settings: Settings) -> LauncherResult<i32> {
    match locate_database(settings.database_uri(), &settings.config.database_candidates) {
        Some(path) => println!("{}", path.display()),
        None => {
            tracing::info!("No existing database found");
            println!("not found");
        }
    }

    Ok(EXIT_OK)
}
