//! Database discovery.
//!
//! The launcher never opens the database; it only needs to know whether a
//! file already exists and where. A missing database is a normal first run.

use std::path::PathBuf;

use crate::config::SQLITE_URI_PREFIX;

/// Extract the file path from a `sqlite:///` connection string.
///
/// Other schemes, and a bare prefix with no path, yield `None`.
pub fn sqlite_path_from_uri(uri: &str) -> Option<PathBuf> {
    uri.trim()
        .strip_prefix(SQLITE_URI_PREFIX)
        .filter(|rest| !rest.is_empty())
        .map(PathBuf::from)
}

/// Find an existing database file.
///
/// The configured URI wins when it names a file that exists; otherwise the
/// first existing candidate is returned.
pub fn locate_database(uri: Option<&str>, candidates: &[PathBuf]) -> Option<PathBuf> {
    if let Some(path) = uri.and_then(sqlite_path_from_uri) {
        if path.is_file() {
            tracing::debug!(path = %path.display(), "Database found via connection string");
            return Some(path);
        }
        tracing::debug!(path = %path.display(), "Connection string names a missing file");
    }

    let found = candidates.iter().find(|candidate| {
        let exists = candidate.is_file();
        tracing::debug!(path = %candidate.display(), exists, "Probed database candidate");
        exists
    });

    found.cloned()
}
