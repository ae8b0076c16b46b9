//! Launcher configuration module
//!
//! Handles environment variables and launcher-wide constants.

mod constants;
mod settings;

pub use constants::*;
pub use settings::{load_env_file, EnvFile, Settings};
