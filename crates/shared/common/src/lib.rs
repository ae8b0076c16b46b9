//! Common types shared by the launcher crates.
//!
//! This crate provides:
//! - Unified launcher error handling
//! - Declarative configuration structures

pub mod config;
pub mod error;

pub use config::*;
pub use error::{LauncherError, LauncherResult};
