//! Persistence: SQLite store and TOML configuration.

mod config;
pub mod database;

pub use config::Config;
pub use database::{HabitDb, ProgressOutcome};

use std::path::PathBuf;

/// Returns `~/.config/ecohabit[-dev]/` based on ECOHABIT_ENV.
///
/// Set ECOHABIT_ENV=dev to use a development data directory.
///
/// # Errors
/// Returns an error if the home directory cannot be determined or if
/// creating the config directory fails.
pub fn data_dir() -> Result<PathBuf, std::io::Error> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("ECOHABIT_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("ecohabit-dev")
    } else {
        base_dir.join("ecohabit")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
