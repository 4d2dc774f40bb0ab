//! Configuration commands for CLI.

use clap::Subcommand;
use ecohabit_core::Config;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,
    /// Print the config file path
    Path,
    /// Get a value by dot-separated key
    Get {
        /// Key, e.g. engine.max_active_tasks
        key: String,
    },
    /// Set a value by dot-separated key
    Set {
        /// Key, e.g. engine.max_active_tasks
        key: String,
        /// New value
        value: String,
    },
}

pub fn run(action: ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ConfigAction::Show => {
            let config = Config::load()?;
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        ConfigAction::Path => {
            println!("{}", Config::path()?.display());
        }
        ConfigAction::Get { key } => {
            let config = Config::load()?;
            let value = config.get(&key).ok_or(format!("Unknown key: {key}"))?;
            println!("{value}");
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load()?;
            config.set(&key, &value)?;
            println!("Updated {key}");
        }
    }
    Ok(())
}
