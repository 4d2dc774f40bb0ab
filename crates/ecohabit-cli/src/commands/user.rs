//! User management commands for CLI.

use clap::Subcommand;
use ecohabit_core::Config;

use super::common::open_db;

#[derive(Subcommand)]
pub enum UserAction {
    /// Register a new user
    Add {
        /// User name
        name: String,
    },
    /// List users
    List,
}

pub fn run(action: UserAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let db = open_db(&config)?;

    match action {
        UserAction::Add { name } => {
            let user = db.create_user(&name)?;
            println!("User added: {}", user.id);
            println!("{}", serde_json::to_string_pretty(&user)?);
        }
        UserAction::List => {
            let users = db.list_users()?;
            println!("{}", serde_json::to_string_pretty(&users)?);
        }
    }
    Ok(())
}
