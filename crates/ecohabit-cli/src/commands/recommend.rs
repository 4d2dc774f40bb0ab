//! Recommendation command for CLI.

use ecohabit_core::Config;

use super::common::{assign_next_tasks, next_tasks, open_db};

pub fn run(user: i64, assign: bool) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let db = open_db(&config)?;
    db.get_user(user)?
        .ok_or(format!("User not found: {user}"))?;

    if assign {
        let assigned = assign_next_tasks(&db, &config, user)?;
        println!("{}", serde_json::to_string_pretty(&assigned)?);
    } else {
        let templates = next_tasks(&db, &config, user)?;
        println!("{}", serde_json::to_string_pretty(&templates)?);
    }
    Ok(())
}
