//! Assigned-task commands for CLI.

use clap::Subcommand;
use ecohabit_core::Config;

use super::common::{assign_next_tasks, open_db};

#[derive(Subcommand)]
pub enum TaskAction {
    /// List a user's task instances
    List {
        /// User id
        user: i64,
        /// Only in-progress instances
        #[arg(long, conflicts_with = "completed")]
        incomplete: bool,
        /// Only completed instances
        #[arg(long)]
        completed: bool,
    },
    /// Record one completion against a task instance
    Progress {
        /// Task instance id
        id: String,
    },
}

pub fn run(action: TaskAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let db = open_db(&config)?;

    match action {
        TaskAction::List {
            user,
            incomplete,
            completed,
        } => {
            let tasks = if incomplete {
                db.incomplete_tasks(user)?
            } else if completed {
                db.completed_tasks(user)?
            } else {
                db.tasks_for_user(user)?
            };
            println!("{}", serde_json::to_string_pretty(&tasks)?);
        }
        TaskAction::Progress { id } => {
            let outcome = db.record_progress(&id)?;
            println!("{}", serde_json::to_string_pretty(&outcome)?);

            // A finished instance frees quota; refill the shortlist.
            if outcome.completed_now {
                let refill = assign_next_tasks(&db, &config, outcome.task.user_id)?;
                println!("{}", serde_json::to_string_pretty(&refill)?);
            }
        }
    }
    Ok(())
}
