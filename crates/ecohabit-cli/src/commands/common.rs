//! Shared helpers for CLI commands.

use ecohabit_core::{recommend, Config, HabitDb, TaskInstance, TaskTemplate, UserId};
use tracing::info;

/// Open the store, honoring a configured path override.
pub fn open_db(config: &Config) -> Result<HabitDb, Box<dyn std::error::Error>> {
    let db = match &config.database.path {
        Some(path) => HabitDb::open_at(path)?,
        None => HabitDb::open()?,
    };
    Ok(db)
}

/// Load a user's snapshot and compute their next task shortlist.
pub fn next_tasks(
    db: &HabitDb,
    config: &Config,
    user_id: UserId,
) -> Result<Vec<TaskTemplate>, Box<dyn std::error::Error>> {
    let questions = db.list_questions()?;
    let templates = db.list_templates()?;
    let responses = db.responses_for_user(user_id)?;
    let incomplete = db.incomplete_tasks(user_id)?;
    let completed = db.completed_tasks(user_id)?;

    let engine_config = config.engine_config();
    let selected = recommend(
        &engine_config,
        &questions,
        &responses,
        &templates,
        &incomplete,
        &completed,
    );
    Ok(selected.into_iter().cloned().collect())
}

/// Compute the shortlist and persist it as new task instances.
pub fn assign_next_tasks(
    db: &HabitDb,
    config: &Config,
    user_id: UserId,
) -> Result<Vec<TaskInstance>, Box<dyn std::error::Error>> {
    let templates = next_tasks(db, config, user_id)?;
    let mut assigned = Vec::new();
    for template in &templates {
        let task = TaskInstance::assign(template, user_id);
        db.assign_task(&task)?;
        assigned.push(task);
    }
    info!(user_id, count = assigned.len(), "generated task assignments");
    Ok(assigned)
}
