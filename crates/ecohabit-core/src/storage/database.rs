//! SQLite-based store for the habit-tracking backend.
//!
//! Provides persistent storage for:
//! - The task/question catalog
//! - Users and their reward points
//! - Questionnaire responses
//! - Assigned task instances and their completion progress
//!
//! The recommendation engine never touches this module; callers load a
//! snapshot here, hand it to the engine, and persist the result.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use serde::Serialize;

use super::data_dir;
use crate::catalog::{Polarity, Question, TaskTemplate, TemplateId};
use crate::error::DatabaseError;
use crate::questionnaire::QuestionnaireResponse;
use crate::task::TaskInstance;
use crate::user::{User, UserId};

// === Helper Functions ===

/// Parse polarity from database string
fn parse_polarity(polarity_str: &str) -> Polarity {
    match polarity_str {
        "yes" => Polarity::Yes,
        _ => Polarity::No,
    }
}

/// Format polarity for database storage
fn format_polarity(polarity: Polarity) -> &'static str {
    match polarity {
        Polarity::Yes => "yes",
        Polarity::No => "no",
    }
}

/// Parse datetime from RFC3339 string with fallback to current time
fn parse_datetime_fallback(dt_str: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(dt_str)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

/// Build a TaskTemplate from a database row
fn row_to_template(row: &rusqlite::Row) -> Result<TaskTemplate, rusqlite::Error> {
    Ok(TaskTemplate {
        id: row.get(0)?,
        desc: row.get(1)?,
        user_points: row.get(2)?,
        carbon_savings: row.get(3)?,
        waste_savings: row.get(4)?,
        max_completions: row.get(5)?,
    })
}

/// Build a Question from a database row
fn row_to_question(row: &rusqlite::Row) -> Result<Question, rusqlite::Error> {
    let polarity_str: String = row.get(4)?;
    Ok(Question {
        id: row.get(0)?,
        template_id: row.get(1)?,
        prompt: row.get(2)?,
        followup: row.get(3)?,
        polarity: parse_polarity(&polarity_str),
    })
}

/// Build a QuestionnaireResponse from a database row
fn row_to_response(row: &rusqlite::Row) -> Result<QuestionnaireResponse, rusqlite::Error> {
    Ok(QuestionnaireResponse {
        id: row.get(0)?,
        user_id: row.get(1)?,
        question_id: row.get(2)?,
        answer1: row.get(3)?,
        answer2: row.get(4)?,
    })
}

/// Build a TaskInstance from a database row
fn row_to_task(row: &rusqlite::Row) -> Result<TaskInstance, rusqlite::Error> {
    let created_at_str: String = row.get(5)?;
    let completed_at_str: Option<String> = row.get(6)?;
    Ok(TaskInstance {
        id: row.get(0)?,
        template_id: row.get(1)?,
        user_id: row.get(2)?,
        completed: row.get(3)?,
        num_completions: row.get(4)?,
        created_at: parse_datetime_fallback(&created_at_str),
        completed_at: completed_at_str.map(|s| parse_datetime_fallback(&s)),
    })
}

/// Build a User from a database row
fn row_to_user(row: &rusqlite::Row) -> Result<User, rusqlite::Error> {
    Ok(User {
        id: row.get(0)?,
        name: row.get(1)?,
        points: row.get(2)?,
    })
}

/// Result of recording one completion against a task instance.
#[derive(Debug, Clone, Serialize)]
pub struct ProgressOutcome {
    pub task: TaskInstance,
    /// Points credited to the owning user for this completion.
    pub awarded_points: i64,
    /// Whether this completion finished the instance.
    pub completed_now: bool,
}

/// SQLite store for users, the catalog, responses, and task instances.
pub struct HabitDb {
    conn: Connection,
}

impl HabitDb {
    /// Open the database at `~/.config/ecohabit/ecohabit.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or initialized.
    pub fn open() -> Result<Self, DatabaseError> {
        let path = data_dir()
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?
            .join("ecohabit.db");
        Self::open_at(&path)
    }

    /// Open the database at an explicit path.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or initialized.
    pub fn open_at(path: &std::path::Path) -> Result<Self, DatabaseError> {
        let conn = Connection::open(path).map_err(|source| DatabaseError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let db = Self { conn };
        db.init_schema()?;
        Ok(db)
    }

    /// Open an in-memory database (for tests and ephemeral runs).
    ///
    /// # Errors
    /// Returns an error if the schema cannot be initialized.
    pub fn open_memory() -> Result<Self, DatabaseError> {
        let conn = Connection::open_in_memory().map_err(|source| DatabaseError::OpenFailed {
            path: ":memory:".into(),
            source,
        })?;
        let db = Self { conn };
        db.init_schema()?;
        Ok(db)
    }

    fn init_schema(&self) -> Result<(), DatabaseError> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS users (
                id     INTEGER PRIMARY KEY AUTOINCREMENT,
                name   TEXT NOT NULL,
                points INTEGER NOT NULL DEFAULT 0
            );

            CREATE TABLE IF NOT EXISTS task_templates (
                id              INTEGER PRIMARY KEY,
                desc            TEXT NOT NULL,
                user_points     INTEGER NOT NULL,
                carbon_savings  REAL NOT NULL,
                waste_savings   REAL NOT NULL,
                max_completions INTEGER NOT NULL
            );

            CREATE TABLE IF NOT EXISTS questions (
                id          INTEGER PRIMARY KEY,
                template_id INTEGER NOT NULL REFERENCES task_templates(id),
                prompt      TEXT NOT NULL,
                followup    TEXT NOT NULL,
                polarity    TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS questionnaire_responses (
                id          INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id     INTEGER NOT NULL,
                question_id INTEGER NOT NULL,
                answer1     TEXT NOT NULL,
                answer2     TEXT
            );

            CREATE TABLE IF NOT EXISTS tasks (
                id              TEXT PRIMARY KEY,
                template_id     INTEGER NOT NULL,
                user_id         INTEGER NOT NULL,
                completed       INTEGER NOT NULL,
                num_completions INTEGER NOT NULL,
                created_at      TEXT NOT NULL,
                completed_at    TEXT
            );

            CREATE INDEX IF NOT EXISTS idx_tasks_user_id ON tasks(user_id);
            CREATE INDEX IF NOT EXISTS idx_tasks_user_id_completed ON tasks(user_id, completed);
            CREATE INDEX IF NOT EXISTS idx_responses_user_id ON questionnaire_responses(user_id);",
        )?;
        Ok(())
    }

    // === Users ===

    /// Create a user with a zero points balance.
    ///
    /// # Errors
    /// Returns an error if the insert fails.
    pub fn create_user(&self, name: &str) -> Result<User, DatabaseError> {
        self.conn.execute(
            "INSERT INTO users (name, points) VALUES (?1, 0)",
            params![name],
        )?;
        let id = self.conn.last_insert_rowid();
        Ok(User {
            id,
            name: name.to_string(),
            points: 0,
        })
    }

    /// Fetch a user by id.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub fn get_user(&self, user_id: UserId) -> Result<Option<User>, DatabaseError> {
        let user = self
            .conn
            .query_row(
                "SELECT id, name, points FROM users WHERE id = ?1",
                params![user_id],
                row_to_user,
            )
            .optional()?;
        Ok(user)
    }

    /// List all users.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub fn list_users(&self) -> Result<Vec<User>, DatabaseError> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, points FROM users ORDER BY id")?;
        let users = stmt
            .query_map([], row_to_user)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(users)
    }

    /// Credit points to a user.
    ///
    /// # Errors
    /// Returns an error if the user does not exist or the update fails.
    pub fn add_points(&self, user_id: UserId, delta: i64) -> Result<(), DatabaseError> {
        let updated = self.conn.execute(
            "UPDATE users SET points = points + ?1 WHERE id = ?2",
            params![delta, user_id],
        )?;
        if updated == 0 {
            return Err(DatabaseError::UserNotFound(user_id));
        }
        Ok(())
    }

    // === Catalog ===

    /// Install a catalog, validating that every question joins to a template.
    ///
    /// Idempotent: existing entries with the same ids are replaced.
    ///
    /// # Errors
    /// Returns an error if a question references a missing template or a
    /// write fails.
    pub fn install_catalog(
        &self,
        questions: &[Question],
        templates: &[TaskTemplate],
    ) -> Result<(), DatabaseError> {
        for question in questions {
            if !templates.iter().any(|t| t.id == question.template_id) {
                return Err(DatabaseError::TemplateNotFound(question.template_id));
            }
        }

        for template in templates {
            self.conn.execute(
                "INSERT OR REPLACE INTO task_templates
                 (id, desc, user_points, carbon_savings, waste_savings, max_completions)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    template.id,
                    template.desc,
                    template.user_points,
                    template.carbon_savings,
                    template.waste_savings,
                    template.max_completions,
                ],
            )?;
        }
        for question in questions {
            self.conn.execute(
                "INSERT OR REPLACE INTO questions
                 (id, template_id, prompt, followup, polarity)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    question.id,
                    question.template_id,
                    question.prompt,
                    question.followup,
                    format_polarity(question.polarity),
                ],
            )?;
        }
        Ok(())
    }

    /// List all task templates.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub fn list_templates(&self) -> Result<Vec<TaskTemplate>, DatabaseError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, desc, user_points, carbon_savings, waste_savings, max_completions
             FROM task_templates ORDER BY id",
        )?;
        let templates = stmt
            .query_map([], row_to_template)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(templates)
    }

    /// Fetch a template by id.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub fn get_template(&self, template_id: TemplateId) -> Result<Option<TaskTemplate>, DatabaseError> {
        let template = self
            .conn
            .query_row(
                "SELECT id, desc, user_points, carbon_savings, waste_savings, max_completions
                 FROM task_templates WHERE id = ?1",
                params![template_id],
                row_to_template,
            )
            .optional()?;
        Ok(template)
    }

    /// List all questions.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub fn list_questions(&self) -> Result<Vec<Question>, DatabaseError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, template_id, prompt, followup, polarity FROM questions ORDER BY id",
        )?;
        let questions = stmt
            .query_map([], row_to_question)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(questions)
    }

    // === Questionnaire responses ===

    /// Record one questionnaire response, returning it with its assigned id.
    ///
    /// # Errors
    /// Returns an error if the insert fails.
    pub fn record_response(
        &self,
        response: &QuestionnaireResponse,
    ) -> Result<QuestionnaireResponse, DatabaseError> {
        self.conn.execute(
            "INSERT INTO questionnaire_responses (user_id, question_id, answer1, answer2)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                response.user_id,
                response.question_id,
                response.answer1,
                response.answer2,
            ],
        )?;
        let mut recorded = response.clone();
        recorded.id = self.conn.last_insert_rowid();
        Ok(recorded)
    }

    /// All of a user's questionnaire responses.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub fn responses_for_user(
        &self,
        user_id: UserId,
    ) -> Result<Vec<QuestionnaireResponse>, DatabaseError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, user_id, question_id, answer1, answer2
             FROM questionnaire_responses WHERE user_id = ?1 ORDER BY id",
        )?;
        let responses = stmt
            .query_map(params![user_id], row_to_response)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(responses)
    }

    // === Task instances ===

    /// Persist a newly assigned task instance.
    ///
    /// # Errors
    /// Returns an error if the insert fails.
    pub fn assign_task(&self, task: &TaskInstance) -> Result<(), DatabaseError> {
        self.conn.execute(
            "INSERT INTO tasks
             (id, template_id, user_id, completed, num_completions, created_at, completed_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                task.id,
                task.template_id,
                task.user_id,
                task.completed,
                task.num_completions,
                task.created_at.to_rfc3339(),
                task.completed_at.map(|t| t.to_rfc3339()),
            ],
        )?;
        Ok(())
    }

    /// Fetch a task instance by id.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub fn get_task(&self, task_id: &str) -> Result<Option<TaskInstance>, DatabaseError> {
        let task = self
            .conn
            .query_row(
                "SELECT id, template_id, user_id, completed, num_completions, created_at, completed_at
                 FROM tasks WHERE id = ?1",
                params![task_id],
                row_to_task,
            )
            .optional()?;
        Ok(task)
    }

    /// All of a user's task instances, oldest first.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub fn tasks_for_user(&self, user_id: UserId) -> Result<Vec<TaskInstance>, DatabaseError> {
        self.tasks_where(user_id, None)
    }

    /// A user's in-progress task instances.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub fn incomplete_tasks(&self, user_id: UserId) -> Result<Vec<TaskInstance>, DatabaseError> {
        self.tasks_where(user_id, Some(false))
    }

    /// A user's completed task instances.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub fn completed_tasks(&self, user_id: UserId) -> Result<Vec<TaskInstance>, DatabaseError> {
        self.tasks_where(user_id, Some(true))
    }

    fn tasks_where(
        &self,
        user_id: UserId,
        completed: Option<bool>,
    ) -> Result<Vec<TaskInstance>, DatabaseError> {
        let mut sql = String::from(
            "SELECT id, template_id, user_id, completed, num_completions, created_at, completed_at
             FROM tasks WHERE user_id = ?1",
        );
        if completed.is_some() {
            sql.push_str(" AND completed = ?2");
        }
        sql.push_str(" ORDER BY created_at, id");

        let mut stmt = self.conn.prepare(&sql)?;
        let tasks = match completed {
            Some(flag) => stmt
                .query_map(params![user_id, flag], row_to_task)?
                .collect::<Result<Vec<_>, _>>()?,
            None => stmt
                .query_map(params![user_id], row_to_task)?
                .collect::<Result<Vec<_>, _>>()?,
        };
        Ok(tasks)
    }

    /// Persist updated progress fields of a task instance.
    ///
    /// # Errors
    /// Returns an error if the instance does not exist or the update fails.
    pub fn update_task(&self, task: &TaskInstance) -> Result<(), DatabaseError> {
        let updated = self.conn.execute(
            "UPDATE tasks SET completed = ?1, num_completions = ?2, completed_at = ?3
             WHERE id = ?4",
            params![
                task.completed,
                task.num_completions,
                task.completed_at.map(|t| t.to_rfc3339()),
                task.id,
            ],
        )?;
        if updated == 0 {
            return Err(DatabaseError::TaskNotFound(task.id.clone()));
        }
        Ok(())
    }

    /// Record one completion against a task instance and credit the owner.
    ///
    /// Increments the completion counter, completes the instance when it
    /// reaches the template's limit, and awards the template's points to the
    /// owning user.
    ///
    /// # Errors
    /// Returns an error if the instance or its template is missing, or a
    /// write fails.
    pub fn record_progress(&self, task_id: &str) -> Result<ProgressOutcome, DatabaseError> {
        let mut task = self
            .get_task(task_id)?
            .ok_or_else(|| DatabaseError::TaskNotFound(task_id.to_string()))?;
        let template = self
            .get_template(task.template_id)?
            .ok_or(DatabaseError::TemplateNotFound(task.template_id))?;

        if task.completed {
            return Ok(ProgressOutcome {
                task,
                awarded_points: 0,
                completed_now: false,
            });
        }

        let completed_now = task.record_completion(&template);
        self.update_task(&task)?;
        self.add_points(task.user_id, template.user_points)?;

        Ok(ProgressOutcome {
            task,
            awarded_points: template.user_points,
            completed_now,
        })
    }
}
