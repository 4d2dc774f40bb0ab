//! Core error types for ecohabit-core.
//!
//! This module defines the error hierarchy using thiserror for better
//! error handling and reporting across the library.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for ecohabit-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Database-related errors
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Recommendation engine errors
    #[error("Recommendation error: {0}")]
    Engine(#[from] EngineError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic errors with context
    #[error("{0}")]
    Custom(String),
}

/// Database-specific errors.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Failed to open database connection
    #[error("Failed to open database at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Database is locked
    #[error("Database is locked")]
    Locked,

    /// No user with the given id
    #[error("User not found: {0}")]
    UserNotFound(i64),

    /// No task instance with the given id
    #[error("Task instance not found: {0}")]
    TaskNotFound(String),

    /// No task template with the given id
    #[error("Task template not found: {0}")]
    TemplateNotFound(i64),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),

    /// Key does not exist in the configuration
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Value cannot be parsed for the given key
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
}

/// Per-response failures during recommendation.
///
/// These never abort a recommendation run; the engine logs the anomaly and
/// skips the offending response.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// Response references a question absent from the catalog
    #[error("response references unknown question {question_id}")]
    MissingQuestion { question_id: i64 },

    /// Question joins to a template absent from the catalog
    #[error("question {question_id} references unknown template {template_id}")]
    MissingTemplate { question_id: i64, template_id: i64 },

    /// A hardness rating was required but the follow-up answer is empty
    #[error("question {question_id} requires a hardness rating but none was given")]
    MissingHardness { question_id: i64 },

    /// The follow-up answer is not an integer in 1..=5
    #[error("invalid hardness rating {value:?} for question {question_id}: expected an integer 1-5")]
    InvalidHardness { question_id: i64, value: String },
}

impl From<rusqlite::Error> for DatabaseError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(err, _msg) => {
                if err.code == rusqlite::ErrorCode::DatabaseLocked {
                    DatabaseError::Locked
                } else {
                    DatabaseError::QueryFailed(err.to_string())
                }
            }
            _ => DatabaseError::QueryFailed(err.to_string()),
        }
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
