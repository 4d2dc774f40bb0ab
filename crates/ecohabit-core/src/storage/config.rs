//! TOML-based application configuration.
//!
//! Stores deployment overrides for:
//! - Engine tuning (active-task quota, footprint normalizers, flight question)
//! - Database location
//!
//! Configuration is stored at `~/.config/ecohabit/config.toml`. The
//! probability-of-success tables are policy constants and intentionally not
//! configurable here.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::data_dir;
use crate::catalog::QuestionId;
use crate::engine::EngineConfig;
use crate::error::ConfigError;

/// Engine tuning overrides.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineSection {
    #[serde(default = "default_max_active_tasks")]
    pub max_active_tasks: usize,
    #[serde(default = "default_avg_weekly_co2_kg")]
    pub avg_weekly_co2_kg: f64,
    #[serde(default = "default_avg_weekly_waste_kg")]
    pub avg_weekly_waste_kg: f64,
    /// Question whose hardness-0 responses are dropped from scoring.
    #[serde(default = "default_flight_question_id")]
    pub flight_question_id: Option<QuestionId>,
}

/// Database location override.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DatabaseSection {
    /// Explicit database file path; defaults to the data directory.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/ecohabit/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub engine: EngineSection,
    #[serde(default)]
    pub database: DatabaseSection,
}

// Default functions
fn default_max_active_tasks() -> usize {
    3
}
fn default_avg_weekly_co2_kg() -> f64 {
    192.0
}
fn default_avg_weekly_waste_kg() -> f64 {
    7.5
}
fn default_flight_question_id() -> Option<QuestionId> {
    Some(4)
}

impl Default for EngineSection {
    fn default() -> Self {
        Self {
            max_active_tasks: default_max_active_tasks(),
            avg_weekly_co2_kg: default_avg_weekly_co2_kg(),
            avg_weekly_waste_kg: default_avg_weekly_waste_kg(),
            flight_question_id: default_flight_question_id(),
        }
    }
}

impl Config {
    /// Path of the config file inside the data directory.
    ///
    /// # Errors
    /// Returns an error if the data directory cannot be created.
    pub fn path() -> Result<PathBuf, ConfigError> {
        let dir = data_dir().map_err(|e| ConfigError::LoadFailed {
            path: PathBuf::from("~/.config/ecohabit"),
            message: e.to_string(),
        })?;
        Ok(dir.join("config.toml"))
    }

    /// Load from disk, writing a default config file on first run.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::path()?;
        if path.exists() {
            let content = std::fs::read_to_string(&path).map_err(|e| ConfigError::LoadFailed {
                path: path.clone(),
                message: e.to_string(),
            })?;
            toml::from_str(&content).map_err(|e| ConfigError::ParseFailed(e.to_string()))
        } else {
            let cfg = Self::default();
            cfg.save()?;
            Ok(cfg)
        }
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }

    /// Persist to disk.
    ///
    /// # Errors
    /// Returns an error if the config cannot be serialized or written.
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = Self::path()?;
        let content =
            toml::to_string_pretty(self).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        std::fs::write(&path, content).map_err(|e| ConfigError::SaveFailed {
            path,
            message: e.to_string(),
        })?;
        Ok(())
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by key and persist the result.
    ///
    /// # Errors
    /// Returns an error if the key is unknown, the value cannot be parsed,
    /// or the config cannot be saved.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json = serde_json::to_value(&*self).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        *self = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        self.save()?;
        Ok(())
    }

    /// Engine constants with this config's overrides applied.
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            avg_weekly_co2_kg: self.engine.avg_weekly_co2_kg,
            avg_weekly_waste_kg: self.engine.avg_weekly_waste_kg,
            max_active_tasks: self.engine.max_active_tasks,
            flight_question_id: self.engine.flight_question_id,
            ..EngineConfig::default()
        }
    }

    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let unknown_key = || ConfigError::UnknownKey(key.to_string());
        let invalid_value = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if parts.peek().is_none() {
            return Err(unknown_key());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            let is_leaf = parts.peek().is_none();
            if is_leaf {
                let obj = current.as_object_mut().ok_or_else(unknown_key)?;
                let existing = obj.get(part).ok_or_else(unknown_key)?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value.parse::<bool>().map_err(|e| invalid_value(e.to_string()))?,
                    ),
                    serde_json::Value::Number(_) | serde_json::Value::Null => {
                        if let Ok(n) = value.parse::<i64>() {
                            serde_json::Value::Number(n.into())
                        } else if let Ok(n) = value.parse::<f64>() {
                            serde_json::Number::from_f64(n)
                                .map(serde_json::Value::Number)
                                .ok_or_else(|| {
                                    invalid_value(format!("cannot parse '{value}' as number"))
                                })?
                        } else {
                            return Err(invalid_value(format!(
                                "cannot parse '{value}' as number"
                            )));
                        }
                    }
                    serde_json::Value::String(_) => serde_json::Value::String(value.to_string()),
                    _ => return Err(unknown_key()),
                };
                obj.insert(part.to_string(), new_value);
            } else {
                current = current.get_mut(part).ok_or_else(unknown_key)?;
            }
        }
        Ok(())
    }
}
