//! Configuration loaded from the environment.
//!
//! # Environment Variables
//!
//! - `TASKFLOW_STORE`: store file (default: `db.sqlite` in the platform data directory)
//! - `TASKFLOW_NOTIFICATION_DURATION`: how long notifications stay up, e.g. `5s` (default: 5s, `0s` keeps them)
//! - `TASKFLOW_SEARCH_DEBOUNCE`: quiet period before a search applies, e.g. `300ms`
//! - `TASKFLOW_SEED_SAMPLE_DATA`: seed the demo account into an empty store (default: true)
//! - `TASKFLOW_LOG`: log filter, falls back to `RUST_LOG`

use anyhow::{anyhow, Context};
use directories::ProjectDirs;
use humantime::parse_duration;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::filter::DEFAULT_SEARCH_DEBOUNCE;
use crate::notifications::DEFAULT_NOTIFICATION_DURATION;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Explicit store file; `None` means the default location.
    pub store_file: Option<PathBuf>,
    pub notification_duration: Duration,
    pub search_debounce: Duration,
    pub seed_sample_data: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            store_file: None,
            notification_duration: DEFAULT_NOTIFICATION_DURATION,
            search_debounce: DEFAULT_SEARCH_DEBOUNCE,
            seed_sample_data: true,
        }
    }
}

impl Config {
    /// Load configuration from environment variables, reading a `.env` file
    /// first if there is one.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Config::from_lookup(|key| env::var(key).ok())
    }

    /// Build a configuration from any key lookup.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();

        let store_file = lookup("TASKFLOW_STORE")
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from);

        let notification_duration = match lookup("TASKFLOW_NOTIFICATION_DURATION") {
            Some(value) => parse_duration(&value)
                .with_context(|| format!("Invalid TASKFLOW_NOTIFICATION_DURATION '{}'", value))?,
            None => defaults.notification_duration,
        };

        let search_debounce = match lookup("TASKFLOW_SEARCH_DEBOUNCE") {
            Some(value) => parse_duration(&value)
                .with_context(|| format!("Invalid TASKFLOW_SEARCH_DEBOUNCE '{}'", value))?,
            None => defaults.search_debounce,
        };

        let seed_sample_data = match lookup("TASKFLOW_SEED_SAMPLE_DATA") {
            Some(value) => parse_bool(&value)
                .ok_or_else(|| anyhow!("Invalid TASKFLOW_SEED_SAMPLE_DATA '{}'", value))?,
            None => defaults.seed_sample_data,
        };

        Ok(Config {
            store_file,
            notification_duration,
            search_debounce,
            seed_sample_data,
        })
    }

    /// The store file to use: the configured one, or `db.sqlite` in the
    /// platform data directory, which is created if needed.
    pub fn resolve_store_file(&self) -> anyhow::Result<PathBuf> {
        if let Some(path) = &self.store_file {
            return Ok(path.clone());
        }
        let dirs = ProjectDirs::from("com", "taskflow", "taskflow")
            .ok_or_else(|| anyhow!("Failed to find a data directory for the store."))?;
        let root_dir = dirs.data_dir();
        if !root_dir.exists() {
            std::fs::create_dir_all(root_dir)
                .with_context(|| format!("Failed to create directory {}.", root_dir.display()))?;
        }
        Ok(root_dir.join("db.sqlite"))
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
