use anyhow::{Context, Result};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;
use uuid::Uuid;

use crate::model::{Project, Task, User};

const USERS_KEY: &str = "taskflow_users";
const CURRENT_USER_KEY: &str = "taskflow_current_user";
const PROJECTS_KEY: &str = "taskflow_projects";
const TASKS_KEY: &str = "taskflow_tasks";

/// The persistent key-value store holding the four board regions: users,
/// the session pointer, projects and tasks. Each region is a JSON document
/// that is read and written wholesale.
pub struct Store {
    db: Connection,
}

impl Store {
    /// Open the store file, creating it if it does not exist.
    pub fn open(path: &Path) -> Result<Store> {
        let db = Connection::open(path)
            .with_context(|| format!("Failed to open store {}.", path.display()))?;
        init_store(&db)?;
        tracing::debug!(path = %path.display(), "opened store");
        Ok(Store { db })
    }

    /// Open a private store that lives only as long as the value.
    pub fn open_in_memory() -> Result<Store> {
        let db = Connection::open_in_memory().context("Failed to open in-memory store.")?;
        init_store(&db)?;
        Ok(Store { db })
    }

    pub fn users(&self) -> Result<Vec<User>> {
        Ok(self.read(USERS_KEY)?.unwrap_or_default())
    }

    pub fn save_users(&self, users: &[User]) -> Result<()> {
        self.write(USERS_KEY, users)
    }

    /// The logged in user, if any.
    pub fn current_user(&self) -> Result<Option<User>> {
        self.read(CURRENT_USER_KEY)
    }

    pub fn set_current_user(&self, user: &User) -> Result<()> {
        self.write(CURRENT_USER_KEY, user)
    }

    pub fn clear_current_user(&self) -> Result<()> {
        self.remove(CURRENT_USER_KEY)
    }

    pub fn projects(&self) -> Result<Vec<Project>> {
        Ok(self.read(PROJECTS_KEY)?.unwrap_or_default())
    }

    pub fn save_projects(&self, projects: &[Project]) -> Result<()> {
        self.write(PROJECTS_KEY, projects)
    }

    pub fn tasks(&self) -> Result<Vec<Task>> {
        Ok(self.read(TASKS_KEY)?.unwrap_or_default())
    }

    pub fn save_tasks(&self, tasks: &[Task]) -> Result<()> {
        self.write(TASKS_KEY, tasks)
    }

    fn read<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let value = self
            .db
            .query_row(
                "SELECT value FROM kv WHERE key = ?1",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()
            .with_context(|| format!("Failed to read '{}' from store.", key))?;

        match value {
            Some(json) => {
                let parsed = serde_json::from_str(&json)
                    .with_context(|| format!("Failed to parse '{}' from store.", key))?;
                Ok(Some(parsed))
            }
            None => Ok(None),
        }
    }

    fn write<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let json = serde_json::to_string(value)
            .with_context(|| format!("Failed to serialize '{}'.", key))?;
        self.db
            .execute(
                "INSERT INTO kv (key, value, updated_at) VALUES (?1, ?2, ?3)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
                params![key, json, Utc::now()],
            )
            .with_context(|| format!("Failed to write '{}' to store.", key))?;
        tracing::trace!(key, bytes = json.len(), "saved region");
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.db
            .execute("DELETE FROM kv WHERE key = ?1", params![key])
            .with_context(|| format!("Failed to remove '{}' from store.", key))?;
        Ok(())
    }
}

/// Initialize the store database.
fn init_store(db: &Connection) -> Result<()> {
    db.execute(
        "CREATE TABLE if not exists kv (
                  key             TEXT PRIMARY KEY,
                  value           TEXT NOT NULL,
                  updated_at      TEXT NOT NULL
                  )",
        [],
    )
    .context("Failed to create kv table.")?;
    Ok(())
}

/// Return a new unique record identifier.
pub fn generate_id() -> String {
    Uuid::new_v4().simple().to_string()
}
