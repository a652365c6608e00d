//! Storage layer for taches: a single SQLite table.

use crate::types::Task;
use chrono::{DateTime, SecondsFormat, Utc};
use eyre::{Context, Result};
use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension, params};
use std::fs;
use std::path::{Path, PathBuf};

/// Default SQLite database file name.
pub const DB_FILE: &str = "tasks.db";

/// Column list shared by every query that builds a `Task`.
const TASK_COLUMNS: &str = "id, title, description, completed, createdAt, completedAt";

/// Errors found while decoding a stored row.
#[derive(Debug, Clone, PartialEq)]
pub enum DecodeError {
    /// `completed` holds something other than 0 or 1.
    InvalidCompletedFlag { id: i64, value: i64 },
    /// A timestamp column is not RFC 3339.
    InvalidTimestamp { id: i64, column: &'static str, value: String },
    /// `completedAt` disagrees with `completed`.
    CompletionMismatch { id: i64, completed: bool },
}

impl std::fmt::Display for DecodeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DecodeError::InvalidCompletedFlag { id, value } => {
                write!(f, "task {}: completed must be 0 or 1, found {}", id, value)
            }
            DecodeError::InvalidTimestamp { id, column, value } => {
                write!(f, "task {}: {} is not a valid timestamp: '{}'", id, column, value)
            }
            DecodeError::CompletionMismatch { id, completed: true } => {
                write!(f, "task {}: completed but completedAt is missing", id)
            }
            DecodeError::CompletionMismatch { id, completed: false } => {
                write!(f, "task {}: completedAt set on a task that is not completed", id)
            }
        }
    }
}

impl std::error::Error for DecodeError {}

/// Storage handle owning the SQLite connection.
pub struct Storage {
    path: PathBuf,
    db: Connection,
}

impl Storage {
    /// Open (or create) the database at `path` and make sure the schema exists.
    ///
    /// Safe to call repeatedly on the same file: existing rows are kept.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let db = Connection::open(path).context("Failed to open SQLite database")?;

        let storage = Self {
            path: path.to_path_buf(),
            db,
        };
        storage.init_schema()?;

        log::debug!("Opened task database at {}", path.display());
        Ok(storage)
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Initialize SQLite schema.
    fn init_schema(&self) -> Result<()> {
        self.db
            .execute_batch(
                r#"
                CREATE TABLE IF NOT EXISTS tasks (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    title TEXT NOT NULL,
                    description TEXT,
                    completed INTEGER DEFAULT 0,
                    createdAt TEXT NOT NULL,
                    completedAt TEXT
                );
            "#,
            )
            .context("Failed to initialize schema")?;

        Ok(())
    }

    /// Insert a new, not yet completed task and return it.
    pub fn insert_task(&self, title: &str, description: &str, created_at: DateTime<Utc>) -> Result<Task> {
        self.db.execute(
            "INSERT INTO tasks (title, description, createdAt) VALUES (?, ?, ?)",
            params![title, description, format_timestamp(created_at)],
        )?;

        Ok(Task {
            id: self.db.last_insert_rowid(),
            title: title.to_string(),
            description: description.to_string(),
            completed: false,
            created_at,
            completed_at: None,
        })
    }

    /// Get a task by id.
    pub fn get_task(&self, id: i64) -> Result<Option<Task>> {
        let sql = format!("SELECT {} FROM tasks WHERE id = ?", TASK_COLUMNS);
        let task = self
            .db
            .query_row(&sql, params![id], Self::row_to_task)
            .optional()?;
        Ok(task)
    }

    /// List tasks oldest first, optionally skipping completed ones.
    pub fn list_tasks(&self, include_completed: bool) -> Result<Vec<Task>> {
        let sql = if include_completed {
            format!("SELECT {} FROM tasks ORDER BY createdAt ASC, id ASC", TASK_COLUMNS)
        } else {
            format!(
                "SELECT {} FROM tasks WHERE completed = 0 OR completed IS NULL ORDER BY createdAt ASC, id ASC",
                TASK_COLUMNS
            )
        };

        let mut stmt = self.db.prepare(&sql)?;
        let tasks = stmt
            .query_map([], Self::row_to_task)?
            .collect::<rusqlite::Result<Vec<Task>>>()
            .context("Failed to decode task rows")?;

        Ok(tasks)
    }

    /// Overwrite title and description. Returns false when no row matched.
    pub fn update_task(&self, id: i64, title: &str, description: &str) -> Result<bool> {
        let changed = self.db.execute(
            "UPDATE tasks SET title = ?, description = ? WHERE id = ?",
            params![title, description, id],
        )?;
        Ok(changed > 0)
    }

    /// Flip `completed` in a single statement and return the new row.
    ///
    /// `now` becomes `completedAt` when the task turns completed; it is
    /// cleared otherwise. Returns `None` when no row has this id. The flip
    /// is rolled back if the updated row fails to decode.
    pub fn toggle_task(&self, id: i64, now: DateTime<Utc>) -> Result<Option<Task>> {
        let sql = format!(
            r#"
            UPDATE tasks
            SET completed = CASE WHEN completed = 1 THEN 0 ELSE 1 END,
                completedAt = CASE WHEN completed = 1 THEN NULL ELSE ?1 END
            WHERE id = ?2
            RETURNING {}
            "#,
            TASK_COLUMNS
        );

        let tx = self.db.unchecked_transaction().context("Failed to begin toggle")?;
        let task = tx
            .query_row(&sql, params![format_timestamp(now), id], Self::row_to_task)
            .optional()?;
        tx.commit().context("Failed to commit toggle")?;
        Ok(task)
    }

    /// Delete a task. Returns false when no row matched.
    pub fn delete_task(&self, id: i64) -> Result<bool> {
        let changed = self.db.execute("DELETE FROM tasks WHERE id = ?", params![id])?;
        Ok(changed > 0)
    }

    /// Delete every task. The AUTOINCREMENT sequence is left as is.
    pub fn delete_all_tasks(&self) -> Result<usize> {
        let removed = self
            .db
            .execute("DELETE FROM tasks", [])
            .context("Failed to clear tasks table")?;
        Ok(removed)
    }

    /// Count all tasks and completed tasks.
    pub fn count_tasks(&self) -> Result<(usize, usize)> {
        let (total, completed): (i64, i64) = self.db.query_row(
            "SELECT COUNT(*), COALESCE(SUM(CASE WHEN completed = 1 THEN 1 ELSE 0 END), 0) FROM tasks",
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;
        Ok((total as usize, completed as usize))
    }

    /// Convert a database row to a Task.
    fn row_to_task(row: &rusqlite::Row) -> rusqlite::Result<Task> {
        let id: i64 = row.get(0)?;

        // NULL falls back to the column default
        let completed = match row.get::<_, Option<i64>>(3)?.unwrap_or(0) {
            0 => false,
            1 => true,
            value => {
                return Err(conversion_error(
                    3,
                    Type::Integer,
                    DecodeError::InvalidCompletedFlag { id, value },
                ));
            }
        };

        let created_at_str: String = row.get(4)?;
        let created_at = parse_timestamp(&created_at_str).ok_or_else(|| {
            conversion_error(
                4,
                Type::Text,
                DecodeError::InvalidTimestamp {
                    id,
                    column: "createdAt",
                    value: created_at_str.clone(),
                },
            )
        })?;

        let completed_at = match row.get::<_, Option<String>>(5)? {
            Some(s) => Some(parse_timestamp(&s).ok_or_else(|| {
                conversion_error(
                    5,
                    Type::Text,
                    DecodeError::InvalidTimestamp {
                        id,
                        column: "completedAt",
                        value: s.clone(),
                    },
                )
            })?),
            None => None,
        };

        if completed != completed_at.is_some() {
            return Err(conversion_error(5, Type::Text, DecodeError::CompletionMismatch { id, completed }));
        }

        Ok(Task {
            id,
            title: row.get(1)?,
            description: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
            completed,
            created_at,
            completed_at,
        })
    }

    /// Raw connection access for tests that need to plant rows.
    #[cfg(test)]
    pub(crate) fn connection(&self) -> &Connection {
        &self.db
    }
}

fn conversion_error(column: usize, ty: Type, err: DecodeError) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(column, ty, Box::new(err))
}

/// Format a timestamp the way it is stored: `2024-05-01T10:00:00.123Z`.
pub fn format_timestamp(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parse a stored RFC 3339 timestamp.
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s).map(|dt| dt.with_timezone(&Utc)).ok()
}
