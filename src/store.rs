//! High-level store API for taches.

use crate::samples::SAMPLE_TASKS;
use crate::storage::Storage;
use crate::types::{Task, TaskCounts, ValidationError, timestamp_now, validate_description, validate_title};
use eyre::{Context, Result};
use std::path::Path;

/// Errors that can occur during store operations.
#[derive(Debug)]
pub enum StoreError {
    /// The store has not been initialized yet.
    StoreUnavailable,
    /// Task not found.
    TaskNotFound(i64),
    /// Validation error.
    Validation(ValidationError),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::StoreUnavailable => write!(f, "task store is not initialized"),
            StoreError::TaskNotFound(id) => write!(f, "task not found: {}", id),
            StoreError::Validation(e) => write!(f, "validation error: {}", e),
        }
    }
}

impl std::error::Error for StoreError {}

/// The task store: every gateway operation over one SQLite connection.
pub struct Store {
    storage: Storage,
}

impl Store {
    /// Open or create the store at `path`.
    pub fn open(path: &Path) -> Result<Self> {
        let storage = Storage::open(path)?;
        log::info!("Task store ready at {}", path.display());
        Ok(Self { storage })
    }

    /// Path of the backing database file.
    pub fn path(&self) -> &Path {
        self.storage.path()
    }

    /// List tasks oldest first; completed ones only when asked for.
    pub fn list(&self, include_completed: bool) -> Result<Vec<Task>> {
        self.storage.list_tasks(include_completed)
    }

    /// Get a task by id.
    pub fn get(&self, id: i64) -> Result<Option<Task>> {
        self.storage.get_task(id)
    }

    /// Create a new task. Title and description are trimmed first.
    pub fn create(&mut self, title: &str, description: &str) -> Result<Task> {
        let (title, description) = (title.trim(), description.trim());
        validate_title(title).map_err(|e| eyre::eyre!(StoreError::Validation(e)))?;
        validate_description(description).map_err(|e| eyre::eyre!(StoreError::Validation(e)))?;

        let task = self
            .storage
            .insert_task(title, description, timestamp_now())
            .context("Failed to persist task")?;

        log::debug!("Created task {}: {}", task.id, task.title);
        Ok(task)
    }

    /// Overwrite a task's title and description.
    ///
    /// A missing id is not an error; the return value says whether a task
    /// was updated.
    pub fn update(&mut self, id: i64, title: &str, description: &str) -> Result<bool> {
        let (title, description) = (title.trim(), description.trim());
        validate_title(title).map_err(|e| eyre::eyre!(StoreError::Validation(e)))?;
        validate_description(description).map_err(|e| eyre::eyre!(StoreError::Validation(e)))?;

        let updated = self
            .storage
            .update_task(id, title, description)
            .context("Failed to persist task update")?;

        if updated {
            log::debug!("Updated task {}", id);
        } else {
            log::debug!("Update skipped, no task {}", id);
        }
        Ok(updated)
    }

    /// Flip a task between pending and completed.
    pub fn toggle(&mut self, id: i64) -> Result<Task> {
        let task = self
            .storage
            .toggle_task(id, timestamp_now())
            .context("Failed to toggle task")?
            .ok_or_else(|| eyre::eyre!(StoreError::TaskNotFound(id)))?;

        log::debug!("Task {} completed = {}", id, task.completed);
        Ok(task)
    }

    /// Delete a task. Returns false when there was nothing to delete.
    pub fn delete(&mut self, id: i64) -> Result<bool> {
        let deleted = self.storage.delete_task(id).context("Failed to delete task")?;
        if deleted {
            log::debug!("Deleted task {}", id);
        }
        Ok(deleted)
    }

    /// Remove every task. Irreversible.
    pub fn reset(&mut self) -> Result<usize> {
        let removed = self.storage.delete_all_tasks()?;
        log::info!("Reset task store, removed {} task(s)", removed);
        Ok(removed)
    }

    /// Insert the fixed sample tasks one by one.
    ///
    /// Not a single transaction: if one insert fails the earlier samples stay.
    pub fn seed_sample_data(&mut self) -> Result<Vec<Task>> {
        let mut created = Vec::with_capacity(SAMPLE_TASKS.len());
        for sample in SAMPLE_TASKS {
            let task = self
                .create(sample.title, sample.description)
                .with_context(|| format!("Failed to insert sample task '{}'", sample.title))?;
            created.push(task);
        }

        log::info!("Inserted {} sample task(s)", created.len());
        Ok(created)
    }

    /// Count tasks by completion state.
    pub fn counts(&self) -> Result<TaskCounts> {
        let (total, completed) = self.storage.count_tasks()?;
        Ok(TaskCounts {
            total,
            completed,
            pending: total - completed,
        })
    }
}
