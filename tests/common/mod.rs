//! Shared test infrastructure for taches integration tests.
//!
//! Provides TestEnv helper for consistent test setup/teardown.

#![allow(dead_code)]

use std::path::PathBuf;
use taches::{DB_FILE, Store, Task};
use tempfile::TempDir;

/// Test environment with automatic cleanup.
pub struct TestEnv {
    pub temp_dir: TempDir,
    pub store: Store,
}

impl TestEnv {
    /// Create a new test environment with an opened store.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = Store::open(&temp_dir.path().join(DB_FILE)).expect("Failed to open store");
        Self { temp_dir, store }
    }

    /// Path of the database file.
    pub fn db_path(&self) -> PathBuf {
        self.temp_dir.path().join(DB_FILE)
    }

    /// Create a task with an empty description.
    pub fn create_task(&mut self, title: &str) -> Task {
        self.store.create(title, "").expect("Failed to create task")
    }

    /// Create a task with a description.
    pub fn create_task_with_desc(&mut self, title: &str, description: &str) -> Task {
        self.store
            .create(title, description)
            .expect("Failed to create task")
    }

    /// Toggle a task and return its new state.
    pub fn toggle(&mut self, task: &Task) -> Task {
        self.store.toggle(task.id).expect("Failed to toggle task")
    }

    /// Fetch a task that must exist.
    pub fn fetch(&self, task: &Task) -> Task {
        self.store
            .get(task.id)
            .expect("Failed to get task")
            .expect("Task should exist")
    }

    /// All tasks, completed included.
    pub fn all(&self) -> Vec<Task> {
        self.store.list(true).expect("Failed to list tasks")
    }

    /// Tasks still to do.
    pub fn pending(&self) -> Vec<Task> {
        self.store.list(false).expect("Failed to list tasks")
    }

    /// Get all tasks count.
    pub fn total_count(&self) -> usize {
        self.all().len()
    }

    /// Assert the completedAt invariant on every stored task.
    pub fn assert_completion_invariant(&self) {
        for task in self.all() {
            assert_eq!(
                task.completed,
                task.completed_at.is_some(),
                "Task {} breaks completed/completedAt invariant: {:?}",
                task.id,
                task
            );
        }
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}
