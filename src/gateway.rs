//! Shared async handle to the task store.
//!
//! A `Gateway` is created unready, becomes usable after `initialize()`, and
//! can be cloned freely: every clone talks to the same `Store` and therefore
//! the same SQLite connection. Calls are serialized by an async mutex and the
//! SQLite work itself runs on tokio's blocking pool.

use crate::store::{Store, StoreError};
use crate::types::{Task, TaskCounts};
use eyre::{Context, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Cloneable async handle over a single `Store`.
#[derive(Clone)]
pub struct Gateway {
    path: PathBuf,
    store: Arc<Mutex<Option<Store>>>,
}

impl Gateway {
    /// Create an unready gateway for the database at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            store: Arc::new(Mutex::new(None)),
        }
    }

    /// Create a gateway and initialize it in one step.
    pub async fn connect(path: impl Into<PathBuf>) -> Result<Self> {
        let gateway = Self::new(path);
        gateway.initialize().await?;
        Ok(gateway)
    }

    /// Database path this gateway opens.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Open the store and create the schema. Calling it again is a no-op.
    pub async fn initialize(&self) -> Result<()> {
        let mut guard = Arc::clone(&self.store).lock_owned().await;
        if guard.is_some() {
            return Ok(());
        }

        let path = self.path.clone();
        let store = tokio::task::spawn_blocking(move || Store::open(&path))
            .await
            .context("Task store worker failed")?
            .context("Failed to initialize task store")?;
        *guard = Some(store);
        Ok(())
    }

    /// Whether `initialize()` has completed.
    pub async fn is_ready(&self) -> bool {
        self.store.lock().await.is_some()
    }

    /// Drop the connection. Later calls behave as before `initialize()`.
    pub async fn close(&self) {
        if self.store.lock().await.take().is_some() {
            log::debug!("Closed task store at {}", self.path.display());
        }
    }

    /// Run `f` on the blocking pool while holding the store lock.
    ///
    /// The owned guard moves into the blocking task, so SQLite I/O never
    /// runs on an async worker and callers stay serialized.
    async fn run_blocking<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(Option<&mut Store>) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let mut guard = Arc::clone(&self.store).lock_owned().await;
        tokio::task::spawn_blocking(move || f((*guard).as_mut()))
            .await
            .context("Task store worker failed")?
    }

    /// Run `f` against the store, failing if it is not initialized.
    async fn with_store<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Store) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        self.run_blocking(|store| match store {
            Some(store) => f(store),
            None => Err(eyre::eyre!(StoreError::StoreUnavailable)),
        })
        .await
    }

    /// List tasks. An uninitialized gateway has nothing to list.
    pub async fn list_tasks(&self, include_completed: bool) -> Result<Vec<Task>> {
        self.run_blocking(move |store| match store {
            Some(store) => store.list(include_completed),
            None => {
                log::warn!("list_tasks called before initialize, returning no tasks");
                Ok(Vec::new())
            }
        })
        .await
    }

    pub async fn get_task(&self, id: i64) -> Result<Option<Task>> {
        self.with_store(move |store| store.get(id)).await
    }

    pub async fn create_task(&self, title: &str, description: &str) -> Result<Task> {
        let (title, description) = (title.to_owned(), description.to_owned());
        self.with_store(move |store| store.create(&title, &description)).await
    }

    pub async fn update_task(&self, id: i64, title: &str, description: &str) -> Result<bool> {
        let (title, description) = (title.to_owned(), description.to_owned());
        self.with_store(move |store| store.update(id, &title, &description)).await
    }

    pub async fn toggle_completion(&self, id: i64) -> Result<Task> {
        self.with_store(move |store| store.toggle(id)).await
    }

    pub async fn delete_task(&self, id: i64) -> Result<bool> {
        self.with_store(move |store| store.delete(id)).await
    }

    pub async fn reset_all(&self) -> Result<usize> {
        self.with_store(|store| store.reset()).await
    }

    pub async fn seed_sample_data(&self) -> Result<Vec<Task>> {
        self.with_store(|store| store.seed_sample_data()).await
    }

    pub async fn counts(&self) -> Result<TaskCounts> {
        self.with_store(|store| store.counts()).await
    }
}
