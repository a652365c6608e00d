//! Taches: a personal task list stored in a local SQLite file.
//!
//! The [`Store`] wraps one SQLite connection and exposes the task operations;
//! the [`Gateway`] shares one store between async callers.
//!
//! # Example
//!
//! ```no_run
//! use taches::Store;
//! use std::path::Path;
//!
//! let mut store = Store::open(Path::new("tasks.db")).unwrap();
//!
//! let task = store.create("Faire les courses", "Pain, lait").unwrap();
//! store.toggle(task.id).unwrap();
//!
//! // Only tasks still to do
//! let pending = store.list(false).unwrap();
//! assert!(pending.iter().all(|t| !t.completed));
//! ```

mod samples;
mod storage;
mod store;
mod types;

pub mod config;
pub mod gateway;

// Re-export public API
pub use config::Config;
pub use gateway::Gateway;
pub use samples::{SAMPLE_TASKS, SampleTask};
pub use storage::{DB_FILE, DecodeError};
pub use store::{Store, StoreError};
pub use types::{
    MAX_DESCRIPTION_LEN, MAX_TITLE_LEN, Task, TaskCounts, ValidationError, validate_description, validate_title,
};
