//! Core data types for taches.

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

/// Maximum title length in characters.
pub const MAX_TITLE_LEN: usize = 100;

/// Maximum description length in characters.
pub const MAX_DESCRIPTION_LEN: usize = 500;

/// A single task as stored in the `tasks` table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Row id assigned by SQLite (AUTOINCREMENT)
    pub id: i64,

    /// Short description of the work
    pub title: String,

    /// Longer free text, empty when none was given
    #[serde(default)]
    pub description: String,

    /// Whether the task is done
    pub completed: bool,

    /// When created
    pub created_at: DateTime<Utc>,

    /// When completed (if completed)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl Task {
    /// Validate the task's fields.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_title(&self.title)?;
        validate_description(&self.description)?;
        match (self.completed, self.completed_at.is_some()) {
            (true, false) => Err(ValidationError::CompletedWithoutTimestamp),
            (false, true) => Err(ValidationError::CompletedAtWithoutCompletion),
            _ => Ok(()),
        }
    }
}

/// Row counts by completion state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TaskCounts {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
}

/// Validation errors for tasks.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    EmptyTitle,
    TitleTooLong,
    InvalidCharacters,
    DescriptionTooLong,
    CompletedWithoutTimestamp,
    CompletedAtWithoutCompletion,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::EmptyTitle => write!(f, "title cannot be empty"),
            ValidationError::TitleTooLong => write!(f, "title exceeds {} characters", MAX_TITLE_LEN),
            ValidationError::InvalidCharacters => write!(f, "title contains control characters"),
            ValidationError::DescriptionTooLong => {
                write!(f, "description exceeds {} characters", MAX_DESCRIPTION_LEN)
            }
            ValidationError::CompletedWithoutTimestamp => write!(f, "task is completed but has no completedAt"),
            ValidationError::CompletedAtWithoutCompletion => {
                write!(f, "completedAt set but task is not completed")
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Check a title the way the store will accept it: non-empty once trimmed,
/// at most `MAX_TITLE_LEN` characters, no control characters.
pub fn validate_title(title: &str) -> Result<(), ValidationError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(ValidationError::EmptyTitle);
    }
    if title.chars().count() > MAX_TITLE_LEN {
        return Err(ValidationError::TitleTooLong);
    }
    if title.chars().any(|c| c.is_control()) {
        return Err(ValidationError::InvalidCharacters);
    }
    Ok(())
}

/// Check a description: at most `MAX_DESCRIPTION_LEN` characters once trimmed.
pub fn validate_description(description: &str) -> Result<(), ValidationError> {
    if description.trim().chars().count() > MAX_DESCRIPTION_LEN {
        return Err(ValidationError::DescriptionTooLong);
    }
    Ok(())
}

/// Current time at the millisecond resolution stored on disk.
pub fn timestamp_now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}
