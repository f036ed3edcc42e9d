use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Maximum length of a task description, in characters
pub const MAX_TASK_TEXT_LEN: usize = 200;

/// A stored task record
///
/// Tasks are the sole persisted entity. The store assigns `id` and
/// `created_at` at creation; `text` and `completed` are the only fields
/// that change afterwards, each through its own targeted update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Unique identifier for the task, assigned by the store
    pub id: String,
    /// Task description
    pub text: String,
    /// Whether the task has been completed
    pub completed: bool,
    /// When the task was created
    pub created_at: DateTime<Utc>,
}

/// A full, ordered view of the task collection
///
/// Snapshots are published wholesale on every store change: incomplete
/// tasks first, then completed ones, newest-created first within each
/// group. Consumers replace their local mirror with each snapshot rather
/// than patching it.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TaskSnapshot {
    /// Tasks in display order
    pub tasks: Vec<Task>,
    /// Monotonic publish counter, starting at 0 for the initial load
    pub seq: u64,
}

impl TaskSnapshot {
    /// Tasks that are not yet completed, in display order
    pub fn pending(&self) -> impl Iterator<Item = &Task> {
        self.tasks.iter().filter(|task| !task.completed)
    }

    /// Tasks that have been completed, in display order
    pub fn completed(&self) -> impl Iterator<Item = &Task> {
        self.tasks.iter().filter(|task| task.completed)
    }
}

/// Validation failure for task description text
///
/// The messages double as the field-level messages shown next to the
/// input that produced them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TaskTextError {
    /// The description was empty after trimming
    #[error("Task description cannot be empty.")]
    Empty,

    /// The description exceeded [`MAX_TASK_TEXT_LEN`] characters
    #[error("Task too long.")]
    TooLong,
}

/// Validate task description text at the form boundary
///
/// Enforces length 1-200 characters. The store itself does not enforce
/// this; every entry point that accepts text runs it through here before
/// issuing a request.
///
/// # Examples
///
/// ```
/// use taskbrief::store::types::{validate_task_text, TaskTextError};
///
/// assert!(validate_task_text("Buy milk").is_ok());
/// assert_eq!(validate_task_text("   "), Err(TaskTextError::Empty));
/// ```
pub fn validate_task_text(text: &str) -> Result<(), TaskTextError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(TaskTextError::Empty);
    }
    if trimmed.chars().count() > MAX_TASK_TEXT_LEN {
        return Err(TaskTextError::TooLong);
    }
    Ok(())
}
