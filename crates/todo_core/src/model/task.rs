//! Task domain model.
//!
//! # Responsibility
//! - Define the task record stored inside a folder.
//! - Provide default construction and single-field toggles.
//!
//! # Invariants
//! - `id` is stable and never reused for another task.
//! - `reminder_date = None` means "no reminder".
//! - The entity does not validate `title`; creation paths reject blank input.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for a task.
pub type TaskId = Uuid;

/// One to-do item.
///
/// Wire names are camelCase to stay compatible with documents written by
/// earlier app builds. Flags and the reminder default when absent so that
/// documents from before starring/reminders still decode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    #[serde(default)]
    pub is_completed: bool,
    #[serde(default)]
    pub is_starred: bool,
    /// Serialized as RFC 3339 text, or `null` when unset.
    #[serde(default)]
    pub reminder_date: Option<DateTime<Utc>>,
}

impl Task {
    /// Creates a task with a generated id and default flags.
    pub fn new(title: impl Into<String>) -> Self {
        Self::with_id(Uuid::new_v4(), title)
    }

    /// Creates a task with a caller-provided id.
    ///
    /// Used by restore paths where identity already exists.
    pub fn with_id(id: TaskId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            is_completed: false,
            is_starred: false,
            reminder_date: None,
        }
    }

    pub fn with_completed(mut self, is_completed: bool) -> Self {
        self.is_completed = is_completed;
        self
    }

    pub fn with_starred(mut self, is_starred: bool) -> Self {
        self.is_starred = is_starred;
        self
    }

    pub fn with_reminder(mut self, reminder_date: Option<DateTime<Utc>>) -> Self {
        self.reminder_date = reminder_date;
        self
    }

    /// Flips completion state and returns the new value.
    pub fn toggle_completed(&mut self) -> bool {
        self.is_completed = !self.is_completed;
        self.is_completed
    }

    /// Flips starred state and returns the new value.
    pub fn toggle_starred(&mut self) -> bool {
        self.is_starred = !self.is_starred;
        self.is_starred
    }

    pub fn has_reminder(&self) -> bool {
        self.reminder_date.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::Task;

    #[test]
    fn toggles_return_new_value() {
        let mut task = Task::new("water plants");
        assert!(task.toggle_completed());
        assert!(!task.toggle_completed());
        assert!(task.toggle_starred());
        assert!(task.is_starred);
    }

    #[test]
    fn missing_optional_fields_decode_to_defaults() {
        let value = serde_json::json!({
            "id": "11111111-2222-4333-8444-555555555555",
            "title": "legacy"
        });

        let task: Task = serde_json::from_value(value).unwrap();
        assert!(!task.is_completed);
        assert!(!task.is_starred);
        assert_eq!(task.reminder_date, None);
    }
}
