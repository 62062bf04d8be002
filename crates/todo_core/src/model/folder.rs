//! Folder domain model.
//!
//! # Invariants
//! - `tasks` order is display order and must round-trip unchanged.
//! - A folder exclusively owns its tasks; dropping it drops them.

use super::task::{Task, TaskId};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for a folder.
pub type FolderId = Uuid;

/// Named, ordered group of tasks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Folder {
    pub id: FolderId,
    pub name: String,
    #[serde(default)]
    pub tasks: Vec<Task>,
}

impl Folder {
    /// Creates an empty folder with a generated id.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_tasks(name, Vec::new())
    }

    /// Creates a folder with a generated id and initial tasks.
    pub fn with_tasks(name: impl Into<String>, tasks: Vec<Task>) -> Self {
        Self::with_id(Uuid::new_v4(), name, tasks)
    }

    /// Creates a folder with a caller-provided id.
    ///
    /// Used by restore paths where identity already exists.
    pub fn with_id(id: FolderId, name: impl Into<String>, tasks: Vec<Task>) -> Self {
        Self {
            id,
            name: name.into(),
            tasks,
        }
    }

    pub fn task_index(&self, task_id: TaskId) -> Option<usize> {
        self.tasks.iter().position(|task| task.id == task_id)
    }

    pub fn task(&self, task_id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == task_id)
    }

    pub fn task_mut(&mut self, task_id: TaskId) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|task| task.id == task_id)
    }
}
