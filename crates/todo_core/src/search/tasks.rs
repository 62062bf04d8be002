//! Task queries across the Folder Collection.
//!
//! # Invariants
//! - Hits follow display order: folder order first, then task order.
//! - Matching is case-insensitive substring matching on `title`.
//! - A blank query returns no hits.
//! - The query is matched as typed; surrounding spaces are significant.

use crate::model::folder::{Folder, FolderId};
use crate::model::task::Task;

/// Hit cap used when the caller does not pick one.
pub const DEFAULT_SEARCH_LIMIT: usize = 20;
/// Upper bound accepted from outer layers.
pub const MAX_SEARCH_LIMIT: usize = 50;

/// Search options for title lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskQuery {
    /// User query text.
    pub text: String,
    /// Whether completed tasks are returned.
    pub include_completed: bool,
    /// Maximum number of hits to return.
    pub limit: usize,
}

impl TaskQuery {
    /// Creates a query that includes completed tasks, with default limit.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            include_completed: true,
            limit: DEFAULT_SEARCH_LIMIT,
        }
    }
}

/// One task together with the folder that owns it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskHit {
    pub folder_id: FolderId,
    pub folder_name: String,
    pub task: Task,
}

impl TaskHit {
    fn new(folder: &Folder, task: &Task) -> Self {
        Self {
            folder_id: folder.id,
            folder_name: folder.name.clone(),
            task: task.clone(),
        }
    }
}

/// Finds tasks whose title contains the query text.
pub fn search_tasks(folders: &[Folder], query: &TaskQuery) -> Vec<TaskHit> {
    if query.text.trim().is_empty() || query.limit == 0 {
        return Vec::new();
    }
    let needle = query.text.to_lowercase();

    folders
        .iter()
        .flat_map(|folder| folder.tasks.iter().map(move |task| (folder, task)))
        .filter(|(_, task)| query.include_completed || !task.is_completed)
        .filter(|(_, task)| task.title.to_lowercase().contains(&needle))
        .take(query.limit)
        .map(|(folder, task)| TaskHit::new(folder, task))
        .collect()
}

/// Lists every starred task in display order.
pub fn starred_tasks(folders: &[Folder]) -> Vec<TaskHit> {
    folders
        .iter()
        .flat_map(|folder| folder.tasks.iter().map(move |task| (folder, task)))
        .filter(|(_, task)| task.is_starred)
        .map(|(folder, task)| TaskHit::new(folder, task))
        .collect()
}
