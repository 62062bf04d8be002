//! Core domain logic for the folder-based to-do app.
//! This crate is the single source of truth for collection invariants.

pub mod config;
pub mod logging;
pub mod model;
pub mod reminder;
pub mod repo;
pub mod search;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::folder::{Folder, FolderId};
pub use model::task::{Task, TaskId};
pub use reminder::outbox::{ReminderCommand, ReminderOutbox};
pub use reminder::{ReminderRequest, ReminderScheduler, REMINDER_TITLE};
pub use repo::json_repo::{JsonFileFolderRepository, DOCUMENT_FILE_NAME};
pub use repo::memory_repo::InMemoryFolderRepository;
pub use repo::{FolderRepository, RepoError, RepoResult};
pub use search::tasks::{
    search_tasks, starred_tasks, TaskHit, TaskQuery, DEFAULT_SEARCH_LIMIT, MAX_SEARCH_LIMIT,
};
pub use service::folder_store::{
    FolderStore, NewTask, SaveReport, StoreError, StoreResult, SubscriptionId,
};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
