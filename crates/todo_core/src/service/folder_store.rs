//! Folder Collection store.
//!
//! # Responsibility
//! - Own the in-memory Folder Collection for one app session.
//! - Validate user input before any entity is constructed.
//! - Push reminder changes to the scheduler as mutation side effects.
//! - Notify subscribers after every applied change.
//!
//! # Invariants
//! - Rejected operations leave the collection and `revision` untouched.
//! - Deleting a task or folder cancels the reminders it owned.
//! - Reloading cancels reminders of tasks the loaded document drops.
//! - `load`/`save` never propagate persistence errors; `try_*` variants do.

use crate::model::folder::{Folder, FolderId};
use crate::model::task::{Task, TaskId};
use crate::reminder::{ReminderRequest, ReminderScheduler};
use crate::repo::{FolderRepository, RepoResult};
use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type StoreResult<T> = Result<T, StoreError>;

/// Store error for rejected user actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Task title is empty or whitespace-only.
    EmptyTitle,
    /// Folder name is empty or whitespace-only.
    EmptyFolderName,
    FolderNotFound(FolderId),
    TaskNotFound(TaskId),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "task title cannot be empty"),
            Self::EmptyFolderName => write!(f, "folder name cannot be empty"),
            Self::FolderNotFound(id) => write!(f, "folder not found: {id}"),
            Self::TaskNotFound(id) => write!(f, "task not found: {id}"),
        }
    }
}

impl Error for StoreError {}

/// Outcome of a lenient save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveReport {
    Saved {
        folder_count: usize,
        task_count: usize,
    },
    Failed {
        reason: String,
    },
}

impl SaveReport {
    pub fn is_saved(&self) -> bool {
        matches!(self, Self::Saved { .. })
    }
}

/// Creation input for a task.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewTask {
    pub title: String,
    pub is_starred: bool,
    pub reminder_date: Option<DateTime<Utc>>,
}

impl NewTask {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn starred(mut self) -> Self {
        self.is_starred = true;
        self
    }

    pub fn with_reminder(mut self, reminder_date: DateTime<Utc>) -> Self {
        self.reminder_date = Some(reminder_date);
        self
    }

    fn into_task(self) -> Task {
        Task::new(self.title)
            .with_starred(self.is_starred)
            .with_reminder(self.reminder_date)
    }
}

/// Handle returned by [`FolderStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&[Folder]) + Send>;

/// Explicit application state for the Folder Collection.
pub struct FolderStore<R: FolderRepository, S: ReminderScheduler> {
    repo: R,
    scheduler: S,
    folders: Vec<Folder>,
    revision: u64,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: u64,
}

impl<R: FolderRepository, S: ReminderScheduler> FolderStore<R, S> {
    /// Creates an empty store without touching storage.
    pub fn new(repo: R, scheduler: S) -> Self {
        Self {
            repo,
            scheduler,
            folders: Vec::new(),
            revision: 0,
            listeners: Vec::new(),
            next_subscription: 0,
        }
    }

    /// Creates a store and loads the persisted collection.
    pub fn open(repo: R, scheduler: S) -> Self {
        let mut store = Self::new(repo, scheduler);
        store.load();
        store
    }

    pub fn folders(&self) -> &[Folder] {
        &self.folders
    }

    pub fn folder(&self, folder_id: FolderId) -> Option<&Folder> {
        self.folders.iter().find(|folder| folder.id == folder_id)
    }

    /// Finds a task and the id of the folder that owns it.
    pub fn task(&self, task_id: TaskId) -> Option<(FolderId, &Task)> {
        self.folders
            .iter()
            .find_map(|folder| folder.task(task_id).map(|task| (folder.id, task)))
    }

    /// Monotonic change counter; bumped on every applied mutation and load.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn repo(&self) -> &R {
        &self.repo
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    /// Replaces memory with the persisted collection.
    ///
    /// Missing, unreadable, or undecodable documents yield an empty collection.
    pub fn load(&mut self) -> &[Folder] {
        let folders = match self.repo.load() {
            Ok(folders) => folders,
            Err(err) => {
                warn!(
                    "event=store_load module=store status=fallback error_code={} error={}",
                    err.code(),
                    err
                );
                Vec::new()
            }
        };
        self.replace_loaded(folders);
        &self.folders
    }

    /// Strict load; memory is only replaced on success.
    pub fn try_load(&mut self) -> RepoResult<&[Folder]> {
        let folders = self.repo.load()?;
        self.replace_loaded(folders);
        Ok(&self.folders)
    }

    /// Writes the full collection, reporting instead of propagating failures.
    pub fn save(&self) -> SaveReport {
        match self.try_save() {
            Ok(()) => SaveReport::Saved {
                folder_count: self.folders.len(),
                task_count: self.task_count(),
            },
            Err(err) => {
                warn!(
                    "event=store_save module=store status=error error_code={} error={}",
                    err.code(),
                    err
                );
                SaveReport::Failed {
                    reason: err.to_string(),
                }
            }
        }
    }

    pub fn try_save(&self) -> RepoResult<()> {
        self.repo.save(&self.folders)
    }

    /// Appends a new empty folder.
    pub fn add_folder(&mut self, name: impl Into<String>) -> StoreResult<FolderId> {
        let name = require_folder_name(name.into())?;
        let folder = Folder::new(name);
        let folder_id = folder.id;
        self.folders.push(folder);
        debug!(
            "event=folder_add module=store status=ok folders={}",
            self.folders.len()
        );
        self.commit();
        Ok(folder_id)
    }

    pub fn rename_folder(
        &mut self,
        folder_id: FolderId,
        name: impl Into<String>,
    ) -> StoreResult<()> {
        let name = require_folder_name(name.into())?;
        let folder = self.folder_mut(folder_id)?;
        folder.name = name;
        self.commit();
        Ok(())
    }

    /// Removes a folder and every task it owns.
    pub fn delete_folder(&mut self, folder_id: FolderId) -> StoreResult<Folder> {
        let index = self
            .folders
            .iter()
            .position(|folder| folder.id == folder_id)
            .ok_or(StoreError::FolderNotFound(folder_id))?;
        let folder = self.folders.remove(index);

        for task in folder.tasks.iter().filter(|task| task.has_reminder()) {
            self.scheduler.cancel(&task.id.to_string());
        }
        debug!(
            "event=folder_delete module=store status=ok removed_tasks={}",
            folder.tasks.len()
        );
        self.commit();
        Ok(folder)
    }

    /// Appends a task to an existing folder.
    pub fn add_task(&mut self, folder_id: FolderId, new_task: NewTask) -> StoreResult<TaskId> {
        require_title(&new_task.title)?;
        let task = new_task.into_task();
        let task_id = task.id;

        self.folder_mut(folder_id)?.tasks.push(task.clone());
        self.schedule_for(&task);
        debug!(
            "event=task_add module=store status=ok reminder={}",
            task.has_reminder()
        );
        self.commit();
        Ok(task_id)
    }

    /// Creates a folder whose first task is `new_task`.
    pub fn add_task_to_new_folder(
        &mut self,
        folder_name: impl Into<String>,
        new_task: NewTask,
    ) -> StoreResult<(FolderId, TaskId)> {
        require_title(&new_task.title)?;
        let folder_name = require_folder_name(folder_name.into())?;

        let task = new_task.into_task();
        let task_id = task.id;
        self.schedule_for(&task);
        let folder = Folder::with_tasks(folder_name, vec![task]);
        let folder_id = folder.id;
        self.folders.push(folder);
        self.commit();
        Ok((folder_id, task_id))
    }

    /// Flips `is_completed` and returns the new value.
    pub fn toggle_completed(&mut self, task_id: TaskId) -> StoreResult<bool> {
        let value = self.task_mut(task_id)?.toggle_completed();
        self.commit();
        Ok(value)
    }

    /// Flips `is_starred` and returns the new value.
    pub fn toggle_starred(&mut self, task_id: TaskId) -> StoreResult<bool> {
        let value = self.task_mut(task_id)?.toggle_starred();
        self.commit();
        Ok(value)
    }

    /// Sets or clears a task reminder and syncs the scheduler.
    pub fn set_reminder(
        &mut self,
        task_id: TaskId,
        reminder_date: Option<DateTime<Utc>>,
    ) -> StoreResult<()> {
        let task = self.task_mut(task_id)?;
        let had_reminder = task.has_reminder();
        task.reminder_date = reminder_date;
        let task = task.clone();

        if task.has_reminder() {
            self.schedule_for(&task);
        } else if had_reminder {
            self.scheduler.cancel(&task.id.to_string());
        }
        self.commit();
        Ok(())
    }

    /// Removes a task from its folder.
    pub fn delete_task(&mut self, task_id: TaskId) -> StoreResult<Task> {
        let (folder_index, task_index) = self
            .folders
            .iter()
            .enumerate()
            .find_map(|(folder_index, folder)| {
                folder
                    .task_index(task_id)
                    .map(|task_index| (folder_index, task_index))
            })
            .ok_or(StoreError::TaskNotFound(task_id))?;

        let task = self.folders[folder_index].tasks.remove(task_index);
        if task.has_reminder() {
            self.scheduler.cancel(&task.id.to_string());
        }
        self.commit();
        Ok(task)
    }

    /// Registers a listener called with the collection after each change.
    pub fn subscribe(
        &mut self,
        listener: impl FnMut(&[Folder]) + Send + 'static,
    ) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Removes a listener. Returns `false` when `id` is unknown.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
        self.listeners.len() != before
    }

    fn task_count(&self) -> usize {
        self.folders.iter().map(|folder| folder.tasks.len()).sum()
    }

    fn folder_mut(&mut self, folder_id: FolderId) -> StoreResult<&mut Folder> {
        self.folders
            .iter_mut()
            .find(|folder| folder.id == folder_id)
            .ok_or(StoreError::FolderNotFound(folder_id))
    }

    fn task_mut(&mut self, task_id: TaskId) -> StoreResult<&mut Task> {
        self.folders
            .iter_mut()
            .find_map(|folder| folder.task_mut(task_id))
            .ok_or(StoreError::TaskNotFound(task_id))
    }

    fn schedule_for(&mut self, task: &Task) {
        if let Some(request) = ReminderRequest::for_task(task) {
            self.scheduler.schedule(request);
        }
    }

    fn replace_loaded(&mut self, folders: Vec<Folder>) {
        let duplicates = count_duplicate_ids(&folders);
        if duplicates > 0 {
            warn!("event=store_load module=store status=warn duplicate_ids={duplicates}");
        }
        self.cancel_orphaned_reminders(&folders);
        self.folders = folders;
        info!(
            "event=store_load module=store status=ok folders={} tasks={}",
            self.folders.len(),
            self.task_count()
        );
        self.commit();
    }

    // Reminders owned by in-memory tasks that the incoming collection no longer
    // carries (or carries without a reminder) must not fire.
    fn cancel_orphaned_reminders(&mut self, incoming: &[Folder]) {
        let still_reminded: HashSet<TaskId> = incoming
            .iter()
            .flat_map(|folder| folder.tasks.iter())
            .filter(|task| task.has_reminder())
            .map(|task| task.id)
            .collect();
        let orphaned: Vec<TaskId> = self
            .folders
            .iter()
            .flat_map(|folder| folder.tasks.iter())
            .filter(|task| task.has_reminder() && !still_reminded.contains(&task.id))
            .map(|task| task.id)
            .collect();

        if !orphaned.is_empty() {
            debug!(
                "event=store_load module=store status=ok cancelled_reminders={}",
                orphaned.len()
            );
        }
        for task_id in orphaned {
            self.scheduler.cancel(&task_id.to_string());
        }
    }

    fn commit(&mut self) {
        self.revision += 1;
        for (_, listener) in self.listeners.iter_mut() {
            listener(&self.folders);
        }
    }
}

fn require_title(title: &str) -> StoreResult<()> {
    if title.trim().is_empty() {
        return Err(StoreError::EmptyTitle);
    }
    Ok(())
}

fn require_folder_name(name: String) -> StoreResult<String> {
    if name.trim().is_empty() {
        return Err(StoreError::EmptyFolderName);
    }
    Ok(name)
}

fn count_duplicate_ids(folders: &[Folder]) -> usize {
    let mut seen = HashSet::new();
    folders
        .iter()
        .flat_map(|folder| {
            std::iter::once(folder.id).chain(folder.tasks.iter().map(|task| task.id))
        })
        .filter(|id| !seen.insert(*id))
        .count()
}
