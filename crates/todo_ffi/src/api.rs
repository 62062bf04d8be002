//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose stable, use-case-level functions to Dart via FRB.
//! - Park the session's `FolderStore` in process-global state.
//! - Hand reminder commands to the host, which owns the OS notification center.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - Ids cross the boundary as UUID strings; timestamps as epoch milliseconds.
//! - Every store call fails with a message until `store_open` succeeds.

use chrono::{DateTime, TimeZone, Utc};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::{Mutex, MutexGuard};
use todo_core::config::resolve_dir;
use todo_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    search_tasks, starred_tasks, Folder, FolderStore, JsonFileFolderRepository, NewTask,
    ReminderCommand, ReminderOutbox, SaveReport, StoreError, Task, TaskHit, TaskQuery,
    DEFAULT_SEARCH_LIMIT, MAX_SEARCH_LIMIT,
};
use uuid::Uuid;

type SessionStore = FolderStore<JsonFileFolderRepository, ReminderOutbox>;

static SESSION_STORE: Mutex<Option<SessionStore>> = Mutex::new(None);

/// Failure of one FFI call before or inside the store.
#[derive(Debug, Clone, PartialEq, Eq)]
enum ApiError {
    LockPoisoned,
    StoreClosed,
    InvalidPath(String),
    InvalidId { label: &'static str, raw: String },
    InvalidTime(i64),
    Store(StoreError),
}

impl ApiError {
    /// Stable short code used in log events.
    fn code(&self) -> &'static str {
        match self {
            Self::LockPoisoned => "lock_poisoned",
            Self::StoreClosed => "store_closed",
            Self::InvalidPath(_) => "invalid_path",
            Self::InvalidId { .. } => "invalid_id",
            Self::InvalidTime(_) => "invalid_time",
            Self::Store(StoreError::EmptyTitle) => "empty_title",
            Self::Store(StoreError::EmptyFolderName) => "empty_folder_name",
            Self::Store(StoreError::FolderNotFound(_)) => "folder_not_found",
            Self::Store(StoreError::TaskNotFound(_)) => "task_not_found",
        }
    }
}

impl Display for ApiError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::LockPoisoned => write!(f, "session store lock poisoned"),
            Self::StoreClosed => write!(f, "store is not open; call store_open first"),
            Self::InvalidPath(message) => write!(f, "{message}"),
            Self::InvalidId { label, raw } => write!(f, "invalid {label} `{raw}`"),
            Self::InvalidTime(value) => write!(f, "reminder time out of range: {value}"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ApiError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            _ => None,
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Task row as seen by the UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskItem {
    pub task_id: String,
    pub title: String,
    pub is_completed: bool,
    pub is_starred: bool,
    /// Reminder time in epoch milliseconds, `None` when unset.
    pub reminder_epoch_ms: Option<i64>,
}

/// Folder with its tasks in display order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderItem {
    pub folder_id: String,
    pub name: String,
    pub tasks: Vec<TaskItem>,
}

/// Task row plus the folder that owns it, for search and starred lists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskHitItem {
    pub folder_id: String,
    pub folder_name: String,
    pub task: TaskItem,
}

/// Reminder command the host forwards to the OS notification center.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReminderCommandItem {
    /// `schedule` or `cancel`.
    pub action: String,
    pub identifier: String,
    /// Set for `schedule` only.
    pub fire_at_epoch_ms: Option<i64>,
    pub title: Option<String>,
    pub body: Option<String>,
}

/// Generic action response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreActionResponse {
    /// Whether operation succeeded.
    pub ok: bool,
    /// Id of the created or affected entity.
    pub id: Option<String>,
    /// Folder that owns the task, set by task creation calls.
    pub folder_id: Option<String>,
    /// New flag value for toggle actions.
    pub value: Option<bool>,
    /// Human-readable response message for diagnostics/UI.
    pub message: String,
}

impl StoreActionResponse {
    fn success(message: impl Into<String>, id: Option<String>) -> Self {
        Self {
            ok: true,
            id,
            folder_id: None,
            value: None,
            message: message.into(),
        }
    }

    fn with_folder_id(mut self, folder_id: Uuid) -> Self {
        self.folder_id = Some(folder_id.to_string());
        self
    }

    fn toggled(message: impl Into<String>, id: String, value: bool) -> Self {
        Self {
            ok: true,
            id: Some(id),
            folder_id: None,
            value: Some(value),
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            id: None,
            folder_id: None,
            value: None,
            message: message.into(),
        }
    }
}

/// Opens the session store from `<data_dir>/folders.json`.
///
/// # FFI contract
/// - `data_dir` must be an absolute path (the app documents directory).
/// - A missing or corrupt document opens as an empty collection.
/// - Replaces any previously opened store without saving it; reminder commands
///   it still held stay queued for `reminders_take_pending`.
#[flutter_rust_bridge::frb(sync)]
pub fn store_open(data_dir: String) -> StoreActionResponse {
    match open_session(data_dir.as_str()) {
        Ok(folder_count) => {
            StoreActionResponse::success(format!("Loaded {folder_count} folder(s)."), None)
        }
        Err(err) => failure_response("store_open", &err),
    }
}

/// Writes the full collection to disk.
///
/// # FFI contract
/// - Intended for app-background lifecycle events.
/// - Write failures return `ok=false`; in-memory state is kept.
#[flutter_rust_bridge::frb(sync)]
pub fn store_save() -> StoreActionResponse {
    match with_store(|store| Ok(store.save())) {
        Ok(SaveReport::Saved {
            folder_count,
            task_count,
        }) => StoreActionResponse::success(
            format!("Saved {folder_count} folder(s), {task_count} task(s)."),
            None,
        ),
        Ok(SaveReport::Failed { reason }) => {
            StoreActionResponse::failure(format!("store_save failed: {reason}"))
        }
        Err(err) => failure_response("store_save", &err),
    }
}

/// Lists all folders with tasks in display order.
///
/// Returns an empty list when the store is not open.
#[flutter_rust_bridge::frb(sync)]
pub fn folders_list() -> Vec<FolderItem> {
    with_store(|store| Ok(store.folders().iter().map(to_folder_item).collect()))
        .unwrap_or_default()
}

#[flutter_rust_bridge::frb(sync)]
pub fn folder_create(name: String) -> StoreActionResponse {
    respond("folder_create", |store| {
        let folder_id = store.add_folder(name.trim().to_string())?;
        Ok(StoreActionResponse::success(
            "Folder created.",
            Some(folder_id.to_string()),
        ))
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn folder_rename(folder_id: String, name: String) -> StoreActionResponse {
    respond("folder_rename", |store| {
        let folder_id = parse_id(&folder_id, "folder_id")?;
        store.rename_folder(folder_id, name.trim().to_string())?;
        Ok(StoreActionResponse::success(
            "Folder renamed.",
            Some(folder_id.to_string()),
        ))
    })
}

/// Deletes a folder with all of its tasks and cancels their reminders.
#[flutter_rust_bridge::frb(sync)]
pub fn folder_delete(folder_id: String) -> StoreActionResponse {
    respond("folder_delete", |store| {
        let folder_id = parse_id(&folder_id, "folder_id")?;
        store.delete_folder(folder_id)?;
        Ok(StoreActionResponse::success(
            "Folder deleted.",
            Some(folder_id.to_string()),
        ))
    })
}

/// Appends a task to an existing folder.
///
/// # FFI contract
/// - Blank titles are rejected with `ok=false`; nothing is created.
/// - A reminder time queues a `schedule` reminder command.
/// - `id` is the new task id; `folder_id` echoes the owning folder.
#[flutter_rust_bridge::frb(sync)]
pub fn task_create(
    folder_id: String,
    title: String,
    is_starred: bool,
    reminder_epoch_ms: Option<i64>,
) -> StoreActionResponse {
    respond("task_create", |store| {
        let folder_id = parse_id(&folder_id, "folder_id")?;
        let new_task = new_task(title, is_starred, reminder_epoch_ms)?;
        let task_id = store.add_task(folder_id, new_task)?;
        Ok(
            StoreActionResponse::success("Task created.", Some(task_id.to_string()))
                .with_folder_id(folder_id),
        )
    })
}

/// Creates a folder whose first task is the given one.
///
/// `id` is the new task id and `folder_id` the new folder id.
#[flutter_rust_bridge::frb(sync)]
pub fn task_create_in_new_folder(
    folder_name: String,
    title: String,
    is_starred: bool,
    reminder_epoch_ms: Option<i64>,
) -> StoreActionResponse {
    respond("task_create_in_new_folder", |store| {
        let new_task = new_task(title, is_starred, reminder_epoch_ms)?;
        let (folder_id, task_id) =
            store.add_task_to_new_folder(folder_name.trim().to_string(), new_task)?;
        Ok(
            StoreActionResponse::success("Task created.", Some(task_id.to_string()))
                .with_folder_id(folder_id),
        )
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn task_toggle_completed(task_id: String) -> StoreActionResponse {
    respond("task_toggle_completed", |store| {
        let task_id = parse_id(&task_id, "task_id")?;
        let value = store.toggle_completed(task_id)?;
        Ok(StoreActionResponse::toggled(
            "Task completion toggled.",
            task_id.to_string(),
            value,
        ))
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn task_toggle_starred(task_id: String) -> StoreActionResponse {
    respond("task_toggle_starred", |store| {
        let task_id = parse_id(&task_id, "task_id")?;
        let value = store.toggle_starred(task_id)?;
        Ok(StoreActionResponse::toggled(
            "Task star toggled.",
            task_id.to_string(),
            value,
        ))
    })
}

/// Sets (`Some`) or clears (`None`) a task reminder.
#[flutter_rust_bridge::frb(sync)]
pub fn task_set_reminder(task_id: String, reminder_epoch_ms: Option<i64>) -> StoreActionResponse {
    respond("task_set_reminder", |store| {
        let task_id = parse_id(&task_id, "task_id")?;
        let reminder_date = reminder_epoch_ms.map(parse_epoch_ms).transpose()?;
        store.set_reminder(task_id, reminder_date)?;
        Ok(StoreActionResponse::success(
            "Reminder updated.",
            Some(task_id.to_string()),
        ))
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn task_delete(task_id: String) -> StoreActionResponse {
    respond("task_delete", |store| {
        let task_id = parse_id(&task_id, "task_id")?;
        store.delete_task(task_id)?;
        Ok(StoreActionResponse::success(
            "Task deleted.",
            Some(task_id.to_string()),
        ))
    })
}

/// Searches task titles across folders.
///
/// # FFI contract
/// - Case-insensitive substring match; blank text returns no items.
/// - `limit` falls back to the core default and clamps to the core maximum.
#[flutter_rust_bridge::frb(sync)]
pub fn tasks_search(text: String, include_completed: bool, limit: Option<u32>) -> Vec<TaskHitItem> {
    let query = TaskQuery {
        text,
        include_completed,
        limit: normalize_search_limit(limit),
    };
    with_store(|store| {
        Ok(search_tasks(store.folders(), &query)
            .into_iter()
            .map(to_task_hit_item)
            .collect())
    })
    .unwrap_or_default()
}

#[flutter_rust_bridge::frb(sync)]
pub fn tasks_starred() -> Vec<TaskHitItem> {
    with_store(|store| {
        Ok(starred_tasks(store.folders())
            .into_iter()
            .map(to_task_hit_item)
            .collect())
    })
    .unwrap_or_default()
}

/// Drains reminder commands queued since the previous call.
///
/// # FFI contract
/// - Commands are returned in issue order and are not returned twice.
/// - Host applies `schedule` as add-or-replace and `cancel` as remove.
#[flutter_rust_bridge::frb(sync)]
pub fn reminders_take_pending() -> Vec<ReminderCommandItem> {
    with_store(|store| {
        Ok(store
            .scheduler_mut()
            .take_commands()
            .into_iter()
            .map(to_reminder_command_item)
            .collect())
    })
    .unwrap_or_default()
}

fn open_session(raw_data_dir: &str) -> Result<usize, ApiError> {
    let data_dir = resolve_dir(raw_data_dir, "data_dir").map_err(ApiError::InvalidPath)?;
    let mut guard = lock_store()?;

    // Commands the host has not drained yet belong to the platform, not the store.
    let carried = guard
        .as_mut()
        .map(|store| store.scheduler_mut().take_commands())
        .unwrap_or_default();
    let carried_count = carried.len();

    let store = FolderStore::open(
        JsonFileFolderRepository::new(&data_dir),
        ReminderOutbox::with_queued(carried),
    );
    let folder_count = store.folders().len();
    *guard = Some(store);

    info!(
        "event=store_open module=ffi status=ok folders={folder_count} carried_commands={carried_count}"
    );
    Ok(folder_count)
}

fn lock_store() -> Result<MutexGuard<'static, Option<SessionStore>>, ApiError> {
    SESSION_STORE.lock().map_err(|_| ApiError::LockPoisoned)
}

fn with_store<T>(
    f: impl FnOnce(&mut SessionStore) -> Result<T, ApiError>,
) -> Result<T, ApiError> {
    let mut guard = lock_store()?;
    let store = guard.as_mut().ok_or(ApiError::StoreClosed)?;
    f(store)
}

fn respond(
    operation: &str,
    f: impl FnOnce(&mut SessionStore) -> Result<StoreActionResponse, ApiError>,
) -> StoreActionResponse {
    with_store(f).unwrap_or_else(|err| failure_response(operation, &err))
}

fn failure_response(operation: &str, err: &ApiError) -> StoreActionResponse {
    warn!(
        "event={operation} module=ffi status=error error_code={}",
        err.code()
    );
    StoreActionResponse::failure(format!("{operation} failed: {err}"))
}

fn new_task(
    title: String,
    is_starred: bool,
    reminder_epoch_ms: Option<i64>,
) -> Result<NewTask, ApiError> {
    Ok(NewTask {
        title: title.trim().to_string(),
        is_starred,
        reminder_date: reminder_epoch_ms.map(parse_epoch_ms).transpose()?,
    })
}

fn parse_id(raw: &str, label: &'static str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw.trim()).map_err(|_| ApiError::InvalidId {
        label,
        raw: raw.to_string(),
    })
}

fn parse_epoch_ms(value: i64) -> Result<DateTime<Utc>, ApiError> {
    Utc.timestamp_millis_opt(value)
        .single()
        .ok_or(ApiError::InvalidTime(value))
}

fn normalize_search_limit(limit: Option<u32>) -> usize {
    match limit {
        Some(0) | None => DEFAULT_SEARCH_LIMIT,
        Some(value) => (value as usize).min(MAX_SEARCH_LIMIT),
    }
}

fn to_task_item(task: &Task) -> TaskItem {
    TaskItem {
        task_id: task.id.to_string(),
        title: task.title.clone(),
        is_completed: task.is_completed,
        is_starred: task.is_starred,
        reminder_epoch_ms: task.reminder_date.map(|date| date.timestamp_millis()),
    }
}

fn to_folder_item(folder: &Folder) -> FolderItem {
    FolderItem {
        folder_id: folder.id.to_string(),
        name: folder.name.clone(),
        tasks: folder.tasks.iter().map(to_task_item).collect(),
    }
}

fn to_task_hit_item(hit: TaskHit) -> TaskHitItem {
    TaskHitItem {
        folder_id: hit.folder_id.to_string(),
        folder_name: hit.folder_name,
        task: to_task_item(&hit.task),
    }
}

fn to_reminder_command_item(command: ReminderCommand) -> ReminderCommandItem {
    match command {
        ReminderCommand::Schedule(request) => ReminderCommandItem {
            action: "schedule".to_string(),
            identifier: request.identifier,
            fire_at_epoch_ms: Some(request.fire_at.timestamp_millis()),
            title: Some(request.title),
            body: Some(request.body),
        },
        ReminderCommand::Cancel { identifier } => ReminderCommandItem {
            action: "cancel".to_string(),
            identifier,
            fire_at_epoch_ms: None,
            title: None,
            body: None,
        },
    }
}
