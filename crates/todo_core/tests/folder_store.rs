use std::sync::{Arc, Mutex};
use todo_core::{
    FolderRepository, FolderStore, InMemoryFolderRepository, JsonFileFolderRepository, NewTask,
    ReminderOutbox, SaveReport, StoreError, Task,
};
use uuid::Uuid;

fn setup() -> FolderStore<InMemoryFolderRepository, ReminderOutbox> {
    FolderStore::new(InMemoryFolderRepository::new(), ReminderOutbox::new())
}

#[test]
fn add_folder_and_task_from_empty_collection() {
    let mut store = setup();

    let folder_id = store.add_folder("Daily").unwrap();
    let task_id = store.add_task(folder_id, NewTask::new("Buy milk")).unwrap();

    assert_eq!(store.folders().len(), 1);
    let folder = store.folder(folder_id).unwrap();
    assert_eq!(folder.name, "Daily");
    assert_eq!(folder.tasks.len(), 1);
    let task = &folder.tasks[0];
    assert_eq!(task.id, task_id);
    assert_eq!(task.title, "Buy milk");
    assert!(!task.is_starred);
    assert_eq!(task.reminder_date, None);
}

#[test]
fn save_then_load_keeps_identical_ids() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = FolderStore::open(JsonFileFolderRepository::new(dir.path()), ReminderOutbox::new());
    let folder_id = store.add_folder("Daily").unwrap();
    let task_id = store.add_task(folder_id, NewTask::new("Buy milk")).unwrap();

    let report = store.save();
    assert_eq!(
        report,
        SaveReport::Saved {
            folder_count: 1,
            task_count: 1
        }
    );

    let reopened = FolderStore::open(JsonFileFolderRepository::new(dir.path()), ReminderOutbox::new());
    assert_eq!(reopened.folders(), store.folders());
    assert_eq!(reopened.task(task_id).map(|(owner, _)| owner), Some(folder_id));
}

#[test]
fn empty_title_is_rejected_and_collection_is_unchanged() {
    let mut store = setup();
    let folder_id = store.add_folder("Daily").unwrap();
    let before = store.folders().to_vec();
    let revision = store.revision();

    assert_eq!(
        store.add_task(folder_id, NewTask::new("")),
        Err(StoreError::EmptyTitle)
    );
    assert_eq!(
        store.add_task(folder_id, NewTask::new("   ")),
        Err(StoreError::EmptyTitle)
    );

    assert_eq!(store.folders(), before.as_slice());
    assert_eq!(store.revision(), revision);
}

#[test]
fn empty_folder_name_is_rejected() {
    let mut store = setup();
    assert_eq!(store.add_folder(""), Err(StoreError::EmptyFolderName));
    assert!(store.folders().is_empty());
    assert_eq!(store.revision(), 0);
}

#[test]
fn add_task_to_unknown_folder_fails() {
    let mut store = setup();
    let missing = Uuid::new_v4();
    assert_eq!(
        store.add_task(missing, NewTask::new("orphan")),
        Err(StoreError::FolderNotFound(missing))
    );
}

#[test]
fn toggles_flip_exactly_one_field() {
    let mut store = setup();
    let folder_id = store.add_folder("Important").unwrap();
    let task_id = store
        .add_task(folder_id, NewTask::new("Learn Rust").starred())
        .unwrap();
    let before = store.task(task_id).unwrap().1.clone();

    assert!(store.toggle_completed(task_id).unwrap());
    let after = store.task(task_id).unwrap().1.clone();
    assert_eq!(
        after,
        Task {
            is_completed: true,
            ..before.clone()
        }
    );

    assert!(!store.toggle_starred(task_id).unwrap());
    let after = store.task(task_id).unwrap().1.clone();
    assert_eq!(after.id, before.id);
    assert!(after.is_completed);
    assert!(!after.is_starred);
    assert_eq!(after.title, before.title);
}

#[test]
fn toggle_unknown_task_fails() {
    let mut store = setup();
    let missing = Uuid::new_v4();
    assert_eq!(
        store.toggle_completed(missing),
        Err(StoreError::TaskNotFound(missing))
    );
    assert_eq!(
        store.toggle_starred(missing),
        Err(StoreError::TaskNotFound(missing))
    );
}

#[test]
fn delete_folder_removes_all_of_its_tasks() {
    let mut store = setup();
    let daily = store.add_folder("Daily").unwrap();
    let work = store.add_folder("Work").unwrap();
    let milk = store.add_task(daily, NewTask::new("Buy milk")).unwrap();
    let gym = store.add_task(daily, NewTask::new("Gym")).unwrap();
    let report = store.add_task(work, NewTask::new("Report")).unwrap();

    let removed = store.delete_folder(daily).unwrap();

    assert_eq!(removed.tasks.len(), 2);
    assert_eq!(store.folders().len(), 1);
    assert!(store.folder(daily).is_none());
    assert!(store.task(milk).is_none());
    assert!(store.task(gym).is_none());
    assert_eq!(store.task(report).map(|(owner, _)| owner), Some(work));
}

#[test]
fn delete_task_keeps_remaining_order() {
    let mut store = setup();
    let folder_id = store.add_folder("Daily").unwrap();
    let a = store.add_task(folder_id, NewTask::new("a")).unwrap();
    let b = store.add_task(folder_id, NewTask::new("b")).unwrap();
    let c = store.add_task(folder_id, NewTask::new("c")).unwrap();

    let removed = store.delete_task(b).unwrap();
    assert_eq!(removed.id, b);

    let ids: Vec<_> = store.folder(folder_id).unwrap().tasks.iter().map(|task| task.id).collect();
    assert_eq!(ids, [a, c]);
    assert_eq!(store.delete_task(b), Err(StoreError::TaskNotFound(b)));
}

#[test]
fn add_task_to_new_folder_validates_title_before_name() {
    let mut store = setup();

    assert_eq!(
        store.add_task_to_new_folder("", NewTask::new("")),
        Err(StoreError::EmptyTitle)
    );
    assert_eq!(
        store.add_task_to_new_folder("", NewTask::new("Buy milk")),
        Err(StoreError::EmptyFolderName)
    );
    assert!(store.folders().is_empty());

    let (folder_id, task_id) = store
        .add_task_to_new_folder("Groceries", NewTask::new("Buy milk"))
        .unwrap();
    let folder = store.folder(folder_id).unwrap();
    assert_eq!(folder.name, "Groceries");
    assert_eq!(folder.tasks[0].id, task_id);
}

#[test]
fn rename_folder_keeps_id_and_tasks() {
    let mut store = setup();
    let folder_id = store.add_folder("Dialy").unwrap();
    store.add_task(folder_id, NewTask::new("Buy milk")).unwrap();

    store.rename_folder(folder_id, "Daily").unwrap();
    assert_eq!(store.folder(folder_id).unwrap().name, "Daily");
    assert_eq!(store.folder(folder_id).unwrap().tasks.len(), 1);
    assert_eq!(
        store.rename_folder(folder_id, " "),
        Err(StoreError::EmptyFolderName)
    );
}

#[test]
fn load_falls_back_to_empty_on_corrupt_document() {
    let repo = InMemoryFolderRepository::with_document("{ definitely not a folder list");
    let mut store = FolderStore::new(repo, ReminderOutbox::new());
    store.add_folder("scratch").unwrap();

    assert!(store.load().is_empty());
    assert!(store.folders().is_empty());
    assert!(store.try_load().is_err());
}

#[test]
fn open_on_missing_file_starts_empty() {
    let dir = tempfile::tempdir().unwrap();
    let store = FolderStore::open(
        JsonFileFolderRepository::new(dir.path().join("never-created")),
        ReminderOutbox::new(),
    );
    assert!(store.folders().is_empty());
}

#[test]
fn open_on_unreadable_document_starts_empty() {
    let dir = tempfile::tempdir().unwrap();
    let repo = JsonFileFolderRepository::new(dir.path());
    std::fs::create_dir(repo.path()).unwrap();

    let mut store = FolderStore::open(repo, ReminderOutbox::new());
    assert!(store.folders().is_empty());
    assert!(store.try_load().is_err());
}

#[test]
fn failed_save_is_reported_and_memory_stays_authoritative() {
    let mut store = setup();
    let folder_id = store.add_folder("Daily").unwrap();
    store.add_task(folder_id, NewTask::new("Buy milk")).unwrap();
    assert!(store.save().is_saved());
    let persisted = store.repo().document();

    store.add_task(folder_id, NewTask::new("Bread")).unwrap();
    store.repo().set_reject_writes(true);
    let report = store.save();

    assert!(matches!(report, SaveReport::Failed { ref reason } if reason.contains("unavailable")));
    assert_eq!(store.folder(folder_id).unwrap().tasks.len(), 2);
    assert_eq!(store.repo().document(), persisted);
    assert!(store.try_save().is_err());
}

#[test]
fn failed_save_to_unwritable_path_does_not_panic() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("blocker");
    std::fs::write(&blocker, b"file, not a directory").unwrap();
    let mut store = FolderStore::new(JsonFileFolderRepository::new(&blocker), ReminderOutbox::new());
    store.add_folder("Daily").unwrap();

    assert!(!store.save().is_saved());
    assert_eq!(store.folders().len(), 1);
}

#[test]
fn subscribers_see_every_applied_change() {
    let mut store = setup();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let subscription = store.subscribe(move |folders| {
        let tasks: usize = folders.iter().map(|folder| folder.tasks.len()).sum();
        sink.lock().unwrap().push((folders.len(), tasks));
    });

    let folder_id = store.add_folder("Daily").unwrap();
    store.add_task(folder_id, NewTask::new("Buy milk")).unwrap();
    let _ = store.add_task(folder_id, NewTask::new(""));
    assert!(store.unsubscribe(subscription));
    store.add_folder("Work").unwrap();

    assert_eq!(*seen.lock().unwrap(), vec![(1, 0), (1, 1)]);
    assert!(!store.unsubscribe(subscription));
}

#[test]
fn revision_advances_only_on_applied_mutations() {
    let mut store = setup();
    let folder_id = store.add_folder("Daily").unwrap();
    let task_id = store.add_task(folder_id, NewTask::new("Buy milk")).unwrap();
    assert_eq!(store.revision(), 2);

    store.toggle_completed(task_id).unwrap();
    let _ = store.toggle_completed(Uuid::new_v4());
    assert_eq!(store.revision(), 3);
}

#[test]
fn store_writes_through_the_shared_repository_contract() {
    let repo = InMemoryFolderRepository::new();
    let mut store = FolderStore::new(repo, ReminderOutbox::new());
    store.add_folder("Daily").unwrap();
    store.save();

    let decoded = store.repo().load().unwrap();
    assert_eq!(decoded, store.folders());
}
