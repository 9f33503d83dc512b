use projectiq_core::db::open_db;
use projectiq_core::{
    keys, ItemDraft, ItemKind, KeyValueStore, MemoryKeyValueStore, SqliteKeyValueStore, Status,
    StoreError, TaskStore, Theme,
};

fn draft(title: &str, kind: ItemKind) -> ItemDraft {
    ItemDraft {
        title: title.to_string(),
        kind: Some(kind),
        ..ItemDraft::default()
    }
}

#[test]
fn mutations_snapshot_whole_collections_to_the_backend() {
    let backend = MemoryKeyValueStore::new();
    let mut store = TaskStore::load(backend).unwrap();

    store.create_item(draft("persisted", ItemKind::Task)).unwrap();
    store.create_item(draft("grouped", ItemKind::Epic)).unwrap();
    store.create_team_member("Ada", "ada@example.com").unwrap();
    store.set_theme(Theme::Dark).unwrap();

    // Rebuild a fresh store from copies of the persisted strings; the
    // snapshots alone must reproduce the full state.
    let copy = MemoryKeyValueStore::new();
    for key in [
        keys::TASKS,
        keys::EPICS,
        keys::TEAM_MEMBERS,
        keys::NEXT_TASK_ID,
        keys::THEME,
    ] {
        if let Some(value) = store.storage().get(key).unwrap() {
            copy.set(key, &value).unwrap();
        }
    }

    let reloaded = TaskStore::load(copy).unwrap();
    assert_eq!(reloaded.tasks().len(), 1);
    assert_eq!(reloaded.epics().len(), 1);
    assert_eq!(reloaded.team_members().len(), 1);
    assert_eq!(reloaded.theme(), Theme::Dark);
    assert_eq!(reloaded.next_id(), 3);
}

#[test]
fn sqlite_backend_restores_state_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("projectiq.sqlite3");

    let first_task_id;
    {
        let conn = open_db(&db_path).unwrap();
        let mut store = TaskStore::load(SqliteKeyValueStore::new(&conn)).unwrap();
        first_task_id = store.create_item(draft("survives", ItemKind::Task)).unwrap().id;
        store.create_item(draft("epic survives", ItemKind::Epic)).unwrap();
        store.create_team_member("Ada", "ada@example.com").unwrap();
        store.set_theme(Theme::Dark).unwrap();
    }

    let conn = open_db(&db_path).unwrap();
    let mut store = TaskStore::load(SqliteKeyValueStore::new(&conn)).unwrap();

    assert_eq!(store.tasks().len(), 1);
    assert_eq!(store.tasks()[0].title, "survives");
    assert_eq!(store.epics().len(), 1);
    assert_eq!(store.resolve_member_name(None), "Unassigned");
    assert_eq!(store.team_members()[0].name, "Ada");
    assert_eq!(store.theme(), Theme::Dark);

    // Restart never reuses ids.
    let next = store.create_item(draft("post-restart", ItemKind::Task)).unwrap();
    assert!(next.id > first_task_id);
    assert!(next.id > store.epics()[0].id);
}

#[test]
fn sqlite_backend_persists_status_changes() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("projectiq.sqlite3");

    let task_id;
    {
        let conn = open_db(&db_path).unwrap();
        let mut store = TaskStore::load(SqliteKeyValueStore::new(&conn)).unwrap();
        task_id = store.create_item(draft("dragged", ItemKind::Task)).unwrap().id;
        store.set_item_status(task_id, Status::Done).unwrap();
    }

    let conn = open_db(&db_path).unwrap();
    let store = TaskStore::load(SqliteKeyValueStore::new(&conn)).unwrap();
    assert_eq!(store.item(task_id).unwrap().status, Status::Done);
}

#[test]
fn corrupt_snapshot_is_rejected_not_masked() {
    let backend = MemoryKeyValueStore::new();
    backend.set(keys::TASKS, "not json at all").unwrap();

    let err = TaskStore::load(backend).map(|_| ()).unwrap_err();
    assert!(matches!(err, StoreError::InvalidData(_)));
}

#[test]
fn counter_key_lagging_behind_data_is_clamped_forward() {
    let backend = MemoryKeyValueStore::new();
    backend
        .set(
            keys::TASKS,
            r#"[{"id":9,"title":"old","status":"todo","priority":"low","itemType":"task","createdAt":0}]"#,
        )
        .unwrap();
    backend.set(keys::NEXT_TASK_ID, "2").unwrap();

    let mut store = TaskStore::load(backend).unwrap();
    let created = store.create_item(draft("fresh", ItemKind::Task)).unwrap();
    assert_eq!(created.id, 10);
}

#[test]
fn missing_keys_default_to_an_empty_store() {
    let store = TaskStore::load(MemoryKeyValueStore::new()).unwrap();
    assert!(store.tasks().is_empty());
    assert!(store.epics().is_empty());
    assert!(store.team_members().is_empty());
    assert_eq!(store.next_id(), 1);
    assert_eq!(store.theme(), Theme::Light);
}
