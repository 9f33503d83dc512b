use projectiq_core::{
    ItemDraft, ItemKind, ItemPatch, MemoryKeyValueStore, Status, StoreError, TaskStore,
    ValidationError,
};

fn store() -> TaskStore<MemoryKeyValueStore> {
    TaskStore::load(MemoryKeyValueStore::new()).unwrap()
}

fn draft(title: &str, kind: ItemKind) -> ItemDraft {
    ItemDraft {
        title: title.to_string(),
        kind: Some(kind),
        ..ItemDraft::default()
    }
}

#[test]
fn create_update_delete_round_trips_to_prior_state() {
    let mut store = store();
    store.create_item(draft("pre-existing", ItemKind::Task)).unwrap();
    let tasks_before = store.tasks().to_vec();
    let epics_before = store.epics().to_vec();

    let created = store.create_item(draft("temporary", ItemKind::Task)).unwrap();
    store
        .update_item(
            created.id,
            ItemPatch {
                title: Some("temporary renamed".to_string()),
                ..ItemPatch::default()
            },
        )
        .unwrap();
    store.delete_item(created.id).unwrap();

    assert_eq!(store.tasks(), tasks_before.as_slice());
    assert_eq!(store.epics(), epics_before.as_slice());
}

#[test]
fn create_rejects_empty_title_and_leaves_state_untouched() {
    let mut store = store();
    let next_before = store.next_id();

    let err = store.create_item(draft("", ItemKind::Task)).unwrap_err();
    assert!(matches!(
        err,
        StoreError::Validation(ValidationError::EmptyTitle)
    ));
    assert!(store.tasks().is_empty());
    assert_eq!(store.next_id(), next_before);
}

#[test]
fn create_assigns_the_advertised_next_id() {
    let mut store = store();
    let expected = store.next_id();

    let created = store.create_item(draft("T", ItemKind::Task)).unwrap();
    assert_eq!(created.id, expected);
    assert_eq!(store.next_id(), expected + 1);
}

#[test]
fn interleaved_creates_share_one_counter_and_route_by_kind() {
    let mut store = store();
    let ids = [
        store.create_item(draft("t1", ItemKind::Task)).unwrap().id,
        store.create_item(draft("e1", ItemKind::Epic)).unwrap().id,
        store.create_item(draft("t2", ItemKind::Task)).unwrap().id,
        store.create_item(draft("e2", ItemKind::Epic)).unwrap().id,
        store.create_item(draft("t3", ItemKind::Story)).unwrap().id,
    ];

    let mut unique = ids.to_vec();
    unique.sort_unstable();
    unique.dedup();
    assert_eq!(unique.len(), 5);

    // Tasks and stories land in the tasks collection, epics in epics.
    assert_eq!(store.tasks().len(), 3);
    assert_eq!(store.epics().len(), 2);
}

#[test]
fn update_moves_record_when_kind_flips_to_epic() {
    let mut store = store();
    let created = store.create_item(draft("promoted", ItemKind::Task)).unwrap();

    let updated = store
        .update_item(
            created.id,
            ItemPatch {
                kind: Some(ItemKind::Epic),
                ..ItemPatch::default()
            },
        )
        .unwrap();

    assert_eq!(updated.kind, ItemKind::Epic);
    assert!(store.tasks().is_empty());
    assert_eq!(store.epics().len(), 1);
    assert_eq!(store.epics()[0].id, created.id);
    assert_eq!(store.epics()[0].created_at, created.created_at);
}

#[test]
fn update_unknown_id_returns_item_not_found() {
    let mut store = store();
    let err = store.update_item(404, ItemPatch::default()).unwrap_err();
    assert!(matches!(err, StoreError::ItemNotFound(404)));
}

#[test]
fn delete_is_idempotent_for_absent_ids() {
    let mut store = store();
    let created = store.create_item(draft("gone", ItemKind::Task)).unwrap();

    store.delete_item(created.id).unwrap();
    store.delete_item(created.id).unwrap();
    assert!(store.tasks().is_empty());
}

#[test]
fn set_status_changes_only_the_status_field() {
    let mut store = store();
    let created = store.create_item(draft("carry on", ItemKind::Task)).unwrap();

    store.set_item_status(created.id, Status::Done).unwrap();

    let stored = store.item(created.id).unwrap();
    assert_eq!(stored.status, Status::Done);
    assert_eq!(stored.title, created.title);
    assert_eq!(stored.priority, created.priority);
    assert_eq!(stored.created_at, created.created_at);
}

#[test]
fn set_status_on_unknown_id_fails_and_changes_nothing() {
    let mut store = store();
    store.create_item(draft("bystander", ItemKind::Task)).unwrap();
    let before = store.tasks().to_vec();

    let err = store.set_item_status(9_999, Status::Done).unwrap_err();
    assert!(matches!(err, StoreError::ItemNotFound(9_999)));
    assert_eq!(store.tasks(), before.as_slice());
}

#[test]
fn set_status_reaches_epics_through_the_shared_id_space() {
    let mut store = store();
    let epic = store.create_item(draft("epic", ItemKind::Epic)).unwrap();

    store.set_item_status(epic.id, Status::Active).unwrap();
    assert_eq!(store.item(epic.id).unwrap().status, Status::Active);
}

#[test]
fn clone_epic_copies_under_new_id_with_copy_suffix() {
    let mut store = store();
    let original = store.create_item(draft("Launch", ItemKind::Epic)).unwrap();

    let copy = store.clone_epic(original.id).unwrap();

    assert_ne!(copy.id, original.id);
    assert_eq!(copy.title, "Launch (Copy)");
    assert_eq!(store.epics().len(), 2);

    let untouched = store.item(original.id).unwrap();
    assert_eq!(untouched.title, "Launch");
}

#[test]
fn clone_epic_rejects_non_epic_ids() {
    let mut store = store();
    let task = store.create_item(draft("not an epic", ItemKind::Task)).unwrap();

    let err = store.clone_epic(task.id).unwrap_err();
    assert!(matches!(err, StoreError::ItemNotFound(id) if id == task.id));
}

#[test]
fn store_stays_usable_after_a_rejected_operation() {
    let mut store = store();
    store.create_item(draft("", ItemKind::Task)).unwrap_err();

    let created = store.create_item(draft("recovered", ItemKind::Task)).unwrap();
    assert_eq!(store.tasks().len(), 1);
    assert_eq!(store.tasks()[0].id, created.id);
}
