use projectiq_core::{
    member_initials, ItemDraft, ItemKind, MemoryKeyValueStore, StoreError, TaskStore,
    ValidationError,
};

fn store() -> TaskStore<MemoryKeyValueStore> {
    TaskStore::load(MemoryKeyValueStore::new()).unwrap()
}

#[test]
fn create_member_trims_and_stores_fields() {
    let mut store = store();
    let member = store
        .create_team_member("  Ada Lovelace  ", " ada@example.com ")
        .unwrap();

    assert_eq!(member.name, "Ada Lovelace");
    assert_eq!(member.email, "ada@example.com");
    assert!(member.created_at > 0);
    assert_eq!(member.updated_at, None);
}

#[test]
fn create_member_rejects_blank_fields() {
    let mut store = store();

    let err = store.create_team_member("   ", "a@example.com").unwrap_err();
    assert!(matches!(
        err,
        StoreError::Validation(ValidationError::EmptyName)
    ));

    let err = store.create_team_member("Ada", "  ").unwrap_err();
    assert!(matches!(
        err,
        StoreError::Validation(ValidationError::EmptyEmail)
    ));
    assert!(store.team_members().is_empty());
}

#[test]
fn member_ids_are_unique_even_within_one_millisecond() {
    let mut store = store();
    let a = store.create_team_member("A", "a@example.com").unwrap();
    let b = store.create_team_member("B", "b@example.com").unwrap();
    let c = store.create_team_member("C", "c@example.com").unwrap();

    assert!(a.id < b.id);
    assert!(b.id < c.id);
}

#[test]
fn update_member_merges_and_stamps_updated_at() {
    let mut store = store();
    let member = store.create_team_member("Ada", "ada@example.com").unwrap();

    let updated = store
        .update_team_member(member.id, "Ada L.", "ada.l@example.com")
        .unwrap();

    assert_eq!(updated.name, "Ada L.");
    assert_eq!(updated.email, "ada.l@example.com");
    assert_eq!(updated.created_at, member.created_at);
    assert!(updated.updated_at.is_some());
}

#[test]
fn update_unknown_member_returns_member_not_found() {
    let mut store = store();
    let err = store
        .update_team_member(123, "Nobody", "nobody@example.com")
        .unwrap_err();
    assert!(matches!(err, StoreError::MemberNotFound(123)));
}

#[test]
fn remove_member_leaves_referencing_items_dangling() {
    let mut store = store();
    let member = store.create_team_member("Ada", "ada@example.com").unwrap();

    let task = store
        .create_item(ItemDraft {
            title: "assigned".to_string(),
            kind: Some(ItemKind::Task),
            assignee: Some(member.id),
            ..ItemDraft::default()
        })
        .unwrap();

    store.remove_team_member(member.id).unwrap();

    // No cascade: the task keeps its reference, lookup resolves the gap.
    let stored = store.item(task.id).unwrap();
    assert_eq!(stored.assignee, Some(member.id));
    assert_eq!(store.resolve_member_name(stored.assignee), "Unknown");
}

#[test]
fn remove_member_is_idempotent() {
    let mut store = store();
    let member = store.create_team_member("Ada", "ada@example.com").unwrap();

    store.remove_team_member(member.id).unwrap();
    store.remove_team_member(member.id).unwrap();
    assert!(store.team_members().is_empty());
}

#[test]
fn resolve_member_name_distinguishes_unassigned_from_deleted() {
    let mut store = store();
    let member = store.create_team_member("Grace", "grace@example.com").unwrap();

    assert_eq!(store.resolve_member_name(None), "Unassigned");
    assert_eq!(store.resolve_member_name(Some(9_999)), "Unknown");
    assert_eq!(store.resolve_member_name(Some(member.id)), "Grace");
}

#[test]
fn initials_take_first_letter_of_up_to_two_tokens() {
    assert_eq!(member_initials("Grace Hopper"), "GH");
    assert_eq!(member_initials("ada"), "A");
    assert_eq!(member_initials("Jean Bartik the Third"), "JB");
    assert_eq!(member_initials("   "), "U");
    assert_eq!(member_initials(""), "U");
}
