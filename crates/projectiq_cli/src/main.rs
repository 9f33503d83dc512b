//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `projectiq_core` linkage.
//! - Keep output deterministic for quick local sanity checks.

use projectiq_core::{ItemDraft, ItemKind, MemoryKeyValueStore, StoreResult, TaskStore};

fn main() {
    println!("projectiq_core version={}", projectiq_core::core_version());
    match smoke() {
        Ok(tasks) => println!("projectiq_core smoke tasks={tasks}"),
        Err(err) => {
            eprintln!("projectiq_core smoke failed: {err}");
            std::process::exit(1);
        }
    }
}

// One in-memory create/list cycle, exercising the full store path without
// touching the file system.
fn smoke() -> StoreResult<usize> {
    let mut store = TaskStore::load(MemoryKeyValueStore::new())?;
    store.create_item(ItemDraft {
        title: "smoke check".to_string(),
        kind: Some(ItemKind::Task),
        ..ItemDraft::default()
    })?;
    Ok(store.filtered_tasks("").len())
}
