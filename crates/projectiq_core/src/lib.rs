//! Core domain logic for ProjectIQ.
//!
//! A thin in-memory relational layer over tasks, epics and team members,
//! persisted as whole-collection snapshots in a key-value backend. The
//! rendering shell consumes this crate through [`TaskStore`] and re-renders
//! after every call; no view code lives here.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod store;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::{
    member_initials, EpicProgress, ItemDraft, ItemId, ItemKind, ItemPatch, MemberId, Priority,
    Status, TeamMember, Theme, ValidationError, WorkItem,
};
pub use repo::{
    keys, KeyValueStore, MemoryKeyValueStore, SqliteKeyValueStore, StorageError, StorageResult,
};
pub use store::{StoreError, StoreResult, TaskStore};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
