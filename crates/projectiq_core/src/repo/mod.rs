//! Persistence layer abstractions and key-value backends.
//!
//! # Responsibility
//! - Define the synchronous key-value contract the store persists through.
//! - Isolate SQLite details from store/business orchestration.
//!
//! # Invariants
//! - Every `set` replaces the whole value under a key (snapshot writes).
//! - Backends never interpret the stored strings.

pub mod kv_store;

pub use kv_store::{
    keys, KeyValueStore, MemoryKeyValueStore, SqliteKeyValueStore, StorageError, StorageResult,
};
