//! Core use-case layer.
//!
//! # Responsibility
//! - Orchestrate model validation and key-value persistence into the
//!   task-store API consumed by the rendering shell.
//! - Keep UI layers decoupled from storage details.

pub mod task_store;

pub use task_store::{StoreError, StoreResult, TaskStore};
