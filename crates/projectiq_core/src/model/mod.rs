//! Domain model for work items, team members and UI theme.
//!
//! # Responsibility
//! - Define the canonical records persisted by the store.
//! - Own required-field validation for all write paths.
//!
//! # Invariants
//! - Work item ids come from one shared counter across tasks and epics.
//! - `created_at` is stamped once at creation and never rewritten.
//! - Unrecognized status/priority strings survive load/save unchanged.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod item;
pub mod member;
pub mod theme;

pub use item::{
    EpicProgress, ItemDraft, ItemId, ItemKind, ItemPatch, Priority, Status, WorkItem,
};
pub use member::{member_initials, MemberId, TeamMember};
pub use theme::Theme;

/// Required-field validation failure for create operations.
///
/// These are local, recoverable rejections reported to the caller; the
/// store stays fully usable after any of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    /// Work item title is empty after trimming.
    EmptyTitle,
    /// Work item draft carries no item kind.
    MissingKind,
    /// Team member name is empty after trimming.
    EmptyName,
    /// Team member email is empty after trimming.
    EmptyEmail,
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "work item title must not be empty"),
            Self::MissingKind => write!(f, "work item kind must be provided"),
            Self::EmptyName => write!(f, "team member name must not be empty"),
            Self::EmptyEmail => write!(f, "team member email must not be empty"),
        }
    }
}

impl Error for ValidationError {}
