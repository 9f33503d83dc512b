//! Work item domain model.
//!
//! # Responsibility
//! - Define the canonical record shared by task/story/epic projections.
//! - Provide draft validation and partial-update merge semantics.
//!
//! # Invariants
//! - `id` is unique across tasks and epics (one shared counter).
//! - `created_at` is set once at creation and never merged over.
//! - Epic progress is always derived from linked tasks, never stored.

use crate::model::member::MemberId;
use crate::model::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Stable identifier for work items (tasks, stories and epics alike).
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type ItemId = u64;

/// Category of a work item.
///
/// Routing is keyed off this: `Epic` records live in the epics collection,
/// everything else lives in the tasks collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    /// Plain unit of work.
    Task,
    /// User-facing story; stored alongside tasks.
    Story,
    /// Grouping of tasks with its own lifecycle.
    Epic,
}

impl Display for ItemKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Task => write!(f, "task"),
            Self::Story => write!(f, "story"),
            Self::Epic => write!(f, "epic"),
        }
    }
}

/// Lifecycle state of a work item.
///
/// Tasks use `todo`/`in-progress`/`done`; epics additionally use `new` and
/// `active`. The store never enforces transition legality, and values it
/// did not produce itself are carried through verbatim via `Other` so
/// legacy data renders literally instead of failing to load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Status {
    New,
    Active,
    Todo,
    InProgress,
    Done,
    /// Pass-through for persisted values outside the known set.
    #[serde(untagged)]
    Other(String),
}

impl Display for Status {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::New => write!(f, "new"),
            Self::Active => write!(f, "active"),
            Self::Todo => write!(f, "todo"),
            Self::InProgress => write!(f, "in-progress"),
            Self::Done => write!(f, "done"),
            Self::Other(value) => write!(f, "{value}"),
        }
    }
}

/// Priority of a work item, with the same pass-through rule as [`Status`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
    /// Pass-through for persisted values outside the known set.
    #[serde(untagged)]
    Other(String),
}

impl Display for Priority {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "low"),
            Self::Medium => write!(f, "medium"),
            Self::High => write!(f, "high"),
            Self::Other(value) => write!(f, "{value}"),
        }
    }
}

/// Canonical record for task, story and epic data.
///
/// One shape serves all three projections; epic-only fields stay `None`
/// on plain tasks. Serialized field names match the original camelCase
/// local-storage layout, so existing persisted data loads unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkItem {
    /// Unique across tasks and epics; drawn from the shared counter.
    pub id: ItemId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub status: Status,
    pub priority: Priority,
    /// Serialized as `itemType` to match the external layout.
    #[serde(rename = "itemType")]
    pub kind: ItemKind,
    /// Team member id; may dangle after member removal.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee: Option<MemberId>,
    /// Owning epic id for task/story records.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub epic_id: Option<ItemId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effort: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capacity: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    /// Epic projection field.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub acceptance_criteria: Option<String>,
    /// Epic owner; may dangle after member removal.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<MemberId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_effort: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual_effort: Option<String>,
    /// Unix epoch milliseconds; immutable after creation.
    pub created_at: i64,
}

impl WorkItem {
    /// Returns whether this record belongs in the epics collection.
    pub fn is_epic(&self) -> bool {
        self.kind == ItemKind::Epic
    }

    /// Case-insensitive search over title, description and decimal id.
    ///
    /// # Contract
    /// - `needle` must already be lowercased by the caller.
    pub fn matches_search(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle)
            || self
                .description
                .as_deref()
                .is_some_and(|text| text.to_lowercase().contains(needle))
            || self.id.to_string().contains(needle)
    }

    /// Merges a partial update into this record.
    ///
    /// # Contract
    /// - Absent patch fields leave the current value untouched.
    /// - Reference fields use the two-level option: `Some(None)` clears.
    /// - `id` and `created_at` are never written by a merge.
    pub fn apply(&mut self, patch: ItemPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(description) = patch.description {
            self.description = Some(description);
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(priority) = patch.priority {
            self.priority = priority;
        }
        if let Some(kind) = patch.kind {
            self.kind = kind;
        }
        if let Some(assignee) = patch.assignee {
            self.assignee = assignee;
        }
        if let Some(epic_id) = patch.epic_id {
            self.epic_id = epic_id;
        }
        if let Some(owner) = patch.owner {
            self.owner = owner;
        }
        if let Some(due_date) = patch.due_date {
            self.due_date = Some(due_date);
        }
        if let Some(effort) = patch.effort {
            self.effort = Some(effort);
        }
        if let Some(capacity) = patch.capacity {
            self.capacity = Some(capacity);
        }
        if let Some(size) = patch.size {
            self.size = Some(size);
        }
        if let Some(acceptance_criteria) = patch.acceptance_criteria {
            self.acceptance_criteria = Some(acceptance_criteria);
        }
        if let Some(start_date) = patch.start_date {
            self.start_date = Some(start_date);
        }
        if let Some(end_date) = patch.end_date {
            self.end_date = Some(end_date);
        }
        if let Some(estimated_effort) = patch.estimated_effort {
            self.estimated_effort = Some(estimated_effort);
        }
        if let Some(actual_effort) = patch.actual_effort {
            self.actual_effort = Some(actual_effort);
        }
    }
}

/// Form-shaped input for creating a work item.
///
/// `kind` is optional here on purpose: the producing form may omit it, and
/// "item type present" is a real runtime check, not a type guarantee.
#[derive(Debug, Clone, Default)]
pub struct ItemDraft {
    pub title: String,
    pub kind: Option<ItemKind>,
    pub description: Option<String>,
    /// Defaults to `Status::Todo` when absent.
    pub status: Option<Status>,
    /// Defaults to `Priority::Medium` when absent.
    pub priority: Option<Priority>,
    pub assignee: Option<MemberId>,
    pub epic_id: Option<ItemId>,
    pub due_date: Option<String>,
    pub effort: Option<String>,
    pub capacity: Option<String>,
    pub size: Option<String>,
    pub acceptance_criteria: Option<String>,
    pub owner: Option<MemberId>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub estimated_effort: Option<String>,
    pub actual_effort: Option<String>,
}

impl ItemDraft {
    /// Validates required fields and materializes the record.
    ///
    /// # Errors
    /// - `ValidationError::EmptyTitle` when the title trims to empty.
    /// - `ValidationError::MissingKind` when no kind was supplied.
    pub fn into_item(self, id: ItemId, created_at: i64) -> Result<WorkItem, ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::EmptyTitle);
        }
        let kind = self.kind.ok_or(ValidationError::MissingKind)?;

        Ok(WorkItem {
            id,
            title: self.title,
            description: self.description,
            status: self.status.unwrap_or(Status::Todo),
            priority: self.priority.unwrap_or(Priority::Medium),
            kind,
            assignee: self.assignee,
            epic_id: self.epic_id,
            due_date: self.due_date,
            effort: self.effort,
            capacity: self.capacity,
            size: self.size,
            acceptance_criteria: self.acceptance_criteria,
            owner: self.owner,
            start_date: self.start_date,
            end_date: self.end_date,
            estimated_effort: self.estimated_effort,
            actual_effort: self.actual_effort,
            created_at,
        })
    }
}

/// Partial update for [`WorkItem::apply`].
///
/// Reference fields (`assignee`, `epic_id`, `owner`) are doubly optional so
/// a patch can distinguish "leave unchanged" from "clear to none".
#[derive(Debug, Clone, Default)]
pub struct ItemPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<Status>,
    pub priority: Option<Priority>,
    pub kind: Option<ItemKind>,
    pub assignee: Option<Option<MemberId>>,
    pub epic_id: Option<Option<ItemId>>,
    pub owner: Option<Option<MemberId>>,
    pub due_date: Option<String>,
    pub effort: Option<String>,
    pub capacity: Option<String>,
    pub size: Option<String>,
    pub acceptance_criteria: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub estimated_effort: Option<String>,
    pub actual_effort: Option<String>,
}

/// Derived completion summary for one epic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EpicProgress {
    /// Number of tasks linked to the epic.
    pub total: usize,
    /// Linked tasks with status `done`.
    pub completed: usize,
    /// `round(100 * completed / total)`; zero when no tasks are linked.
    pub percentage: u32,
}
