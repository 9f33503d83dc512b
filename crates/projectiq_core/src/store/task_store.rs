//! The task store: collections, id allocation and derived views.
//!
//! # Responsibility
//! - Own the task/epic/team collections and the shared id counter.
//! - Perform create/update/delete with kind-based collection routing.
//! - Compute derived views (filtering, epic progress, member lookups).
//! - Snapshot every affected collection to the key-value backend after
//!   each mutation.
//!
//! # Invariants
//! - The id counter never decreases and is persisted with every draw.
//! - Rejected operations leave in-memory state untouched.
//! - In-memory state stays authoritative even when a snapshot write fails.

use crate::model::{
    EpicProgress, ItemDraft, ItemId, ItemPatch, MemberId, Status, TeamMember, Theme,
    ValidationError, WorkItem,
};
use crate::repo::{keys, KeyValueStore, StorageError};
use log::{debug, info};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::{SystemTime, UNIX_EPOCH};

pub type StoreResult<T> = Result<T, StoreError>;

/// Store-level error for all task-store operations.
#[derive(Debug)]
pub enum StoreError {
    Validation(ValidationError),
    /// No task or epic carries this id.
    ItemNotFound(ItemId),
    /// No roster entry carries this id.
    MemberNotFound(MemberId),
    Storage(StorageError),
    /// Persisted snapshot under a key failed to decode.
    InvalidData(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::ItemNotFound(id) => write!(f, "work item not found: {id}"),
            Self::MemberNotFound(id) => write!(f, "team member not found: {id}"),
            Self::Storage(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Storage(err) => Some(err),
            Self::ItemNotFound(_) | Self::MemberNotFound(_) | Self::InvalidData(_) => None,
        }
    }
}

impl From<ValidationError> for StoreError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<StorageError> for StoreError {
    fn from(value: StorageError) -> Self {
        Self::Storage(value)
    }
}

/// In-memory relational core over a key-value snapshot backend.
///
/// All operations run on one logical thread; mutating calls persist the
/// affected keys before returning.
pub struct TaskStore<S: KeyValueStore> {
    storage: S,
    tasks: Vec<WorkItem>,
    epics: Vec<WorkItem>,
    team_members: Vec<TeamMember>,
    next_id: ItemId,
    theme: Theme,
}

impl<S: KeyValueStore> TaskStore<S> {
    /// Restores store state from the backend.
    ///
    /// Missing keys default (empty collections, counter at 1, light
    /// theme). Present but undecodable snapshots are rejected with
    /// `InvalidData` rather than silently dropped.
    ///
    /// # Invariants
    /// - The restored counter never sits at or below an existing item id,
    ///   so ids are not reused even if the counter key lags the data.
    pub fn load(storage: S) -> StoreResult<Self> {
        let tasks: Vec<WorkItem> = read_collection(&storage, keys::TASKS)?;
        let epics: Vec<WorkItem> = read_collection(&storage, keys::EPICS)?;
        let team_members: Vec<TeamMember> = read_collection(&storage, keys::TEAM_MEMBERS)?;
        let persisted_next = read_counter(&storage)?;
        let theme = match storage.get(keys::THEME)? {
            Some(raw) => Theme::parse(&raw),
            None => Theme::default(),
        };

        let max_item_id = tasks.iter().chain(epics.iter()).map(|item| item.id).max();
        let next_id = persisted_next
            .unwrap_or(1)
            .max(max_item_id.map_or(1, |id| id + 1));

        info!(
            "event=store_load module=store status=ok tasks={} epics={} members={} next_id={next_id}",
            tasks.len(),
            epics.len(),
            team_members.len()
        );

        Ok(Self {
            storage,
            tasks,
            epics,
            team_members,
            next_id,
            theme,
        })
    }

    /// Tasks and stories in insertion order.
    pub fn tasks(&self) -> &[WorkItem] {
        &self.tasks
    }

    /// Epics in insertion order.
    pub fn epics(&self) -> &[WorkItem] {
        &self.epics
    }

    /// Roster in insertion order.
    pub fn team_members(&self) -> &[TeamMember] {
        &self.team_members
    }

    /// Next id the shared counter will issue.
    pub fn next_id(&self) -> ItemId {
        self.next_id
    }

    /// The underlying key-value backend.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Looks up a work item in either collection.
    pub fn item(&self, id: ItemId) -> Option<&WorkItem> {
        self.tasks
            .iter()
            .chain(self.epics.iter())
            .find(|item| item.id == id)
    }

    /// Looks up a roster entry.
    pub fn team_member(&self, id: MemberId) -> Option<&TeamMember> {
        self.team_members.iter().find(|member| member.id == id)
    }

    /// Creates a work item from form input.
    ///
    /// # Contract
    /// - Empty title / missing kind reject with `Validation` and leave
    ///   state untouched.
    /// - The new record takes `id = next_id`; the counter is incremented
    ///   and persisted together with the destination collection.
    /// - `kind == epic` routes into the epics collection, everything else
    ///   into tasks.
    pub fn create_item(&mut self, draft: ItemDraft) -> StoreResult<WorkItem> {
        let item = draft.into_item(self.next_id, now_ms())?;
        self.next_id += 1;

        let created = item.clone();
        let into_epics = item.is_epic();
        if into_epics {
            self.epics.push(item);
        } else {
            self.tasks.push(item);
        }

        self.persist_counter()?;
        self.persist_items(into_epics)?;

        debug!(
            "event=item_created module=store id={} kind={}",
            created.id, created.kind
        );
        Ok(created)
    }

    /// Merges a partial update into the item with this id.
    ///
    /// A kind change to or from `epic` migrates the record between the
    /// tasks and epics collections (appended at the destination tail), and
    /// both collections are persisted.
    pub fn update_item(&mut self, id: ItemId, patch: ItemPatch) -> StoreResult<WorkItem> {
        let (in_epics, index) = self.locate(id).ok_or(StoreError::ItemNotFound(id))?;

        let item = if in_epics {
            &mut self.epics[index]
        } else {
            &mut self.tasks[index]
        };
        item.apply(patch);
        let moved = item.is_epic() != in_epics;

        if moved {
            let item = if in_epics {
                self.epics.remove(index)
            } else {
                self.tasks.remove(index)
            };
            if in_epics {
                self.tasks.push(item);
            } else {
                self.epics.push(item);
            }
            self.persist_items(true)?;
            self.persist_items(false)?;
        } else {
            self.persist_items(in_epics)?;
        }

        debug!("event=item_updated module=store id={id} moved={moved}");
        let updated = self
            .item(id)
            .cloned()
            .ok_or(StoreError::ItemNotFound(id))?;
        Ok(updated)
    }

    /// Removes the item with this id from whichever collection holds it.
    ///
    /// Idempotent: an absent id is a no-op and nothing is persisted.
    pub fn delete_item(&mut self, id: ItemId) -> StoreResult<()> {
        match self.locate(id) {
            Some((in_epics, index)) => {
                if in_epics {
                    self.epics.remove(index);
                } else {
                    self.tasks.remove(index);
                }
                self.persist_items(in_epics)?;
                debug!("event=item_deleted module=store id={id}");
                Ok(())
            }
            None => Ok(()),
        }
    }

    /// Sets only the status field; the board drag-and-drop entry point.
    ///
    /// Any status is reachable from any other; no transition legality is
    /// enforced.
    pub fn set_item_status(&mut self, id: ItemId, status: Status) -> StoreResult<()> {
        let (in_epics, index) = self.locate(id).ok_or(StoreError::ItemNotFound(id))?;

        if in_epics {
            self.epics[index].status = status;
        } else {
            self.tasks[index].status = status;
        }
        self.persist_items(in_epics)?;

        debug!("event=item_status_set module=store id={id}");
        Ok(())
    }

    /// Adds a roster entry with a time-based id.
    ///
    /// Ids are clamped to strictly increase, so creations within the same
    /// millisecond still get distinct ids.
    pub fn create_team_member(&mut self, name: &str, email: &str) -> StoreResult<TeamMember> {
        let now = now_ms();
        let last_issued = self.team_members.iter().map(|member| member.id).max();
        let id = last_issued.map_or(now, |last| now.max(last + 1));

        let member = TeamMember::new(id, name, email, now)?;
        let created = member.clone();
        self.team_members.push(member);
        self.persist_members()?;

        debug!("event=member_created module=store id={id}");
        Ok(created)
    }

    /// Replaces a roster entry's name and email, stamping `updated_at`.
    pub fn update_team_member(
        &mut self,
        id: MemberId,
        name: &str,
        email: &str,
    ) -> StoreResult<TeamMember> {
        let member = self
            .team_members
            .iter_mut()
            .find(|member| member.id == id)
            .ok_or(StoreError::MemberNotFound(id))?;

        member.name = name.trim().to_string();
        member.email = email.trim().to_string();
        member.updated_at = Some(now_ms());
        let updated = member.clone();
        self.persist_members()?;

        debug!("event=member_updated module=store id={id}");
        Ok(updated)
    }

    /// Removes a roster entry without touching referencing items.
    ///
    /// Dangling `assignee`/`owner` ids are resolved to `"Unknown"` by
    /// [`TaskStore::resolve_member_name`] instead of being cleaned up.
    pub fn remove_team_member(&mut self, id: MemberId) -> StoreResult<()> {
        let before = self.team_members.len();
        self.team_members.retain(|member| member.id != id);
        if self.team_members.len() == before {
            return Ok(());
        }

        self.persist_members()?;
        debug!("event=member_removed module=store id={id}");
        Ok(())
    }

    /// Duplicates an epic under a fresh id with a `" (Copy)"` title suffix.
    ///
    /// The copy is shallow (linked tasks still reference the original) and
    /// gets a fresh `created_at`; the source epic is left unmodified.
    pub fn clone_epic(&mut self, id: ItemId) -> StoreResult<WorkItem> {
        let source = self
            .epics
            .iter()
            .find(|epic| epic.id == id)
            .ok_or(StoreError::ItemNotFound(id))?;

        let mut copy = source.clone();
        copy.id = self.next_id;
        copy.title = format!("{} (Copy)", copy.title);
        copy.created_at = now_ms();
        self.next_id += 1;

        let cloned = copy.clone();
        self.epics.push(copy);
        self.persist_counter()?;
        self.persist_items(true)?;

        debug!(
            "event=epic_cloned module=store source_id={id} id={}",
            cloned.id
        );
        Ok(cloned)
    }

    /// Tasks matching a case-insensitive search term, insertion order
    /// preserved. Empty term returns the whole collection.
    pub fn filtered_tasks(&self, term: &str) -> Vec<&WorkItem> {
        filter_items(&self.tasks, term)
    }

    /// Epics matching a case-insensitive search term; same semantics as
    /// [`TaskStore::filtered_tasks`].
    pub fn filtered_epics(&self, term: &str) -> Vec<&WorkItem> {
        filter_items(&self.epics, term)
    }

    /// Derived completion summary for the epic with this id.
    ///
    /// Always computed from the live tasks collection, never stored. An
    /// epic with no linked tasks reports all zeros.
    pub fn epic_progress(&self, epic_id: ItemId) -> EpicProgress {
        let linked = self
            .tasks
            .iter()
            .filter(|task| task.epic_id == Some(epic_id));
        let mut total = 0;
        let mut completed = 0;
        for task in linked {
            total += 1;
            if task.status == Status::Done {
                completed += 1;
            }
        }

        let percentage = if total == 0 {
            0
        } else {
            (100.0 * completed as f64 / total as f64).round() as u32
        };

        EpicProgress {
            total,
            completed,
            percentage,
        }
    }

    /// Display name for an assignee/owner reference.
    ///
    /// `None` means no assignee was ever set (`"Unassigned"`); a set id
    /// with no matching roster entry means the member was deleted
    /// (`"Unknown"`). Callers rely on the distinction.
    pub fn resolve_member_name(&self, id: Option<MemberId>) -> &str {
        match id {
            None => "Unassigned",
            Some(id) => self
                .team_member(id)
                .map_or("Unknown", |member| member.name.as_str()),
        }
    }

    /// Current UI theme preference.
    pub fn theme(&self) -> Theme {
        self.theme
    }

    /// Persists a new theme preference.
    pub fn set_theme(&mut self, theme: Theme) -> StoreResult<()> {
        self.theme = theme;
        self.storage.set(keys::THEME, theme.as_str())?;
        debug!("event=theme_set module=store theme={theme}");
        Ok(())
    }

    fn locate(&self, id: ItemId) -> Option<(bool, usize)> {
        if let Some(index) = self.tasks.iter().position(|item| item.id == id) {
            return Some((false, index));
        }
        self.epics
            .iter()
            .position(|item| item.id == id)
            .map(|index| (true, index))
    }

    fn persist_items(&self, epics: bool) -> StoreResult<()> {
        if epics {
            self.write_collection(keys::EPICS, &self.epics)
        } else {
            self.write_collection(keys::TASKS, &self.tasks)
        }
    }

    fn persist_members(&self) -> StoreResult<()> {
        self.write_collection(keys::TEAM_MEMBERS, &self.team_members)
    }

    fn persist_counter(&self) -> StoreResult<()> {
        self.storage
            .set(keys::NEXT_TASK_ID, &self.next_id.to_string())?;
        Ok(())
    }

    fn write_collection<T: Serialize>(&self, key: &str, values: &[T]) -> StoreResult<()> {
        let raw = serde_json::to_string(values)
            .map_err(|err| StoreError::InvalidData(format!("failed to encode `{key}`: {err}")))?;
        self.storage.set(key, &raw)?;
        Ok(())
    }
}

fn read_collection<S: KeyValueStore, T: DeserializeOwned>(
    storage: &S,
    key: &str,
) -> StoreResult<Vec<T>> {
    match storage.get(key)? {
        Some(raw) => serde_json::from_str(&raw)
            .map_err(|err| StoreError::InvalidData(format!("bad snapshot under `{key}`: {err}"))),
        None => Ok(Vec::new()),
    }
}

fn read_counter<S: KeyValueStore>(storage: &S) -> StoreResult<Option<ItemId>> {
    match storage.get(keys::NEXT_TASK_ID)? {
        Some(raw) => raw.trim().parse::<ItemId>().map(Some).map_err(|err| {
            StoreError::InvalidData(format!(
                "bad counter under `{}`: {err}",
                keys::NEXT_TASK_ID
            ))
        }),
        None => Ok(None),
    }
}

fn filter_items<'a>(items: &'a [WorkItem], term: &str) -> Vec<&'a WorkItem> {
    let needle = term.to_lowercase();
    if needle.is_empty() {
        return items.iter().collect();
    }

    items
        .iter()
        .filter(|item| item.matches_search(&needle))
        .collect()
}

fn now_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as i64)
        .unwrap_or(0)
}
