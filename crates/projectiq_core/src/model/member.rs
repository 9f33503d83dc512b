//! Team member domain model.
//!
//! # Responsibility
//! - Define the roster record referenced by work item assignee/owner.
//! - Provide display helpers that tolerate dangling references.
//!
//! # Invariants
//! - Ids are time-based and never reused within one store instance.
//! - Removing a member never cascades into work items; lookups resolve
//!   dangling ids to a display fallback instead.

use crate::model::ValidationError;
use serde::{Deserialize, Serialize};

/// Time-based unique identifier for team members.
pub type MemberId = i64;

/// Roster entry referenced by `WorkItem::assignee` / `WorkItem::owner`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamMember {
    pub id: MemberId,
    pub name: String,
    pub email: String,
    /// Unix epoch milliseconds; set once at creation.
    pub created_at: i64,
    /// Stamped on every successful update.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<i64>,
}

impl TeamMember {
    /// Validates and builds a roster entry from trimmed form input.
    ///
    /// # Errors
    /// - `ValidationError::EmptyName` / `ValidationError::EmptyEmail` when
    ///   the respective field trims to empty.
    pub fn new(
        id: MemberId,
        name: &str,
        email: &str,
        created_at: i64,
    ) -> Result<Self, ValidationError> {
        let name = name.trim();
        let email = email.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyName);
        }
        if email.is_empty() {
            return Err(ValidationError::EmptyEmail);
        }

        Ok(Self {
            id,
            name: name.to_string(),
            email: email.to_string(),
            created_at,
            updated_at: None,
        })
    }
}

/// Derives avatar initials from a member name.
///
/// First letter of each whitespace-separated token, uppercased, capped at
/// two characters. Blank input yields the `"U"` (unknown) placeholder.
pub fn member_initials(name: &str) -> String {
    let initials: String = name
        .split_whitespace()
        .filter_map(|token| token.chars().next())
        .flat_map(char::to_uppercase)
        .take(2)
        .collect();

    if initials.is_empty() {
        "U".to_string()
    } else {
        initials
    }
}
