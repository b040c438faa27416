//! Note domain model.
//!
//! # Invariants
//! - `id` is `None` until the first persist and never changes afterwards.
//! - `name` carries no length, blank or uniqueness constraint.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque identifier assigned when a note is first persisted.
pub type NoteId = Uuid;

/// The single persisted entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: Option<NoteId>,
    pub name: String,
    /// Unix epoch milliseconds, set by storage.
    pub created_at: Option<i64>,
    /// Unix epoch milliseconds, set by storage.
    pub updated_at: Option<i64>,
}

impl Note {
    /// Builds an in-memory note; nothing is written until it is saved.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            created_at: None,
            updated_at: None,
        }
    }

    /// True once storage has assigned an identifier.
    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }
}
