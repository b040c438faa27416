//! Domain model for the note store.
//!
//! # Invariants
//! - Every persisted note carries a stable `NoteId`.
//! - Timestamps are owned by the persistence layer.

pub mod note;
