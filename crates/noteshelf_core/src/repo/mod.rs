//! Repository layer for note persistence.
//!
//! # Responsibility
//! - Define the data access contract used by services.
//! - Keep SQLite query details inside the persistence boundary.
//!
//! # Invariants
//! - Storage failures surface as `RepoError`; nothing is retried.

pub mod note_repo;
