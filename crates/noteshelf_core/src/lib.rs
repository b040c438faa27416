//! Core domain logic for noteshelf.
//! Owns the note store, its SQLite schema, configuration and feature flags.

pub mod config;
pub mod db;
pub mod flags;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::{AppConfig, ConfigError, DatabaseLocation};
pub use flags::{dependency_upgraded_next, FeatureFlag, FeatureFlags, DEPENDENCY_UPGRADED_NEXT};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::note::{Note, NoteId};
pub use repo::note_repo::{
    NoteCursor, NoteIter, NotePage, NoteRepository, RepoError, RepoResult, SqliteNoteRepository,
};
pub use service::note_service::{NoteService, NoteServiceError};

/// Minimal health-check API.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
