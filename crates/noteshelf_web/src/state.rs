//! Shared application state.
//!
//! # Invariants
//! - One SQLite connection per process, guarded by a mutex.
//! - Store calls never run on async worker threads.
//! - A panic inside store work does not lock out later requests.
//! - Feature flags are the values captured at startup.

use crate::error::WebError;
use noteshelf_core::{FeatureFlags, NoteService, NoteServiceError, SqliteNoteRepository};
use log::warn;
use rusqlite::Connection;
use std::sync::{Arc, Mutex, PoisonError};

#[derive(Clone)]
pub struct AppState {
    conn: Arc<Mutex<Connection>>,
    flags: FeatureFlags,
}

impl AppState {
    /// Takes ownership of a migrated connection.
    pub fn new(conn: Connection, flags: FeatureFlags) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
            flags,
        }
    }

    pub fn flags(&self) -> FeatureFlags {
        self.flags
    }

    /// Runs `work` against a note service on the blocking pool.
    pub async fn with_notes<T, F>(&self, work: F) -> Result<T, WebError>
    where
        T: Send + 'static,
        F: FnOnce(&NoteService<SqliteNoteRepository<'_>>) -> Result<T, NoteServiceError>
            + Send
            + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || -> Result<T, WebError> {
            // Statements are scoped to each call, so a panicked caller leaves
            // nothing half-applied on the connection itself.
            let guard = conn.lock().unwrap_or_else(|poisoned| {
                warn!("event=store_lock module=web status=recovered reason=poisoned");
                conn.clear_poison();
                PoisonError::into_inner(poisoned)
            });
            let service = NoteService::new(SqliteNoteRepository::try_new(&guard)?);
            Ok(work(&service)?)
        })
        .await
        .map_err(|err| WebError::Worker(err.to_string()))?
    }
}
