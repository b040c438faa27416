//! Note use-case service.
//!
//! # Responsibility
//! - Provide create/rename/get/list APIs over a `NoteRepository`.
//! - Emit metadata-only log events for note writes.
//!
//! # Invariants
//! - Returned notes are read back from storage, never echoed from input.
//! - Listing follows repository order (insertion order).

use crate::model::note::{Note, NoteId};
use crate::repo::note_repo::{NoteIter, NoteRepository, RepoError, RepoResult};
use log::{error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for note use-cases.
#[derive(Debug)]
pub enum NoteServiceError {
    NoteNotFound(NoteId),
    Repo(RepoError),
    /// Storage accepted a write but the read-back disagrees.
    InconsistentState(&'static str),
}

impl Display for NoteServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoteNotFound(id) => write!(f, "note not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::InconsistentState(details) => write!(f, "inconsistent note state: {details}"),
        }
    }
}

impl Error for NoteServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for NoteServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::NoteNotFound(id),
            other => Self::Repo(other),
        }
    }
}

/// Note service facade over repository implementations.
pub struct NoteService<R: NoteRepository> {
    repo: R,
}

impl<R: NoteRepository> NoteService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Constructs and persists one note, returning the stored record.
    pub fn create_note(&self, name: impl Into<String>) -> Result<Note, NoteServiceError> {
        let mut note = Note::new(name);
        let id = self.repo.save(&mut note).map_err(|err| {
            error!("event=note_create module=service status=error error={err}");
            err
        })?;
        info!("event=note_create module=service status=ok note_id={id}");

        self.repo
            .get_note(id)?
            .ok_or(NoteServiceError::InconsistentState(
                "created note not found in read-back",
            ))
    }

    /// Replaces the name of an existing note.
    pub fn rename_note(
        &self,
        id: NoteId,
        name: impl Into<String>,
    ) -> Result<Note, NoteServiceError> {
        let mut note = self
            .repo
            .get_note(id)?
            .ok_or(NoteServiceError::NoteNotFound(id))?;
        note.name = name.into();
        self.repo.save(&mut note)?;
        info!("event=note_rename module=service status=ok note_id={id}");

        self.repo
            .get_note(id)?
            .ok_or(NoteServiceError::InconsistentState(
                "renamed note not found in read-back",
            ))
    }

    pub fn get_note(&self, id: NoteId) -> RepoResult<Option<Note>> {
        self.repo.get_note(id)
    }

    /// Lazy walk over every note; call again to restart.
    pub fn iter_notes(&self) -> NoteIter<'_, R> {
        self.repo.iter_notes()
    }

    pub fn list_notes(&self) -> Result<Vec<Note>, NoteServiceError> {
        Ok(self.repo.list_notes()?)
    }

    pub fn count_notes(&self) -> RepoResult<u64> {
        self.repo.count_notes()
    }

    /// Removes every note; returns how many rows were deleted.
    pub fn purge_notes(&self) -> RepoResult<usize> {
        let removed = self.repo.purge_notes()?;
        info!("event=note_purge module=service status=ok removed={removed}");
        Ok(removed)
    }
}
