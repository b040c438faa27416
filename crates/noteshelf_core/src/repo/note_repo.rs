//! Note repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Persist, read and list notes stored in the `notes` table.
//! - Provide a lazy, restartable listing in insertion order.
//!
//! # Invariants
//! - A note receives its id only after the insert succeeds.
//! - Listing order is `seq ASC` (insertion order) and never changes between
//!   calls.
//! - Read paths reject malformed persisted ids instead of masking them.

use crate::db::DbError;
use crate::model::note::{Note, NoteId};
use rusqlite::{params, Connection, Row};
use std::collections::VecDeque;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Rows fetched per round-trip by [`NoteIter`].
pub const NOTES_PAGE_SIZE: u32 = 100;

pub type RepoResult<T> = Result<T, RepoError>;

#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    NotFound(NoteId),
    InvalidData(String),
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "note not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted note data: {message}"),
            Self::MissingRequiredTable(table) => {
                write!(f, "database is missing required table `{table}`")
            }
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "table `{table}` is missing required column `{column}`")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Opaque position in the listing order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct NoteCursor(i64);

/// One batch of notes plus the cursor of its last row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotePage {
    pub notes: Vec<Note>,
    pub last: Option<NoteCursor>,
}

/// Repository interface for note operations.
pub trait NoteRepository {
    /// Inserts a new note or writes the name of an already persisted one.
    ///
    /// On first save the note's `id` and timestamps are filled in.
    fn save(&self, note: &mut Note) -> RepoResult<NoteId>;
    fn get_note(&self, id: NoteId) -> RepoResult<Option<Note>>;
    /// Returns up to `limit` notes strictly after `after`, in listing order.
    fn list_page(&self, after: Option<NoteCursor>, limit: u32) -> RepoResult<NotePage>;
    fn count_notes(&self) -> RepoResult<u64>;
    /// Deletes every note. Used to reset test databases.
    fn purge_notes(&self) -> RepoResult<usize>;

    /// Lazily walks all notes in insertion order.
    ///
    /// Each call starts a fresh walk from the first note.
    fn iter_notes(&self) -> NoteIter<'_, Self>
    where
        Self: Sized,
    {
        NoteIter::new(self, NOTES_PAGE_SIZE)
    }

    /// Collects the full listing.
    fn list_notes(&self) -> RepoResult<Vec<Note>>
    where
        Self: Sized,
    {
        self.iter_notes().collect()
    }
}

/// Lazy, finite iterator over every note, fetched page by page.
///
/// Yields at most one error and then stops.
pub struct NoteIter<'r, R: NoteRepository> {
    repo: &'r R,
    page_size: u32,
    buffered: VecDeque<Note>,
    cursor: Option<NoteCursor>,
    exhausted: bool,
}

impl<'r, R: NoteRepository> NoteIter<'r, R> {
    pub fn new(repo: &'r R, page_size: u32) -> Self {
        Self {
            repo,
            page_size: page_size.max(1),
            buffered: VecDeque::new(),
            cursor: None,
            exhausted: false,
        }
    }

    fn fill(&mut self) -> RepoResult<()> {
        let page = self.repo.list_page(self.cursor, self.page_size)?;
        if page.notes.len() < self.page_size as usize {
            self.exhausted = true;
        }
        if page.last.is_some() {
            self.cursor = page.last;
        }
        self.buffered.extend(page.notes);
        Ok(())
    }
}

impl<R: NoteRepository> Iterator for NoteIter<'_, R> {
    type Item = RepoResult<Note>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.buffered.is_empty() && !self.exhausted {
            if let Err(err) = self.fill() {
                self.exhausted = true;
                return Some(Err(err));
            }
        }
        self.buffered.pop_front().map(Ok)
    }
}

/// SQLite-backed note repository.
pub struct SqliteNoteRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteNoteRepository<'conn> {
    /// Wraps a migrated connection after checking the `notes` schema.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl NoteRepository for SqliteNoteRepository<'_> {
    fn save(&self, note: &mut Note) -> RepoResult<NoteId> {
        if let Some(id) = note.id {
            let updated_at = self
                .conn
                .query_row(
                    "UPDATE notes
                     SET
                        name = ?1,
                        updated_at = (strftime('%s', 'now') * 1000)
                     WHERE uuid = ?2
                     RETURNING updated_at;",
                    params![note.name.as_str(), id.to_string()],
                    |row| row.get::<_, i64>(0),
                )
                .map_err(|err| match err {
                    rusqlite::Error::QueryReturnedNoRows => RepoError::NotFound(id),
                    other => other.into(),
                })?;
            note.updated_at = Some(updated_at);
            return Ok(id);
        }

        let id = Uuid::new_v4();
        let (created_at, updated_at) = self.conn.query_row(
            "INSERT INTO notes (uuid, name)
             VALUES (?1, ?2)
             RETURNING created_at, updated_at;",
            params![id.to_string(), note.name.as_str()],
            |row| Ok((row.get::<_, i64>(0)?, row.get::<_, i64>(1)?)),
        )?;

        note.id = Some(id);
        note.created_at = Some(created_at);
        note.updated_at = Some(updated_at);
        Ok(id)
    }

    fn get_note(&self, id: NoteId) -> RepoResult<Option<Note>> {
        let mut stmt = self.conn.prepare(
            "SELECT seq, uuid, name, created_at, updated_at
             FROM notes
             WHERE uuid = ?1;",
        )?;
        let mut rows = stmt.query([id.to_string()])?;
        match rows.next()? {
            Some(row) => Ok(Some(parse_note_row(row)?.1)),
            None => Ok(None),
        }
    }

    fn list_page(&self, after: Option<NoteCursor>, limit: u32) -> RepoResult<NotePage> {
        let after_seq = after.map_or(0, |cursor| cursor.0);
        let mut stmt = self.conn.prepare(
            "SELECT seq, uuid, name, created_at, updated_at
             FROM notes
             WHERE seq > ?1
             ORDER BY seq ASC
             LIMIT ?2;",
        )?;
        let mut rows = stmt.query(params![after_seq, i64::from(limit)])?;

        let mut page = NotePage::default();
        while let Some(row) = rows.next()? {
            let (cursor, note) = parse_note_row(row)?;
            page.last = Some(cursor);
            page.notes.push(note);
        }
        Ok(page)
    }

    fn count_notes(&self) -> RepoResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM notes;", [], |row| row.get(0))?;
        u64::try_from(count)
            .map_err(|_| RepoError::InvalidData(format!("negative note count `{count}`")))
    }

    fn purge_notes(&self) -> RepoResult<usize> {
        Ok(self.conn.execute("DELETE FROM notes;", [])?)
    }
}

fn parse_note_row(row: &Row<'_>) -> RepoResult<(NoteCursor, Note)> {
    let uuid_text: String = row.get("uuid")?;
    let id = Uuid::parse_str(&uuid_text).map_err(|_| {
        RepoError::InvalidData(format!("invalid uuid value `{uuid_text}` in notes.uuid"))
    })?;

    let note = Note {
        id: Some(id),
        name: row.get("name")?,
        created_at: Some(row.get("created_at")?),
        updated_at: Some(row.get("updated_at")?),
    };
    Ok((NoteCursor(row.get("seq")?), note))
}

fn ensure_connection_ready(conn: &Connection) -> RepoResult<()> {
    if !table_exists(conn, "notes")? {
        return Err(RepoError::MissingRequiredTable("notes"));
    }

    for column in ["seq", "uuid", "name", "created_at", "updated_at"] {
        if !table_has_column(conn, "notes", column)? {
            return Err(RepoError::MissingRequiredColumn {
                table: "notes",
                column,
            });
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}
