pub mod sqlite;

use serde::{Deserialize, Serialize};

use crate::{record::LogRecord, types::Generation};

/// Version number for serialized [`JournalEnvelope`] payloads.
pub const JOURNAL_FORMAT_VERSION: u16 = 1;

#[derive(Debug)]
pub enum JournalError {
    Sqlite(rusqlite::Error),
    Serde(serde_json::Error),
    Message(String),
}

impl From<rusqlite::Error> for JournalError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

impl From<serde_json::Error> for JournalError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serde(value)
    }
}

impl std::fmt::Display for JournalError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JournalError::Sqlite(e) => write!(f, "journal sqlite error: {e}"),
            JournalError::Serde(e) => write!(f, "journal encode error: {e}"),
            JournalError::Message(m) => f.write_str(m),
        }
    }
}

pub type JournalResult<T> = Result<T, JournalError>;

/// What happened to one submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum JournalEvent {
    /// The record left for `/update-log`.
    Dispatched { record: LogRecord },
    /// The server answered with a message.
    Answered { message: String },
    /// The request failed; the contact may not be on the server.
    Failed { detail: String },
}

/// One journal row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntry {
    /// Runtime start time in ms, distinguishing page loads.
    pub session: u64,
    /// Submission generation within the session.
    pub generation: Generation,
    pub ts_ms: u64,
    pub event: JournalEvent,
}

/// Versioned wrapper for stable on-disk payload decoding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEnvelope {
    pub format_version: u16,
    pub entry: JournalEntry,
}

impl JournalEnvelope {
    pub fn new(entry: JournalEntry) -> Self {
        Self {
            format_version: JOURNAL_FORMAT_VERSION,
            entry,
        }
    }
}

/// Local audit trail of submissions, written off the entry loop.
pub trait SubmissionJournal: Send {
    /// Appends entries in order, returning the number written.
    fn append(&mut self, entries: &[JournalEntry]) -> JournalResult<usize>;
    fn flush(&mut self) -> JournalResult<()> {
        Ok(())
    }
    /// Highest session id already recorded, if the backend can tell.
    fn latest_session(&self) -> JournalResult<Option<u64>> {
        Ok(None)
    }
}
