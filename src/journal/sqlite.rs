//! SQLite-backed append-only submission journal.

use std::path::Path;

use rusqlite::{Connection, params};

use crate::{record::LogRecord, types::Generation};

use super::{
    JOURNAL_FORMAT_VERSION, JournalEntry, JournalEnvelope, JournalError, JournalEvent,
    JournalResult, SubmissionJournal,
};

/// SQLite implementation of [`crate::journal::SubmissionJournal`].
pub struct SqliteJournal {
    conn: Connection,
}

impl SqliteJournal {
    /// Opens or creates a journal at `path`.
    ///
    /// Enables WAL mode and sets `synchronous=NORMAL`.
    pub fn open(path: impl AsRef<Path>) -> JournalResult<Self> {
        let conn = Connection::open(path)?;
        Self::init_connection(conn)
    }

    pub fn open_in_memory() -> JournalResult<Self> {
        let conn = Connection::open_in_memory()?;
        Self::init_connection(conn)
    }

    fn init_connection(conn: Connection) -> JournalResult<Self> {
        conn.execute_batch(include_str!("schema.sql"))?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;
        Ok(Self { conn })
    }

    /// Loads every entry of `session` in append order.
    pub fn load_session(&self, session: u64) -> JournalResult<Vec<JournalEntry>> {
        let mut stmt = self
            .conn
            .prepare("SELECT payload FROM submissions WHERE session = ?1 ORDER BY id ASC")?;
        let rows = stmt.query_map(params![session as i64], |row| row.get::<_, Vec<u8>>(0))?;

        let mut out = Vec::new();
        for payload in rows {
            out.push(decode_entry(&payload?)?);
        }
        Ok(out)
    }

    /// Records dispatched in `session` that never got a server answer.
    ///
    /// Failed submissions are included: the server may or may not have stored them.
    pub fn unconfirmed(&self, session: u64) -> JournalResult<Vec<(Generation, LogRecord)>> {
        let mut pending: Vec<(Generation, LogRecord)> = Vec::new();
        for entry in self.load_session(session)? {
            match entry.event {
                JournalEvent::Dispatched { record } => pending.push((entry.generation, record)),
                JournalEvent::Answered { .. } => {
                    pending.retain(|(g, _)| *g != entry.generation);
                }
                JournalEvent::Failed { .. } => {}
            }
        }
        Ok(pending)
    }

    /// Most recent runtime session recorded, if any.
    pub fn latest_session(&self) -> JournalResult<Option<u64>> {
        let session: Option<i64> = self
            .conn
            .query_row("SELECT MAX(session) FROM submissions", [], |row| row.get(0))?;
        Ok(session.map(|s| s as u64))
    }

    pub fn len(&self) -> JournalResult<usize> {
        let n: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM submissions", [], |row| row.get(0))?;
        Ok(n as usize)
    }

    pub fn is_empty(&self) -> JournalResult<bool> {
        Ok(self.len()? == 0)
    }
}

impl SubmissionJournal for SqliteJournal {
    fn append(&mut self, entries: &[JournalEntry]) -> JournalResult<usize> {
        if entries.is_empty() {
            return Ok(0);
        }

        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO submissions(session, generation, ts_ms, kind, call, payload) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            )?;
            for entry in entries {
                let payload = serde_json::to_vec(&JournalEnvelope::new(entry.clone()))?;
                let (kind, call) = event_kind_and_call(&entry.event);
                stmt.execute(params![
                    entry.session as i64,
                    entry.generation as i64,
                    entry.ts_ms as i64,
                    kind,
                    call,
                    payload,
                ])?;
            }
        }
        tx.commit()?;
        Ok(entries.len())
    }

    fn flush(&mut self) -> JournalResult<()> {
        self.conn.execute_batch("PRAGMA wal_checkpoint(PASSIVE);")?;
        Ok(())
    }

    fn latest_session(&self) -> JournalResult<Option<u64>> {
        SqliteJournal::latest_session(self)
    }
}

fn event_kind_and_call(event: &JournalEvent) -> (i64, Option<&str>) {
    match event {
        JournalEvent::Dispatched { record } => (1, Some(record.call())),
        JournalEvent::Answered { .. } => (2, None),
        JournalEvent::Failed { .. } => (3, None),
    }
}

fn decode_entry(payload: &[u8]) -> JournalResult<JournalEntry> {
    let envelope: JournalEnvelope = serde_json::from_slice(payload)?;
    if envelope.format_version != JOURNAL_FORMAT_VERSION {
        return Err(JournalError::Message(format!(
            "unsupported journal format version: {}",
            envelope.format_version
        )));
    }
    Ok(envelope.entry)
}
