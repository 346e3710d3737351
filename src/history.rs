//! Bounded persistence for saved conversations.
//!
//! Stores keep the 20 most recent conversations, newest first, and never
//! surface persistence failures to callers: a broken or missing store reads
//! as empty and writes are fire-and-forget. Failures are counted, not raised.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde_json::{from_reader, to_writer_pretty};

use crate::error::{Error, Result};
use crate::observability::{STORE_ERRORS, STORE_LOADS, STORE_SAVES};
use crate::types::Session;

/// Maximum number of conversations a store retains.
pub const MAX_SESSIONS: usize = 20;

/// Default file name for the on-disk store.
pub const DEFAULT_STORE_FILE: &str = "agriagent_sessions.json";

/// Persistence for saved conversations.
///
/// Implementations must be safe to share: concurrent upserts for the same id
/// resolve last-write-wins.
pub trait SessionStore: Send + Sync {
    /// All saved conversations, most recent first. Never fails; a broken
    /// store reads as empty.
    fn load_all(&self) -> Vec<Session>;

    /// Replace the stored list wholesale. The caller is responsible for
    /// ordering and the retention bound on this path.
    fn save_all(&self, sessions: &[Session]);

    /// Insert or update one conversation. A session with no messages is
    /// never persisted. An existing id is replaced in place, keeping its
    /// position; a new id goes to the front. The list is then truncated to
    /// the retention bound.
    fn upsert(&self, session: Session);

    /// Delete a conversation by id. Unknown ids are a no-op.
    fn remove(&self, id: &str);
}

/// Apply the upsert rules to a session list.
pub(crate) fn upsert_into(sessions: &mut Vec<Session>, session: Session) {
    if session.messages.is_empty() {
        return;
    }
    if let Some(existing) = sessions.iter_mut().find(|s| s.id == session.id) {
        *existing = session;
    } else {
        sessions.insert(0, session);
    }
    sessions.truncate(MAX_SESSIONS);
}

/// Remove a session by id from a session list.
pub(crate) fn remove_from(sessions: &mut Vec<Session>, id: &str) {
    sessions.retain(|s| s.id != id);
}

/// Session store backed by a single JSON file.
///
/// The file holds a bare array of sessions, newest first. Read-modify-write
/// sequences run under an internal lock so shared use stays last-write-wins.
#[derive(Debug)]
pub struct FileSessionStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileSessionStore {
    /// Create a store backed by the given file. The file is created on the
    /// first write.
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// The path this store writes to.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_sessions(&self) -> Result<Vec<Session>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let file = File::open(&self.path)
            .map_err(|err| Error::io("failed to open session store", err))?;
        let reader = BufReader::new(file);
        from_reader(reader).map_err(|err| {
            Error::serialization("failed to parse session store", Some(Box::new(err)))
        })
    }

    fn write_sessions(&self, sessions: &[Session]) -> Result<()> {
        let file = File::create(&self.path)
            .map_err(|err| Error::io("failed to create session store", err))?;
        let writer = BufWriter::new(file);
        to_writer_pretty(writer, &sessions).map_err(|err| {
            Error::serialization("failed to serialize session store", Some(Box::new(err)))
        })
    }

    fn read_or_empty(&self) -> Vec<Session> {
        match self.read_sessions() {
            Ok(sessions) => sessions,
            Err(_) => {
                STORE_ERRORS.click();
                Vec::new()
            }
        }
    }

    fn write_or_count(&self, sessions: &[Session]) {
        STORE_SAVES.click();
        if self.write_sessions(sessions).is_err() {
            STORE_ERRORS.click();
        }
    }
}

impl SessionStore for FileSessionStore {
    fn load_all(&self) -> Vec<Session> {
        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());
        STORE_LOADS.click();
        self.read_or_empty()
    }

    fn save_all(&self, sessions: &[Session]) {
        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());
        self.write_or_count(sessions);
    }

    fn upsert(&self, session: Session) {
        if session.messages.is_empty() {
            return;
        }
        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());
        let mut sessions = self.read_or_empty();
        upsert_into(&mut sessions, session);
        self.write_or_count(&sessions);
    }

    fn remove(&self, id: &str) {
        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());
        let mut sessions = self.read_or_empty();
        remove_from(&mut sessions, id);
        self.write_or_count(&sessions);
    }
}

/// Session store held entirely in memory.
///
/// Useful for tests and for running the chat without touching disk.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    sessions: Mutex<Vec<Session>>,
}

impl MemorySessionStore {
    /// Create an empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    fn load_all(&self) -> Vec<Session> {
        STORE_LOADS.click();
        self.sessions
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    fn save_all(&self, sessions: &[Session]) {
        STORE_SAVES.click();
        *self.sessions.lock().unwrap_or_else(|e| e.into_inner()) = sessions.to_vec();
    }

    fn upsert(&self, session: Session) {
        STORE_SAVES.click();
        let mut sessions = self.sessions.lock().unwrap_or_else(|e| e.into_inner());
        upsert_into(&mut sessions, session);
    }

    fn remove(&self, id: &str) {
        STORE_SAVES.click();
        let mut sessions = self.sessions.lock().unwrap_or_else(|e| e.into_inner());
        remove_from(&mut sessions, id);
    }
}
