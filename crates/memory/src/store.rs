//! In-memory session store with per-session mutation granularity.
//!
//! Backed by a `DashMap` so concurrent appends to *different* sessions
//! proceed in parallel while operations touching the *same* session are
//! serialized on its map entry. Eviction of stale sessions is cooperative:
//! callers invoke [`SessionStore::evict_stale`] explicitly, typically from
//! a maintenance task outside the request path.

use chrono::{DateTime, TimeDelta, Utc};
use dashmap::DashMap;
use parley_core::Message;
use serde::Serialize;

/// The ordered message history for one conversation identifier.
///
/// Created lazily on the first append for a given id. Insertion order is
/// chronological order. Mutated only by [`SessionStore::append`].
#[derive(Debug, Clone, Serialize)]
pub struct Session {
    /// Opaque conversation identifier, chosen by the caller
    pub id: String,

    /// Ordered messages, oldest first
    pub messages: Vec<Message>,

    /// When the session was created
    pub created_at: DateTime<Utc>,

    /// When the last message was appended
    pub last_activity: DateTime<Utc>,
}

impl Session {
    fn new(id: &str) -> Self {
        let now = Utc::now();
        Self {
            id: id.to_string(),
            messages: Vec::new(),
            created_at: now,
            last_activity: now,
        }
    }
}

/// Holds every live session, keyed by session id.
pub struct SessionStore {
    sessions: DashMap<String, Session>,
    max_messages: usize,
}

impl SessionStore {
    /// Create a store that caps each session at `max_messages` messages.
    pub fn new(max_messages: usize) -> Self {
        Self {
            sessions: DashMap::new(),
            max_messages,
        }
    }

    /// Append a message, creating the session if absent.
    ///
    /// Updates `last_activity` and drops the oldest messages when the cap
    /// is exceeded (FIFO eviction). Always succeeds.
    pub fn append(&self, session_id: &str, message: Message) {
        let mut session = self
            .sessions
            .entry(session_id.to_string())
            .or_insert_with(|| Session::new(session_id));

        session.messages.push(message);
        session.last_activity = Utc::now();

        if session.messages.len() > self.max_messages {
            let excess = session.messages.len() - self.max_messages;
            session.messages.drain(..excess);
        }
    }

    /// The up-to-`n` most recent messages, chronological order (oldest
    /// first). Empty when the session does not exist.
    pub fn recent(&self, session_id: &str, n: usize) -> Vec<Message> {
        match self.sessions.get(session_id) {
            Some(session) => {
                let messages = &session.messages;
                let start = messages.len().saturating_sub(n);
                messages[start..].to_vec()
            }
            None => Vec::new(),
        }
    }

    /// Snapshot of a full session, if it exists.
    pub fn get(&self, session_id: &str) -> Option<Session> {
        self.sessions.get(session_id).map(|s| s.clone())
    }

    /// Remove a session outright. Returns whether it existed.
    pub fn remove(&self, session_id: &str) -> bool {
        self.sessions.remove(session_id).is_some()
    }

    /// Remove every session whose `last_activity` predates `now - retention`.
    ///
    /// Returns the number of sessions evicted. Safe to call concurrently
    /// with `append`/`recent` on other sessions.
    pub fn evict_stale(&self, now: DateTime<Utc>, retention: TimeDelta) -> usize {
        let cutoff = now - retention;
        let before = self.sessions.len();
        self.sessions.retain(|_, session| session.last_activity >= cutoff);
        let evicted = before - self.sessions.len();
        if evicted > 0 {
            tracing::info!(evicted, "evicted stale sessions");
        }
        evicted
    }

    /// Number of live sessions.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
