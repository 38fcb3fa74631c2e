//! Session Management
//!
//! Per-session conversation memory. A session is created lazily the first
//! time its id is referenced and lives until the store is dropped; there is
//! no eviction, size bound or persistence.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::message::{Conversation, Message, Role};

/// Opaque session identifier
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(String);

impl SessionId {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for SessionId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// One conversation's memory: an append-only list of prior turns
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Session {
    /// Unique identifier
    pub id: SessionId,

    /// Prior user and assistant messages, oldest first
    history: Conversation,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last activity timestamp
    pub updated_at: DateTime<Utc>,
}

impl Session {
    pub fn new(id: SessionId) -> Self {
        let now = Utc::now();
        Self {
            id,
            history: Conversation::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Append a message to the history
    pub fn push(&mut self, message: Message) {
        self.history.push(message);
        self.updated_at = Utc::now();
    }

    /// Record a completed exchange
    pub fn append_turn(&mut self, user: impl Into<String>, assistant: impl Into<String>) {
        self.push(Message::user(user));
        self.push(Message::assistant(assistant));
    }

    /// Prior messages, oldest first
    pub fn messages(&self) -> &[Message] {
        self.history.messages()
    }

    /// Number of user turns recorded
    pub fn turn_count(&self) -> usize {
        self.messages().iter().filter(|m| m.role == Role::User).count()
    }

    pub fn message_count(&self) -> usize {
        self.history.len()
    }
}

/// Mapping from session id to session memory.
///
/// Passed by mutable reference to whoever drives the conversation; access
/// is single-threaded.
pub trait SessionStore {
    /// Get the session, creating an empty one on first reference
    fn get_or_create(&mut self, id: &SessionId) -> &mut Session;

    /// Look up a session without creating it
    fn get(&self, id: &SessionId) -> Option<&Session>;

    /// Append a message to a session, creating it if needed
    fn append(&mut self, id: &SessionId, message: Message) {
        self.get_or_create(id).push(message);
    }

    /// Snapshot of a session's history (empty for unknown sessions)
    fn history(&self, id: &SessionId) -> Vec<Message> {
        self.get(id).map(|s| s.messages().to_vec()).unwrap_or_default()
    }
}

/// In-memory session store
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    sessions: HashMap<SessionId, Session>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

impl SessionStore for MemorySessionStore {
    fn get_or_create(&mut self, id: &SessionId) -> &mut Session {
        self.sessions.entry(id.clone()).or_insert_with(|| {
            tracing::debug!(session = %id, "Creating session");
            Session::new(id.clone())
        })
    }

    fn get(&self, id: &SessionId) -> Option<&Session> {
        self.sessions.get(id)
    }
}
