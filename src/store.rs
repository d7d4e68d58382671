//! The session store: an ordered, newest-first collection of chat sessions,
//! an active-session pointer, and persistence on every mutation.
//!
//! There is exactly one logical writer (the UI thread), so mutations run to
//! completion synchronously and subscribers are notified inline. Storage
//! writes are best-effort: a failed write is logged and the in-memory
//! mutation stands.

use crate::history::{current_timestamp, derive_title, ChatMessage, ChatSession};
use crate::storage::KeyValueStorage;
use tracing::warn;
use uuid::Uuid;

pub const SESSIONS_KEY: &str = "chatSessions";

pub type SubscriptionId = u64;

type Subscriber = Box<dyn FnMut(&[ChatSession], Option<&str>)>;

pub struct SessionStore {
    sessions: Vec<ChatSession>,
    active_id: Option<String>,
    storage: Box<dyn KeyValueStorage>,
    subscribers: Vec<(SubscriptionId, Subscriber)>,
    next_subscription: SubscriptionId,
}

impl SessionStore {
    /// Loads the persisted collection once at construction. Absent or
    /// malformed content degrades to an empty collection.
    pub fn new(storage: Box<dyn KeyValueStorage>) -> Self {
        let sessions = if storage.is_available() {
            match storage.read(SESSIONS_KEY) {
                Some(raw) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                    warn!(error = %e, "Discarding malformed session data");
                    Vec::new()
                }),
                None => Vec::new(),
            }
        } else {
            Vec::new()
        };

        Self {
            sessions,
            active_id: None,
            storage,
            subscribers: Vec::new(),
            next_subscription: 0,
        }
    }

    /// Creates an empty session at the front of the collection, makes it
    /// active, and returns its id.
    pub fn create_session(&mut self) -> String {
        let session_id = Uuid::new_v4().to_string();
        self.sessions.insert(0, ChatSession::new(session_id.clone()));
        self.active_id = Some(session_id.clone());
        self.persist();
        self.notify();
        session_id
    }

    /// Replaces a session's transcript, re-deriving its title and refreshing
    /// its timestamp. A hit keeps the session's position; a miss inserts a
    /// new session at the front. No-op on an empty id or empty transcript,
    /// so placeholder sessions are never persisted.
    pub fn update_session(&mut self, session_id: &str, messages: Vec<ChatMessage>) {
        if session_id.is_empty() || messages.is_empty() {
            return;
        }

        let title = derive_title(&messages);
        match self.sessions.iter_mut().find(|s| s.id == session_id) {
            Some(session) => {
                session.title = title;
                session.messages = messages;
                session.timestamp = current_timestamp();
            }
            None => {
                self.sessions.insert(
                    0,
                    ChatSession {
                        id: session_id.to_string(),
                        title,
                        messages,
                        timestamp: current_timestamp(),
                    },
                );
            }
        }
        self.persist();
        self.notify();
    }

    /// Returns the session the active pointer resolves to, or `None` when the
    /// pointer is unset or stale. The pointer itself is never auto-cleared.
    pub fn get_active_session(&self) -> Option<ChatSession> {
        let session_id = self.active_id.as_deref()?;
        self.sessions.iter().find(|s| s.id == session_id).cloned()
    }

    /// Repoints the active pointer at an existing session. Returns false and
    /// leaves the pointer unchanged when the id does not resolve.
    pub fn select_session(&mut self, session_id: &str) -> bool {
        if !self.sessions.iter().any(|s| s.id == session_id) {
            return false;
        }
        self.active_id = Some(session_id.to_string());
        self.notify();
        true
    }

    pub fn active_session_id(&self) -> Option<&str> {
        self.active_id.as_deref()
    }

    /// Snapshot of the collection, newest-first.
    pub fn sessions(&self) -> Vec<ChatSession> {
        self.sessions.clone()
    }

    /// Registers a callback invoked synchronously after every mutation with
    /// the collection and the active pointer.
    pub fn subscribe(
        &mut self,
        callback: impl FnMut(&[ChatSession], Option<&str>) + 'static,
    ) -> SubscriptionId {
        let id = self.next_subscription;
        self.next_subscription += 1;
        self.subscribers.push((id, Box::new(callback)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) {
        self.subscribers.retain(|(sub_id, _)| *sub_id != id);
    }

    fn persist(&mut self) {
        if !self.storage.is_available() {
            return;
        }
        match serde_json::to_string(&self.sessions) {
            Ok(raw) => {
                if let Err(e) = self.storage.write(SESSIONS_KEY, &raw) {
                    warn!(error = %e, "Failed to persist sessions");
                }
            }
            Err(e) => warn!(error = %e, "Failed to serialize sessions"),
        }
    }

    fn notify(&mut self) {
        for (_, callback) in &mut self.subscribers {
            callback(&self.sessions, self.active_id.as_deref());
        }
    }
}
