//! In-memory session store
//!
//! The store is the only shared mutable state of the adapter. Every method is
//! atomic on its own; nothing is ordered across different session ids.

use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use super::{keys, Session, SessionId, SessionValue};
use crate::error::{MessagingError, Result};

/// Concurrent map of live sessions
///
/// Cloning the store yields another handle onto the same sessions.
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    sessions: Arc<DashMap<SessionId, Session>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self {
            sessions: Arc::new(DashMap::new()),
        }
    }

    /// Create a session for the given callback address and return its id
    pub fn create(&self, callback_address: &str) -> Result<SessionId> {
        let callback_address = callback_address.trim();
        if callback_address.is_empty() {
            return Err(MessagingError::invalid_argument("A callback URL must be provided"));
        }

        loop {
            let session_id = SessionId::new();
            if let Entry::Vacant(entry) = self.sessions.entry(session_id.clone()) {
                entry.insert(Session::new(session_id.clone(), callback_address.to_string()));
                tracing::debug!("Created session {} with callback {}", session_id, callback_address);
                return Ok(session_id);
            }
        }
    }

    /// Remove a session; returns whether it was present
    pub fn destroy(&self, session_id: &str) -> bool {
        let removed = self.sessions.remove(session_id).is_some();
        if removed {
            tracing::debug!("Destroyed session {}", session_id);
        }
        removed
    }

    /// Read an attribute of a session
    ///
    /// Unknown sessions and unset keys both yield `None`.
    pub fn get(&self, session_id: &str, key: &str) -> Option<SessionValue> {
        self.sessions
            .get(session_id)
            .and_then(|session| session.attribute(key))
    }

    /// Set an attribute of a live session
    pub fn set(&self, session_id: &str, key: impl Into<String>, value: impl Into<SessionValue>) -> Result<()> {
        let key = key.into();
        if key == keys::CALLBACK_URL {
            return Err(MessagingError::invalid_argument(format!(
                "Attribute [{}] is fixed at session creation",
                keys::CALLBACK_URL
            )));
        }

        match self.sessions.get_mut(session_id) {
            Some(mut session) => {
                session.set_attribute(key, value.into());
                Ok(())
            }
            None => Err(MessagingError::session_not_found(session_id)),
        }
    }

    /// Callback address of a session, if the session exists
    pub fn callback_address(&self, session_id: &str) -> Option<String> {
        self.get(session_id, keys::CALLBACK_URL)
            .and_then(|value| value.as_text().map(str::to_string))
    }

    pub fn exists(&self, session_id: &str) -> bool {
        self.sessions.contains_key(session_id)
    }

    /// Point-in-time copy of all sessions
    pub fn list_all(&self) -> Vec<Session> {
        self.sessions
            .iter()
            .map(|entry| entry.value().clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
