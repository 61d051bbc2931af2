//! Session tracking
//!
//! A session is the correlation context of one test session running in the
//! test bed. It is created by `initiate`, carries the address on which the
//! test bed is called back, and disappears on `finalize`. Presence in the
//! [`SessionStore`] is the only lifecycle signal.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod store;
pub mod value;

pub use store::SessionStore;
pub use value::SessionValue;

/// Well-known attribute keys
pub mod keys {
    /// The URL on which the test bed is to be called back
    pub const CALLBACK_URL: &str = "callbackURL";
}

/// Opaque session identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(pub String);

impl SessionId {
    /// Generate a fresh random identifier
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Borrow<str> for SessionId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SessionId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for SessionId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// State kept for one live session
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    id: SessionId,
    callback_address: String,
    attributes: HashMap<String, SessionValue>,
}

impl Session {
    pub(crate) fn new(id: SessionId, callback_address: String) -> Self {
        Self {
            id,
            callback_address,
            attributes: HashMap::new(),
        }
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    /// Address the test bed asked to be called back on
    pub fn callback_address(&self) -> &str {
        &self.callback_address
    }

    pub fn attributes(&self) -> &HashMap<String, SessionValue> {
        &self.attributes
    }

    /// Look up an attribute; the callback address is exposed under [`keys::CALLBACK_URL`]
    pub fn attribute(&self, key: &str) -> Option<SessionValue> {
        if key == keys::CALLBACK_URL {
            return Some(SessionValue::Text(self.callback_address.clone()));
        }
        self.attributes.get(key).cloned()
    }

    pub(crate) fn set_attribute(&mut self, key: String, value: SessionValue) {
        self.attributes.insert(key, value);
    }
}
