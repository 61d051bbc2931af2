//! Values stored in a session's attribute map

use crate::types::AnyContent;

/// Tagged value kept under a session attribute key
#[derive(Debug, Clone, PartialEq)]
pub enum SessionValue {
    Text(String),
    Integer(i64),
    Bool(bool),
    Content(AnyContent),
}

impl SessionValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            SessionValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            SessionValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            SessionValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_content(&self) -> Option<&AnyContent> {
        match self {
            SessionValue::Content(c) => Some(c),
            _ => None,
        }
    }
}

impl From<String> for SessionValue {
    fn from(value: String) -> Self {
        SessionValue::Text(value)
    }
}

impl From<&str> for SessionValue {
    fn from(value: &str) -> Self {
        SessionValue::Text(value.to_string())
    }
}

impl From<i64> for SessionValue {
    fn from(value: i64) -> Self {
        SessionValue::Integer(value)
    }
}

impl From<bool> for SessionValue {
    fn from(value: bool) -> Self {
        SessionValue::Bool(value)
    }
}

impl From<AnyContent> for SessionValue {
    fn from(value: AnyContent) -> Self {
        SessionValue::Content(value)
    }
}
