//! Error types for the messaging core

use thiserror::Error;

/// Failure of a single outbound call to a test bed callback endpoint
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CallbackError {
    /// The call never produced a response (connect, DNS, timeout, proxy)
    #[error("Transport error: {0}")]
    Transport(String),

    /// The endpoint answered with a non-success status
    #[error("Callback endpoint returned status {status}: {body}")]
    Status { status: u16, body: String },

    /// The stored address cannot be turned into a request target
    #[error("Invalid callback address: {0}")]
    InvalidAddress(String),
}

impl CallbackError {
    pub fn transport<S: Into<String>>(msg: S) -> Self {
        Self::Transport(msg.into())
    }

    pub fn invalid_address<S: Into<String>>(msg: S) -> Self {
        Self::InvalidAddress(msg.into())
    }
}

/// Messaging adapter errors
#[derive(Error, Debug)]
pub enum MessagingError {
    /// Caller-supplied data violates an operation contract
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Mutation attempted against a session that is not (or no longer) tracked
    #[error("Session not found: {0}")]
    SessionNotFound(String),

    /// The primary notification to the test bed failed
    #[error("Failed to notify test bed for session {session_id}: {source}")]
    NotifyFailure {
        session_id: String,
        #[source]
        source: CallbackError,
    },

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl MessagingError {
    /// Create a new InvalidArgument error
    pub fn invalid_argument<S: Into<String>>(msg: S) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Create a new SessionNotFound error
    pub fn session_not_found<S: Into<String>>(session_id: S) -> Self {
        Self::SessionNotFound(session_id.into())
    }

    /// Create a new NotifyFailure error
    pub fn notify_failure<S: Into<String>>(session_id: S, source: CallbackError) -> Self {
        Self::NotifyFailure {
            session_id: session_id.into(),
            source,
        }
    }

    /// Create a new Config error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new Internal error
    pub fn internal<S: Into<String>>(msg: S) -> Self {
        Self::Internal(msg.into())
    }

    /// Short machine-readable name of the error kind
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidArgument(_) => "InvalidArgument",
            Self::SessionNotFound(_) => "SessionNotFound",
            Self::NotifyFailure { .. } => "NotifyFailure",
            Self::Config(_) => "Config",
            Self::Internal(_) => "Internal",
        }
    }
}

/// Result type for messaging operations
pub type Result<T> = std::result::Result<T, MessagingError>;
