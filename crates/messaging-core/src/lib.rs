//! # Testbed Messaging Core
//!
//! Session lifecycle and callback notification for messaging adapters driven
//! by an external test bed.
//!
//! The test bed calls the adapter synchronously (`initiate`, `send`, `receive`,
//! `beginTransaction`, `endTransaction`, `finalize`) and expects results that
//! become available later to be pushed back to it through a callback service
//! whose address it supplies when a test session starts.
//!
//! This crate provides:
//! - [`SessionStore`]: concurrent map of live sessions and their attributes
//! - [`reply_to`]: extraction of the callback address from call metadata
//! - [`NotificationDispatcher`]: report delivery with failure reporting
//! - [`ServiceOperations`]: the operations exposed to the test bed
//!
//! The outbound transport is supplied by the embedding application through
//! the [`CallbackClient`] trait.

pub mod config;
pub mod error;
pub mod notify;
pub mod reply_to;
pub mod service;
pub mod session;
pub mod types;

pub use config::ServiceIdentity;
pub use error::{CallbackError, MessagingError, Result};
pub use notify::{CallbackClient, NotificationDispatcher};
pub use reply_to::{resolve_reply_address, CallMetadata, MetadataEntry, REPLY_TO_HEADER};
pub use service::{ServiceOperations, INPUT_MESSAGE, OUTPUT_MESSAGE};
pub use session::{keys, Session, SessionId, SessionStore, SessionValue};
pub use types::{AnyContent, NotifyForMessageRequest, Report, TestResultType, ValueEmbedding};
