//! Notifications towards the test bed
//!
//! Results that are not returned inline (for example a message that arrives on
//! the simulated channel later on) are pushed to the test bed through its
//! callback service. The transport is abstracted behind [`CallbackClient`].

use async_trait::async_trait;

use crate::error::CallbackError;
use crate::types::NotifyForMessageRequest;

pub mod dispatcher;

pub use dispatcher::NotificationDispatcher;

/// Outbound call to a test bed callback service
///
/// `address` is the session's stored callback address. Implementations must
/// resolve it on every call rather than keep a connection bound to it.
#[async_trait]
pub trait CallbackClient: Send + Sync {
    async fn notify_for_message(
        &self,
        address: &str,
        request: &NotifyForMessageRequest,
    ) -> Result<(), CallbackError>;
}
