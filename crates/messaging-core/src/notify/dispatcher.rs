//! Delivery of reports to a session's callback address

use std::sync::Arc;

use tracing::{info, warn};

use super::CallbackClient;
use crate::error::{MessagingError, Result};
use crate::session::SessionStore;
use crate::types::{NotifyForMessageRequest, Report};

/// Sends reports to the test bed on behalf of a session
#[derive(Clone)]
pub struct NotificationDispatcher {
    store: SessionStore,
    client: Arc<dyn CallbackClient>,
}

impl NotificationDispatcher {
    pub fn new(store: SessionStore, client: Arc<dyn CallbackClient>) -> Self {
        Self { store, client }
    }

    /// Notify the test bed of `report` for the given session
    ///
    /// A session without a callback address is logged and skipped. When the
    /// call fails, a FAILURE report is sent to the same address on a
    /// best-effort basis and the original cause is returned.
    pub async fn notify(&self, session_id: &str, report: Report) -> Result<()> {
        let Some(callback) = self.store.callback_address(session_id) else {
            warn!("Could not find callback URL for session [{}]", session_id);
            return Ok(());
        };

        info!("Notifying test bed for session [{}]", session_id);
        let request = NotifyForMessageRequest {
            session_id: session_id.to_string(),
            report,
        };

        let cause = match self.client.notify_for_message(&callback, &request).await {
            Ok(()) => return Ok(()),
            Err(e) => e,
        };
        warn!("Error while notifying test bed for session [{}]: {}", session_id, cause);

        let failure = NotifyForMessageRequest {
            session_id: session_id.to_string(),
            report: Report::failure(),
        };
        if let Err(e) = self.client.notify_for_message(&callback, &failure).await {
            warn!(
                "Could not report notification failure to test bed for session [{}]: {}",
                session_id, e
            );
        }

        Err(MessagingError::notify_failure(session_id, cause))
    }
}

impl std::fmt::Debug for NotificationDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationDispatcher")
            .field("sessions", &self.store.len())
            .finish()
    }
}
