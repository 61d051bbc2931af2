//! Messaging service operations
//!
//! Maps the operations the test bed calls onto the session store and the
//! notification dispatcher. The actual communication performed by `send` and
//! the arrival of messages fed to `deliver` are where a concrete adapter plugs
//! in its own protocol; here they are logged.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::config::ServiceIdentity;
use crate::error::{MessagingError, Result};
use crate::notify::{CallbackClient, NotificationDispatcher};
use crate::reply_to::{resolve_reply_address, CallMetadata};
use crate::session::{Session, SessionStore};
use crate::types::{
    inputs_named, Acknowledgement, AnyContent, BasicRequest, BeginTransactionRequest,
    ConfigurationKind, FinalizeRequest, InitiateRequest, InitiateResponse, ModuleDefinition,
    ModuleMetadata, ReceiveRequest, Report, SendRequest, SendResponse, TypedParameter, Usage,
    ValueEmbedding,
};

/// Name of the input carrying the message the test bed wants sent
pub const INPUT_MESSAGE: &str = "messageToSend";

/// Name of the output carrying a message received for the test bed
pub const OUTPUT_MESSAGE: &str = "messageReceived";

/// Entry point for every operation exposed to the test bed
#[derive(Debug, Clone)]
pub struct ServiceOperations {
    identity: ServiceIdentity,
    store: SessionStore,
    dispatcher: NotificationDispatcher,
}

impl ServiceOperations {
    /// Create the service with its own session store
    pub fn new(identity: ServiceIdentity, client: Arc<dyn CallbackClient>) -> Self {
        let store = SessionStore::new();
        let dispatcher = NotificationDispatcher::new(store.clone(), client);
        Self {
            identity,
            store,
            dispatcher,
        }
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    pub fn dispatcher(&self) -> &NotificationDispatcher {
        &self.dispatcher
    }

    /// Describe how the module is to be called
    ///
    /// Both parameters are optional since they apply to `send` and `receive`
    /// alike; each operation checks its own inputs.
    pub fn describe(&self) -> ModuleDefinition {
        ModuleDefinition {
            id: self.identity.id.clone(),
            metadata: ModuleMetadata {
                name: self.identity.id.clone(),
                version: self.identity.version.clone(),
            },
            inputs: vec![
                TypedParameter::new(
                    INPUT_MESSAGE,
                    "string",
                    Usage::Optional,
                    ConfigurationKind::Simple,
                    "The message to send.",
                ),
                TypedParameter::new(
                    OUTPUT_MESSAGE,
                    "string",
                    Usage::Optional,
                    ConfigurationKind::Simple,
                    "The received message.",
                ),
            ],
        }
    }

    /// Start tracking a new test session
    ///
    /// The callback address is taken from the reply-to header of the call.
    pub fn initiate(&self, metadata: &CallMetadata, _request: InitiateRequest) -> Result<InitiateResponse> {
        let reply_to = resolve_reply_address(metadata).ok_or_else(|| {
            MessagingError::invalid_argument("A callback URL must be provided")
        })?;
        let session_id = self.store.create(&reply_to)?;

        info!(
            "Initiated a new session [{}] with callback address [{}]",
            session_id, reply_to
        );
        Ok(InitiateResponse {
            session_id: session_id.0,
            configs: Vec::new(),
        })
    }

    /// Send a message on behalf of the test bed
    pub fn send(&self, request: SendRequest) -> Result<SendResponse> {
        let inputs = inputs_named(&request.input, INPUT_MESSAGE);
        let [message] = inputs.as_slice() else {
            return Err(MessagingError::invalid_argument(format!(
                "Only a single input is expected named [{}]",
                INPUT_MESSAGE
            )));
        };

        info!(
            "Received 'send' command from test bed for session [{}]. The message to send is [{}]",
            request.session_id,
            message.value.as_deref().unwrap_or_default()
        );
        Ok(SendResponse {
            report: Report::success(),
        })
    }

    pub fn receive(&self, request: ReceiveRequest) -> Acknowledgement {
        info!(
            "Received 'receive' command from test bed for session [{}]",
            request.session_id
        );
        Acknowledgement {}
    }

    pub fn begin_transaction(&self, request: BeginTransactionRequest) -> Acknowledgement {
        info!("Transaction starting for session [{}]", request.session_id);
        Acknowledgement {}
    }

    pub fn end_transaction(&self, request: BasicRequest) -> Acknowledgement {
        info!("Transaction ending for session [{}]", request.session_id);
        Acknowledgement {}
    }

    /// Release all state of a completed test session
    pub fn finalize(&self, request: FinalizeRequest) -> Acknowledgement {
        info!("Finalising session [{}]", request.session_id);
        self.store.destroy(&request.session_id);
        Acknowledgement {}
    }

    /// Hand a message received on the channel to the test bed
    ///
    /// The notification runs on its own task; the returned handle resolves
    /// once the test bed has been called.
    pub fn deliver(&self, session_id: &str, message: impl Into<String>) -> Result<JoinHandle<Result<()>>> {
        if !self.store.exists(session_id) {
            return Err(MessagingError::session_not_found(session_id));
        }

        let report = Report::success().with_context_item(AnyContent::simple(
            OUTPUT_MESSAGE,
            message,
            ValueEmbedding::String,
        ));
        let dispatcher = self.dispatcher.clone();
        let session_id = session_id.to_string();

        Ok(tokio::spawn(async move {
            let result = dispatcher.notify(&session_id, report).await;
            if let Err(e) = &result {
                error!("Delivery to test bed failed for session [{}]: {}", session_id, e);
            }
            result
        }))
    }

    /// Snapshot of the live sessions, for diagnostics
    pub fn sessions(&self) -> Vec<Session> {
        self.store.list_all()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CallbackError;
    use crate::reply_to::REPLY_TO_HEADER;
    use crate::session::keys;
    use crate::types::{NotifyForMessageRequest, TestResultType};
    use async_trait::async_trait;

    struct NoopClient;

    #[async_trait]
    impl CallbackClient for NoopClient {
        async fn notify_for_message(
            &self,
            _address: &str,
            _request: &NotifyForMessageRequest,
        ) -> std::result::Result<(), CallbackError> {
            Ok(())
        }
    }

    fn service() -> ServiceOperations {
        ServiceOperations::new(ServiceIdentity::new("echo", "2.1"), Arc::new(NoopClient))
    }

    fn message(value: &str) -> AnyContent {
        AnyContent::simple(INPUT_MESSAGE, value, ValueEmbedding::String)
    }

    #[test]
    fn test_describe_uses_identity() {
        let definition = service().describe();
        assert_eq!(definition.id, "echo");
        assert_eq!(definition.metadata.name, "echo");
        assert_eq!(definition.metadata.version, "2.1");

        let names: Vec<_> = definition.inputs.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec![INPUT_MESSAGE, OUTPUT_MESSAGE]);
        assert!(definition
            .inputs
            .iter()
            .all(|p| p.usage == Usage::Optional && p.param_type == "string"));
    }

    #[test]
    fn test_initiate_without_reply_to_fails() {
        let service = service();
        let result = service.initiate(&CallMetadata::new(), InitiateRequest::default());
        assert!(matches!(result, Err(MessagingError::InvalidArgument(_))));
        assert!(service.store().is_empty());
    }

    #[test]
    fn test_initiate_stores_normalized_callback() {
        let service = service();
        let metadata = CallMetadata::new().with_entry(REPLY_TO_HEADER, "http://tb/cb");

        let response = service.initiate(&metadata, InitiateRequest::default()).unwrap();
        assert!(response.configs.is_empty());
        assert_eq!(
            service.store().callback_address(&response.session_id).as_deref(),
            Some("http://tb/cb?wsdl")
        );
    }

    #[test]
    fn test_send_requires_exactly_one_message() {
        let service = service();

        let none = SendRequest {
            session_id: "s".to_string(),
            ..Default::default()
        };
        assert!(matches!(service.send(none), Err(MessagingError::InvalidArgument(_))));

        let two = SendRequest {
            session_id: "s".to_string(),
            input: vec![message("a"), message("b")],
            ..Default::default()
        };
        assert!(matches!(service.send(two), Err(MessagingError::InvalidArgument(_))));

        let one = SendRequest {
            session_id: "s".to_string(),
            input: vec![message("hello"), AnyContent::simple("other", "x", ValueEmbedding::String)],
            ..Default::default()
        };
        assert_eq!(service.send(one).unwrap().report.result, TestResultType::Success);
    }

    #[test]
    fn test_finalize_is_idempotent() {
        let service = service();
        let metadata = CallMetadata::new().with_entry(REPLY_TO_HEADER, "http://tb/cb");
        let id = service.initiate(&metadata, InitiateRequest::default()).unwrap().session_id;

        let request = FinalizeRequest { session_id: id.clone() };
        service.finalize(request.clone());
        service.finalize(request);
        assert_eq!(service.store().get(&id, keys::CALLBACK_URL), None);
    }

    #[tokio::test]
    async fn test_deliver_to_unknown_session_fails() {
        let service = service();
        assert!(matches!(
            service.deliver("missing", "hi"),
            Err(MessagingError::SessionNotFound(_))
        ));
    }
}
