//! HTTP client for test bed callbacks

use std::time::Duration;

use async_trait::async_trait;
use testbed_messaging_core::reply_to::service_endpoint;
use testbed_messaging_core::{
    CallbackClient, CallbackError, MessagingError, NotifyForMessageRequest, Result,
};
use tracing::debug;

use crate::config::CallbackConfig;

pub mod proxy;

pub use proxy::ProxySettings;

/// Posts notifications as JSON to the callback service of each session
///
/// Connections are not kept idle between calls; each notification resolves
/// the session's address again.
#[derive(Debug, Clone)]
pub struct HttpCallbackClient {
    client: reqwest::Client,
}

impl HttpCallbackClient {
    /// Redirects are followed up to 10 hops. reqwest resends the POST on 307/308
    /// but turns it into a body-less GET on 301/302/303, so a test bed must use
    /// 307/308 to move its callback endpoint.
    pub fn new(config: &CallbackConfig, proxy: Option<&ProxySettings>) -> Result<Self> {
        let mut builder = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .pool_max_idle_per_host(0)
            .redirect(reqwest::redirect::Policy::limited(10));

        builder = match proxy {
            Some(proxy) => {
                debug!("Routing test bed callbacks through proxy {}", proxy.proxy_url());
                builder.proxy(proxy.to_reqwest()?)
            }
            None => builder.no_proxy(),
        };

        let client = builder
            .build()
            .map_err(|e| MessagingError::config(format!("Failed to build callback client: {}", e)))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl CallbackClient for HttpCallbackClient {
    async fn notify_for_message(
        &self,
        address: &str,
        request: &NotifyForMessageRequest,
    ) -> std::result::Result<(), CallbackError> {
        let endpoint = url::Url::parse(service_endpoint(address))
            .map_err(|e| CallbackError::invalid_address(format!("{}: {}", address, e)))?;

        debug!("Calling test bed at {} for session {}", endpoint, request.session_id);
        let response = self
            .client
            .post(endpoint)
            .json(request)
            .send()
            .await
            .map_err(|e| CallbackError::transport(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(CallbackError::Status {
                status: status.as_u16(),
                body,
            })
        }
    }
}
