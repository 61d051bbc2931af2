//! # Testbed Messaging Service
//!
//! Runnable HTTP service around the messaging core:
//! - configuration loading ([`config`])
//! - logging setup ([`logging`])
//! - the JSON endpoints called by the test bed ([`api`])
//! - the outbound callback client and proxy ([`callback`])

use std::sync::Arc;

use testbed_messaging_core::{Result, ServiceOperations};

pub mod api;
pub mod callback;
pub mod config;
pub mod logging;

pub use api::create_router;
pub use callback::{HttpCallbackClient, ProxySettings};
pub use config::AppConfig;

/// Wire the service operations to an HTTP callback client built from `config`
pub fn build_service(config: &AppConfig) -> Result<Arc<ServiceOperations>> {
    let proxy = ProxySettings::from_config(&config.proxy)?;
    let client = HttpCallbackClient::new(&config.callback, proxy.as_ref())?;
    Ok(Arc::new(ServiceOperations::new(
        config.service.clone(),
        Arc::new(client),
    )))
}
