//! HTTP surface of the messaging service
//!
//! Every test bed operation is a JSON endpoint under the configured base path.
//! Request headers become the call metadata from which `initiate` reads the
//! test bed's reply address.

use std::sync::Arc;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde_json::json;
use testbed_messaging_core::{MessagingError, ServiceOperations};
use tower_http::trace::TraceLayer;

pub mod handlers;
pub mod metadata;

/// Shared state handed to every handler
#[derive(Clone)]
pub struct ApiState {
    pub service: Arc<ServiceOperations>,
}

/// Build the router with all operations mounted under `base_path`
pub fn create_router(service: Arc<ServiceOperations>, base_path: &str) -> Router {
    let routes = Router::new()
        .route("/definition", get(handlers::describe))
        .route("/initiate", post(handlers::initiate))
        .route("/send", post(handlers::send))
        .route("/receive", post(handlers::receive))
        .route("/begin-transaction", post(handlers::begin_transaction))
        .route("/end-transaction", post(handlers::end_transaction))
        .route("/finalize", post(handlers::finalize))
        .route("/sessions", get(handlers::list_sessions))
        .route("/sessions/:session_id/messages", post(handlers::deliver))
        .route("/health", get(handlers::health))
        .with_state(ApiState { service });

    let base_path = base_path.trim_end_matches('/');
    let router = if base_path.is_empty() {
        routes
    } else {
        Router::new().nest(base_path, routes)
    };
    router.layer(TraceLayer::new_for_http())
}

/// Error returned from handlers
#[derive(Debug)]
pub struct ApiError(pub MessagingError);

impl From<MessagingError> for ApiError {
    fn from(err: MessagingError) -> Self {
        Self(err)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            MessagingError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            MessagingError::SessionNotFound(_) => StatusCode::NOT_FOUND,
            MessagingError::NotifyFailure { .. } => StatusCode::BAD_GATEWAY,
            MessagingError::Config(_) | MessagingError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self.0);
        } else {
            tracing::debug!("Request rejected: {}", self.0);
        }
        let body = Json(json!({
            "error": self.0.kind(),
            "message": self.0.to_string(),
        }));
        (status, body).into_response()
    }
}
