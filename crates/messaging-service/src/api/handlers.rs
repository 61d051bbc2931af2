//! Request handlers

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::Json,
};
use serde::{Deserialize, Serialize};
use testbed_messaging_core::types::{
    Acknowledgement, BasicRequest, BeginTransactionRequest, FinalizeRequest, InitiateRequest,
    InitiateResponse, ModuleDefinition, ReceiveRequest, SendRequest, SendResponse,
};

use super::{metadata::call_metadata, ApiError, ApiState};

pub async fn describe(State(state): State<ApiState>) -> Json<ModuleDefinition> {
    Json(state.service.describe())
}

pub async fn initiate(
    State(state): State<ApiState>,
    headers: HeaderMap,
    Json(request): Json<InitiateRequest>,
) -> Result<Json<InitiateResponse>, ApiError> {
    let metadata = call_metadata(&headers);
    Ok(Json(state.service.initiate(&metadata, request)?))
}

pub async fn send(
    State(state): State<ApiState>,
    Json(request): Json<SendRequest>,
) -> Result<Json<SendResponse>, ApiError> {
    Ok(Json(state.service.send(request)?))
}

pub async fn receive(
    State(state): State<ApiState>,
    Json(request): Json<ReceiveRequest>,
) -> Json<Acknowledgement> {
    Json(state.service.receive(request))
}

pub async fn begin_transaction(
    State(state): State<ApiState>,
    Json(request): Json<BeginTransactionRequest>,
) -> Json<Acknowledgement> {
    Json(state.service.begin_transaction(request))
}

pub async fn end_transaction(
    State(state): State<ApiState>,
    Json(request): Json<BasicRequest>,
) -> Json<Acknowledgement> {
    Json(state.service.end_transaction(request))
}

pub async fn finalize(
    State(state): State<ApiState>,
    Json(request): Json<FinalizeRequest>,
) -> Json<Acknowledgement> {
    Json(state.service.finalize(request))
}

/// Message that arrived on the simulated channel
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InboundMessage {
    pub message: String,
}

/// Accept a message for a session; the test bed is notified in the background
pub async fn deliver(
    State(state): State<ApiState>,
    Path(session_id): Path<String>,
    Json(inbound): Json<InboundMessage>,
) -> Result<(StatusCode, Json<Acknowledgement>), ApiError> {
    // The notification task outlives the request; its failures are logged by the service.
    let _ = state.service.deliver(&session_id, inbound.message)?;
    Ok((StatusCode::ACCEPTED, Json(Acknowledgement {})))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    pub session_id: String,
    pub callback_address: String,
    pub attributes: usize,
}

pub async fn list_sessions(State(state): State<ApiState>) -> Json<Vec<SessionSummary>> {
    let mut sessions: Vec<SessionSummary> = state
        .service
        .sessions()
        .into_iter()
        .map(|session| SessionSummary {
            session_id: session.id().to_string(),
            callback_address: session.callback_address().to_string(),
            attributes: session.attributes().len(),
        })
        .collect();
    sessions.sort_by(|a, b| a.session_id.cmp(&b.session_id));
    Json(sessions)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Health {
    pub status: String,
    pub sessions: usize,
}

pub async fn health(State(state): State<ApiState>) -> Json<Health> {
    Json(Health {
        status: "ok".to_string(),
        sessions: state.service.store().len(),
    })
}
