use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use crate::{
    error::{ApiError, ApiResult},
    state::AppState,
};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ChatRequest {
    pub user_id: String,
    pub message: String,
    /// Route straight to this thread instead of inferring one from the message
    #[serde(default)]
    pub thread_name: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ChatResponse {
    pub response: String,
    pub thread_name: String,
    pub thread_id: String,
}

/// Send a message
///
/// The message is routed to an explicitly named thread, to a persona thread
/// inferred from the text ("act like my mentor"), or to the user's most
/// recently active thread.
#[utoipa::path(
    post,
    path = "/chat",
    request_body = ChatRequest,
    responses(
        (status = 200, description = "Assistant reply", body = ChatResponse),
        (status = 400, description = "Blank user_id or message", body = crate::error::ErrorResponse),
        (status = 500, description = "Storage or generation failure", body = crate::error::ErrorResponse)
    ),
    tag = "chat"
)]
pub async fn chat(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> ApiResult<Json<ChatResponse>> {
    let Json(req) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    tracing::info!(user_id = %req.user_id, "Processing chat request");

    let turn = state
        .agent
        .chat(&req.user_id, &req.message, req.thread_name.as_deref())
        .await?;

    Ok(Json(ChatResponse {
        response: turn.response,
        thread_name: turn.thread_name,
        thread_id: turn.thread_id,
    }))
}
