use axum::{
    extract::{Path, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use switchboard_types::{HistoryMessage, ThreadHistory};
use utoipa::ToSchema;

use crate::{error::ApiResult, state::AppState};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    /// `user` or `assistant`
    pub role: String,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl From<HistoryMessage> for MessageResponse {
    fn from(msg: HistoryMessage) -> Self {
        Self {
            role: msg.role.to_string(),
            content: msg.content,
            timestamp: msg.timestamp,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ThreadResponse {
    pub thread_id: String,
    pub thread_name: String,
    pub persona_prompt: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub messages: Vec<MessageResponse>,
}

impl From<ThreadHistory> for ThreadResponse {
    fn from(thread: ThreadHistory) -> Self {
        Self {
            thread_id: thread.thread_id,
            thread_name: thread.thread_name,
            persona_prompt: thread.persona_prompt,
            created_at: thread.created_at,
            updated_at: thread.updated_at,
            messages: thread.messages.into_iter().map(MessageResponse::from).collect(),
        }
    }
}

/// Get a specific thread by ID
#[utoipa::path(
    get,
    path = "/threads/{thread_id}",
    params(
        ("thread_id" = String, Path, description = "Thread ID")
    ),
    responses(
        (status = 200, description = "Thread with its messages", body = ThreadResponse),
        (status = 404, description = "Thread not found", body = crate::error::ErrorResponse)
    ),
    tag = "threads"
)]
pub async fn get_thread(
    State(state): State<Arc<AppState>>,
    Path(thread_id): Path<String>,
) -> ApiResult<Json<ThreadResponse>> {
    let thread = state.agent.thread(&thread_id).await?;
    Ok(Json(thread.into()))
}
