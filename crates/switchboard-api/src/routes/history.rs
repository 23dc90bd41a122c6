use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};

use super::threads::ThreadResponse;
use crate::{
    error::{ApiError, ApiResult},
    state::AppState,
};

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct HistoryQuery {
    /// User whose threads to return
    pub user_id: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ChatHistoryResponse {
    pub user_id: String,
    /// Threads keyed by thread name
    pub threads: BTreeMap<String, ThreadResponse>,
}

/// Get every thread of a user with its conversation
#[utoipa::path(
    get,
    path = "/chat_history",
    params(HistoryQuery),
    responses(
        (status = 200, description = "Threads keyed by name", body = ChatHistoryResponse),
        (status = 400, description = "Missing or blank user_id", body = crate::error::ErrorResponse)
    ),
    tag = "chat"
)]
pub async fn chat_history(
    State(state): State<Arc<AppState>>,
    query: Result<Query<HistoryQuery>, QueryRejection>,
) -> ApiResult<Json<ChatHistoryResponse>> {
    let Query(query) = query.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    let history = state.agent.history(&query.user_id).await?;
    tracing::info!(user_id = %query.user_id, threads = history.len(), "Retrieved chat history");

    Ok(Json(ChatHistoryResponse {
        user_id: query.user_id,
        threads: history
            .into_iter()
            .map(|(name, thread)| (name, thread.into()))
            .collect(),
    }))
}
