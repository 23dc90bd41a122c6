use axum::Json;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RootResponse {
    pub message: String,
    pub endpoints: BTreeMap<String, String>,
}

/// Service name and endpoint index
#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Endpoint index", body = RootResponse)
    ),
    tag = "health"
)]
pub async fn root() -> Json<RootResponse> {
    let endpoints = [
        ("/chat", "POST - Send a message to the chatbot"),
        ("/chat_history", "GET - Get chat history for a user"),
        ("/threads/{thread_id}", "GET - Get one thread with its messages"),
        ("/health", "GET - Health check"),
        ("/api-docs/openapi.json", "GET - OpenAPI document"),
    ]
    .into_iter()
    .map(|(path, what)| (path.to_string(), what.to_string()))
    .collect();

    Json(RootResponse {
        message: "Persona-Switching Chat API".to_string(),
        endpoints,
    })
}
