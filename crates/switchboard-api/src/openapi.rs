use axum::Json;
use utoipa::OpenApi;

use crate::error::ErrorResponse;
use crate::routes::{chat, health, history, root, threads};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Switchboard API",
        description = "Chat backend that keeps one thread per persona and routes each message to the right one"
    ),
    paths(
        chat::chat,
        history::chat_history,
        threads::get_thread,
        health::health_check,
        root::root,
    ),
    components(schemas(
        chat::ChatRequest,
        chat::ChatResponse,
        history::ChatHistoryResponse,
        threads::ThreadResponse,
        threads::MessageResponse,
        health::HealthResponse,
        root::RootResponse,
        ErrorResponse,
    )),
    tags(
        (name = "chat", description = "Chat turns and history"),
        (name = "threads", description = "Thread lookup"),
        (name = "health", description = "Liveness and service index")
    )
)]
pub struct ApiDoc;

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
