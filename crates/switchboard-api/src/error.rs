use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use switchboard_agent::{ChatError, ErrorCategory};
use thiserror::Error;
use utoipa::ToSchema;

/// Body of every error response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    /// Coarse category, e.g. `invalid_input` or `storage`
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Chat(#[from] ChatError),

    #[error("Invalid request: {0}")]
    BadRequest(String),
}

impl ApiError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ApiError::Chat(e) => e.category(),
            ApiError::BadRequest(_) => ErrorCategory::InvalidInput,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self.category() {
            ErrorCategory::InvalidInput => StatusCode::BAD_REQUEST,
            ErrorCategory::NotFound => StatusCode::NOT_FOUND,
            ErrorCategory::Storage | ErrorCategory::Generation | ErrorCategory::Configuration => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let category = self.category();
        let status = self.status();

        // Server-side detail stays in the logs
        let message = match category {
            ErrorCategory::InvalidInput | ErrorCategory::NotFound => {
                tracing::warn!(category = %category, "Client error: {}", self);
                self.to_string()
            }
            ErrorCategory::Storage => {
                tracing::error!("Storage error: {}", self);
                "Storage error".to_string()
            }
            ErrorCategory::Generation => {
                tracing::error!("Generation error: {}", self);
                "Error processing with LLM".to_string()
            }
            ErrorCategory::Configuration => {
                tracing::error!("Configuration error: {}", self);
                "Configuration error".to_string()
            }
        };

        let body = Json(ErrorResponse {
            error: message,
            kind: category.as_str().to_string(),
        });

        (status, body).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
