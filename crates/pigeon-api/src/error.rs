use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

use pigeon_db::{StoreError, ValidationError};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error(
        "Value provided for since_days_ago could not be processed. \
         Provide a whole number from 0 to 30, e.g. '?since_days_ago=10'"
    )]
    InvalidSinceDaysAgo,

    #[error("{}", .0.body_text())]
    InvalidBody(#[from] JsonRejection),

    #[error("store failure: {0}")]
    Store(#[from] StoreError),

    #[error("blocking task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

impl From<pigeon_db::Error> for ApiError {
    fn from(e: pigeon_db::Error) -> Self {
        match e {
            pigeon_db::Error::Validation(v) => ApiError::Validation(v),
            pigeon_db::Error::Store(s) => ApiError::Store(s),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Validation(_) | ApiError::InvalidSinceDaysAgo => StatusCode::BAD_REQUEST,
            // 400, 415 or 422 depending on what was wrong with the body
            ApiError::InvalidBody(rejection) => rejection.status(),
            ApiError::Store(_) | ApiError::Join(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        // Server-side detail stays in the logs
        let message = if status.is_server_error() {
            error!("Request failed: {}", self);
            "Internal server error".to_string()
        } else {
            self.to_string()
        };

        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}
