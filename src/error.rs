// src/error.rs
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::services::completion::CompletionError;

pub const UPSTREAM_USER_MESSAGE: &str =
    "Sorry, the AI service is currently unavailable. Please try again later.";
pub const TIMEOUT_USER_MESSAGE: &str =
    "The AI service took too long to respond. Please try again.";

#[derive(Debug, Error)]
pub enum AppError {
    /// Bad client input. The message is safe to show the caller.
    #[error("{0}")]
    Validation(String),
    /// The completion provider failed. The cause is for operator logs only.
    #[error("upstream completion failure")]
    Upstream(#[source] CompletionError),
    #[error("upstream completion timed out")]
    Timeout,
}

impl From<CompletionError> for AppError {
    fn from(err: CompletionError) -> Self {
        match err {
            CompletionError::Timeout => AppError::Timeout,
            other => AppError::Upstream(other),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, user_message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Upstream(cause) => {
                error!(cause = %cause, "completion request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    UPSTREAM_USER_MESSAGE.to_string(),
                )
            }
            AppError::Timeout => {
                error!("completion request timed out");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    TIMEOUT_USER_MESSAGE.to_string(),
                )
            }
        };

        (status, Json(json!({ "error": user_message }))).into_response()
    }
}
