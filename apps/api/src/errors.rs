use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::llm_client::LlmError;

/// Application-level error type covering every stage of the scoring pipeline.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
///
/// Every per-request failure collapses into the same 500 response with a
/// `detail` message; the variants exist for logging and for callers inside
/// the pipeline, not for distinct status codes.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unsupported upload: {0}")]
    UnsupportedUpload(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PDF extraction error: {0}")]
    Extraction(String),

    #[error("Job page fetch error: {0}")]
    Fetch(String),

    #[error("Job structuring error: {0}")]
    Structuring(String),

    #[error("Rating error: {0}")]
    Rating(String),

    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            AppError::Validation(msg) => tracing::warn!("Validation failure: {msg}"),
            AppError::UnsupportedUpload(msg) => tracing::warn!("Unsupported upload: {msg}"),
            AppError::Io(e) => tracing::error!("I/O failure: {e}"),
            AppError::Extraction(msg) => tracing::error!("PDF extraction failure: {msg}"),
            AppError::Fetch(msg) => tracing::error!("Job page fetch failure: {msg}"),
            AppError::Structuring(msg) => tracing::error!("Job structuring failure: {msg}"),
            AppError::Rating(msg) => tracing::error!("Rating failure: {msg}"),
            AppError::Llm(e) => tracing::error!("LLM failure: {e}"),
            AppError::Internal(e) => tracing::error!("Internal failure: {e:?}"),
        }

        let body = Json(json!({
            "detail": format!("Resume scoring failed: {self}")
        }));

        (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
    }
}
