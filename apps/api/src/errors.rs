use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::screening::resolver::Role;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
///
/// Transient LLM failures (503 from the model endpoint) never appear here —
/// they are absorbed by the orchestrator's retry loop and only surface as
/// `LlmExhausted` once the attempt budget is spent.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Missing {0} input (file or text)")]
    MissingInput(Role),

    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("Failed to extract text from document '{file_name}': {reason}")]
    ExtractionFailed { file_name: String, reason: String },

    #[error("LLM API failed after {attempts} attempts: {last_error}")]
    LlmExhausted { attempts: u32, last_error: String },

    #[error("LLM error: {0}")]
    LlmFatal(String),

    #[error("LLM response violated the result schema at field '{field}'")]
    SchemaViolation { field: String },

    #[error("Screening deadline exceeded")]
    Timeout,

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::MissingInput(role) => (
                StatusCode::BAD_REQUEST,
                "MISSING_INPUT",
                format!("Missing {role} input (file or text)."),
            ),
            AppError::UnsupportedFormat(media_type) => (
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
                "UNSUPPORTED_FORMAT",
                format!("Unsupported file format: {media_type}"),
            ),
            AppError::ExtractionFailed { file_name, reason } => {
                tracing::error!("Extraction failed for '{file_name}': {reason}");
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    "EXTRACTION_FAILED",
                    "Failed to extract text from document.".to_string(),
                )
            }
            AppError::LlmExhausted {
                attempts,
                last_error,
            } => {
                tracing::error!("LLM exhausted after {attempts} attempts: {last_error}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "LLM_EXHAUSTED",
                    "Internal server error during screening process.".to_string(),
                )
            }
            AppError::LlmFatal(msg) => {
                tracing::error!("LLM error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "LLM_ERROR",
                    "Internal server error during screening process.".to_string(),
                )
            }
            AppError::SchemaViolation { field } => {
                tracing::error!("LLM response schema violation at '{field}'");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "SCHEMA_VIOLATION",
                    "Internal server error during screening process.".to_string(),
                )
            }
            AppError::Timeout => (
                StatusCode::GATEWAY_TIMEOUT,
                "TIMEOUT",
                "Screening did not complete within the allotted time.".to_string(),
            ),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        // Top-level `message` mirrors the error envelope for clients that
        // only read `{message}`.
        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            },
            "message": message
        }));

        (status, body).into_response()
    }
}
