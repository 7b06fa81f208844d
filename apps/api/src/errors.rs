#![allow(dead_code)]

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;

use crate::orchestration::OrchestrationError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("No file: {0}")]
    NoFile(String),

    #[error("Unsupported type: {0}")]
    UnsupportedType(String),

    /// Every applicable adapter failed; `details` lists each attempt.
    #[error("Parse failed: {message}")]
    ParseFailed { message: String, details: Value },

    #[error("Adapter error: {0}")]
    Adapter(String),

    /// Reserved for an OCR adapter; nothing produces it yet.
    #[error("OCR failed: {0}")]
    OcrFailed(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn code(&self) -> &'static str {
        match self {
            AppError::NoFile(_) => "NO_FILE",
            AppError::UnsupportedType(_) => "UNSUPPORTED_TYPE",
            AppError::ParseFailed { .. } => "PARSE_FAILED",
            AppError::Adapter(_) => "ADAPTER_ERROR",
            AppError::OcrFailed(_) => "OCR_FAILED",
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NoFile(_) | AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::UnsupportedType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            AppError::ParseFailed { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::OcrFailed(_) => StatusCode::NOT_IMPLEMENTED,
            AppError::Adapter(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<OrchestrationError> for AppError {
    fn from(e: OrchestrationError) -> Self {
        match e {
            OrchestrationError::EmptyDocument => AppError::NoFile(e.to_string()),
            OrchestrationError::UnsupportedType { .. } => AppError::UnsupportedType(e.to_string()),
            OrchestrationError::UnknownAdapter(_) => AppError::Validation(e.to_string()),
            OrchestrationError::AdapterFault { .. } => AppError::Adapter(e.to_string()),
            OrchestrationError::ParseFailed { ref attempts } => AppError::ParseFailed {
                message: e.to_string(),
                details: json!({ "attempts": attempts }),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let code = self.code();

        let (message, details) = match self {
            AppError::ParseFailed { message, details } => (message, Some(details)),
            AppError::Adapter(msg) => {
                tracing::error!("Adapter error: {msg}");
                (msg, None)
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                ("An internal server error occurred".to_string(), None)
            }
            AppError::NoFile(msg)
            | AppError::UnsupportedType(msg)
            | AppError::OcrFailed(msg)
            | AppError::Validation(msg) => (msg, None),
        };

        let mut error = json!({
            "code": code,
            "message": message
        });
        if let Some(details) = details {
            error["details"] = details;
        }

        let body = Json(json!({
            "success": false,
            "error": error
        }));

        (status, body).into_response()
    }
}
