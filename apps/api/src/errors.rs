use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Unsupported file type")]
    UnsupportedFileType,

    #[error("Could not extract text from the uploaded file.")]
    EmptyText,

    #[error("Prediction failed: {0}")]
    PredictionFailed(String),

    #[error("Uploaded file is larger than {limit} bytes")]
    PayloadTooLarge { limit: usize },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::UnsupportedFileType | AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::EmptyText => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::PredictionFailed(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            AppError::UnsupportedFileType => "UNSUPPORTED_FILE_TYPE",
            AppError::EmptyText => "EMPTY_TEXT",
            AppError::PredictionFailed(_) => "PREDICTION_FAILED",
            AppError::PayloadTooLarge { .. } => "PAYLOAD_TOO_LARGE",
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Message safe to show on the page or in the JSON envelope.
    /// Internal errors are logged and replaced by a generic message.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                "An internal server error occurred".to_string()
            }
            AppError::Validation(msg) => msg.clone(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "error": {
                "code": self.code(),
                "message": self.user_message()
            }
        }));

        (self.status(), body).into_response()
    }
}
