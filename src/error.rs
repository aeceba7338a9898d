//! Error handling

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

pub type AppResult<T> = Result<T, AppError>;

/// Failures surfaced by the prediction endpoints.
#[derive(Debug, Error)]
pub enum AppError {
    /// No model was loaded at startup
    #[error("Model not loaded")]
    ModelUnavailable,

    /// The request or upload was rejected before inference
    #[error("{0}")]
    InvalidInput(String),

    /// Anything else, including inference backend failures
    #[error("{0}")]
    Unhandled(String),
}

impl AppError {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        AppError::InvalidInput(msg.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::ModelUnavailable | AppError::InvalidInput(_) | AppError::Unhandled(_) => {
                StatusCode::BAD_REQUEST
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        match &self {
            AppError::Unhandled(msg) => tracing::error!("Unhandled error: {}", msg),
            other => tracing::warn!("Request rejected: {}", other),
        }

        let body = Json(json!({
            "error": self.to_string(),
            "status": status.as_u16()
        }));

        (status, body).into_response()
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Unhandled(format!("{:#}", err))
    }
}

impl From<axum::extract::multipart::MultipartError> for AppError {
    fn from(err: axum::extract::multipart::MultipartError) -> Self {
        AppError::InvalidInput(err.body_text())
    }
}

impl From<axum::extract::rejection::JsonRejection> for AppError {
    fn from(err: axum::extract::rejection::JsonRejection) -> Self {
        AppError::InvalidInput(err.body_text())
    }
}
