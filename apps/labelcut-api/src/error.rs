//! Error types for the labelcut API

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use labelcut_core::SplitError;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error(transparent)]
    Split(#[from] SplitError),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message, skipped) = match &self {
            ApiError::InvalidRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone(), None),
            ApiError::Split(err) => match err {
                SplitError::UnsupportedInput(_) | SplitError::InvalidCrop { .. } => {
                    (StatusCode::BAD_REQUEST, err.to_string(), None)
                }
                SplitError::NoValidPages(skips) => (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    err.to_string(),
                    Some(skips.clone()),
                ),
                SplitError::Extraction(_) | SplitError::Operation(_) => {
                    tracing::error!("PDF processing error: {}", err);
                    (StatusCode::INTERNAL_SERVER_ERROR, err.to_string(), None)
                }
            },
            ApiError::Internal(e) => {
                tracing::error!("Internal error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal error".to_string(),
                    None,
                )
            }
        };

        let mut body = json!({
            "error": message,
            "status": status.as_u16(),
        });
        if let Some(skips) = skipped {
            if let Ok(value) = serde_json::to_value(skips) {
                body["skipped"] = value;
            }
        }

        (status, Json(body)).into_response()
    }
}
