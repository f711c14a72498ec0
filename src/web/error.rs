//! HTTP error responses.

use crate::image_proc::ProcessingError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Could not decode image: {0}")]
    Decode(ProcessingError),

    #[error("Image too large: {0}")]
    TooLarge(ProcessingError),
}

impl From<ProcessingError> for ApiError {
    fn from(e: ProcessingError) -> Self {
        if e.is_too_large() {
            ApiError::TooLarge(e)
        } else {
            ApiError::Decode(e)
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Decode(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::TooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
        };

        let body = Json(json!({
            "status": status.as_u16(),
            "error": self.to_string(),
        }));

        (status, body).into_response()
    }
}
