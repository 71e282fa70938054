//! Errors surfaced by the HTTP handlers.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The payload's `answer` field was not a string.
    #[error("answer text must be a string")]
    UnparseableAnswer,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::UnparseableAnswer => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({ "error": self.to_string() });
        (self.status(), Json(body)).into_response()
    }
}
