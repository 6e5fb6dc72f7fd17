use axum::{
    Json,
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::media::BurnError;
use crate::media::subtitles::SubtitleError;

/**
    Errors returned by the HTTP handlers. Every variant renders as a JSON
    body of the form `{"error": ...}`.
*/
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Need video and srt files")]
    MissingFiles,

    #[error("{}", .0.body_text())]
    Multipart(#[from] MultipartError),

    #[error(transparent)]
    InvalidSubtitles(#[from] SubtitleError),

    #[error(transparent)]
    Burn(#[from] BurnError),

    #[error("{0}")]
    Internal(String),
}

impl From<std::io::Error> for ApiError {
    fn from(err: std::io::Error) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::MissingFiles => (
                StatusCode::BAD_REQUEST,
                serde_json::json!({ "error": "Need video and srt files" }),
            ),
            ApiError::Multipart(err) => (
                err.status(),
                serde_json::json!({ "error": err.body_text() }),
            ),
            ApiError::InvalidSubtitles(err) => (
                StatusCode::BAD_REQUEST,
                serde_json::json!({ "error": err.to_string() }),
            ),
            ApiError::Burn(BurnError::Timeout(_)) => (
                StatusCode::REQUEST_TIMEOUT,
                serde_json::json!({ "error": "Timeout - video too large" }),
            ),
            ApiError::Burn(BurnError::Failed { stdout, stderr, .. }) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                serde_json::json!({
                    "error": "FFmpeg failed",
                    "stdout": stdout,
                    "stderr": stderr,
                }),
            ),
            ApiError::Burn(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                serde_json::json!({ "error": err.to_string() }),
            ),
            ApiError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                serde_json::json!({ "error": msg }),
            ),
        };
        (status, Json(body)).into_response()
    }
}
