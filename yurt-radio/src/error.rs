//! Error types for the HTTP layer
//!
//! Every failure leaves the server as `{"error": {"code", "message"}}` with a
//! code the client can branch on.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Track selection against an empty catalog (404)
    #[error("No tracks available")]
    NoTracks,

    /// Statistics on an empty catalog (404)
    #[error("No tracks in catalog")]
    EmptyCatalog,

    /// Unknown track id (404)
    #[error("Track not found: {0}")]
    TrackNotFound(i64),

    /// Catalog row exists but the file is gone from disk (404)
    #[error("Audio file missing for track {0}")]
    FileMissing(i64),

    /// Invalid request (400)
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Conflict (409), e.g. a rescan already running
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Internal server error (500)
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl From<yurt_common::Error> for ApiError {
    fn from(err: yurt_common::Error) -> Self {
        use yurt_common::Error;

        match err {
            Error::NoTracksAvailable => ApiError::NoTracks,
            Error::EmptyCatalog => ApiError::EmptyCatalog,
            Error::TrackNotFound(id) => ApiError::TrackNotFound(id),
            Error::InvalidInput(msg) => ApiError::BadRequest(msg),
            Error::SyncInProgress => {
                ApiError::Conflict("Library synchronization already in progress".to_string())
            }
            Error::MusicRootMissing(path) => {
                error!("Music directory not found: {}", path.display());
                ApiError::Internal("Music library unavailable".to_string())
            }
            other => {
                error!("Request failed: {}", other);
                ApiError::Internal("Internal server error".to_string())
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code) = match self {
            ApiError::NoTracks => (StatusCode::NOT_FOUND, "NO_TRACKS"),
            ApiError::EmptyCatalog => (StatusCode::NOT_FOUND, "EMPTY_CATALOG"),
            ApiError::TrackNotFound(_) => (StatusCode::NOT_FOUND, "TRACK_NOT_FOUND"),
            ApiError::FileMissing(_) => (StatusCode::NOT_FOUND, "FILE_MISSING"),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            ApiError::Conflict(_) => (StatusCode::CONFLICT, "CONFLICT"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        };

        let message = match &self {
            ApiError::BadRequest(msg) | ApiError::Conflict(msg) | ApiError::Internal(msg) => {
                msg.clone()
            }
            other => other.to_string(),
        };

        let body = Json(json!({
            "error": {
                "code": error_code,
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
