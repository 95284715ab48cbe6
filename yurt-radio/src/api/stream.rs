//! Audio streaming
//!
//! Serves the catalogued file with Range support. The MIME type comes from the
//! extension alone; play accounting happens at selection, not here.

use axum::{
    body::Body,
    extract::{Path, Request, State},
    http::{header, HeaderValue},
    response::Response,
};
use std::path::{Path as FsPath, PathBuf};
use tower::ServiceExt;
use tower_http::services::ServeFile;
use tracing::{debug, warn};
use yurt_common::formats::mime_for_path;

use crate::error::{ApiError, ApiResult};
use crate::AppState;

/// GET /api/stream/:id
pub async fn stream_track(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    request: Request,
) -> ApiResult<Response> {
    let track = state
        .catalog
        .get_by_id(id)
        .await?
        .ok_or(ApiError::TrackNotFound(id))?;

    let file_path = resolve_track_path(&state.config.music_directory, &track.file_path, id).await?;
    let mime = HeaderValue::from_static(mime_for_path(&file_path));

    debug!(track_id = id, path = %file_path.display(), mime = ?mime, "Streaming track");

    let mut response = ServeFile::new(&file_path)
        .oneshot(request)
        .await
        .map_err(|e| ApiError::Internal(format!("Failed to serve file: {}", e)))?
        .map(Body::new);

    // Replace the guessed type with the fixed one for the extension
    if response.status().is_success() {
        response.headers_mut().insert(header::CONTENT_TYPE, mime);
    }

    Ok(response)
}

/// Join the stored path onto the music root and make sure it stays inside it
async fn resolve_track_path(music_root: &FsPath, stored: &str, id: i64) -> ApiResult<PathBuf> {
    let candidate = music_root.join(stored);

    let resolved = match tokio::fs::canonicalize(&candidate).await {
        Ok(path) => path,
        Err(_) => {
            warn!(track_id = id, path = %candidate.display(), "Catalogued file missing on disk");
            return Err(ApiError::FileMissing(id));
        }
    };
    let root = tokio::fs::canonicalize(music_root)
        .await
        .map_err(|_| ApiError::FileMissing(id))?;

    if !resolved.starts_with(&root) {
        warn!(
            track_id = id,
            path = %resolved.display(),
            "Refusing to stream outside the music root"
        );
        return Err(ApiError::TrackNotFound(id));
    }
    if !resolved.is_file() {
        return Err(ApiError::FileMissing(id));
    }

    Ok(resolved)
}
