//! Track endpoints: random selection, detail and paged listing

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use yurt_common::db::TrackPage;
use yurt_common::Track;

use crate::error::{ApiError, ApiResult};
use crate::AppState;

/// Payload for the next track to play
#[derive(Debug, Serialize)]
pub struct RandomTrackResponse {
    pub id: i64,
    pub title: String,
    pub author: String,
    /// Whole seconds
    pub duration: i64,
    pub file_path: String,
    pub stream_url: String,
}

impl From<Track> for RandomTrackResponse {
    fn from(track: Track) -> Self {
        Self {
            stream_url: stream_url(track.id),
            id: track.id,
            title: track.title,
            author: track.author,
            duration: track.duration_seconds,
            file_path: track.file_path,
        }
    }
}

pub fn stream_url(id: i64) -> String {
    format!("/api/stream/{}", id)
}

/// Query parameters for the listing
#[derive(Debug, Deserialize)]
pub struct ListParams {
    /// Page number (1-indexed, default 1)
    pub page: Option<i64>,
    /// Tracks per page (default from configuration)
    pub limit: Option<i64>,
}

/// GET /api/track/random
pub async fn random_track(State(state): State<AppState>) -> ApiResult<Json<RandomTrackResponse>> {
    let track = state.selector.next_track().await?;
    Ok(Json(track.into()))
}

/// GET /api/track/:id
pub async fn get_track(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Track>> {
    let track = state
        .catalog
        .get_by_id(id)
        .await?
        .ok_or(ApiError::TrackNotFound(id))?;
    Ok(Json(track))
}

/// GET /api/tracks?page=&limit=
pub async fn list_tracks(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<TrackPage>> {
    let page = params.page.unwrap_or(1);
    let limit = params.limit.unwrap_or(state.config.page_size);

    let result = state.catalog.list_page(page, limit).await?;
    Ok(Json(result))
}

/// POST /api/track/recent/clear
pub async fn clear_recent(State(state): State<AppState>) -> axum::http::StatusCode {
    state.selector.clear().await;
    axum::http::StatusCode::NO_CONTENT
}
